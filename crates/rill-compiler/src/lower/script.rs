//! Entry point specialization
//!
//! The script's entry point function needs IR the user never wrote: an
//! implicit return when not every path escapes, static metadata fields and
//! their getters, accessor values bridged into local variables, capability
//! probe methods, and a sandbox try/catch converting every runtime failure
//! into the uniform script exception.

use super::Lowerer;
use crate::ast::SFunction;
use crate::error::{LowerError, LowerResult};
use crate::ir::{
    BlockNode, CatchNode, ExpressionNode, FieldNode, FunctionNode, LocalFunction, MethodSig,
    Modifiers, StatementNode,
};
use crate::location::Location;
use crate::scope::exported_variable_name;
use crate::ty::{well_known, Const, Ty};

/// Sandboxed error kinds caught with empty diagnostic headers, in the order
/// their handlers are emitted. The diagnostic kind is handled separately and
/// first; the catch-all kind must stay last.
const SANDBOXED_KINDS: [&str; 5] = [
    well_known::RILL_ERROR,
    well_known::BOOTSTRAP_ERROR,
    well_known::OUT_OF_MEMORY_ERROR,
    well_known::STACK_OVERFLOW_ERROR,
    well_known::EXCEPTION,
];

impl<'a> Lowerer<'a> {
    pub(super) fn lower_execute(&mut self, function: &SFunction) -> LowerResult<()> {
        if self.specialized {
            return Err(LowerError::DuplicateEntryPoint {
                location: function.location.clone(),
                name: function.name.clone(),
            });
        }
        self.specialized = true;

        let info = self.scope.script_info();
        let return_ty = info.execute_return().clone();

        if function.parameters.len() != info.execute_arguments().len() {
            return Err(LowerError::MissingSignature {
                location: function.location.clone(),
                name: function.name.clone(),
            });
        }

        let method_escape = self.scope.method_escape(function.id);
        let mut block = self.lower_block(&function.block)?;

        if !method_escape {
            block.statements.push(default_return(
                &function.location,
                &return_ty,
            ));
            block.all_escape = true;
        }

        let parameter_names = info
            .execute_arguments()
            .iter()
            .map(|argument| argument.name.clone())
            .collect();
        let type_parameters = info
            .execute_arguments()
            .iter()
            .map(|argument| argument.ty.clone())
            .collect();

        self.inject_static_fields_and_getters();
        self.inject_gets_declarations(&mut block)?;
        self.inject_needs_methods()?;

        let mut node = FunctionNode {
            location: function.location.clone(),
            name: function.name.clone(),
            return_ty,
            parameter_names,
            type_parameters,
            is_static: false,
            is_vararg: false,
            is_synthetic: false,
            max_loop_counter: self.scope.settings().max_loop_counter,
            block,
        };

        inject_sandbox_exceptions(&mut node);

        let index = self.class.add_function(node);
        self.ir_functions.insert(function.id, index);
        Ok(())
    }

    /// Adds the static fields and getter methods the embedding contract
    /// requires of every compiled script: display name, source text, and the
    /// statement-boundary bitset, each populated externally at load time.
    fn inject_static_fields_and_getters(&mut self) {
        let location = Location::internal("inject_static_fields_and_getters");
        let modifiers = Modifiers::PUBLIC | Modifiers::STATIC;

        let fields = [
            ("$NAME", well_known::STRING),
            ("$SOURCE", well_known::STRING),
            ("$STATEMENTS", well_known::BIT_SET),
        ];

        for (name, ty_name) in fields {
            self.class.add_field(FieldNode {
                location: location.clone(),
                modifiers,
                ty: Ty::reference(ty_name),
                name: name.to_string(),
            });
        }

        let getters = [
            ("getName", "$NAME", well_known::STRING),
            ("getSource", "$SOURCE", well_known::STRING),
            ("getStatements", "$STATEMENTS", well_known::BIT_SET),
        ];

        for (getter, field, ty_name) in getters {
            let ty = Ty::reference(ty_name);
            let load = ExpressionNode::MemberFieldLoad {
                location: location.clone(),
                ty: ty.clone(),
                name: field.to_string(),
                is_static: true,
            };
            let body = StatementNode::Return {
                location: location.clone(),
                value: Some(load),
            };
            self.class
                .add_function(synthetic_method(&location, getter, ty, body));
        }
    }

    /// Bridges each accessor method whose derived name the script actually
    /// references into a local variable declared at the front of the entry
    /// point body. Unused accessors get no declaration so no frivolous
    /// variable slot is allocated.
    ///
    /// Declarations keep the accessor declaration order at the front of the
    /// block; that ordering is a tested contract.
    fn inject_gets_declarations(&mut self, block: &mut BlockNode) -> LowerResult<()> {
        let location = Location::internal("inject_gets_declarations");
        let mut declarations = Vec::new();

        for get_method in self.scope.script_info().get_methods() {
            let name = exported_variable_name(&get_method.name, 3, &location)?;
            if !self.scope.is_used_variable(&name) {
                continue;
            }

            let function = LocalFunction {
                name: get_method.name.clone(),
                return_ty: get_method.return_ty.clone(),
                parameter_tys: Vec::new(),
                is_internal: true,
                is_static: false,
            };
            let initializer = ExpressionNode::MemberCall {
                location: location.clone(),
                ty: get_method.return_ty.clone(),
                function,
                arguments: Vec::new(),
            };

            declarations.push(StatementNode::Declaration {
                location: location.clone(),
                name,
                ty: get_method.return_ty.clone(),
                initializer: Some(initializer),
            });
        }

        block.statements.splice(0..0, declarations);
        Ok(())
    }

    /// Synthesizes one boolean method per declared `needsX` method reporting
    /// whether the script references the probed name. Injection is
    /// unconditional; the host calls these virtually at load time to decide
    /// which optional inputs to supply.
    fn inject_needs_methods(&mut self) -> LowerResult<()> {
        let location = Location::internal("inject_needs_methods");

        for needs_method in self.scope.script_info().needs_methods() {
            let name = exported_variable_name(needs_method, 5, &location)?;
            let used = self.scope.is_used_variable(&name);

            let value = ExpressionNode::Constant {
                location: location.clone(),
                ty: Ty::Bool,
                value: Const::Bool(used),
            };
            let body = StatementNode::Return {
                location: location.clone(),
                value: Some(value),
            };
            self.class
                .add_function(synthetic_method(&location, needs_method, Ty::Bool, body));
        }

        Ok(())
    }
}

/// Default return appended when not every path through the entry point
/// escapes: nothing for void, the zero literal for primitives, a typed null
/// for references.
fn default_return(location: &Location, return_ty: &Ty) -> StatementNode {
    let value = match return_ty {
        Ty::Void => None,
        Ty::Bool => Some(zero_constant(location, return_ty, Const::Bool(false))),
        Ty::Byte => Some(zero_constant(location, return_ty, Const::Byte(0))),
        Ty::Char => Some(zero_constant(location, return_ty, Const::Char('\0'))),
        Ty::Short => Some(zero_constant(location, return_ty, Const::Short(0))),
        Ty::Int => Some(zero_constant(location, return_ty, Const::Int(0))),
        Ty::Long => Some(zero_constant(location, return_ty, Const::Long(0))),
        Ty::Float => Some(zero_constant(location, return_ty, Const::Float(0.0))),
        Ty::Double => Some(zero_constant(location, return_ty, Const::Double(0.0))),
        Ty::Ref(_) => Some(ExpressionNode::Null {
            location: location.clone(),
            ty: return_ty.clone(),
        }),
    };

    StatementNode::Return {
        location: location.clone(),
        value,
    }
}

fn zero_constant(location: &Location, ty: &Ty, value: Const) -> ExpressionNode {
    ExpressionNode::Constant {
        location: location.clone(),
        ty: ty.clone(),
        value,
    }
}

/// Single-statement synthetic instance method with no loop budget
fn synthetic_method(
    location: &Location,
    name: &str,
    return_ty: Ty,
    statement: StatementNode,
) -> FunctionNode {
    let mut block = BlockNode::new(location.clone());
    block.all_escape = true;
    block.statements.push(statement);

    FunctionNode {
        location: location.clone(),
        name: name.to_string(),
        return_ty,
        parameter_names: Vec::new(),
        type_parameters: Vec::new(),
        is_static: false,
        is_vararg: false,
        is_synthetic: true,
        max_loop_counter: 0,
        block,
    }
}

/// Wraps the entry point body so the compiled script behaves as:
///
/// ```text
/// try { ... } catch (ExplainError e) {
///     throw this.convertToScriptException(e, e.getHeaders($DEFINITION))
/// } catch (RillError | BootstrapError | OutOfMemoryError
///          | StackOverflowError | Exception e) {
///     throw this.convertToScriptException(e, Maps.emptyMap())
/// }
/// ```
///
/// The diagnostic kind comes first and the catch-all kind last; downstream
/// consumers validate the handler order against the source line mapping.
fn inject_sandbox_exceptions(function: &mut FunctionNode) {
    let location = Location::internal("inject_sandbox_exceptions");

    let body = std::mem::replace(&mut function.block, BlockNode::new(location.clone()));
    let all_escape = body.all_escape;
    let body_location = body.location.clone();

    let mut catches = Vec::with_capacity(1 + SANDBOXED_KINDS.len());
    catches.push(explain_handler(&location));
    for kind in SANDBOXED_KINDS {
        catches.push(uniform_handler(&location, kind));
    }

    let try_statement = StatementNode::Try {
        location: location.clone(),
        block: body,
        catches,
    };

    let mut wrapper = BlockNode::new(body_location);
    wrapper.all_escape = all_escape;
    wrapper.statements.push(try_statement);
    function.block = wrapper;
}

/// Handler for the diagnostic error kind; the only one that forwards
/// headers, read from the caught error against the active type lookup.
fn explain_handler(location: &Location) -> CatchNode {
    let caught_ty = Ty::reference(well_known::EXPLAIN_ERROR);
    let symbol = catch_symbol(well_known::EXPLAIN_ERROR);
    let map_ty = Ty::reference(well_known::MAP);

    let caught = ExpressionNode::Variable {
        location: location.clone(),
        ty: caught_ty.clone(),
        name: symbol.clone(),
    };

    let definition = ExpressionNode::MemberFieldLoad {
        location: location.clone(),
        ty: Ty::reference(well_known::TYPE_LOOKUP),
        name: "$DEFINITION".to_string(),
        is_static: true,
    };

    let get_headers = ExpressionNode::Invoke {
        location: location.clone(),
        ty: map_ty.clone(),
        method: MethodSig {
            owner: caught_ty.clone(),
            name: "getHeaders".to_string(),
            return_ty: map_ty.clone(),
            parameter_tys: vec![Ty::reference(well_known::TYPE_LOOKUP)],
        },
        arguments: vec![definition],
    };

    let headers = ExpressionNode::Call {
        location: location.clone(),
        ty: map_ty,
        receiver: Box::new(caught.clone()),
        invocation: Box::new(get_headers),
    };

    CatchNode {
        location: location.clone(),
        exception_ty: caught_ty,
        symbol,
        block: handler_block(location, caught, headers),
    }
}

/// Handler for one of the non-diagnostic kinds; headers are empty since no
/// diagnostic context is available for these.
fn uniform_handler(location: &Location, kind: &str) -> CatchNode {
    let caught_ty = Ty::reference(kind);
    let symbol = catch_symbol(kind);
    let map_ty = Ty::reference(well_known::MAP);
    let maps_ty = Ty::reference(well_known::MAPS);

    let caught = ExpressionNode::Variable {
        location: location.clone(),
        ty: caught_ty.clone(),
        name: symbol.clone(),
    };

    let empty_map = ExpressionNode::Invoke {
        location: location.clone(),
        ty: map_ty.clone(),
        method: MethodSig {
            owner: maps_ty.clone(),
            name: "emptyMap".to_string(),
            return_ty: map_ty.clone(),
            parameter_tys: Vec::new(),
        },
        arguments: Vec::new(),
    };

    let headers = ExpressionNode::Call {
        location: location.clone(),
        ty: map_ty,
        receiver: Box::new(ExpressionNode::Static {
            location: location.clone(),
            ty: maps_ty,
        }),
        invocation: Box::new(empty_map),
    };

    CatchNode {
        location: location.clone(),
        exception_ty: caught_ty,
        symbol,
        block: handler_block(location, caught, headers),
    }
}

/// Single-statement handler body:
/// `throw this.convertToScriptException(caught, headers)`
fn handler_block(
    location: &Location,
    caught: ExpressionNode,
    headers: ExpressionNode,
) -> BlockNode {
    let exception_ty = Ty::reference(well_known::SCRIPT_EXCEPTION);

    let convert = ExpressionNode::MemberCall {
        location: location.clone(),
        ty: exception_ty.clone(),
        function: LocalFunction {
            name: "convertToScriptException".to_string(),
            return_ty: exception_ty,
            parameter_tys: vec![
                Ty::reference(well_known::THROWABLE),
                Ty::reference(well_known::MAP),
            ],
            is_internal: true,
            is_static: false,
        },
        arguments: vec![caught, headers],
    };

    let mut block = BlockNode::new(location.clone());
    block.all_escape = true;
    block.statements.push(StatementNode::Throw {
        location: location.clone(),
        value: convert,
    });
    block
}

/// Handler binding name for a caught kind: `RillError` binds `#rillError`
fn catch_symbol(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => format!("#{}{}", first.to_lowercase(), chars.as_str()),
        None => "#".to_string(),
    }
}
