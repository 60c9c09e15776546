//! User tree to IR tree lowering
//!
//! Converts the analyzed, decorated user tree into the IR tree consumed by
//! code generation. Ordinary constructs lower structurally one-to-one; the
//! function named as the script's entry point additionally receives the
//! injection steps in `script.rs`.

mod expr;
mod script;
mod stmt;

use crate::ast::{NodeId, SBlock, SClass, SFunction};
use crate::error::LowerResult;
use crate::ir::{BlockNode, ClassNode, FunctionNode, StatementNode};
use crate::location::Location;
use crate::scope::ScriptScope;
use crate::ty::Ty;
use rustc_hash::FxHashMap;

/// Result of lowering one script: the assembled class plus the association
/// from each user function node to its IR counterpart
#[derive(Debug)]
pub struct LoweredScript {
    pub class: ClassNode,
    functions: FxHashMap<NodeId, usize>,
}

impl LoweredScript {
    /// IR function lowered from the given user function node
    pub fn function_for(&self, id: NodeId) -> Option<&FunctionNode> {
        self.functions
            .get(&id)
            .and_then(|&index| self.class.functions.get(index))
    }
}

/// Lower a script's user tree to its IR tree
pub fn lower_script(class: &SClass, scope: &ScriptScope) -> LowerResult<LoweredScript> {
    Lowerer::new(scope).lower_class(class)
}

/// User tree to IR tree lowerer, one instance per compiled script
pub(crate) struct Lowerer<'a> {
    scope: &'a ScriptScope,
    class: ClassNode,
    ir_functions: FxHashMap<NodeId, usize>,
    /// Set once the entry point has been lowered; a second entry point in
    /// the same compilation is a malformed tree
    specialized: bool,
}

impl<'a> Lowerer<'a> {
    fn new(scope: &'a ScriptScope) -> Self {
        Self {
            scope,
            class: ClassNode::new(Location::internal("class"), "Script"),
            ir_functions: FxHashMap::default(),
            specialized: false,
        }
    }

    fn lower_class(mut self, class: &SClass) -> LowerResult<LoweredScript> {
        self.class.location = class.location.clone();

        for function in &class.functions {
            self.lower_function(function)?;
        }

        Ok(LoweredScript {
            class: self.class,
            functions: self.ir_functions,
        })
    }

    fn lower_function(&mut self, function: &SFunction) -> LowerResult<()> {
        if function.name == self.scope.settings().entry_point {
            return self.lower_execute(function);
        }

        let mut block = self.lower_block(&function.block)?;

        // A void function may fall off the end of its body; give it an
        // explicit return so code generation never sees an open block.
        if !self.scope.method_escape(function.id) && function.return_ty.is_void() {
            block.statements.push(StatementNode::Return {
                location: function.location.clone(),
                value: None,
            });
            block.all_escape = true;
        }

        let (parameter_names, type_parameters) = split_parameters(&function.parameters);

        let node = FunctionNode {
            location: function.location.clone(),
            name: function.name.clone(),
            return_ty: function.return_ty.clone(),
            parameter_names,
            type_parameters,
            is_static: false,
            is_vararg: false,
            is_synthetic: false,
            max_loop_counter: self.scope.settings().max_loop_counter,
            block,
        };

        let index = self.class.add_function(node);
        self.ir_functions.insert(function.id, index);
        Ok(())
    }

    fn lower_block(&mut self, block: &SBlock) -> LowerResult<BlockNode> {
        let mut statements = Vec::with_capacity(block.statements.len());
        for statement in &block.statements {
            statements.push(self.lower_statement(statement)?);
        }

        Ok(BlockNode {
            location: block.location.clone(),
            statements,
            all_escape: self.scope.all_escape(block.id),
        })
    }
}

fn split_parameters(parameters: &[(String, Ty)]) -> (Vec<String>, Vec<Ty>) {
    parameters.iter().cloned().unzip()
}
