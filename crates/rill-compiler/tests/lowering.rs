//! Lowering tests for the entry point specialization and the generic pass

use rill_compiler::ast::{
    NodeId, SBlock, SCatch, SClass, SExpression, SExpressionKind, SFunction, SStatement,
    SStatementKind,
};
use rill_compiler::ir::{
    BlockNode, CatchNode, ExpressionNode, FunctionNode, Modifiers, StatementNode,
};
use rill_compiler::ty::well_known;
use rill_compiler::{
    lower_script, CompilerSettings, Const, GetMethod, Location, LowerError, LoweredScript,
    MethodArgument, ScriptClassInfo, ScriptScope, Ty,
};

const CLASS_ID: NodeId = NodeId(0);
const EXEC_ID: NodeId = NodeId(1);
const EXEC_BLOCK_ID: NodeId = NodeId(2);

fn sloc() -> Location {
    Location::new("test.rill", 0)
}

fn stmt(id: u32, kind: SStatementKind) -> SStatement {
    SStatement {
        id: NodeId::new(id),
        location: sloc(),
        kind,
    }
}

fn int_const(value: i32) -> SExpression {
    SExpression {
        location: sloc(),
        ty: Ty::Int,
        kind: SExpressionKind::Constant(Const::Int(value)),
    }
}

fn variable(name: &str, ty: Ty) -> SExpression {
    SExpression {
        location: sloc(),
        ty,
        kind: SExpressionKind::Variable(name.to_string()),
    }
}

fn execute_fn(parameters: Vec<(String, Ty)>, statements: Vec<SStatement>) -> SFunction {
    SFunction {
        id: EXEC_ID,
        location: sloc(),
        name: "execute".to_string(),
        return_ty: Ty::Int,
        parameters,
        block: SBlock {
            id: EXEC_BLOCK_ID,
            location: sloc(),
            statements,
        },
    }
}

fn script(functions: Vec<SFunction>) -> SClass {
    SClass {
        id: CLASS_ID,
        location: sloc(),
        functions,
    }
}

fn base_info(execute_return: Ty) -> ScriptClassInfo {
    ScriptClassInfo::new(Vec::new(), execute_return, Vec::new(), Vec::new())
}

fn scope_of(info: ScriptClassInfo, used: &[&str], method_escape: bool) -> ScriptScope {
    let mut scope = ScriptScope::new(info, CompilerSettings::default());
    for name in used {
        scope.add_used_variable(*name);
    }
    if method_escape {
        scope.mark_method_escape(EXEC_ID);
        scope.mark_all_escape(EXEC_BLOCK_ID);
    }
    scope
}

fn lower_execute(statements: Vec<SStatement>, scope: &ScriptScope) -> LoweredScript {
    lower_script(&script(vec![execute_fn(Vec::new(), statements)]), scope)
        .expect("lowering failed")
}

fn execute_node(lowered: &LoweredScript) -> &FunctionNode {
    lowered.function_for(EXEC_ID).expect("no execute function")
}

/// Unwrap the sandbox try around the entry point body
fn sandbox(function: &FunctionNode) -> (&BlockNode, &[CatchNode]) {
    assert_eq!(
        function.block.statements.len(),
        1,
        "entry point body must be exactly the sandbox wrap"
    );
    match &function.block.statements[0] {
        StatementNode::Try { block, catches, .. } => (block, catches),
        other => panic!("expected sandbox try, got {:?}", other),
    }
}

#[test]
fn test_implicit_return_int_zero() {
    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    assert!(body.all_escape);
    match body.statements.last() {
        Some(StatementNode::Return {
            value: Some(ExpressionNode::Constant { ty, value, .. }),
            ..
        }) => {
            assert_eq!(*ty, Ty::Int);
            assert_eq!(*value, Const::Int(0));
        }
        other => panic!("expected implicit int return, got {:?}", other),
    }
}

#[test]
fn test_implicit_return_per_primitive_kind() {
    let cases = [
        (Ty::Bool, Const::Bool(false)),
        (Ty::Byte, Const::Byte(0)),
        (Ty::Char, Const::Char('\0')),
        (Ty::Short, Const::Short(0)),
        (Ty::Long, Const::Long(0)),
        (Ty::Float, Const::Float(0.0)),
        (Ty::Double, Const::Double(0.0)),
    ];

    for (ty, expected) in cases {
        let scope = scope_of(base_info(ty.clone()), &[], false);
        let lowered = lower_execute(Vec::new(), &scope);
        let (body, _) = sandbox(execute_node(&lowered));

        match body.statements.last() {
            Some(StatementNode::Return {
                value: Some(ExpressionNode::Constant { value, .. }),
                ..
            }) => assert_eq!(*value, expected, "wrong zero literal for {}", ty),
            other => panic!("expected implicit {} return, got {:?}", ty, other),
        }
    }
}

#[test]
fn test_implicit_return_void_is_bare() {
    let scope = scope_of(base_info(Ty::Void), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    assert!(matches!(
        body.statements.last(),
        Some(StatementNode::Return { value: None, .. })
    ));
}

#[test]
fn test_implicit_return_reference_is_typed_null() {
    let map = Ty::reference("Map");
    let scope = scope_of(base_info(map.clone()), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    match body.statements.last() {
        Some(StatementNode::Return {
            value: Some(ExpressionNode::Null { ty, .. }),
            ..
        }) => assert_eq!(*ty, map),
        other => panic!("expected null return, got {:?}", other),
    }
}

#[test]
fn test_no_implicit_return_when_method_escapes() {
    let scope = scope_of(base_info(Ty::Int), &[], true);
    let statements = vec![stmt(10, SStatementKind::Return(Some(int_const(42))))];
    let lowered = lower_execute(statements, &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    assert_eq!(body.statements.len(), 1);
    assert!(body.all_escape);
}

#[test]
fn test_gets_declaration_for_used_name() {
    let map = Ty::reference("Map");
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        vec![GetMethod {
            name: "getCtx".to_string(),
            return_ty: map.clone(),
        }],
        Vec::new(),
    );
    let scope = scope_of(info, &["ctx"], true);
    let statements = vec![stmt(10, SStatementKind::Return(Some(int_const(0))))];
    let lowered = lower_execute(statements, &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    assert_eq!(body.statements.len(), 2);
    match &body.statements[0] {
        StatementNode::Declaration {
            name,
            ty,
            initializer: Some(ExpressionNode::MemberCall { function, .. }),
            location,
        } => {
            assert_eq!(name, "ctx");
            assert_eq!(*ty, map);
            assert_eq!(function.name, "getCtx");
            assert_eq!(function.return_ty, map);
            assert!(function.is_internal);
            assert!(function.parameter_tys.is_empty());
            assert!(location.is_internal());
        }
        other => panic!("expected bridged declaration, got {:?}", other),
    }
}

#[test]
fn test_gets_declaration_skipped_when_unused() {
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        vec![GetMethod {
            name: "getCtx".to_string(),
            return_ty: Ty::reference("Map"),
        }],
        Vec::new(),
    );
    let scope = scope_of(info, &[], true);
    let statements = vec![stmt(10, SStatementKind::Return(Some(int_const(0))))];
    let lowered = lower_execute(statements, &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    assert_eq!(body.statements.len(), 1);
    assert!(!matches!(
        body.statements[0],
        StatementNode::Declaration { .. }
    ));
}

#[test]
fn test_gets_declarations_keep_declared_order() {
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        vec![
            GetMethod {
                name: "getAlpha".to_string(),
                return_ty: Ty::Int,
            },
            GetMethod {
                name: "getBeta".to_string(),
                return_ty: Ty::Double,
            },
        ],
        Vec::new(),
    );
    let scope = scope_of(info, &["alpha", "beta"], true);
    let statements = vec![stmt(10, SStatementKind::Return(Some(int_const(0))))];
    let lowered = lower_execute(statements, &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    let names: Vec<&str> = body
        .statements
        .iter()
        .filter_map(|s| match s {
            StatementNode::Declaration { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["alpha", "beta"]);
}

#[test]
fn test_needs_method_reports_used_name() {
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        Vec::new(),
        vec!["needsScore".to_string()],
    );
    let scope = scope_of(info, &["score"], true);
    let lowered = lower_execute(
        vec![stmt(10, SStatementKind::Return(Some(int_const(0))))],
        &scope,
    );

    let needs = lowered
        .class
        .function("needsScore")
        .expect("needsScore not injected");
    assert!(needs.is_synthetic);
    assert_eq!(needs.return_ty, Ty::Bool);
    assert_eq!(needs.max_loop_counter, 0);
    assert_eq!(needs.block.statements.len(), 1);

    match &needs.block.statements[0] {
        StatementNode::Return {
            value: Some(ExpressionNode::Constant { value, .. }),
            ..
        } => assert_eq!(*value, Const::Bool(true)),
        other => panic!("expected constant return, got {:?}", other),
    }
}

#[test]
fn test_needs_method_injected_even_when_unused() {
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        Vec::new(),
        vec!["needsScore".to_string()],
    );
    // No used variables and an escaping body: injection must still happen
    let scope = scope_of(info, &[], true);
    let lowered = lower_execute(
        vec![stmt(10, SStatementKind::Return(Some(int_const(0))))],
        &scope,
    );

    let needs = lowered
        .class
        .function("needsScore")
        .expect("needsScore not injected");
    match &needs.block.statements[0] {
        StatementNode::Return {
            value: Some(ExpressionNode::Constant { value, .. }),
            ..
        } => assert_eq!(*value, Const::Bool(false)),
        other => panic!("expected constant return, got {:?}", other),
    }
}

#[test]
fn test_sandbox_handler_order() {
    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (_, catches) = sandbox(execute_node(&lowered));

    let expected = [
        well_known::EXPLAIN_ERROR,
        well_known::RILL_ERROR,
        well_known::BOOTSTRAP_ERROR,
        well_known::OUT_OF_MEMORY_ERROR,
        well_known::STACK_OVERFLOW_ERROR,
        well_known::EXCEPTION,
    ];
    assert_eq!(catches.len(), expected.len());
    for (catch, kind) in catches.iter().zip(expected) {
        assert_eq!(catch.exception_ty, Ty::reference(kind));
        assert!(catch.location.is_internal());
        assert!(catch.block.all_escape);
        assert_eq!(
            catch.block.statements.len(),
            1,
            "handler for {} must be a single throw",
            kind
        );
    }
}

#[test]
fn test_sandbox_handlers_convert_to_script_exception() {
    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (_, catches) = sandbox(execute_node(&lowered));

    for catch in catches {
        let convert = match &catch.block.statements[0] {
            StatementNode::Throw {
                value: ExpressionNode::MemberCall { function, arguments, .. },
                ..
            } => {
                assert_eq!(function.name, "convertToScriptException");
                assert_eq!(
                    function.return_ty,
                    Ty::reference(well_known::SCRIPT_EXCEPTION)
                );
                assert!(function.is_internal);
                arguments
            }
            other => panic!("expected thrown conversion, got {:?}", other),
        };

        assert_eq!(convert.len(), 2);
        match &convert[0] {
            ExpressionNode::Variable { name, .. } => assert_eq!(*name, catch.symbol),
            other => panic!("expected caught variable, got {:?}", other),
        }
    }
}

#[test]
fn test_only_explain_handler_forwards_headers() {
    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);
    let (_, catches) = sandbox(execute_node(&lowered));

    // First handler: headers read from the caught error with $DEFINITION
    match &catches[0].block.statements[0] {
        StatementNode::Throw {
            value: ExpressionNode::MemberCall { arguments, .. },
            ..
        } => match &arguments[1] {
            ExpressionNode::Call {
                receiver,
                invocation,
                ..
            } => {
                assert!(matches!(
                    receiver.as_ref(),
                    ExpressionNode::Variable { name, .. }
                        if name == &catches[0].symbol
                ));
                match invocation.as_ref() {
                    ExpressionNode::Invoke {
                        method, arguments, ..
                    } => {
                        assert_eq!(method.name, "getHeaders");
                        assert_eq!(arguments.len(), 1);
                        assert!(matches!(
                            &arguments[0],
                            ExpressionNode::MemberFieldLoad { name, is_static: true, .. }
                                if name == "$DEFINITION"
                        ));
                    }
                    other => panic!("expected getHeaders invoke, got {:?}", other),
                }
            }
            other => panic!("expected headers call, got {:?}", other),
        },
        other => panic!("expected thrown conversion, got {:?}", other),
    }

    // Remaining handlers: empty headers mapping
    for catch in &catches[1..] {
        match &catch.block.statements[0] {
            StatementNode::Throw {
                value: ExpressionNode::MemberCall { arguments, .. },
                ..
            } => match &arguments[1] {
                ExpressionNode::Call {
                    receiver,
                    invocation,
                    ..
                } => {
                    assert!(matches!(
                        receiver.as_ref(),
                        ExpressionNode::Static { ty, .. }
                            if *ty == Ty::reference(well_known::MAPS)
                    ));
                    assert!(matches!(
                        invocation.as_ref(),
                        ExpressionNode::Invoke { method, arguments, .. }
                            if method.name == "emptyMap" && arguments.is_empty()
                    ));
                }
                other => panic!("expected empty headers call, got {:?}", other),
            },
            other => panic!("expected thrown conversion, got {:?}", other),
        }
    }
}

#[test]
fn test_metadata_fields_and_getters_injected_once() {
    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_execute(Vec::new(), &scope);

    let field_names: Vec<&str> = lowered
        .class
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(field_names, ["$NAME", "$SOURCE", "$STATEMENTS"]);

    for field in &lowered.class.fields {
        assert!(field.modifiers.contains(Modifiers::PUBLIC | Modifiers::STATIC));
        assert!(field.location.is_internal());
    }

    for (getter, field, ty_name) in [
        ("getName", "$NAME", "String"),
        ("getSource", "$SOURCE", "String"),
        ("getStatements", "$STATEMENTS", "BitSet"),
    ] {
        let count = lowered
            .class
            .functions
            .iter()
            .filter(|f| f.name == getter)
            .count();
        assert_eq!(count, 1, "{} must be injected exactly once", getter);

        let function = lowered.class.function(getter).unwrap();
        assert!(function.is_synthetic);
        assert_eq!(function.return_ty, Ty::reference(ty_name));
        assert_eq!(function.max_loop_counter, 0);
        assert_eq!(function.block.statements.len(), 1);
        match &function.block.statements[0] {
            StatementNode::Return {
                value: Some(ExpressionNode::MemberFieldLoad { name, is_static, .. }),
                ..
            } => {
                assert_eq!(name, field);
                assert!(*is_static);
            }
            other => panic!("expected static field load, got {:?}", other),
        }
    }
}

#[test]
fn test_duplicate_entry_point_rejected() {
    let mut second = execute_fn(Vec::new(), Vec::new());
    second.id = NodeId::new(50);
    second.block.id = NodeId::new(51);

    let user_class = script(vec![execute_fn(Vec::new(), Vec::new()), second]);
    let scope = scope_of(base_info(Ty::Int), &[], false);

    let err = lower_script(&user_class, &scope).unwrap_err();
    assert!(matches!(err, LowerError::DuplicateEntryPoint { .. }));
}

#[test]
fn test_round_trip_injects_only_metadata_and_sandbox() {
    // No accessors, no needs methods, escaping body: the injected content is
    // exactly the metadata fields/getters and the sandbox wrap.
    let scope = scope_of(base_info(Ty::Int), &[], true);
    let statements = vec![stmt(10, SStatementKind::Return(Some(int_const(7))))];
    let lowered = lower_execute(statements, &scope);

    assert_eq!(lowered.class.fields.len(), 3);
    let names: Vec<&str> = lowered
        .class
        .functions
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["getName", "getSource", "getStatements", "execute"]);

    let (body, _) = sandbox(execute_node(&lowered));
    assert_eq!(body.statements.len(), 1);
    assert!(matches!(body.statements[0], StatementNode::Return { .. }));
}

#[test]
fn test_execute_signature_from_metadata() {
    let map = Ty::reference("Map");
    let info = ScriptClassInfo::new(
        vec![
            MethodArgument {
                name: "ctx".to_string(),
                ty: map.clone(),
            },
            MethodArgument {
                name: "value".to_string(),
                ty: Ty::Double,
            },
        ],
        Ty::Int,
        Vec::new(),
        Vec::new(),
    );
    let scope = scope_of(info, &[], false);

    let parameters = vec![
        ("ctx".to_string(), map.clone()),
        ("value".to_string(), Ty::Double),
    ];
    let lowered = lower_script(&script(vec![execute_fn(parameters, Vec::new())]), &scope)
        .expect("lowering failed");

    let execute = execute_node(&lowered);
    assert_eq!(execute.parameter_names, ["ctx", "value"]);
    assert_eq!(execute.type_parameters, [map, Ty::Double]);
    assert!(!execute.is_static);
    assert!(!execute.is_vararg);
    assert!(!execute.is_synthetic);
    assert_eq!(
        execute.max_loop_counter,
        CompilerSettings::default().max_loop_counter
    );
}

#[test]
fn test_execute_parameter_mismatch_is_an_error() {
    let info = ScriptClassInfo::new(
        vec![MethodArgument {
            name: "ctx".to_string(),
            ty: Ty::reference("Map"),
        }],
        Ty::Int,
        Vec::new(),
        Vec::new(),
    );
    let scope = scope_of(info, &[], false);

    let err = lower_script(&script(vec![execute_fn(Vec::new(), Vec::new())]), &scope).unwrap_err();
    assert!(matches!(err, LowerError::MissingSignature { .. }));
}

#[test]
fn test_generic_function_gets_no_injections() {
    let helper = SFunction {
        id: NodeId::new(30),
        location: Location::new("test.rill", 5),
        name: "helper".to_string(),
        return_ty: Ty::Void,
        parameters: vec![("x".to_string(), Ty::Int)],
        block: SBlock {
            id: NodeId::new(31),
            location: Location::new("test.rill", 5),
            statements: vec![stmt(
                32,
                SStatementKind::Expression(variable("x", Ty::Int)),
            )],
        },
    };

    let scope = scope_of(base_info(Ty::Int), &[], false);
    let lowered = lower_script(&script(vec![helper]), &scope).expect("lowering failed");

    // No entry point in this script: nothing was injected
    assert!(lowered.class.fields.is_empty());
    assert_eq!(lowered.class.functions.len(), 1);

    let function = lowered.function_for(NodeId::new(30)).unwrap();
    assert_eq!(function.name, "helper");
    assert!(!function.is_synthetic);
    assert_eq!(function.location, Location::new("test.rill", 5));
    assert_eq!(function.parameter_names, ["x"]);
    assert_eq!(function.type_parameters, [Ty::Int]);

    // Void fall-through still gets an explicit bare return
    assert_eq!(function.block.statements.len(), 2);
    assert!(matches!(
        function.block.statements[1],
        StatementNode::Return { value: None, .. }
    ));
    assert!(function.block.all_escape);
}

#[test]
fn test_generic_try_lowering_preserves_handler_order() {
    let catch_a = SCatch {
        id: NodeId::new(40),
        location: sloc(),
        exception_ty: Ty::reference("ParseError"),
        name: "a".to_string(),
        block: SBlock {
            id: NodeId::new(41),
            location: sloc(),
            statements: Vec::new(),
        },
    };
    let catch_b = SCatch {
        id: NodeId::new(42),
        location: sloc(),
        exception_ty: Ty::reference("Exception"),
        name: "b".to_string(),
        block: SBlock {
            id: NodeId::new(43),
            location: sloc(),
            statements: Vec::new(),
        },
    };

    let statements = vec![
        stmt(
            10,
            SStatementKind::Try {
                block: SBlock {
                    id: NodeId::new(44),
                    location: sloc(),
                    statements: Vec::new(),
                },
                catches: vec![catch_a, catch_b],
            },
        ),
        stmt(11, SStatementKind::Return(Some(int_const(0)))),
    ];

    let scope = scope_of(base_info(Ty::Int), &[], true);
    let lowered = lower_execute(statements, &scope);
    let (body, _) = sandbox(execute_node(&lowered));

    match &body.statements[0] {
        StatementNode::Try { catches, .. } => {
            assert_eq!(catches.len(), 2);
            assert_eq!(catches[0].exception_ty, Ty::reference("ParseError"));
            assert_eq!(catches[0].symbol, "a");
            assert_eq!(catches[1].exception_ty, Ty::reference("Exception"));
        }
        other => panic!("expected user try, got {:?}", other),
    }
}

#[test]
fn test_catching_primitive_type_is_an_error() {
    let statements = vec![stmt(
        10,
        SStatementKind::Try {
            block: SBlock {
                id: NodeId::new(44),
                location: sloc(),
                statements: Vec::new(),
            },
            catches: vec![SCatch {
                id: NodeId::new(45),
                location: sloc(),
                exception_ty: Ty::Int,
                name: "bad".to_string(),
                block: SBlock {
                    id: NodeId::new(46),
                    location: sloc(),
                    statements: Vec::new(),
                },
            }],
        },
    )];

    let scope = scope_of(base_info(Ty::Int), &[], false);
    let err = lower_script(&script(vec![execute_fn(Vec::new(), statements)]), &scope).unwrap_err();
    assert!(matches!(err, LowerError::IllegalTree { .. }));
}

#[test]
fn test_invalid_accessor_name_is_an_error() {
    let info = ScriptClassInfo::new(
        Vec::new(),
        Ty::Int,
        vec![GetMethod {
            name: "get".to_string(),
            return_ty: Ty::Int,
        }],
        Vec::new(),
    );
    let scope = scope_of(info, &[], false);
    let err = lower_script(&script(vec![execute_fn(Vec::new(), Vec::new())]), &scope).unwrap_err();
    assert!(matches!(err, LowerError::InvalidAccessorName { .. }));
}
