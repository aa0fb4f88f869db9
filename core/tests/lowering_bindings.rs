mod common;

use common::{fixture, init, lower_err, print, run};
use dragonc_core::ir::{IROp, Value};
use dragonc_core::lower::LowerCtx;
use dragonc_core::{AstNode, Interpreter, LowerConfig, LoweringErrorKind};

#[test]
fn declare_assign_use_round_trip() {
    let out = run(vec![
        AstNode::declare("x"),
        AstNode::assign(AstNode::var("x"), AstNode::integer(41)),
        AstNode::assign(AstNode::var("x"), AstNode::add(AstNode::var("x"), AstNode::integer(1))),
        print(AstNode::var("x")),
    ]);
    assert_eq!(out, vec!["42\n"]);
}

#[test]
fn declaration_yields_storage_not_value() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    let ptr = AstNode::declare("x").emit_code(&mut cx).expect("declare");
    assert_eq!(ptr, Value::Inst(0));
    assert_eq!(cx.builder.ops(), &[IROp::Alloca { name: "x".to_string() }]);

    let addr = AstNode::var_address("x").emit_code(&mut cx).expect("address");
    assert_eq!(addr, ptr);
    // address mode emits nothing
    assert_eq!(cx.builder.current_len(), 1);
}

#[test]
fn declaration_get_value_reloads_every_time() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    let decl = AstNode::declare("x");
    let ptr = decl.emit_code(&mut cx).expect("declare");
    AstNode::assign(AstNode::var("x"), AstNode::integer(7)).emit_code(&mut cx).expect("assign 7");
    let first = decl.get_value(&mut cx).expect("get").expect("some");
    AstNode::assign(AstNode::var("x"), AstNode::integer(9)).emit_code(&mut cx).expect("assign 9");
    let second = decl.get_value(&mut cx).expect("get").expect("some");

    assert_ne!(first, second);
    let ops = cx.builder.ops();
    assert!(matches!(ops.last(), Some(IROp::Load { ptr: p }) if *p == ptr));

    let sum = cx
        .builder
        .build_binary(cx.module, dragonc_core::ir::BinOp::Mul, first, second)
        .expect("mul");
    cx.builder.build_ret(cx.module, Some(sum)).expect("ret");
    builder.finalize_into(&mut module).expect("finalize");

    let mut vm = Interpreter::new(&module);
    assert_eq!(vm.call("main", &[]).expect("run"), Some(63));
}

#[test]
fn use_get_value_resolves_again_on_every_call() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    let ptr = AstNode::declare("x").emit_code(&mut cx).expect("declare");
    let use_x = AstNode::var("x");
    let first = use_x.get_value(&mut cx).expect("get").expect("some");
    let second = use_x.get_value(&mut cx).expect("get").expect("some");

    assert_eq!(first, Value::Inst(1));
    assert_eq!(second, Value::Inst(2));
    assert_eq!(cx.builder.ops()[1], IROp::Load { ptr });
    assert_eq!(cx.builder.ops()[2], IROp::Load { ptr });

    let addr = AstNode::var_address("x").get_value(&mut cx).expect("get");
    assert_eq!(addr, Some(ptr));
    assert_eq!(cx.builder.current_len(), 3);
}

#[test]
fn use_get_value_of_unknown_name_fails() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    let err = AstNode::var("nope").get_value(&mut cx).expect_err("unbound");
    assert_eq!(err.kind(), LoweringErrorKind::UnresolvedName);
    assert_eq!(cx.builder.current_len(), 0);
}

#[test]
fn get_value_is_none_for_computed_nodes() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    assert_eq!(AstNode::integer(3).get_value(&mut cx).expect("literal"), None);
    let sum = AstNode::add(AstNode::integer(1), AstNode::integer(2));
    assert_eq!(sum.get_value(&mut cx).expect("binary"), None);
    assert_eq!(cx.builder.current_len(), 0);
}

#[test]
fn assignment_is_an_expression() {
    // int x; int y; y = (x = 3);
    let out = run(vec![
        AstNode::declare("x"),
        AstNode::declare("y"),
        AstNode::assign(AstNode::var("y"), AstNode::assign(AstNode::var("x"), AstNode::integer(3))),
        print(AstNode::var("x")),
        print(AstNode::var("y")),
    ]);
    assert_eq!(out, vec!["3\n", "3\n"]);
}

#[test]
fn assignment_returns_the_stored_value_handle() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    AstNode::declare("x").emit_code(&mut cx).expect("declare");
    let v = AstNode::assign(AstNode::var_address("x"), AstNode::integer(12)).emit_code(&mut cx).expect("assign");
    assert_eq!(v, Value::Const(12));
    assert_eq!(cx.builder.ops()[1], IROp::Store { ptr: Value::Inst(0), value: Value::Const(12) });
}

#[test]
fn assignment_lowers_value_before_resolving_target() {
    // int x = x;  the right side sees no `x` yet
    let err = lower_err(vec![AstNode::assign(AstNode::declare("x"), AstNode::var("x"))]);
    assert_eq!(err.kind(), LoweringErrorKind::UnresolvedName);
    assert_eq!(err.name(), Some("x"));
}

#[test]
fn declaration_as_assignment_target_initialises() {
    assert_eq!(run(vec![init("count", 10), print(AstNode::var("count"))]), vec!["10\n"]);
}

#[test]
fn unresolved_name_fails_fast_without_rollback() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    print(AstNode::integer(7)).emit_code(&mut cx).expect("first statement");
    let stmt = AstNode::add(print(AstNode::integer(1)), AstNode::var("missing"));
    let err = stmt.emit_code(&mut cx).expect_err("must fail");

    assert_eq!(err.kind(), LoweringErrorKind::UnresolvedName);
    assert_eq!(err.node_kind(), "use");
    assert_eq!(err.name(), Some("missing"));
    // both prints stay emitted
    assert_eq!(common::count_calls(cx.builder.ops()), 2);
}

#[test]
fn redeclaration_in_same_scope_is_rejected() {
    let err = lower_err(vec![AstNode::declare("x"), AstNode::declare("x")]);
    assert_eq!(err.kind(), LoweringErrorKind::Redeclaration);
    assert_eq!(err.name(), Some("x"));
}

#[test]
fn rejected_redeclaration_allocates_nothing() {
    let config = LowerConfig::default();
    let (mut module, mut builder, mut env) = fixture(&config);
    let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, &config);

    let ptr = AstNode::declare("x").emit_code(&mut cx).expect("declare");
    let err = AstNode::declare("x").emit_code(&mut cx).expect_err("again");
    assert_eq!(err.kind(), LoweringErrorKind::Redeclaration);
    assert_eq!(cx.builder.current_len(), 1);
    assert_eq!(AstNode::var_address("x").emit_code(&mut cx).expect("address"), ptr);
}

#[test]
fn literal_is_not_assignable() {
    let err = lower_err(vec![AstNode::assign(AstNode::integer(3), AstNode::integer(4))]);
    assert_eq!(err.kind(), LoweringErrorKind::NonAssignableTarget);
    assert_eq!(err.node_kind(), "assignment");
}

#[test]
fn computed_expression_is_not_assignable() {
    let target = AstNode::add(AstNode::integer(1), AstNode::integer(2));
    let err = lower_err(vec![AstNode::assign(target, AstNode::integer(4))]);
    assert_eq!(err.kind(), LoweringErrorKind::NonAssignableTarget);
}

#[test]
fn assigning_to_undeclared_name_is_unresolved() {
    let err = lower_err(vec![AstNode::assign(AstNode::var("ghost"), AstNode::integer(1))]);
    assert_eq!(err.kind(), LoweringErrorKind::UnresolvedName);
    assert_eq!(err.name(), Some("ghost"));
}

#[test]
fn address_used_as_operand_is_rejected_by_backend() {
    let err = lower_err(vec![
        AstNode::declare("x"),
        AstNode::add(AstNode::var_address("x"), AstNode::integer(1)),
    ]);
    assert_eq!(err.kind(), LoweringErrorKind::BackendRejected);
    assert_eq!(err.node_kind(), "binary");
}
