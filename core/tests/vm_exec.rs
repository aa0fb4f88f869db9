mod common;

use common::print;
use dragonc_core::ast::{DragonType, Parameter};
use dragonc_core::location::{Location, Span};
use dragonc_core::{generate_error_report, lower_program, AstNode, DragoncErrorExt, Interpreter, Level, LowerConfig};

#[test]
fn division_by_zero_is_a_runtime_error() {
    let stmts = vec![print(AstNode::div(AstNode::integer(1), AstNode::integer(0)))];
    let module = lower_program(&stmts, &LowerConfig::default()).expect("lowering does not fold");
    let err = Interpreter::new(&module).call("main", &[]).expect_err("div by zero");
    assert!(err.to_string().contains("division by zero"));
    assert_eq!(err.function(), "main");
}

#[test]
fn reading_uninitialized_storage_fails() {
    let stmts = vec![AstNode::declare("x"), print(AstNode::var("x"))];
    let module = lower_program(&stmts, &LowerConfig::default()).expect("lower");
    let err = Interpreter::new(&module).call("main", &[]).expect_err("uninitialized");
    assert!(err.to_string().contains("uninitialized"));
}

#[test]
fn calling_with_wrong_argument_count_fails() {
    let f = AstNode::function(
        "id",
        DragonType::Int,
        vec![Parameter::new("v", DragonType::Int)],
        vec![AstNode::ret(Some(AstNode::var("v")))],
    );
    let module = lower_program(&[f], &LowerConfig::default()).expect("lower");
    let mut vm = Interpreter::new(&module);
    assert!(vm.call("id", &[]).is_err());
    assert!(vm.call("nope", &[]).is_err());
    assert_eq!(vm.call("id", &[11]).expect("ok"), Some(11));
}

#[test]
fn main_returns_zero_by_default() {
    let module = lower_program(&[], &LowerConfig::default()).expect("lower");
    assert_eq!(Interpreter::new(&module).call("main", &[]).expect("run"), Some(0));
}

#[test]
fn top_level_return_sets_exit_value() {
    let stmts = vec![AstNode::ret(Some(AstNode::integer(3)))];
    let module = lower_program(&stmts, &LowerConfig::default()).expect("lower");
    assert_eq!(Interpreter::new(&module).call("main", &[]).expect("run"), Some(3));
}

#[test]
fn lowering_errors_render_as_diagnostics() {
    let at = Location::new("demo.dr", 4, 9);
    let node = AstNode::var("missing").with_location(at.clone()).with_span(Span::point(at));
    let err = lower_program(&[print(node)], &LowerConfig::default()).expect_err("unresolved");

    assert_eq!(err.level(), Level::Fatal);
    assert_eq!(err.issuer(), "dragonc.lower.use");
    assert_eq!(err.location().map(|l| l.line), Some(4));
    let report = generate_error_report(&err);
    assert!(report.starts_with("DRAGONC | FATAL | demo.dr:4:9 |"), "{}", report);
    assert!(report.contains("'missing'"), "{}", report);
}
