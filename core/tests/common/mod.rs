#![allow(dead_code)]

use dragonc_core::ir::{FunctionBuilder, IROp, IrModule, IrType};
use dragonc_core::lower::{declare_print_routine, SymbolEnv};
use dragonc_core::{AstNode, Interpreter, LowerConfig, LoweringError};

/// A module with the print routine and an empty `main`, plus a builder
/// positioned in `main` and a fresh environment.
pub fn fixture(config: &LowerConfig) -> (IrModule, FunctionBuilder, SymbolEnv) {
    let mut module = IrModule::new("test");
    declare_print_routine(&mut module, config).expect("declare print");
    let main = module.declare_function("main", Vec::new(), IrType::Int).expect("declare main");
    let builder = FunctionBuilder::new(&module, main).expect("builder");
    (module, builder, SymbolEnv::new())
}

/// Lower `statements` as a program and run `main`, returning printed lines.
pub fn run(statements: Vec<AstNode>) -> Vec<String> {
    let module = dragonc_core::lower_program(&statements, &LowerConfig::default())
        .unwrap_or_else(|e| panic!("lowering failed: {}", e));
    let mut vm = Interpreter::new(&module);
    vm.call("main", &[]).unwrap_or_else(|e| panic!("run failed: {}\n{}", e, module));
    vm.output().to_vec()
}

pub fn lower_err(statements: Vec<AstNode>) -> LoweringError {
    match dragonc_core::lower_program(&statements, &LowerConfig::default()) {
        Ok(module) => panic!("expected lowering to fail, got:\n{}", module),
        Err(e) => e,
    }
}

pub fn count_calls(ops: &[IROp]) -> usize {
    ops.iter().filter(|op| matches!(op, IROp::Call { .. })).count()
}

/// `int <name> = <value>`
pub fn init(name: &str, value: i64) -> AstNode {
    AstNode::assign(AstNode::declare(name), AstNode::integer(value))
}

pub fn print(arg: AstNode) -> AstNode {
    AstNode::print(vec![arg])
}
