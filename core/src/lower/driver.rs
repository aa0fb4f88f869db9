//! file: core/src/lower/driver.rs
//! description: whole-program lowering entry point.
//!
//! Opens the entry function, lowers each top-level statement into it in
//! order and seals it. Function declarations among the statements become
//! their own IR functions.

use crate::ast::{AstNode, LoweringError};
use crate::config::LowerConfig;
use crate::ir::{FuncId, FunctionBuilder, IrError, IrModule, IrType, Param, Value};

use super::context::LowerCtx;
use super::env::SymbolEnv;

/// Declare the external print routine the config names. It takes the
/// format string as its one fixed parameter when a format is configured,
/// and is variadic either way.
pub fn declare_print_routine(module: &mut IrModule, config: &LowerConfig) -> Result<FuncId, IrError> {
    let params = match config.print_format {
        Some(_) => vec![Param { name: "format".to_string(), ty: IrType::Ptr }],
        None => Vec::new(),
    };
    module.declare_external(&config.print_routine, params, true, IrType::Int)
}

/// Lower a parsed program. The first error aborts the pass; no partial
/// module is returned.
pub fn lower_program(statements: &[AstNode], config: &LowerConfig) -> Result<IrModule, LoweringError> {
    let mut module = IrModule::new(&config.entry_function);

    let entry = AstNode::function(&config.entry_function, crate::ast::DragonType::Int, Vec::new(), Vec::new());
    declare_print_routine(&mut module, config).map_err(|e| LoweringError::backend(&entry, e))?;
    let main_id = module
        .declare_function(&config.entry_function, Vec::new(), IrType::Int)
        .map_err(|e| LoweringError::backend(&entry, e))?;
    let mut builder = FunctionBuilder::new(&module, main_id).map_err(|e| LoweringError::backend(&entry, e))?;
    let mut env = SymbolEnv::new();

    log::debug!("[lower] lowering {} top-level statement(s) into '{}'", statements.len(), config.entry_function);
    {
        let mut cx = LowerCtx::new(&mut builder, &mut module, &mut env, config);
        for stmt in statements {
            stmt.emit_code(&mut cx)?;
        }
        if !cx.builder.is_terminated() {
            cx.builder
                .build_ret(cx.module, Some(Value::Const(0)))
                .map_err(|e| LoweringError::backend(&entry, e))?;
        }
    }
    builder.finalize_into(&mut module).map_err(|e| LoweringError::backend(&entry, e))?;
    Ok(module)
}
