//! file: core/src/lower/context.rs
//! description: explicit state threaded through every lowering call.
//!
//! `LowerCtx` bundles the instruction cursor, the module, the symbol
//! environment and the config. All four are borrowed for the duration of
//! a single call; nodes never keep them.

use crate::config::LowerConfig;
use crate::ir::{FunctionBuilder, IrModule};

use super::env::SymbolEnv;

pub struct LowerCtx<'a> {
    pub builder: &'a mut FunctionBuilder,
    pub module: &'a mut IrModule,
    pub env: &'a mut SymbolEnv,
    pub config: &'a LowerConfig,
}

impl<'a> LowerCtx<'a> {
    pub fn new(
        builder: &'a mut FunctionBuilder,
        module: &'a mut IrModule,
        env: &'a mut SymbolEnv,
        config: &'a LowerConfig,
    ) -> Self {
        LowerCtx { builder, module, env, config }
    }

    /// Reborrow the module, environment and config around a different
    /// cursor, e.g. the builder of a nested function.
    pub fn with_builder<'b>(&'b mut self, builder: &'b mut FunctionBuilder) -> LowerCtx<'b> {
        LowerCtx { builder, module: &mut *self.module, env: &mut *self.env, config: self.config }
    }
}
