//! file: core/src/ast/emit.rs
//! description: lowering of AST nodes into IR values.
//!
//! `emit_code` lowers a node bottom-up through the cursor in `LowerCtx` and
//! returns the handle of what it produced. Children are always lowered
//! before their parent consumes them, left operand before right. The first
//! error aborts; instructions already emitted stay in the builder.
//!
use crate::ir::{BinOp, FunctionBuilder, Param, Value};
use crate::lower::context::LowerCtx;
use crate::lower::env::{Binding, DeclareError};

use super::err::{LoweringError, LoweringErrorKind};
use super::kind::{AstNodeKind, DragonType, ExecutionOrder, IncDecOp, Parameter, UseMode};
use super::node::AstNode;

impl AstNode {
    pub fn emit_code(&self, cx: &mut LowerCtx<'_>) -> Result<Value, LoweringError> {
        log::debug!("[lower] {} in '{}'", self, cx.builder.name());
        match &self.kind {
            AstNodeKind::Binary { op, lhs, rhs } => {
                let l = lhs.emit_code(cx)?;
                let r = rhs.emit_code(cx)?;
                cx.builder
                    .build_binary(cx.module, op.to_bin_op(), l, r)
                    .map_err(|e| LoweringError::backend(self, e))
            }
            AstNodeKind::Assignment { target, value } => {
                let v = value.emit_code(cx)?;
                let ptr = self.assignment_target(target, cx)?;
                cx.builder.build_store(cx.module, ptr, v).map_err(|e| LoweringError::backend(self, e))?;
                Ok(v)
            }
            AstNodeKind::Declaration { name } => self.emit_declaration(name, cx),
            AstNodeKind::Use { name, mode } => self.emit_use(name, *mode, cx),
            AstNodeKind::IncDec { name, order, op } => self.emit_inc_dec(name, *order, *op, cx),
            AstNodeKind::Integer { value } => Ok(Value::Const(*value)),
            AstNodeKind::Function { name, return_type, params, body } => {
                self.emit_function(name, *return_type, params, body, cx)
            }
            AstNodeKind::Argument { index } => self.argument_value(*index, cx),
            AstNodeKind::Print { args } => self.emit_print(args, cx),
            AstNodeKind::Return { value } => {
                let v = match value {
                    Some(expr) => Some(expr.emit_code(cx)?),
                    None => None,
                };
                cx.builder.build_ret(cx.module, v).map_err(|e| LoweringError::backend(self, e))
            }
        }
    }

    /// Expose a value this node can provide without being lowered again.
    ///
    /// A declaration reloads its storage on every call, so the result
    /// always reflects the latest store. A use re-resolves its name. An
    /// argument hands back its parameter. Every other node has nothing to
    /// offer and returns `None`.
    pub fn get_value(&self, cx: &mut LowerCtx<'_>) -> Result<Option<Value>, LoweringError> {
        match &self.kind {
            AstNodeKind::Declaration { name } => {
                let ptr = self.storage_of(name, cx)?;
                let v = cx.builder.build_load(cx.module, ptr).map_err(|e| LoweringError::backend(self, e))?;
                Ok(Some(v))
            }
            AstNodeKind::Use { name, mode } => self.emit_use(name, *mode, cx).map(Some),
            AstNodeKind::Argument { index } => self.argument_value(*index, cx).map(Some),
            _ => Ok(None),
        }
    }

    fn resolve(&self, name: &str, cx: &LowerCtx<'_>) -> Result<Binding, LoweringError> {
        cx.env.resolve(name).map_err(|e| {
            LoweringError::at(LoweringErrorKind::UnresolvedName, self, e.to_string()).with_name(name)
        })
    }

    /// Storage address bound to `name`. Parameters have none.
    fn storage_of(&self, name: &str, cx: &LowerCtx<'_>) -> Result<Value, LoweringError> {
        match self.resolve(name, cx)? {
            Binding::Storage(ptr) => Ok(ptr),
            Binding::Argument(_) => Err(LoweringError::at(
                LoweringErrorKind::NonAssignableTarget,
                self,
                format!("'{}' is a function parameter and has no storage", name),
            )
            .with_name(name)),
        }
    }

    fn assignment_target(&self, target: &AstNode, cx: &mut LowerCtx<'_>) -> Result<Value, LoweringError> {
        match &target.kind {
            AstNodeKind::Use { name, .. } => target.storage_of(name, cx),
            // `int x = e`: the declaration supplies fresh storage.
            AstNodeKind::Declaration { .. } => target.emit_code(cx),
            other => Err(LoweringError::at(
                LoweringErrorKind::NonAssignableTarget,
                self,
                format!("cannot assign to {} node `{}`", other.name(), other),
            )),
        }
    }

    fn emit_declaration(&self, name: &str, cx: &mut LowerCtx<'_>) -> Result<Value, LoweringError> {
        let builder = &mut *cx.builder;
        let binding = cx
            .env
            .declare_with(name, || builder.build_alloca(name).map(Binding::Storage))
            .map_err(|e| match e {
                DeclareError::Env(e) => LoweringError::at(LoweringErrorKind::Redeclaration, self, e.to_string()),
                DeclareError::Make(e) => LoweringError::backend(self, e),
            })?;
        Ok(binding.value())
    }

    fn emit_use(&self, name: &str, mode: UseMode, cx: &mut LowerCtx<'_>) -> Result<Value, LoweringError> {
        match mode {
            UseMode::Address => self.storage_of(name, cx),
            UseMode::Value => match self.resolve(name, cx)? {
                Binding::Storage(ptr) => {
                    cx.builder.build_load(cx.module, ptr).map_err(|e| LoweringError::backend(self, e))
                }
                Binding::Argument(v) => Ok(v),
            },
        }
    }

    fn emit_inc_dec(
        &self,
        name: &str,
        order: ExecutionOrder,
        op: IncDecOp,
        cx: &mut LowerCtx<'_>,
    ) -> Result<Value, LoweringError> {
        let ptr = self.storage_of(name, cx)?;
        let bin = match op {
            IncDecOp::Increment => BinOp::Add,
            IncDecOp::Decrement => BinOp::Sub,
        };
        let current = cx.builder.build_load(cx.module, ptr).map_err(|e| LoweringError::backend(self, e))?;
        let updated = cx
            .builder
            .build_binary(cx.module, bin, current, Value::Const(1))
            .map_err(|e| LoweringError::backend(self, e))?;
        cx.builder.build_store(cx.module, ptr, updated).map_err(|e| LoweringError::backend(self, e))?;
        Ok(match order {
            ExecutionOrder::Pre => updated,
            ExecutionOrder::Post => current,
        })
    }

    fn argument_value(&self, index: usize, cx: &LowerCtx<'_>) -> Result<Value, LoweringError> {
        cx.builder.arg(index).ok_or_else(|| {
            LoweringError::at(
                LoweringErrorKind::BackendRejected,
                self,
                format!("'{}' has no parameter #{}", cx.builder.name(), index),
            )
        })
    }

    fn emit_function(
        &self,
        name: &str,
        return_type: DragonType,
        params: &[Parameter],
        body: &[AstNode],
        cx: &mut LowerCtx<'_>,
    ) -> Result<Value, LoweringError> {
        let ir_params = params.iter().map(|p| Param { name: p.name.clone(), ty: p.ty.to_ir() }).collect();
        let id = cx
            .module
            .declare_function(name, ir_params, return_type.to_ir())
            .map_err(|e| LoweringError::backend(self, e))?;
        let mut builder = FunctionBuilder::new(cx.module, id).map_err(|e| LoweringError::backend(self, e))?;

        cx.env.enter_function();
        let lowered = self.emit_function_body(params, body, return_type, &mut cx.with_builder(&mut builder));
        cx.env.exit_function();
        lowered?;

        builder.finalize_into(cx.module).map_err(|e| LoweringError::backend(self, e))?;
        log::debug!("[lower] function '{}' sealed", name);
        Ok(Value::Func(id))
    }

    fn emit_function_body(
        &self,
        params: &[Parameter],
        body: &[AstNode],
        return_type: DragonType,
        cx: &mut LowerCtx<'_>,
    ) -> Result<(), LoweringError> {
        for (index, param) in params.iter().enumerate() {
            let mut arg = AstNode::argument(index);
            arg.location = self.location.clone();
            arg.span = self.span.clone();
            let v = arg.emit_code(cx)?;
            cx.env.declare(&param.name, Binding::Argument(v)).map_err(|e| {
                LoweringError::at(LoweringErrorKind::Redeclaration, self, e.to_string()).with_name(&param.name)
            })?;
        }
        for stmt in body {
            stmt.emit_code(cx)?;
        }
        if !cx.builder.is_terminated() {
            let implicit = match return_type {
                DragonType::Int => Some(Value::Const(0)),
                DragonType::Void => None,
            };
            cx.builder.build_ret(cx.module, implicit).map_err(|e| LoweringError::backend(self, e))?;
        }
        Ok(())
    }

    fn emit_print(&self, args: &[AstNode], cx: &mut LowerCtx<'_>) -> Result<Value, LoweringError> {
        let [arg] = args else {
            return Err(LoweringError::at(
                LoweringErrorKind::UnsupportedArity,
                self,
                format!("print takes exactly one argument, got {}", args.len()),
            ));
        };
        let v = arg.emit_code(cx)?;
        let callee = cx.module.find_function(&cx.config.print_routine).ok_or_else(|| {
            LoweringError::at(
                LoweringErrorKind::BackendRejected,
                self,
                format!("print routine '{}' is not declared", cx.config.print_routine),
            )
        })?;
        let mut call_args = Vec::with_capacity(2);
        if let Some(format) = &cx.config.print_format {
            call_args.push(Value::Global(cx.module.intern_string(format)));
        }
        call_args.push(v);
        cx.builder.build_call(cx.module, callee, call_args).map_err(|e| LoweringError::backend(self, e))
    }
}
