//! file: core/src/ir/function_builder.rs
//! description: per-function instruction cursor.
//!
//! `FunctionBuilder` appends type-checked instructions to the body of one
//! declared function. Nothing reaches the module until `finalize_into`, so
//! a builder abandoned after an error leaves the module's function
//! declared but undefined.

use crate::ir::err::IrError;
use crate::ir::module::IrModule;
use crate::ir::op::{BinOp, IROp};
use crate::ir::value::{FuncId, IrType, Value};

pub struct FunctionBuilder {
    func: FuncId,
    name: String,
    params: Vec<IrType>,
    ret: IrType,
    ops: Vec<IROp>,
    types: Vec<IrType>,
}

impl FunctionBuilder {
    /// Position a new builder at the start of the declared function `func`.
    pub fn new(module: &IrModule, func: FuncId) -> Result<Self, IrError> {
        let function = module.function(func).ok_or(IrError::UnknownValue { value: Value::Func(func) })?;
        if function.external {
            return Err(IrError::InvalidType { context: format!("body of external '{}'", function.name), ty: IrType::Fn });
        }
        Ok(FunctionBuilder {
            func,
            name: function.name.clone(),
            params: function.params.iter().map(|p| p.ty).collect(),
            ret: function.ret,
            ops: Vec::new(),
            types: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &[IROp] {
        &self.ops
    }

    pub fn current_len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.ops.last().is_some_and(IROp::is_terminator)
    }

    /// Handle for the `index`-th parameter of this function.
    pub fn arg(&self, index: usize) -> Option<Value> {
        if index < self.params.len() { Some(Value::Arg(index as u32)) } else { None }
    }

    pub fn type_of(&self, module: &IrModule, value: Value) -> Result<IrType, IrError> {
        let ty = match value {
            Value::Const(_) => Some(IrType::Int),
            Value::Arg(i) => self.params.get(i as usize).copied(),
            Value::Inst(i) => self.types.get(i).copied(),
            Value::Global(g) => module.global(g).map(|_| IrType::Ptr),
            Value::Func(id) => module.function(id).map(|_| IrType::Fn),
        };
        ty.ok_or(IrError::UnknownValue { value })
    }

    fn check_type(&self, module: &IrModule, operation: &'static str, value: Value, expected: IrType) -> Result<(), IrError> {
        let found = self.type_of(module, value)?;
        if found != expected {
            return Err(IrError::TypeMismatch { operation, expected, found, value });
        }
        Ok(())
    }

    fn push(&mut self, op: IROp, ty: IrType) -> Result<Value, IrError> {
        if self.is_terminated() {
            return Err(IrError::AfterTerminator { function: self.name.clone() });
        }
        let idx = self.ops.len();
        log::trace!("[ir] {}: %{} <- {:?}", self.name, idx, op);
        self.ops.push(op);
        self.types.push(ty);
        Ok(Value::Inst(idx))
    }

    pub fn build_alloca(&mut self, name: &str) -> Result<Value, IrError> {
        self.push(IROp::Alloca { name: name.to_string() }, IrType::Ptr)
    }

    pub fn build_load(&mut self, module: &IrModule, ptr: Value) -> Result<Value, IrError> {
        self.check_type(module, "load", ptr, IrType::Ptr)?;
        self.push(IROp::Load { ptr }, IrType::Int)
    }

    pub fn build_store(&mut self, module: &IrModule, ptr: Value, value: Value) -> Result<(), IrError> {
        self.check_type(module, "store", ptr, IrType::Ptr)?;
        self.check_type(module, "store", value, IrType::Int)?;
        self.push(IROp::Store { ptr, value }, IrType::Void)?;
        Ok(())
    }

    pub fn build_binary(&mut self, module: &IrModule, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        self.check_type(module, op.mnemonic(), lhs, IrType::Int)?;
        self.check_type(module, op.mnemonic(), rhs, IrType::Int)?;
        self.push(IROp::Binary { op, lhs, rhs }, IrType::Int)
    }

    pub fn build_call(&mut self, module: &IrModule, callee: FuncId, args: Vec<Value>) -> Result<Value, IrError> {
        let function = module.function(callee).ok_or(IrError::UnknownValue { value: Value::Func(callee) })?;
        let fixed = function.params.len();
        let count_ok = if function.variadic { args.len() >= fixed } else { args.len() == fixed };
        if !count_ok {
            return Err(IrError::ArgumentCount {
                callee: function.name.clone(),
                expected: fixed,
                found: args.len(),
                variadic: function.variadic,
            });
        }
        for (i, arg) in args.iter().enumerate() {
            match function.params.get(i) {
                Some(param) => self.check_type(module, "call", *arg, param.ty)?,
                None => {
                    let ty = self.type_of(module, *arg)?;
                    if !matches!(ty, IrType::Int | IrType::Ptr) {
                        return Err(IrError::InvalidType { context: format!("variadic argument to '{}'", function.name), ty });
                    }
                }
            }
        }
        let ret = function.ret;
        self.push(IROp::Call { callee, args }, ret)
    }

    /// Emit `ret`. The returned handle has type `void`; it exists so a
    /// return can sit where an expression is expected.
    pub fn build_ret(&mut self, module: &IrModule, value: Option<Value>) -> Result<Value, IrError> {
        match (self.ret, value) {
            (IrType::Void, None) => {}
            (IrType::Void, Some(v)) => {
                let found = self.type_of(module, v)?;
                return Err(IrError::TypeMismatch { operation: "ret", expected: IrType::Void, found, value: v });
            }
            (expected, Some(v)) => self.check_type(module, "ret", v, expected)?,
            (expected, None) => {
                return Err(IrError::InvalidType { context: format!("empty return from '{}' returning {}", self.name, expected), ty: IrType::Void });
            }
        }
        self.push(IROp::Ret { value }, IrType::Void)
    }

    /// Hand the finished body to the module.
    pub fn finalize_into(self, module: &mut IrModule) -> Result<FuncId, IrError> {
        log::debug!("[ir] finalizing '{}' with {} op(s)", self.name, self.ops.len());
        module.define_function(self.func, self.ops, self.types)?;
        Ok(self.func)
    }
}
