//! file: core/src/vm/exec.rs
//! description: straight-line interpreter over lowered IR.
//!
//! Each call gets a `Frame` with one register per instruction and the stack
//! slots its `alloca`s created. Calls to externals go to the host print
//! routine; calls to defined functions recurse.
//!
use std::collections::HashSet;

use crate::config::LowerConfig;
use crate::error::{DragoncErrorExt, Level};
use crate::ir::{BinOp, FuncId, IROp, IrModule, Value as IrValue};
use crate::location::{Location, Span};
use crate::vm::host;
use crate::vm::value::Value;

const MAX_CALL_DEPTH: usize = 256;

struct Frame {
    args: Vec<Value>,
    regs: Vec<Option<Value>>,
    slots: Vec<Option<i64>>,
}

impl Frame {
    fn new(args: Vec<Value>, op_count: usize) -> Self {
        Frame { args, regs: vec![None; op_count], slots: Vec::new() }
    }
}

pub struct Interpreter<'m> {
    module: &'m IrModule,
    print_routines: HashSet<String>,
    output: Vec<String>,
}

impl<'m> Interpreter<'m> {
    /// Interpreter that recognises the default print routine.
    pub fn new(module: &'m IrModule) -> Self {
        Interpreter::with_config(module, &LowerConfig::default())
    }

    pub fn with_config(module: &'m IrModule, config: &LowerConfig) -> Self {
        let mut print_routines = HashSet::new();
        print_routines.insert(config.print_routine.clone());
        Interpreter { module, print_routines, output: Vec::new() }
    }

    /// Everything the print routine produced, one entry per call.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Run the defined function `name` and return its integer result, or
    /// `None` for a void function.
    pub fn call(&mut self, name: &str, args: &[i64]) -> Result<Option<i64>, ExecError> {
        let id = self
            .module
            .find_function(name)
            .ok_or_else(|| ExecError::new(name, format!("function '{}' is not declared", name)))?;
        let args = args.iter().map(|i| Value::Int(*i)).collect();
        match self.invoke(id, args, 0)? {
            Value::Int(i) => Ok(Some(i)),
            Value::Void => Ok(None),
            other => Err(ExecError::new(name, format!("returned a {}", other.describe()))),
        }
    }

    fn invoke(&mut self, id: FuncId, args: Vec<Value>, depth: usize) -> Result<Value, ExecError> {
        let module = self.module;
        let function = module
            .function(id)
            .ok_or_else(|| ExecError::new("<unknown>", format!("no function with id {}", id)))?;
        let name = function.name.as_str();

        if function.external {
            if !self.print_routines.contains(name) {
                return Err(ExecError::new(name, "no host implementation for external".to_string()));
            }
            let text = host::run_print(module, &args).map_err(|e| ExecError::new(name, e))?;
            let written = text.len() as i64;
            self.output.push(text);
            return Ok(Value::Int(written));
        }
        if depth >= MAX_CALL_DEPTH {
            return Err(ExecError::new(name, format!("call depth exceeded {}", MAX_CALL_DEPTH)));
        }
        if args.len() != function.params.len() {
            return Err(ExecError::new(
                name,
                format!("expects {} argument(s), got {}", function.params.len(), args.len()),
            ));
        }
        let ops = function
            .body
            .as_deref()
            .ok_or_else(|| ExecError::new(name, "function has no body".to_string()))?;

        let mut frame = Frame::new(args, ops.len());
        for (pc, op) in ops.iter().enumerate() {
            log::trace!("[vm] {}:{:04} {:?}", name, pc, op);
            let result = match op {
                IROp::Alloca { .. } => {
                    frame.slots.push(None);
                    Value::Slot(frame.slots.len() - 1)
                }
                IROp::Load { ptr } => {
                    let slot = slot_of(&frame, name, *ptr)?;
                    let v = frame.slots[slot]
                        .ok_or_else(|| ExecError::new(name, format!("read of uninitialized storage at %{}", pc)))?;
                    Value::Int(v)
                }
                IROp::Store { ptr, value } => {
                    let slot = slot_of(&frame, name, *ptr)?;
                    let v = int_of(&frame, name, *value)?;
                    frame.slots[slot] = Some(v);
                    Value::Void
                }
                IROp::Binary { op, lhs, rhs } => {
                    let l = int_of(&frame, name, *lhs)?;
                    let r = int_of(&frame, name, *rhs)?;
                    Value::Int(apply(*op, l, r).map_err(|e| ExecError::new(name, e))?)
                }
                IROp::Call { callee, args } => {
                    let mut values = Vec::with_capacity(args.len());
                    for a in args {
                        values.push(eval(&frame, name, *a)?);
                    }
                    self.invoke(*callee, values, depth + 1)?
                }
                IROp::Ret { value } => {
                    return match value {
                        Some(v) => eval(&frame, name, *v),
                        None => Ok(Value::Void),
                    };
                }
            };
            frame.regs[pc] = Some(result);
        }
        Err(ExecError::new(name, "fell off the end without a return".to_string()))
    }
}

fn eval(frame: &Frame, function: &str, value: IrValue) -> Result<Value, ExecError> {
    match value {
        IrValue::Const(i) => Ok(Value::Int(i)),
        IrValue::Arg(i) => frame
            .args
            .get(i as usize)
            .copied()
            .ok_or_else(|| ExecError::new(function, format!("no argument #{}", i))),
        IrValue::Inst(i) => frame
            .regs
            .get(i)
            .copied()
            .flatten()
            .ok_or_else(|| ExecError::new(function, format!("%{} used before it was computed", i))),
        IrValue::Global(g) => Ok(Value::Str(g)),
        IrValue::Func(id) => Ok(Value::Func(id)),
    }
}

fn int_of(frame: &Frame, function: &str, value: IrValue) -> Result<i64, ExecError> {
    let v = eval(frame, function, value)?;
    v.as_int().ok_or_else(|| ExecError::new(function, format!("expected int, found {}", v.describe())))
}

fn slot_of(frame: &Frame, function: &str, value: IrValue) -> Result<usize, ExecError> {
    match eval(frame, function, value)? {
        Value::Slot(s) if s < frame.slots.len() => Ok(s),
        other => Err(ExecError::new(function, format!("expected pointer, found {}", other.describe()))),
    }
}

fn apply(op: BinOp, l: i64, r: i64) -> Result<i64, String> {
    match op {
        BinOp::Add => Ok(l.wrapping_add(r)),
        BinOp::Sub => Ok(l.wrapping_sub(r)),
        BinOp::Mul => Ok(l.wrapping_mul(r)),
        BinOp::SDiv if r == 0 => Err("division by zero".to_string()),
        BinOp::SDiv => Ok(l.wrapping_div(r)),
        BinOp::SRem if r == 0 => Err("remainder by zero".to_string()),
        BinOp::SRem => Ok(l.wrapping_rem(r)),
        BinOp::Or => Ok(l | r),
        BinOp::And => Ok(l & r),
    }
}

#[derive(Debug, Clone)]
pub struct ExecError {
    function: String,
    message: String,
}

impl ExecError {
    pub fn new(function: &str, message: String) -> Self {
        ExecError { function: function.to_string(), message }
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "in '{}': {}", self.function, self.message)
    }
}

impl std::error::Error for ExecError {}

impl DragoncErrorExt for ExecError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "dragonc.vm".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
