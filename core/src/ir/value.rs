//! file: core/src/ir/value.rs
//! description: opaque value handles produced by the IR builder.
//!
//! A `Value` names something the backend produced: a constant, a parameter
//! of the function being built, the result of an instruction, a string
//! global or a function. Handles are plain indices; an `Inst` or `Arg`
//! handle only means something inside the function it was created for.

use std::fmt;

pub type InstId = usize;
pub type GlobalId = usize;
pub type FuncId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Const(i64),
    Arg(u32),
    Inst(InstId),
    Global(GlobalId),
    Func(FuncId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    Int,
    Ptr,
    Void,
    Fn,
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Int => write!(f, "i64"),
            IrType::Ptr => write!(f, "ptr"),
            IrType::Void => write!(f, "void"),
            IrType::Fn => write!(f, "fn"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(v) => write!(f, "{}", v),
            Value::Arg(i) => write!(f, "%arg{}", i),
            Value::Inst(i) => write!(f, "%{}", i),
            Value::Global(g) => write!(f, "@.str{}", g),
            Value::Func(id) => write!(f, "@fn{}", id),
        }
    }
}
