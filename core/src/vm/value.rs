use crate::ir::{FuncId, GlobalId};

/// Runtime value held in a frame register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    /// Index of a stack slot in the current frame.
    Slot(usize),
    Str(GlobalId),
    Func(FuncId),
    Void,
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Slot(_) => "pointer",
            Value::Str(_) => "string",
            Value::Func(_) => "function",
            Value::Void => "void",
        }
    }
}
