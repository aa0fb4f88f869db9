use super::value::{FuncId, Value};

/// Integer operators the builder can encode as a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    Or,
    And,
}

impl BinOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::SRem => "srem",
            BinOp::Or => "or",
            BinOp::And => "and",
        }
    }
}

/// One instruction. Instructions that produce a value are referred to by
/// their position in the function body (`Value::Inst(index)`).
#[derive(Debug, Clone, PartialEq)]
pub enum IROp {
    /// Reserve a stack slot; produces a `ptr`.
    Alloca { name: String },
    Load { ptr: Value },
    Store { ptr: Value, value: Value },
    Binary { op: BinOp, lhs: Value, rhs: Value },
    Call { callee: FuncId, args: Vec<Value> },
    Ret { value: Option<Value> },
}

impl IROp {
    pub fn is_terminator(&self) -> bool {
        matches!(self, IROp::Ret { .. })
    }
}
