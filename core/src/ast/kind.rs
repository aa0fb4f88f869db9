//! file: core/src/ast/kind.rs
//! description: AST node kind definitions and operator enums.
//!
//! Defines the closed set of expression nodes (`AstNodeKind`) together with
//! the small immutable enums fixed at node construction: arithmetic
//! operator, increment/decrement direction, execution order, use mode and
//! declared type.
//!
use std::fmt;

use super::node::AstNode;
use crate::ir::{BinOp, IrType};

/// Arithmetic and bitwise operators of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Rem,    // %
    BitOr,  // |
    BitAnd, // &
}

impl ArithOp {
    pub fn to_bin_op(self) -> BinOp {
        match self {
            ArithOp::Add => BinOp::Add,
            ArithOp::Sub => BinOp::Sub,
            ArithOp::Mul => BinOp::Mul,
            ArithOp::Div => BinOp::SDiv,
            ArithOp::Rem => BinOp::SRem,
            ArithOp::BitOr => BinOp::Or,
            ArithOp::BitAnd => BinOp::And,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
            ArithOp::BitOr => "|",
            ArithOp::BitAnd => "&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Increment, // ++
    Decrement, // --
}

/// Whether an increment/decrement yields the updated value (`Pre`) or the
/// value observed before the update (`Post`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOrder {
    Pre,
    Post,
}

/// How a `Use` node exposes its variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMode {
    /// Load and yield the current value.
    Value,
    /// Yield the storage address itself.
    Address,
}

/// Source-level types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragonType {
    Int,
    Void,
}

impl DragonType {
    pub fn to_ir(self) -> IrType {
        match self {
            DragonType::Int => IrType::Int,
            DragonType::Void => IrType::Void,
        }
    }
}

/// A named, typed function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: DragonType,
}

impl Parameter {
    pub fn new(name: &str, ty: DragonType) -> Self {
        Parameter { name: name.to_string(), ty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNodeKind {
    Binary { op: ArithOp, lhs: Box<AstNode>, rhs: Box<AstNode> },
    Assignment { target: Box<AstNode>, value: Box<AstNode> },
    Declaration { name: String },
    Use { name: String, mode: UseMode },
    IncDec { name: String, order: ExecutionOrder, op: IncDecOp },
    Integer { value: i64 },
    Function { name: String, return_type: DragonType, params: Vec<Parameter>, body: Vec<AstNode> },
    /// Passthrough for the `index`-th parameter of the function being lowered.
    Argument { index: usize },
    Print { args: Vec<AstNode> },
    Return { value: Option<Box<AstNode>> },
}

impl AstNodeKind {
    /// Short, stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            AstNodeKind::Binary { .. } => "binary",
            AstNodeKind::Assignment { .. } => "assignment",
            AstNodeKind::Declaration { .. } => "declaration",
            AstNodeKind::Use { .. } => "use",
            AstNodeKind::IncDec { .. } => "increment/decrement",
            AstNodeKind::Integer { .. } => "integer",
            AstNodeKind::Function { .. } => "function",
            AstNodeKind::Argument { .. } => "argument",
            AstNodeKind::Print { .. } => "print",
            AstNodeKind::Return { .. } => "return",
        }
    }

    /// The identifier this node refers to, when it refers to one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            AstNodeKind::Declaration { name }
            | AstNodeKind::Use { name, .. }
            | AstNodeKind::IncDec { name, .. }
            | AstNodeKind::Function { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNodeKind::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs.kind, op.symbol(), rhs.kind),
            AstNodeKind::Assignment { target, value } => write!(f, "({} = {})", target.kind, value.kind),
            AstNodeKind::Declaration { name } => write!(f, "int {}", name),
            AstNodeKind::Use { name, mode: UseMode::Value } => write!(f, "{}", name),
            AstNodeKind::Use { name, mode: UseMode::Address } => write!(f, "&{}", name),
            AstNodeKind::IncDec { name, order, op } => {
                let sym = match op {
                    IncDecOp::Increment => "++",
                    IncDecOp::Decrement => "--",
                };
                match order {
                    ExecutionOrder::Pre => write!(f, "{}{}", sym, name),
                    ExecutionOrder::Post => write!(f, "{}{}", name, sym),
                }
            }
            AstNodeKind::Integer { value } => write!(f, "{}", value),
            AstNodeKind::Function { name, params, .. } => {
                let names = params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
                write!(f, "fn {}({})", name, names.join(", "))
            }
            AstNodeKind::Argument { index } => write!(f, "arg#{}", index),
            AstNodeKind::Print { args } => write!(f, "print/{}", args.len()),
            AstNodeKind::Return { value: Some(v) } => write!(f, "return {}", v.kind),
            AstNodeKind::Return { value: None } => write!(f, "return"),
        }
    }
}
