use std::fmt;

use super::value::{IrType, Value};

/// Reasons the builder or module refuses to encode an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum IrError {
    TypeMismatch { operation: &'static str, expected: IrType, found: IrType, value: Value },
    ArgumentCount { callee: String, expected: usize, found: usize, variadic: bool },
    AfterTerminator { function: String },
    DuplicateFunction { name: String },
    UnknownFunction { name: String },
    UnknownValue { value: Value },
    InvalidType { context: String, ty: IrType },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::TypeMismatch { operation, expected, found, value } => {
                write!(f, "{} expects {} but {} has type {}", operation, expected, value, found)
            }
            IrError::ArgumentCount { callee, expected, found, variadic } => {
                let at_least = if *variadic { "at least " } else { "" };
                write!(f, "call to '{}' expects {}{} argument(s), got {}", callee, at_least, expected, found)
            }
            IrError::AfterTerminator { function } => {
                write!(f, "instruction emitted after terminator in '{}'", function)
            }
            IrError::DuplicateFunction { name } => write!(f, "function '{}' is already defined", name),
            IrError::UnknownFunction { name } => write!(f, "function '{}' is not declared", name),
            IrError::UnknownValue { value } => write!(f, "value {} does not belong to this function", value),
            IrError::InvalidType { context, ty } => write!(f, "type {} is not valid for {}", ty, context),
        }
    }
}

impl std::error::Error for IrError {}
