pub mod ast;
pub mod config;
pub mod error;
pub mod ir;
pub mod location;
pub mod lower;
pub mod vm;

pub use ast::{AstNode, LoweringError, LoweringErrorKind};
pub use config::{ConfigError, LowerConfig};
pub use error::{generate_error_report, DragoncErrorExt, Level};
pub use location::{Location, Span};
pub use lower::lower_program;
pub use vm::Interpreter;
