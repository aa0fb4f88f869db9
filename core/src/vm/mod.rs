pub mod exec;
mod host;
pub mod value;

pub use self::exec::{ExecError, Interpreter};
