pub mod context;
pub mod driver;
pub mod env;

pub use self::context::LowerCtx;
pub use self::driver::{declare_print_routine, lower_program};
pub use self::env::{Binding, DeclareError, EnvError, SymbolEnv};
