pub mod err;
pub mod function_builder;
pub mod module;
pub mod op;
pub mod value;

pub use self::err::IrError;
pub use self::function_builder::FunctionBuilder;
pub use self::module::{Function, IrModule, Param};
pub use self::op::{BinOp, IROp};
pub use self::value::{FuncId, GlobalId, InstId, IrType, Value};
