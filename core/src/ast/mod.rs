pub mod emit;
pub mod err;
pub mod kind;
pub mod node;

pub use self::err::{LoweringError, LoweringErrorKind};
pub use self::kind::{ArithOp, AstNodeKind, DragonType, ExecutionOrder, IncDecOp, Parameter, UseMode};
pub use self::node::AstNode;
