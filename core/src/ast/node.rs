use crate::location;

use super::kind::{ArithOp, AstNodeKind, DragonType, ExecutionOrder, IncDecOp, Parameter, UseMode};

/// One expression or statement. Children are owned by their parent and
/// dropped with it.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub location: Option<location::Location>,
    pub span: Option<location::Span>,
}

impl AstNode {
    pub fn new(kind: AstNodeKind, location: Option<location::Location>, span: Option<location::Span>) -> Self {
        AstNode { kind, location, span }
    }

    fn bare(kind: AstNodeKind) -> Self {
        AstNode::new(kind, None, None)
    }

    pub fn binary(op: ArithOp, lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::bare(AstNodeKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
    }

    pub fn add(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::Div, lhs, rhs)
    }

    pub fn rem(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::Rem, lhs, rhs)
    }

    pub fn bit_or(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::BitOr, lhs, rhs)
    }

    pub fn bit_and(lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::binary(ArithOp::BitAnd, lhs, rhs)
    }

    pub fn assign(target: AstNode, value: AstNode) -> Self {
        AstNode::bare(AstNodeKind::Assignment { target: Box::new(target), value: Box::new(value) })
    }

    pub fn declare(name: &str) -> Self {
        AstNode::bare(AstNodeKind::Declaration { name: name.to_string() })
    }

    /// Read `name`'s current value.
    pub fn var(name: &str) -> Self {
        AstNode::bare(AstNodeKind::Use { name: name.to_string(), mode: UseMode::Value })
    }

    /// Refer to `name`'s storage without loading it.
    pub fn var_address(name: &str) -> Self {
        AstNode::bare(AstNodeKind::Use { name: name.to_string(), mode: UseMode::Address })
    }

    pub fn inc_dec(name: &str, order: ExecutionOrder, op: IncDecOp) -> Self {
        AstNode::bare(AstNodeKind::IncDec { name: name.to_string(), order, op })
    }

    pub fn pre_inc(name: &str) -> Self {
        AstNode::inc_dec(name, ExecutionOrder::Pre, IncDecOp::Increment)
    }

    pub fn post_inc(name: &str) -> Self {
        AstNode::inc_dec(name, ExecutionOrder::Post, IncDecOp::Increment)
    }

    pub fn pre_dec(name: &str) -> Self {
        AstNode::inc_dec(name, ExecutionOrder::Pre, IncDecOp::Decrement)
    }

    pub fn post_dec(name: &str) -> Self {
        AstNode::inc_dec(name, ExecutionOrder::Post, IncDecOp::Decrement)
    }

    pub fn integer(value: i64) -> Self {
        AstNode::bare(AstNodeKind::Integer { value })
    }

    pub fn function(name: &str, return_type: DragonType, params: Vec<Parameter>, body: Vec<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Function { name: name.to_string(), return_type, params, body })
    }

    pub fn argument(index: usize) -> Self {
        AstNode::bare(AstNodeKind::Argument { index })
    }

    pub fn print(args: Vec<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Print { args })
    }

    pub fn ret(value: Option<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Return { value: value.map(Box::new) })
    }

    pub fn with_location(mut self, location: location::Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_span(mut self, span: location::Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl std::fmt::Display for AstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} @ {}", self.kind, loc),
            None => write!(f, "{}", self.kind),
        }
    }
}
