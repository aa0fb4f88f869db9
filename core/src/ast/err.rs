use crate::error::{DragoncErrorExt, Level};
use crate::ir::IrError;
use crate::location::{Location, Span};

use super::node::AstNode;

/// Why lowering stopped. Every kind is fatal for the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringErrorKind {
    UnresolvedName,
    Redeclaration,
    NonAssignableTarget,
    BackendRejected,
    UnsupportedArity,
    DuplicateFunction,
}

impl std::fmt::Display for LoweringErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoweringErrorKind::UnresolvedName => "unresolved-name",
            LoweringErrorKind::Redeclaration => "redeclaration",
            LoweringErrorKind::NonAssignableTarget => "non-assignable-target",
            LoweringErrorKind::BackendRejected => "backend-rejected-operation",
            LoweringErrorKind::UnsupportedArity => "unsupported-arity",
            LoweringErrorKind::DuplicateFunction => "duplicate-function",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    message: String,
    node_kind: &'static str,
    name: Option<String>,
    location: Option<Location>,
    span: Option<Span>,
}

impl LoweringError {
    /// Build an error attributed to `node`, picking up its identifier and
    /// source position.
    pub fn at(kind: LoweringErrorKind, node: &AstNode, message: String) -> Self {
        LoweringError {
            kind,
            message,
            node_kind: node.kind.name(),
            name: node.kind.identifier().map(str::to_string),
            location: node.location.clone(),
            span: node.span.clone(),
        }
    }

    /// Wrap a backend refusal. A duplicate function keeps its own kind so the
    /// driver can tell it apart from an encoding failure.
    pub fn backend(node: &AstNode, err: IrError) -> Self {
        let kind = match err {
            IrError::DuplicateFunction { .. } => LoweringErrorKind::DuplicateFunction,
            _ => LoweringErrorKind::BackendRejected,
        };
        LoweringError::at(kind, node, err.to_string())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn kind(&self) -> LoweringErrorKind {
        self.kind
    }

    pub fn node_kind(&self) -> &'static str {
        self.node_kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {} node", self.kind, self.node_kind)?;
        if let Some(name) = &self.name {
            write!(f, " '{}'", name)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoweringError {}

impl DragoncErrorExt for LoweringError {
    fn level(&self) -> Level {
        Level::Fatal
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        format!("dragonc.lower.{}", self.node_kind)
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
