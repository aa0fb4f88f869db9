//! file: core/src/lower/env.rs
//! description: scoped symbol environment used while lowering.
//!
//! Maps identifier names to what a declaration produced for them: a stack
//! slot or a function parameter. Each function body gets its own layer and
//! lookups never cross into the enclosing function, since the enclosing
//! function's handles are meaningless inside another body.

use std::collections::HashMap;

use crate::ir::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Address of a local slot produced by `alloca`.
    Storage(Value),
    /// A parameter of the current function; a value with no storage.
    Argument(Value),
}

impl Binding {
    pub fn value(&self) -> Value {
        match self {
            Binding::Storage(v) | Binding::Argument(v) => *v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    AlreadyBound(String),
    Unbound(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::AlreadyBound(name) => write!(f, "'{}' is already declared in this scope", name),
            EnvError::Unbound(name) => write!(f, "'{}' is not declared", name),
        }
    }
}

impl std::error::Error for EnvError {}

/// Failure of [`SymbolEnv::declare_with`]: either the name was refused or
/// producing the binding failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclareError<E> {
    Env(EnvError),
    Make(E),
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
    /// Lookups stop after this scope.
    function_boundary: bool,
}

#[derive(Debug)]
pub struct SymbolEnv {
    scopes: Vec<Scope>,
}

impl Default for SymbolEnv {
    fn default() -> Self {
        SymbolEnv::new()
    }
}

impl SymbolEnv {
    /// Create an environment with one function-level scope, ready for the
    /// entry function's top-level statements.
    pub fn new() -> Self {
        SymbolEnv { scopes: vec![Scope { bindings: HashMap::new(), function_boundary: true }] }
    }

    /// ------- Scope Helpers -------

    pub fn enter_function(&mut self) {
        self.scopes.push(Scope { bindings: HashMap::new(), function_boundary: true });
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Discard the innermost scope and everything bound in it.
    pub fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Discard every scope opened since the matching `enter_function`,
    /// including the function's own layer.
    pub fn exit_function(&mut self) {
        while let Some(scope) = self.scopes.pop() {
            if scope.function_boundary {
                break;
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// ------- Binding Helpers -------

    pub fn declare(&mut self, name: &str, binding: Binding) -> Result<(), EnvError> {
        if self.scopes.is_empty() {
            self.enter_function();
        }
        if let Some(scope) = self.scopes.last_mut() {
            if scope.bindings.contains_key(name) {
                return Err(EnvError::AlreadyBound(name.to_string()));
            }
            scope.bindings.insert(name.to_string(), binding);
        }
        Ok(())
    }

    /// Bind `name` to whatever `make` produces. `make` only runs once the
    /// name is known to be free in the current scope, so a refused name
    /// leaves no trace.
    pub fn declare_with<E>(
        &mut self,
        name: &str,
        make: impl FnOnce() -> Result<Binding, E>,
    ) -> Result<Binding, DeclareError<E>> {
        if self.is_bound_in_current_scope(name) {
            return Err(DeclareError::Env(EnvError::AlreadyBound(name.to_string())));
        }
        let binding = make().map_err(DeclareError::Make)?;
        self.declare(name, binding).map_err(DeclareError::Env)?;
        Ok(binding)
    }

    pub fn resolve(&self, name: &str) -> Result<Binding, EnvError> {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.bindings.get(name) {
                return Ok(*binding);
            }
            if scope.function_boundary {
                break;
            }
        }
        Err(EnvError::Unbound(name.to_string()))
    }

    pub fn is_bound_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|s| s.bindings.contains_key(name))
    }
}
