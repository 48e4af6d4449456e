//! Errors that abort an interpreter run.
//!
//! Problems a call can recover from locally (a built-in receiving the wrong kind
//! of argument, an unknown variable) are reported as diagnostics instead and
//! never show up here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Neither a built-in nor a user function has this name.
    #[error("unresolved function '{name}'")]
    UnresolvedFunction { name: String },

    /// A user function was called with the wrong number of arguments.
    #[error("function '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A function declaration appeared inside a function body.
    #[error("function '{name}' is declared inside a body; declarations are only valid at the top level")]
    NestedDeclaration { name: String },

    /// The entry point returned something other than a number.
    #[error("function '{name}' must return a number, got {found}")]
    NonNumericExit { name: String, found: &'static str },
}
