//! Built-in functions.
//!
//! A built-in is a native Rust handler resolvable by name. Built-ins are checked
//! before user declarations, so they shadow any user function of the same name.
//!
//! The set of built-ins is an explicit [`BuiltinRegistry`] value built at startup
//! and handed to the interpreter. Hosts extend it with [`BuiltinRegistry::register`].
//!
//! Handlers only see an [`Args`] accessor: argument count, positional access, the
//! output stream and a way to report diagnostics. They decide their own arity and
//! type expectations; on misuse they report a diagnostic and return
//! [`Value::Nothing`]. The interpreter never validates a built-in call itself.
//!
//! # Example
//!
//! ```
//! use kiln_core::builtins::{Args, BuiltinRegistry};
//! use kiln_core::values::Value;
//!
//! fn answer<'a>(args: &mut Args<'_, 'a>) -> Value<'a> {
//!     if !args.is_empty() {
//!         args.error(format!("{} takes no arguments", args.name()));
//!         return Value::Nothing;
//!     }
//!     Value::Number(42.0)
//! }
//!
//! let mut builtins = BuiltinRegistry::with_defaults();
//! builtins.register("answer", answer);
//! assert!(builtins.lookup("answer").is_some());
//! assert!(builtins.lookup("print").is_some());
//! ```

pub mod io;

use std::borrow::Cow;
use std::io::Write;

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    values::Value,
};

/// Signature of a native built-in handler.
pub type BuiltinFn = for<'a> fn(&mut Args<'_, 'a>) -> Value<'a>;

/// A named native handler.
#[derive(Clone)]
pub struct Builtin {
    name: Cow<'static, str>,
    handler: BuiltinFn,
}

impl Builtin {
    pub fn new(name: impl Into<Cow<'static, str>>, handler: BuiltinFn) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> BuiltinFn {
        self.handler
    }
}

impl core::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// The table of built-ins available to a program.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    entries: Vec<Builtin>,
}

impl BuiltinRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the default built-ins (`print`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("print", io::print);
        registry
    }

    /// Register a built-in.
    ///
    /// Lookup returns the first registration of a name, so a later duplicate
    /// is shadowed by the earlier one.
    pub fn register(&mut self, name: impl Into<Cow<'static, str>>, handler: BuiltinFn) {
        self.entries.push(Builtin::new(name, handler));
    }

    /// Find a built-in by exact name.
    pub fn lookup(&self, name: &str) -> Option<&Builtin> {
        self.entries.iter().find(|builtin| builtin.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.entries.iter()
    }
}

/// What a built-in handler sees of its call.
///
/// Arguments have already been evaluated, left to right, in the caller's scope.
pub struct Args<'c, 'a> {
    name: &'c str,
    values: &'c [Value<'a>],
    output: &'c mut dyn Write,
    diagnostics: &'c dyn DiagnosticSink,
}

impl<'c, 'a> Args<'c, 'a> {
    pub fn new(
        name: &'c str,
        values: &'c [Value<'a>],
        output: &'c mut dyn Write,
        diagnostics: &'c dyn DiagnosticSink,
    ) -> Self {
        Self {
            name,
            values,
            output,
            diagnostics,
        }
    }

    /// The name the built-in was called by.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Number of arguments passed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        self.values.get(index).copied()
    }

    /// The stream built-ins write program output to.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Report a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    /// Report an error diagnostic.
    pub fn error(&self, message: impl Into<String>) {
        self.report(Diagnostic::error(message));
    }
}
