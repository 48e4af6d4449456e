//! Tree-walking interpreter for a program's top-level functions.
//!
//! The interpreter records the function declarations of a program, then runs the
//! one named `main` and turns its numeric return value into an exit code.
//!
//! ## Semantics
//!
//! - **Resolution**: built-ins are searched first, then user functions; the first
//!   match by exact name wins, so built-ins shadow user functions.
//! - **Calls**: arguments are evaluated left to right in the caller's scope. A user
//!   function gets a fresh [`Scope`] holding only its parameters: scoping is flat,
//!   with no access to the caller's variables.
//! - **Failures**: an unresolved function, an arity mismatch or a nested
//!   declaration in statement position aborts the run. An unknown variable, or a
//!   failed call used as an expression, is reported and evaluates to
//!   [`Value::Nothing`].
//!
//! ## Known limitation
//!
//! Calls recurse on the native stack with no depth limit, so unbounded recursion
//! in a program overflows the host's stack.
//!
//! ## Example
//!
//! ```
//! use kiln_core::arena::Arena;
//! use kiln_core::ast::AstBuilder;
//! use kiln_core::builtins::BuiltinRegistry;
//! use kiln_core::interpreter::Interpreter;
//!
//! let arena = Arena::new();
//! let ast = AstBuilder::new(&arena);
//! let program = ast.program(&[ast.function("main", &[], &[ast.ret(ast.number(42.0))])]);
//!
//! let mut vm = Interpreter::new(&arena, program, BuiltinRegistry::with_defaults());
//! assert!(vm.exec());
//! assert_eq!(vm.exit_code(), Some(42));
//! ```

mod error;
mod eval;

#[cfg(test)]
mod eval_test;

pub use error::ExecutionError;

use std::io::{self, Write};

use crate::{
    arena::Arena,
    arena_vec::ArenaVec,
    ast::{Call, Stmt},
    builtins::BuiltinRegistry,
    diagnostics::{Diagnostic, DiagnosticSink, TracingSink},
    scope::Scope,
    values::{FunctionDeclaration, Value},
};

/// Name of the function a run starts from.
pub const ENTRY_POINT: &str = "main";

/// Executes a program's functions.
///
/// # Lifetimes
///
/// - `'a`: lifetime of the arena, the program and everything borrowed from them.
pub struct Interpreter<'a> {
    arena: &'a Arena,
    functions: ArenaVec<'a, FunctionDeclaration<'a>>,
    builtins: BuiltinRegistry,
    diagnostics: &'a dyn DiagnosticSink,
    output: Box<dyn Write + 'a>,
    exit_code: Option<i32>,
}

impl<'a> Interpreter<'a> {
    /// Bind an interpreter to an arena and a program.
    ///
    /// Function declarations are recorded in program order; other top-level
    /// statements are ignored. Duplicate names are kept as they are, and lookup
    /// returns the first one.
    ///
    /// Output goes to stdout and diagnostics to `tracing` until overridden with
    /// [`with_output`](Self::with_output) and [`with_diagnostics`](Self::with_diagnostics).
    pub fn new(arena: &'a Arena, program: &'a [Stmt<'a>], builtins: BuiltinRegistry) -> Self {
        let mut functions = ArenaVec::new_in(arena);
        for stmt in program {
            if let Stmt::Function(decl) = stmt {
                functions.push(FunctionDeclaration::from(*decl));
            }
        }
        tracing::debug!(
            functions = functions.len(),
            builtins = builtins.len(),
            "interpreter initialized"
        );

        Self {
            arena,
            functions,
            builtins,
            diagnostics: &TracingSink,
            output: Box::new(io::stdout()),
            exit_code: None,
        }
    }

    /// Send program output (what `print` writes) to `output`.
    pub fn with_output(mut self, output: impl Write + 'a) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Send diagnostics to `sink`.
    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Run `main`, reporting any failure as a diagnostic.
    ///
    /// Returns whether the run succeeded. On success the exit code is available
    /// from [`exit_code`](Self::exit_code).
    pub fn exec(&mut self) -> bool {
        match self.run() {
            Ok(_) => true,
            Err(err) => {
                self.diagnostics.emit(Diagnostic::error(err.to_string()));
                false
            }
        }
    }

    /// Run `main` and return the exit code.
    ///
    /// `main` must return a number; the exit code is that number truncated
    /// toward zero (saturating at the `i32` bounds, NaN becomes 0).
    pub fn run(&mut self) -> Result<i32, ExecutionError> {
        self.exit_code = None;

        // Output written before a failure is flushed too.
        let result = self.run_entry_point();
        if let Err(err) = self.output.flush() {
            self.diagnostics
                .emit(Diagnostic::warning(format!("failed to flush output: {}", err)));
        }

        let code = result?;
        tracing::debug!(code, "program exited");
        self.exit_code = Some(code);
        Ok(code)
    }

    fn run_entry_point(&mut self) -> Result<i32, ExecutionError> {
        let top = Scope::new(self.arena);
        let value = self.call(&Call::new(ENTRY_POINT, &[]), &top)?;
        let number = value
            .as_number()
            .map_err(|_| ExecutionError::NonNumericExit {
                name: ENTRY_POINT.to_string(),
                found: value.kind(),
            })?;
        Ok(number as i32)
    }

    /// Exit code of the last successful run.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// The recorded function declarations, in program order.
    pub fn functions(&self) -> &[FunctionDeclaration<'a>] {
        &self.functions
    }

    /// Find a user function by exact name; the first declaration wins.
    pub fn lookup_function(&self, name: &str) -> Option<&FunctionDeclaration<'a>> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// Report a diagnostic and substitute `Nothing`.
    fn recover(&self, diagnostic: Diagnostic) -> Value<'a> {
        self.diagnostics.emit(diagnostic);
        Value::Nothing
    }
}
