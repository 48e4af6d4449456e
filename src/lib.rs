//! Kiln - a region-based arena and a small tree-walking interpreter
//!
//! # Overview
//!
//! Kiln runs programs made of top-level function declarations. Everything a run
//! allocates (syntax nodes, argument lists, variable bindings) lives in one
//! [`Arena`]: a chain of bump-allocated regions that is released all at once.
//!
//! - [`Arena`] and [`ArenaVec`]: region-chained bump allocation with reclaim on
//!   reallocation, and a growable array on top of it
//! - [`Interpreter`]: resolves calls (built-ins first), binds parameters in flat
//!   per-call scopes and turns `main`'s return value into an exit code
//! - [`BuiltinRegistry`]: native functions exposed to programs, `print` included
//!
//! # Quick Start
//!
//! ```
//! use kiln::{Arena, AstBuilder, BuiltinRegistry, CollectingSink, Interpreter};
//!
//! let arena = Arena::new();
//! let ast = AstBuilder::new(&arena);
//!
//! // main() { print("hello"); return 0; }
//! let program = ast.program(&[ast.function(
//!     "main",
//!     &[],
//!     &[ast.call_stmt("print", &[ast.string("hello")]), ast.ret(ast.number(0.0))],
//! )]);
//!
//! let sink = CollectingSink::new();
//! let mut output = Vec::new();
//! let mut vm = Interpreter::new(&arena, program, BuiltinRegistry::with_defaults())
//!     .with_output(&mut output)
//!     .with_diagnostics(&sink);
//! assert_eq!(vm.run(), Ok(0));
//! drop(vm);
//!
//! assert_eq!(output, b"hello\n");
//! assert!(sink.is_empty());
//! ```
//!
//! # Built-ins
//!
//! Register native Rust functions on a [`BuiltinRegistry`]:
//!
//! ```
//! use kiln::{Args, BuiltinRegistry, Value};
//!
//! fn twice<'a>(args: &mut Args<'_, 'a>) -> Value<'a> {
//!     match args.get(0).unwrap_or_default().as_number() {
//!         Ok(n) => Value::Number(n * 2.0),
//!         Err(err) => {
//!             args.error(format!("{} expects a number: {}", args.name(), err));
//!             Value::Nothing
//!         }
//!     }
//! }
//!
//! let mut builtins = BuiltinRegistry::with_defaults();
//! builtins.register("twice", twice);
//! ```

pub use kiln_core::arena::{AllocError, Arena, ArenaStats};
pub use kiln_core::arena_vec::ArenaVec;
pub use kiln_core::ast::{self, AstBuilder};
pub use kiln_core::builtins::{Args, Builtin, BuiltinFn, BuiltinRegistry};
pub use kiln_core::diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink,
};
pub use kiln_core::interpreter::{ENTRY_POINT, ExecutionError, Interpreter};
pub use kiln_core::options::{ArenaOptions, DEFAULT_REGION_CAPACITY};
pub use kiln_core::scope::{Scope, Variable};
pub use kiln_core::values::{FunctionDeclaration, TypeError, Value};
