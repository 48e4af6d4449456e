//! Syntax nodes consumed by the interpreter.
//!
//! Tokenizing and parsing happen elsewhere; the interpreter only walks the nodes
//! defined here. All nodes are `Copy` and borrow their children, so a whole
//! program can be laid out in an [`Arena`](crate::arena::Arena) (or in `'static`
//! data) and shared freely.
//!
//! ```
//! use kiln_core::ast::{Call, Expr, FunctionDecl, Stmt};
//!
//! // main() { print("hi"); return 0; }
//! static ARGS: [Expr<'static>; 1] = [Expr::String("hi")];
//! static BODY: [Stmt<'static>; 2] = [
//!     Stmt::Call(Call::new("print", &ARGS)),
//!     Stmt::Return(Some(Expr::Number(0.0))),
//! ];
//! static MAIN: FunctionDecl<'static> = FunctionDecl::new("main", &[], &BODY);
//! let program = [Stmt::Function(&MAIN)];
//! assert_eq!(program.len(), 1);
//! ```
//!
//! [`AstBuilder`] does the same with every node allocated in an arena:
//!
//! ```
//! use kiln_core::arena::Arena;
//! use kiln_core::ast::AstBuilder;
//!
//! let arena = Arena::new();
//! let ast = AstBuilder::new(&arena);
//! let program = ast.program(&[ast.function(
//!     "main",
//!     &[],
//!     &[ast.call_stmt("print", &[ast.string("hi")]), ast.ret(ast.number(0.0))],
//! )]);
//! assert_eq!(program.len(), 1);
//! ```

use crate::{arena::Arena, arena_vec::ArenaVec};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'a> {
    Number(f64),
    /// A string literal; the value borrows these bytes.
    String(&'a str),
    /// A reference to a variable of the current call.
    Ident(&'a str),
    Call(Call<'a>),
}

/// A call by name, used both as a statement and as an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Call<'a> {
    pub name: &'a str,
    pub args: &'a [Expr<'a>],
}

impl<'a> Call<'a> {
    pub const fn new(name: &'a str, args: &'a [Expr<'a>]) -> Self {
        Self { name, args }
    }
}

/// A statement.
///
/// The top level of a program is a list of statements too; only function
/// declarations are meaningful there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'a> {
    /// A function declaration. Only valid at the top level.
    Function(&'a FunctionDecl<'a>),
    Return(Option<Expr<'a>>),
    /// A call whose result is discarded.
    Call(Call<'a>),
}

/// A parsed function declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'a> {
    pub name: &'a str,
    pub params: &'a [&'a str],
    pub body: &'a [Stmt<'a>],
}

impl<'a> FunctionDecl<'a> {
    pub const fn new(name: &'a str, params: &'a [&'a str], body: &'a [Stmt<'a>]) -> Self {
        Self { name, params, body }
    }
}

/// Lays out syntax nodes in an [`Arena`].
///
/// Names and string literals are copied into the arena, so the resulting nodes
/// borrow nothing but the arena itself.
#[derive(Clone, Copy)]
pub struct AstBuilder<'a> {
    arena: &'a Arena,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena }
    }

    pub fn number(&self, value: f64) -> Expr<'a> {
        Expr::Number(value)
    }

    pub fn string(&self, value: &str) -> Expr<'a> {
        Expr::String(self.arena.alloc_str(value))
    }

    pub fn ident(&self, name: &str) -> Expr<'a> {
        Expr::Ident(self.arena.alloc_str(name))
    }

    pub fn call(&self, name: &str, args: &[Expr<'a>]) -> Call<'a> {
        Call::new(self.arena.alloc_str(name), self.arena.alloc_slice_copy(args))
    }

    pub fn call_expr(&self, name: &str, args: &[Expr<'a>]) -> Expr<'a> {
        Expr::Call(self.call(name, args))
    }

    pub fn call_stmt(&self, name: &str, args: &[Expr<'a>]) -> Stmt<'a> {
        Stmt::Call(self.call(name, args))
    }

    /// `return expr;`
    pub fn ret(&self, expr: Expr<'a>) -> Stmt<'a> {
        Stmt::Return(Some(expr))
    }

    /// `return;`
    pub fn ret_nothing(&self) -> Stmt<'a> {
        Stmt::Return(None)
    }

    pub fn function(&self, name: &str, params: &[&str], body: &[Stmt<'a>]) -> Stmt<'a> {
        let mut names = ArenaVec::with_capacity_in(params.len(), self.arena);
        for param in params {
            names.push(&*self.arena.alloc_str(param));
        }
        let decl = FunctionDecl::new(
            self.arena.alloc_str(name),
            names.into_arena_slice(),
            self.arena.alloc_slice_copy(body),
        );
        Stmt::Function(self.arena.alloc(decl))
    }

    /// Copy a list of top-level statements into the arena.
    pub fn program(&self, statements: &[Stmt<'a>]) -> &'a [Stmt<'a>] {
        self.arena.alloc_slice_copy(statements)
    }
}
