//! In-memory representation of a user-declared function.

use crate::ast::{FunctionDecl, Stmt};

/// A function declared at the top level of a program.
///
/// Recorded once when the interpreter is created and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDeclaration<'a> {
    pub name: &'a str,
    /// Parameter names, bound positionally at each call.
    pub params: &'a [&'a str],
    pub body: &'a [Stmt<'a>],
}

impl<'a> FunctionDeclaration<'a> {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl<'a> From<&'a FunctionDecl<'a>> for FunctionDeclaration<'a> {
    fn from(decl: &'a FunctionDecl<'a>) -> Self {
        Self {
            name: decl.name,
            params: decl.params,
            body: decl.body,
        }
    }
}
