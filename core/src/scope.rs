//! Variable bindings of a single function activation.
//!
//! Scoping is flat: every call gets its own [`Scope`] with no parent, so a
//! callee never sees its caller's variables and there are no closures. Lookup
//! is a linear scan in binding order; the first binding of a name wins.

use crate::{arena::Arena, arena_vec::ArenaVec, values::Value};

/// A named value owned by exactly one scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable<'a> {
    pub name: &'a str,
    pub value: Value<'a>,
}

/// Bindings plus return state of one call.
pub struct Scope<'a> {
    variables: ArenaVec<'a, Variable<'a>>,
    /// Value set by the last `return` executed in this activation.
    pub return_value: Value<'a>,
    /// Set by `return`; stops execution of the rest of the body.
    pub halt: bool,
}

impl<'a> Scope<'a> {
    /// Create an empty scope whose bindings live in `arena`.
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            variables: ArenaVec::new_in(arena),
            return_value: Value::Nothing,
            halt: false,
        }
    }

    /// Bind `value` to `name` in this scope.
    pub fn bind(&mut self, name: &'a str, value: Value<'a>) {
        self.variables.push(Variable { name, value });
    }

    /// Look up a name in this scope only.
    pub fn lookup(&self, name: &str) -> Option<Value<'a>> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(|variable| variable.value)
    }

    pub fn variables(&self) -> &[Variable<'a>] {
        &self.variables
    }
}
