//! Core evaluation logic.

use crate::{
    arena_vec::ArenaVec,
    ast::{Call, Expr, Stmt},
    builtins::{Args, BuiltinFn},
    diagnostics::Diagnostic,
    interpreter::{ExecutionError, Interpreter},
    scope::Scope,
    values::{FunctionDeclaration, Value},
};

/// What a call name resolved to.
#[derive(Clone, Copy)]
pub(crate) enum Callee<'a> {
    Builtin(BuiltinFn),
    User(FunctionDeclaration<'a>),
}

impl<'a> Interpreter<'a> {
    /// Resolve a function name: built-ins first, then user functions.
    pub(crate) fn resolve(&self, name: &str) -> Option<Callee<'a>> {
        if let Some(builtin) = self.builtins.lookup(name) {
            return Some(Callee::Builtin(builtin.handler()));
        }
        self.lookup_function(name).copied().map(Callee::User)
    }

    /// Resolve and invoke `call`, evaluating its arguments in `caller`.
    pub(crate) fn call(
        &mut self,
        call: &Call<'a>,
        caller: &Scope<'a>,
    ) -> Result<Value<'a>, ExecutionError> {
        let callee = self
            .resolve(call.name)
            .ok_or_else(|| ExecutionError::UnresolvedFunction {
                name: call.name.to_string(),
            })?;

        tracing::trace!(function = call.name, args = call.args.len(), "call");
        match callee {
            Callee::Builtin(handler) => Ok(self.call_builtin(call, handler, caller)),
            Callee::User(function) => self.call_function(&function, call, caller),
        }
    }

    fn call_builtin(
        &mut self,
        call: &Call<'a>,
        handler: BuiltinFn,
        caller: &Scope<'a>,
    ) -> Value<'a> {
        let args = self.eval_args(call.args, caller);
        let mut accessor = Args::new(call.name, &args, &mut *self.output, self.diagnostics);
        handler(&mut accessor)
    }

    fn call_function(
        &mut self,
        function: &FunctionDeclaration<'a>,
        call: &Call<'a>,
        caller: &Scope<'a>,
    ) -> Result<Value<'a>, ExecutionError> {
        if function.arity() != call.args.len() {
            return Err(ExecutionError::ArityMismatch {
                name: function.name.to_string(),
                expected: function.arity(),
                found: call.args.len(),
            });
        }

        // Every argument is evaluated before the first parameter is bound.
        let args = self.eval_args(call.args, caller);
        let mut scope = Scope::new(self.arena);
        for (name, value) in function.params.iter().zip(args.iter()) {
            scope.bind(*name, *value);
        }

        self.exec_body(function.body, &mut scope)?;
        Ok(scope.return_value)
    }

    /// Evaluate arguments left to right.
    fn eval_args(&mut self, exprs: &'a [Expr<'a>], caller: &Scope<'a>) -> ArenaVec<'a, Value<'a>> {
        let mut args = ArenaVec::with_capacity_in(exprs.len(), self.arena);
        for expr in exprs {
            let value = self.eval_expr(expr, caller);
            args.push(value);
        }
        args
    }

    /// Execute statements until one of them halts the scope.
    pub(crate) fn exec_body(
        &mut self,
        body: &'a [Stmt<'a>],
        scope: &mut Scope<'a>,
    ) -> Result<(), ExecutionError> {
        for stmt in body {
            self.exec_stmt(stmt, scope)?;
            if scope.halt {
                break;
            }
        }
        Ok(())
    }

    fn exec_stmt(
        &mut self,
        stmt: &'a Stmt<'a>,
        scope: &mut Scope<'a>,
    ) -> Result<(), ExecutionError> {
        match stmt {
            Stmt::Return(expr) => {
                scope.halt = true;
                if let Some(expr) = expr {
                    let value = self.eval_expr(expr, scope);
                    scope.return_value = value;
                }
                Ok(())
            }

            Stmt::Call(call) => {
                self.call(call, scope)?;
                Ok(())
            }

            Stmt::Function(decl) => Err(ExecutionError::NestedDeclaration {
                name: decl.name.to_string(),
            }),
        }
    }

    /// Evaluate an expression. Never fails: problems are reported and replaced
    /// by `Nothing`.
    pub(crate) fn eval_expr(&mut self, expr: &'a Expr<'a>, scope: &Scope<'a>) -> Value<'a> {
        match expr {
            Expr::Number(n) => Value::Number(*n),

            Expr::String(s) => Value::String(*s),

            // Only the current call's variables are visible.
            Expr::Ident(name) => match scope.lookup(name) {
                Some(value) => value,
                None => {
                    self.recover(Diagnostic::error(format!("undefined variable '{}'", name)))
                }
            },

            Expr::Call(call) => match self.call(call, scope) {
                Ok(value) => value,
                Err(err) => self.recover(Diagnostic::error(err.to_string())),
            },
        }
    }
}
