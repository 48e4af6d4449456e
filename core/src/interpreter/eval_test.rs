//! Unit tests for the interpreter.

use super::*;
use crate::{
    ast::AstBuilder,
    builtins::Args,
    diagnostics::{CollectingSink, Severity},
};
use pretty_assertions::assert_eq;

struct Outcome {
    result: Result<i32, ExecutionError>,
    output: String,
    diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    fn errors(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect()
    }
}

fn run_with<'a>(arena: &'a Arena, program: &'a [Stmt<'a>], builtins: BuiltinRegistry) -> Outcome {
    crate::test_utils::init_test_logging();
    let sink = CollectingSink::new();
    let mut output = Vec::new();
    let (result, exit_code) = {
        let mut vm = Interpreter::new(arena, program, builtins)
            .with_output(&mut output)
            .with_diagnostics(&sink);
        let result = vm.run();
        (result, vm.exit_code())
    };
    assert_eq!(exit_code, result.as_ref().ok().copied());

    Outcome {
        result,
        output: String::from_utf8(output).unwrap(),
        diagnostics: sink.diagnostics(),
    }
}

fn run<'a>(arena: &'a Arena, program: &'a [Stmt<'a>]) -> Outcome {
    run_with(arena, program, BuiltinRegistry::with_defaults())
}

/// Writes its string argument and hands it back.
fn echo<'a>(args: &mut Args<'_, 'a>) -> Value<'a> {
    let value = args.get(0).unwrap_or_default();
    if let Ok(text) = value.as_str() {
        let _ = writeln!(args.output(), "{}", text);
    }
    value
}

fn answer<'a>(_args: &mut Args<'_, 'a>) -> Value<'a> {
    Value::Number(42.0)
}

#[test]
fn test_main_returns_exit_code() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function("main", &[], &[ast.ret(ast.number(42.0))])]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(42));
    assert_eq!(outcome.output, "");
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_print_then_return() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.call_stmt("print", &[ast.string("hello")]),
            ast.ret(ast.number(0.0)),
        ],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "hello\n");
}

#[test]
fn test_unresolved_call_statement_aborts() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[ast.call_stmt("foo", &[]), ast.ret(ast.number(0.0))],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(
        outcome.result,
        Err(ExecutionError::UnresolvedFunction {
            name: "foo".to_string()
        })
    );
}

#[test]
fn test_missing_entry_point() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function("start", &[], &[ast.ret(ast.number(1.0))])]);

    let outcome = run(&arena, program);
    assert_eq!(
        outcome.result,
        Err(ExecutionError::UnresolvedFunction {
            name: "main".to_string()
        })
    );
}

#[test]
fn test_arity_mismatch() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("f", &["a"], &[ast.ret(ast.ident("a"))]),
        ast.function(
            "main",
            &[],
            &[ast.call_stmt("f", &[]), ast.ret(ast.number(0.0))],
        ),
    ]);

    let outcome = run(&arena, program);
    assert_eq!(
        outcome.result,
        Err(ExecutionError::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            found: 0,
        })
    );
}

#[test]
fn test_arity_checked_before_arguments_run() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("f", &["a"], &[]),
        ast.function(
            "main",
            &[],
            &[
                ast.call_stmt(
                    "f",
                    &[
                        ast.call_expr("print", &[ast.string("x")]),
                        ast.call_expr("print", &[ast.string("y")]),
                    ],
                ),
                ast.ret(ast.number(0.0)),
            ],
        ),
    ]);

    let outcome = run(&arena, program);
    assert!(matches!(
        outcome.result,
        Err(ExecutionError::ArityMismatch { expected: 1, found: 2, .. })
    ));
    assert_eq!(outcome.output, "");
}

#[test]
fn test_print_number_reports_and_continues() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.call_stmt("print", &[ast.number(1.0)]),
            ast.ret(ast.number(0.0)),
        ],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "");
    assert_eq!(
        outcome.errors(),
        vec!["print expects a string argument: expected string, found number"]
    );
}

#[test]
fn test_builtin_shadows_user_function() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("print", &["s"], &[ast.ret(ast.number(7.0))]),
        ast.function(
            "main",
            &[],
            &[
                ast.call_stmt("print", &[ast.string("hi")]),
                ast.ret(ast.number(0.0)),
            ],
        ),
    ]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "hi\n");
}

#[test]
fn test_parameters_bind_positionally() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("second", &["a", "b"], &[ast.ret(ast.ident("b"))]),
        ast.function(
            "main",
            &[],
            &[ast.ret(ast.call_expr(
                "second",
                &[ast.number(1.0), ast.number(2.0)],
            ))],
        ),
    ]);

    assert_eq!(run(&arena, program).result, Ok(2));
}

#[test]
fn test_arguments_evaluated_left_to_right() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function(
            "both",
            &["x", "y"],
            &[
                ast.call_stmt("print", &[ast.ident("y")]),
                ast.call_stmt("print", &[ast.ident("x")]),
            ],
        ),
        ast.function(
            "main",
            &[],
            &[
                ast.call_stmt(
                    "both",
                    &[
                        ast.call_expr("echo", &[ast.string("a")]),
                        ast.call_expr("echo", &[ast.string("b")]),
                    ],
                ),
                ast.ret(ast.number(0.0)),
            ],
        ),
    ]);

    let mut builtins = BuiltinRegistry::with_defaults();
    builtins.register("echo", echo);
    let outcome = run_with(&arena, program, builtins);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "a\nb\nb\na\n");
}

#[test]
fn test_callee_cannot_see_caller_variables() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("outer", &["x"], &[ast.ret(ast.call_expr("inner", &[]))]),
        ast.function("inner", &[], &[ast.ret(ast.ident("x"))]),
        ast.function(
            "main",
            &[],
            &[ast.ret(ast.call_expr("outer", &[ast.number(3.0)]))],
        ),
    ]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.errors(), vec!["undefined variable 'x'"]);
    assert_eq!(
        outcome.result,
        Err(ExecutionError::NonNumericExit {
            name: "main".to_string(),
            found: "nothing",
        })
    );
}

#[test]
fn test_return_stops_body() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.ret(ast.number(1.0)),
            ast.call_stmt("print", &[ast.string("unreachable")]),
            ast.call_stmt("missing", &[]),
        ],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(1));
    assert_eq!(outcome.output, "");
}

#[test]
fn test_body_without_return_yields_nothing() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[ast.call_stmt("print", &[ast.string("done")])],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.output, "done\n");
    assert_eq!(
        outcome.result,
        Err(ExecutionError::NonNumericExit {
            name: "main".to_string(),
            found: "nothing",
        })
    );
}

#[test]
fn test_bare_return_yields_nothing() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("noop", &[], &[ast.ret_nothing()]),
        ast.function("main", &[], &[ast.ret(ast.call_expr("noop", &[]))]),
    ]);

    assert!(matches!(
        run(&arena, program).result,
        Err(ExecutionError::NonNumericExit { found: "nothing", .. })
    ));
}

#[test]
fn test_string_exit_value_rejected() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function("main", &[], &[ast.ret(ast.string("0"))])]);

    assert_eq!(
        run(&arena, program).result,
        Err(ExecutionError::NonNumericExit {
            name: "main".to_string(),
            found: "string",
        })
    );
}

#[test]
fn test_nested_declaration_rejected() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.function("inner", &[], &[]),
            ast.ret(ast.number(0.0)),
        ],
    )]);

    assert_eq!(
        run(&arena, program).result,
        Err(ExecutionError::NestedDeclaration {
            name: "inner".to_string()
        })
    );
}

#[test]
fn test_first_duplicate_declaration_wins() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.function("main", &[], &[ast.ret(ast.number(1.0))]),
        ast.function("main", &[], &[ast.ret(ast.number(2.0))]),
    ]);

    let vm = Interpreter::new(&arena, program, BuiltinRegistry::new());
    assert_eq!(vm.functions().len(), 2);
    assert_eq!(run(&arena, program).result, Ok(1));
}

#[test]
fn test_top_level_statements_are_not_executed() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[
        ast.call_stmt("print", &[ast.string("top")]),
        ast.ret(ast.number(9.0)),
        ast.function("main", &[], &[ast.ret(ast.number(0.0))]),
    ]);

    let vm = Interpreter::new(&arena, program, BuiltinRegistry::new());
    assert_eq!(vm.functions().len(), 1);
    assert_eq!(vm.lookup_function("main").map(|f| f.arity()), Some(0));

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "");
}

#[test]
fn test_failed_call_expression_yields_nothing() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.call_stmt("print", &[ast.call_expr("missing", &[])]),
            ast.ret(ast.number(3.0)),
        ],
    )]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(3));
    assert_eq!(
        outcome.errors(),
        vec![
            "unresolved function 'missing'",
            "print expects a string argument: expected string, found nothing",
        ]
    );
}

#[test]
fn test_exit_code_truncates_toward_zero() {
    let cases = [
        (-2.9, -2),
        (7.99, 7),
        (1e12, i32::MAX),
        (-1e12, i32::MIN),
        (f64::NAN, 0),
    ];
    for (returned, expected) in cases {
        let arena = Arena::new();
        let ast = AstBuilder::new(&arena);
        let program = ast.program(&[ast.function("main", &[], &[ast.ret(ast.number(returned))])]);
        assert_eq!(run(&arena, program).result, Ok(expected), "main returned {}", returned);
    }
}

#[test]
fn test_registered_builtin_is_callable() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[ast.ret(ast.call_expr("answer", &[]))],
    )]);

    let mut builtins = BuiltinRegistry::new();
    builtins.register("answer", answer);
    assert_eq!(run_with(&arena, program, builtins).result, Ok(42));
}

#[test]
fn test_exec_reports_failure_once() {
    crate::test_utils::init_test_logging();
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function("main", &[], &[ast.call_stmt("nope", &[])])]);

    let sink = CollectingSink::new();
    let mut vm = Interpreter::new(&arena, program, BuiltinRegistry::with_defaults())
        .with_output(Vec::new())
        .with_diagnostics(&sink);
    assert!(!vm.exec());
    assert_eq!(vm.exit_code(), None);
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::error("unresolved function 'nope'")]
    );
}

#[test]
fn test_exec_success_sets_exit_code() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function("main", &[], &[ast.ret(ast.number(5.0))])]);

    let sink = CollectingSink::new();
    let mut vm = Interpreter::new(&arena, program, BuiltinRegistry::with_defaults())
        .with_output(Vec::new())
        .with_diagnostics(&sink);
    assert!(vm.exec());
    assert_eq!(vm.exit_code(), Some(5));
    assert!(sink.is_empty());
}

#[test]
fn test_failure_inside_call_expression_is_recovered() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    // f() { missing(); return "s"; }  main() { print(f()); return 0; }
    let program = ast.program(&[
        ast.function(
            "f",
            &[],
            &[ast.call_stmt("missing", &[]), ast.ret(ast.string("s"))],
        ),
        ast.function(
            "main",
            &[],
            &[
                ast.call_stmt("print", &[ast.call_expr("f", &[])]),
                ast.ret(ast.number(0.0)),
            ],
        ),
    ]);

    let outcome = run(&arena, program);
    assert_eq!(outcome.result, Ok(0));
    assert_eq!(outcome.output, "");
    assert_eq!(
        outcome.errors(),
        vec![
            "unresolved function 'missing'",
            "print expects a string argument: expected string, found nothing",
        ]
    );
}

/// A writer whose bytes stay readable while the interpreter still owns it.
#[derive(Clone, Default)]
struct SharedBuffer(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_flushed_when_run_fails() {
    let arena = Arena::new();
    let ast = AstBuilder::new(&arena);
    let program = ast.program(&[ast.function(
        "main",
        &[],
        &[
            ast.call_stmt("print", &[ast.string("before")]),
            ast.call_stmt("missing", &[]),
        ],
    )]);

    let buffer = SharedBuffer::default();
    let sink = CollectingSink::new();
    let mut vm = Interpreter::new(&arena, program, BuiltinRegistry::with_defaults())
        .with_output(io::BufWriter::new(buffer.clone()))
        .with_diagnostics(&sink);

    assert!(vm.run().is_err());
    assert_eq!(buffer.0.borrow().as_slice(), b"before\n");
}
