use kiln::{Arena, BuiltinRegistry, CollectingSink, Diagnostic, Interpreter, Severity, ast::Stmt};

/// What a single `exec` left behind.
pub struct Run {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Run {
    pub fn errors(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.clone())
            .collect()
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Execute `program` with the default built-ins, capturing output and diagnostics.
pub fn exec<'a>(arena: &'a Arena, program: &'a [Stmt<'a>]) -> Run {
    exec_with(arena, program, BuiltinRegistry::with_defaults())
}

pub fn exec_with<'a>(arena: &'a Arena, program: &'a [Stmt<'a>], builtins: BuiltinRegistry) -> Run {
    init_logging();
    let sink = CollectingSink::new();
    let mut output = Vec::new();
    let (succeeded, exit_code) = {
        let mut vm = Interpreter::new(arena, program, builtins)
            .with_output(&mut output)
            .with_diagnostics(&sink);
        let succeeded = vm.exec();
        (succeeded, vm.exit_code())
    };

    Run {
        succeeded,
        exit_code,
        output: String::from_utf8(output).expect("program output is UTF-8"),
        diagnostics: sink.diagnostics(),
    }
}
