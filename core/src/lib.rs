pub mod arena;
pub mod arena_vec;
pub mod ast;
pub mod builtins;
pub mod diagnostics;
pub mod interpreter;
pub mod options;
pub mod scope;
pub mod values;
