use core::fmt;

use thiserror::Error;

/// A runtime value.
///
/// Strings borrow their bytes from the program text or the arena; a value never
/// owns memory of its own and is copied freely between scopes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value<'a> {
    /// The absence of a value: what a body without `return` produces.
    #[default]
    Nothing,
    Number(f64),
    String(&'a str),
}

/// Error extracting a payload of the wrong kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl<'a> Value<'a> {
    /// Name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nothing => "nothing",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    /// Extract a number.
    ///
    /// Returns error if value is not a Number.
    pub fn as_number(&self) -> Result<f64, TypeError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(TypeError::Mismatch {
                expected: "number",
                found: other.kind(),
            }),
        }
    }

    /// Extract a string.
    ///
    /// Returns error if value is not a String.
    pub fn as_str(&self) -> Result<&'a str, TypeError> {
        match self {
            Value::String(s) => Ok(*s),
            other => Err(TypeError::Mismatch {
                expected: "string",
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nothing => write!(f, "nothing"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}
