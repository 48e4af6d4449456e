//! Output built-ins.

use super::Args;
use crate::values::Value;

/// `print(s)`: write the string `s` and a newline to the output stream.
///
/// Anything other than exactly one string argument is reported and ignored.
pub fn print<'a>(args: &mut Args<'_, 'a>) -> Value<'a> {
    if args.len() != 1 {
        args.error(format!(
            "{} expects exactly 1 argument, got {}",
            args.name(),
            args.len()
        ));
        return Value::Nothing;
    }

    let text = match args.get(0).unwrap_or_default().as_str() {
        Ok(text) => text,
        Err(err) => {
            args.error(format!("{} expects a string argument: {}", args.name(), err));
            return Value::Nothing;
        }
    };

    if let Err(err) = writeln!(args.output(), "{}", text) {
        args.error(format!("{} failed to write output: {}", args.name(), err));
    }
    Value::Nothing
}
