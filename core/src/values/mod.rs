pub mod function;
pub mod value;
pub use function::FunctionDeclaration;
pub use value::{TypeError, Value};
