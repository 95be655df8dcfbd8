mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{StandardValidator, ValidationOptions, Validator};
