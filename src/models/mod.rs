// Re-export all model types for ease of use

pub mod employee;
pub mod responses;
pub mod validation;

// Re-export commonly used types
pub use employee::*;
pub use responses::*;
pub use validation::{FieldError, ValidationErrors};
