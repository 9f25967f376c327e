pub mod sanitizer;

pub use sanitizer::{InputSanitizer, ValidationResult};
