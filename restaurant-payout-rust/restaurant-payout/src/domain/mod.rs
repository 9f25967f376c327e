pub mod auth;
pub mod error;

pub use auth::{AuthManager, Claims, Role};
pub use error::{ApiError, AuthError};
