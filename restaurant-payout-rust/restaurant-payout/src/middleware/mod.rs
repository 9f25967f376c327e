pub mod auth;
pub mod error_handling;
pub mod security;

pub use auth::{AdminUser, AuthenticatedUser, RestaurantUser};
pub use security::{build_cors, SecurityHeaders};
