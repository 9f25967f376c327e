//! Shared types, utilities, and constants
//!
//! Common identifiers, pagination, money helpers and the ledger error type.

pub mod types;
pub mod utils;
pub mod constants;
pub mod error;

// Re-export shared components
pub use types::*;
pub use utils::*;
pub use constants::*;
pub use error::*;
