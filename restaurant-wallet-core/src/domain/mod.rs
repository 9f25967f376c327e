//! Domain layer - entities and repositories
//!
//! Records of the withdrawal ledger and the storage contracts around them.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
