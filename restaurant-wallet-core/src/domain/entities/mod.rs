//! Domain entities
//!
//! Wallet, withdrawal request, restaurant and order records.

pub mod wallet;
pub mod withdrawal;
pub mod order;
pub mod restaurant;

// Re-export entities
pub use wallet::*;
pub use withdrawal::*;
pub use order::*;
pub use restaurant::*;
