//! Domain repositories
//!
//! Repository traits the service layer talks to. Storage backends implement
//! all four and get [`LedgerRepository`] for free.

pub mod wallet_repository;
pub mod withdrawal_repository;
pub mod order_repository;

// Re-export repositories
pub use wallet_repository::*;
pub use withdrawal_repository::*;
pub use order_repository::*;

/// Everything the withdrawal service needs from storage.
pub trait LedgerRepository:
    WalletRepository + WithdrawalRepository + OrderRepository + RestaurantRepository
{
}

impl<T> LedgerRepository for T where
    T: WalletRepository + WithdrawalRepository + OrderRepository + RestaurantRepository
{
}
