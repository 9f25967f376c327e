//! Restaurant Wallet Core
//!
//! Ledger core for restaurant payouts: wallets, withdrawal requests and the
//! weekly payout cycle that decides how much a restaurant may cash out.
//!
//! ## Architecture
//!
//! - **Core**: payout-cycle arithmetic and withdrawal rules
//! - **Domain**: entities and repository traits
//! - **Shared**: common types, constants, errors and utilities
//!
//! Storage, transport and notification live in the service crate; this crate
//! does no I/O.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//! use restaurant_wallet_core::{
//!     core::cycle::{compute_available, PayoutCycle},
//!     Wallet, WithdrawalRequest, DEFAULT_COMMISSION_RATE,
//! };
//!
//! let mut wallet = Wallet::with_balance("rest-1", Decimal::new(100, 0));
//! let breakdown = compute_available(
//!     PayoutCycle::current(),
//!     wallet.total_balance,
//!     &[],
//!     &[],
//!     DEFAULT_COMMISSION_RATE,
//! );
//! assert_eq!(breakdown.available, Decimal::new(100, 0));
//!
//! let mut request = WithdrawalRequest::new("rest-1", Decimal::new(40, 0), Utc::now());
//! request.transaction_id = Some(wallet.record_withdrawal(&request, Utc::now()));
//! assert_eq!(wallet.total_balance, Decimal::new(60, 0));
//! ```

pub mod core;
pub mod domain;
pub mod shared;

// Re-export main types and traits
pub use domain::entities::*;
pub use domain::repositories::*;
pub use shared::constants::*;
pub use shared::error::LedgerError;
pub use shared::types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
