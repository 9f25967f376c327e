//! Core ledger functionality
//!
//! Payout-cycle arithmetic and the withdrawal rules built on it.

pub mod cycle;
pub mod withdrawals;
