//! Constants for the wallet ledger

use rust_decimal::Decimal;

// Payout constants
/// Commission applied to a delivered order that carries no explicit commission (10%).
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Amounts are kept to cents.
pub const AMOUNT_SCALE: u32 = 2;

// Listing constants
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

// Text constants
pub const MAX_REJECTION_REASON_LENGTH: usize = 500;
pub const MAX_SEARCH_LENGTH: usize = 100;

pub const WITHDRAWAL_DESCRIPTION: &str = "Withdrawal request";
pub const REFUND_DESCRIPTION: &str = "Refund for rejected withdrawal request";
