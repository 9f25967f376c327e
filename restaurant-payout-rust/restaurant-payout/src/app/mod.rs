pub mod withdrawal_service;

pub use withdrawal_service::{WithdrawalService, WithdrawalServiceSettings, WithdrawalStats, WithdrawalView};
