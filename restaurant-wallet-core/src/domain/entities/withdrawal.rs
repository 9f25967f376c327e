//! Withdrawal request entity
//!
//! Created by a restaurant, processed once by an administrator, never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::LedgerError;
use crate::shared::types::{AdminId, RequestId, RestaurantId, TransactionId};
use crate::shared::utils::generate_id;

/// Status of a withdrawal request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WithdrawalStatus {
    /// Awaiting an administrator
    Pending,
    /// Accepted; the deducted money is on its way out
    Approved,
    /// Refused; the money went back into the wallet
    Rejected,
    /// Paid out
    Processed,
}

impl WithdrawalStatus {
    pub const ALL: [WithdrawalStatus; 4] = [
        WithdrawalStatus::Pending,
        WithdrawalStatus::Approved,
        WithdrawalStatus::Rejected,
        WithdrawalStatus::Processed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "Pending",
            WithdrawalStatus::Approved => "Approved",
            WithdrawalStatus::Rejected => "Rejected",
            WithdrawalStatus::Processed => "Processed",
        }
    }

    /// Pending and Approved requests still hold money against the weekly payout.
    pub fn reserves_funds(&self) -> bool {
        matches!(self, WithdrawalStatus::Pending | WithdrawalStatus::Approved)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithdrawalStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LedgerError::validation(format!(
                    "Invalid status '{}'. Expected one of: Pending, Approved, Rejected, Processed",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalRequest {
    pub id: RequestId,
    pub restaurant_id: RestaurantId,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<AdminId>,
    pub rejection_reason: Option<String>,
    /// Wallet transaction created alongside this request.
    pub transaction_id: Option<TransactionId>,
}

impl WithdrawalRequest {
    pub fn new(restaurant_id: impl Into<RestaurantId>, amount: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            restaurant_id: restaurant_id.into(),
            amount,
            status: WithdrawalStatus::Pending,
            requested_at: now,
            processed_at: None,
            processed_by: None,
            rejection_reason: None,
            transaction_id: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }

    fn ensure_pending(&self) -> Result<(), LedgerError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(LedgerError::invalid_state(format!(
                "Withdrawal request {} is already {}",
                self.id, self.status
            )))
        }
    }

    pub fn approve(&mut self, admin_id: &str, now: DateTime<Utc>) -> Result<(), LedgerError> {
        self.ensure_pending()?;
        self.status = WithdrawalStatus::Approved;
        self.processed_at = Some(now);
        self.processed_by = Some(admin_id.to_string());
        Ok(())
    }

    pub fn reject(&mut self, admin_id: &str, reason: Option<String>, now: DateTime<Utc>) -> Result<(), LedgerError> {
        self.ensure_pending()?;
        self.status = WithdrawalStatus::Rejected;
        self.processed_at = Some(now);
        self.processed_by = Some(admin_id.to_string());
        self.rejection_reason = reason.filter(|r| !r.trim().is_empty());
        Ok(())
    }
}
