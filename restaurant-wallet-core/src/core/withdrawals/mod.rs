//! Withdrawal business rules and listing filters
//!
//! Pure checks shared by the service layer; nothing in here touches storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::cycle::BalanceBreakdown;
use crate::domain::entities::{Restaurant, WithdrawalRequest, WithdrawalStatus};
use crate::shared::error::LedgerError;
use crate::shared::utils::round_amount;

/// Normalise a requested amount to cents, rejecting anything not positive.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Withdrawal amount must be greater than zero"));
    }
    let rounded = round_amount(amount);
    if rounded <= Decimal::ZERO {
        return Err(LedgerError::validation("Withdrawal amount must be at least 0.01"));
    }
    Ok(rounded)
}

/// Only one pending request per restaurant.
pub fn ensure_no_pending(restaurant_id: &str, existing: &[WithdrawalRequest]) -> Result<(), LedgerError> {
    if existing.iter().any(|r| r.restaurant_id == restaurant_id && r.is_pending()) {
        return Err(LedgerError::PendingRequestExists(restaurant_id.to_string()));
    }
    Ok(())
}

pub fn ensure_available(amount: Decimal, breakdown: &BalanceBreakdown) -> Result<(), LedgerError> {
    if amount > breakdown.available {
        return Err(LedgerError::InsufficientBalance {
            requested: amount,
            available: breakdown.available,
        });
    }
    Ok(())
}

/// Listing filter. `None` fields do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WithdrawalFilter {
    pub status: Option<WithdrawalStatus>,
    pub restaurant_id: Option<String>,
    pub processed_by: Option<String>,
    pub search: Option<String>,
}

impl WithdrawalFilter {
    pub fn matches(&self, request: &WithdrawalRequest, restaurant: Option<&Restaurant>) -> bool {
        if self.status.is_some_and(|status| status != request.status) {
            return false;
        }
        if self.restaurant_id.as_deref().is_some_and(|id| id != request.restaurant_id) {
            return false;
        }
        if let Some(admin) = self.processed_by.as_deref() {
            if request.processed_by.as_deref() != Some(admin) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => restaurant.is_some_and(|r| r.matches_search(term)),
            None => true,
        }
    }

    /// Filter and sort newest first.
    pub fn apply(
        &self,
        requests: Vec<WithdrawalRequest>,
        restaurants: &HashMap<String, Restaurant>,
    ) -> Vec<WithdrawalRequest> {
        let mut selected: Vec<WithdrawalRequest> = requests
            .into_iter()
            .filter(|r| self.matches(r, restaurants.get(&r.restaurant_id)))
            .collect();
        selected.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        selected
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusTotals {
    pub count: usize,
    pub amount: Decimal,
}

/// Request counts and sums per status, every status present.
pub fn status_totals(requests: &[WithdrawalRequest]) -> HashMap<WithdrawalStatus, StatusTotals> {
    let mut totals: HashMap<WithdrawalStatus, StatusTotals> = WithdrawalStatus::ALL
        .into_iter()
        .map(|status| (status, StatusTotals::default()))
        .collect();
    for request in requests {
        let entry = totals.entry(request.status).or_default();
        entry.count += 1;
        entry.amount += request.amount;
    }
    totals
}
