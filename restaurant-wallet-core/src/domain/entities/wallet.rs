//! Wallet entity and its transaction history
//!
//! A wallet belongs to exactly one restaurant. Every balance mutation goes
//! through the methods here so the non-negative invariant holds after each one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::withdrawal::WithdrawalRequest;
use crate::shared::constants::{REFUND_DESCRIPTION, WITHDRAWAL_DESCRIPTION};
use crate::shared::types::{RestaurantId, TransactionId};
use crate::shared::utils::{generate_id, non_negative};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Withdrawal,
    Refund,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub description: String,
    /// Withdrawal request this entry belongs to, when known.
    #[serde(default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    fn new(
        amount: Decimal,
        transaction_type: TransactionType,
        status: TransactionStatus,
        description: &str,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(),
            amount,
            transaction_type,
            status,
            description: description.to_string(),
            reference,
            created_at: now,
            updated_at: now,
        }
    }

    fn set_status(&mut self, status: TransactionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Per-restaurant running balance and transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wallet {
    pub restaurant_id: RestaurantId,
    pub total_balance: Decimal,
    pub total_withdrawn: Decimal,
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(restaurant_id: impl Into<RestaurantId>) -> Self {
        let now = Utc::now();
        Self {
            restaurant_id: restaurant_id.into(),
            total_balance: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_balance(restaurant_id: impl Into<RestaurantId>, balance: Decimal) -> Self {
        let mut wallet = Self::new(restaurant_id);
        wallet.total_balance = non_negative(balance);
        wallet
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Append a pending withdrawal and deduct it straight away.
    ///
    /// The deduction is clamped: the request may have been backed by the
    /// weekly payout rather than the stored balance.
    pub fn record_withdrawal(&mut self, request: &WithdrawalRequest, now: DateTime<Utc>) -> TransactionId {
        let tx = Transaction::new(
            request.amount,
            TransactionType::Withdrawal,
            TransactionStatus::Pending,
            WITHDRAWAL_DESCRIPTION,
            Some(request.id.clone()),
            now,
        );
        let id = tx.id.clone();
        self.transactions.push(tx);
        self.total_balance = non_negative(self.total_balance - request.amount);
        self.total_withdrawn += request.amount;
        self.updated_at = now;
        log::debug!(
            "wallet {}: pending withdrawal {} of {} recorded",
            self.restaurant_id, id, request.amount
        );
        id
    }

    /// Mark the request's withdrawal Completed. No balance change: it was
    /// deducted when the request was created.
    pub fn complete_withdrawal(&mut self, request: &WithdrawalRequest, now: DateTime<Utc>) -> TransactionId {
        let id = match self.find_withdrawal(request) {
            Some(index) => {
                let tx = &mut self.transactions[index];
                tx.set_status(TransactionStatus::Completed, now);
                tx.reference.get_or_insert_with(|| request.id.clone());
                tx.id.clone()
            }
            None => {
                log::warn!(
                    "wallet {}: no withdrawal entry for request {}, recording a completed one",
                    self.restaurant_id, request.id
                );
                let tx = Transaction::new(
                    request.amount,
                    TransactionType::Withdrawal,
                    TransactionStatus::Completed,
                    WITHDRAWAL_DESCRIPTION,
                    Some(request.id.clone()),
                    now,
                );
                let id = tx.id.clone();
                self.transactions.push(tx);
                id
            }
        };
        self.updated_at = now;
        id
    }

    /// Cancel the request's withdrawal and give the money back.
    pub fn cancel_withdrawal(&mut self, request: &WithdrawalRequest, now: DateTime<Utc>) -> TransactionId {
        let id = match self.find_withdrawal(request) {
            Some(index) => {
                let tx = &mut self.transactions[index];
                tx.set_status(TransactionStatus::Cancelled, now);
                tx.id.clone()
            }
            None => {
                let tx = Transaction::new(
                    request.amount,
                    TransactionType::Refund,
                    TransactionStatus::Completed,
                    REFUND_DESCRIPTION,
                    Some(request.id.clone()),
                    now,
                );
                let id = tx.id.clone();
                self.transactions.push(tx);
                id
            }
        };
        self.total_balance += request.amount;
        self.total_withdrawn = non_negative(self.total_withdrawn - request.amount);
        self.updated_at = now;
        id
    }

    /// Linked entry first, then the oldest pending withdrawal of the same
    /// amount that is either unreferenced or references this request.
    fn find_withdrawal(&self, request: &WithdrawalRequest) -> Option<usize> {
        if let Some(linked) = request.transaction_id.as_deref() {
            if let Some(index) = self.transactions.iter().position(|tx| tx.id == linked) {
                return Some(index);
            }
        }

        self.transactions.iter().position(|tx| {
            tx.transaction_type == TransactionType::Withdrawal
                && tx.status == TransactionStatus::Pending
                && tx.amount == request.amount
                && tx.reference.as_deref().map_or(true, |r| r == request.id)
        })
    }

    /// Transactions newest first.
    pub fn history(&self) -> Vec<Transaction> {
        let mut history = self.transactions.clone();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> WithdrawalRequest {
        WithdrawalRequest::new("rest-1", amount, Utc::now())
    }

    #[test]
    fn test_record_withdrawal_deducts_and_links() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let req = request(dec!(40));

        let tx_id = wallet.record_withdrawal(&req, Utc::now());

        assert_eq!(wallet.total_balance, dec!(60));
        assert_eq!(wallet.total_withdrawn, dec!(40));
        let tx = wallet.transaction(&tx_id).unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.transaction_type, TransactionType::Withdrawal);
        assert_eq!(tx.reference.as_deref(), Some(req.id.as_str()));
    }

    #[test]
    fn test_record_withdrawal_clamps_at_zero() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(25));
        wallet.record_withdrawal(&request(dec!(90)), Utc::now());

        assert_eq!(wallet.total_balance, Decimal::ZERO);
        assert_eq!(wallet.total_withdrawn, dec!(90));
    }

    #[test]
    fn test_complete_leaves_balance_untouched() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let mut req = request(dec!(30));
        req.transaction_id = Some(wallet.record_withdrawal(&req, Utc::now()));

        let tx_id = wallet.complete_withdrawal(&req, Utc::now());

        assert_eq!(Some(tx_id.clone()), req.transaction_id);
        assert_eq!(wallet.total_balance, dec!(70));
        assert_eq!(wallet.transaction(&tx_id).unwrap().status, TransactionStatus::Completed);
        assert_eq!(wallet.transactions.len(), 1);
    }

    #[test]
    fn test_complete_matches_unlinked_entry_by_amount() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let req = request(dec!(30));
        wallet.record_withdrawal(&req, Utc::now());

        // link lost
        let tx_id = wallet.complete_withdrawal(&req, Utc::now());

        assert_eq!(wallet.transactions.len(), 1);
        assert_eq!(wallet.transaction(&tx_id).unwrap().status, TransactionStatus::Completed);
    }

    #[test]
    fn test_complete_without_any_entry_appends_one() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let req = request(dec!(30));

        let tx_id = wallet.complete_withdrawal(&req, Utc::now());

        assert_eq!(wallet.transactions.len(), 1);
        assert_eq!(wallet.total_balance, dec!(100));
        assert_eq!(wallet.transaction(&tx_id).unwrap().status, TransactionStatus::Completed);
    }

    #[test]
    fn test_match_ignores_other_requests_entries() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let other = request(dec!(30));
        let other_tx = wallet.record_withdrawal(&other, Utc::now());
        let req = request(dec!(30));

        wallet.complete_withdrawal(&req, Utc::now());

        assert_eq!(wallet.transaction(&other_tx).unwrap().status, TransactionStatus::Pending);
        assert_eq!(wallet.transactions.len(), 2);
    }

    #[test]
    fn test_cancel_refunds_exact_amount() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(100));
        let mut req = request(dec!(45.50));
        req.transaction_id = Some(wallet.record_withdrawal(&req, Utc::now()));

        let tx_id = wallet.cancel_withdrawal(&req, Utc::now());

        assert_eq!(wallet.total_balance, dec!(100));
        assert_eq!(wallet.total_withdrawn, Decimal::ZERO);
        assert_eq!(wallet.transaction(&tx_id).unwrap().status, TransactionStatus::Cancelled);
    }

    #[test]
    fn test_cancel_without_entry_records_refund() {
        let mut wallet = Wallet::with_balance("rest-1", dec!(10));
        let req = request(dec!(5));

        let tx_id = wallet.cancel_withdrawal(&req, Utc::now());
        let tx = wallet.transaction(&tx_id).unwrap();

        assert_eq!(tx.transaction_type, TransactionType::Refund);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(wallet.total_balance, dec!(15));
        assert_eq!(wallet.total_withdrawn, Decimal::ZERO);
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let mut wallet = Wallet::new("rest-1");
        wallet.record_withdrawal(&request(dec!(1)), Utc::now());
        let json = serde_json::to_value(&wallet.transactions[0]).unwrap();

        assert_eq!(json["type"], "withdrawal");
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["amount"], "1");
    }

    proptest! {
        #[test]
        fn prop_balance_never_negative(
            start in 0i64..10_000,
            ops in proptest::collection::vec((0i64..5_000, 0u8..3), 1..40),
        ) {
            let mut wallet = Wallet::with_balance("rest-1", Decimal::new(start, 0));
            let mut open: Vec<WithdrawalRequest> = Vec::new();

            for (cents, op) in ops {
                match op {
                    0 => {
                        let mut req = request(Decimal::new(cents + 1, 2));
                        req.transaction_id = Some(wallet.record_withdrawal(&req, Utc::now()));
                        open.push(req);
                    }
                    1 => {
                        if let Some(req) = open.pop() {
                            wallet.complete_withdrawal(&req, Utc::now());
                        }
                    }
                    _ => {
                        if let Some(req) = open.pop() {
                            wallet.cancel_withdrawal(&req, Utc::now());
                        }
                    }
                }
                prop_assert!(wallet.total_balance >= Decimal::ZERO);
                prop_assert!(wallet.total_withdrawn >= Decimal::ZERO);
            }
        }
    }
}
