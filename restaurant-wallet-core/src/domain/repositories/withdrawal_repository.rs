//! Withdrawal request repository for data access

use async_trait::async_trait;

use crate::domain::entities::WithdrawalRequest;
use crate::shared::error::LedgerError;

#[async_trait]
pub trait WithdrawalRepository: Send + Sync {
    /// Insert or replace a request
    async fn save_request(&self, request: &WithdrawalRequest) -> Result<(), LedgerError>;

    /// Get request by id
    async fn get_request(&self, id: &str) -> Result<Option<WithdrawalRequest>, LedgerError>;

    /// All requests of one restaurant
    async fn list_requests_for_restaurant(&self, restaurant_id: &str) -> Result<Vec<WithdrawalRequest>, LedgerError>;

    /// Every request in the ledger
    async fn list_requests(&self) -> Result<Vec<WithdrawalRequest>, LedgerError>;
}
