//! Wallet repository for data access

use async_trait::async_trait;

use crate::domain::entities::Wallet;
use crate::shared::error::LedgerError;

/// Wallet repository trait
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Get the wallet owned by a restaurant
    async fn get_wallet(&self, restaurant_id: &str) -> Result<Option<Wallet>, LedgerError>;

    /// Insert or replace a wallet
    async fn save_wallet(&self, wallet: &Wallet) -> Result<(), LedgerError>;

    /// Existing wallet, or a fresh zero-balance one (not yet persisted)
    async fn wallet_or_default(&self, restaurant_id: &str) -> Result<Wallet, LedgerError> {
        Ok(self
            .get_wallet(restaurant_id)
            .await?
            .unwrap_or_else(|| Wallet::new(restaurant_id)))
    }
}
