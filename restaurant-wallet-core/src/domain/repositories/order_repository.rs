//! Read access to orders and restaurants owned by the rest of the platform

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Order, Restaurant};
use crate::shared::error::LedgerError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Delivered orders of a restaurant settled in `[from, to)`
    async fn delivered_orders(
        &self,
        restaurant_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, LedgerError>;
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, LedgerError>;

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, LedgerError>;
}
