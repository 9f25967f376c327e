//! Order entity
//!
//! Orders belong to the ordering side of the platform. The ledger only reads
//! delivered ones to estimate what a restaurant earned this week.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::types::RestaurantId;
use crate::shared::utils::{non_negative, round_amount};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub restaurant_id: RestaurantId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    /// Platform commission recorded on the order, if any.
    #[serde(default)]
    pub commission_amount: Option<Decimal>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// When the order counts towards a payout cycle.
    pub fn settled_at(&self) -> DateTime<Utc> {
        self.delivered_at.unwrap_or(self.created_at)
    }

    pub fn commission(&self, fallback_rate: Decimal) -> Decimal {
        match self.commission_amount {
            Some(commission) => non_negative(commission),
            None => round_amount(self.total_amount * fallback_rate),
        }
    }

    pub fn net_revenue(&self, fallback_rate: Decimal) -> Decimal {
        non_negative(self.total_amount - self.commission(fallback_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::DEFAULT_COMMISSION_RATE;
    use rust_decimal_macros::dec;

    fn order(total: Decimal, commission: Option<Decimal>) -> Order {
        Order {
            id: "ord-1".to_string(),
            restaurant_id: "rest-1".to_string(),
            status: OrderStatus::Delivered,
            total_amount: total,
            commission_amount: commission,
            delivered_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fallback_commission() {
        let o = order(dec!(45.55), None);
        assert_eq!(o.commission(DEFAULT_COMMISSION_RATE), dec!(4.56));
        assert_eq!(o.net_revenue(DEFAULT_COMMISSION_RATE), dec!(40.99));
    }

    #[test]
    fn test_recorded_commission_wins() {
        let o = order(dec!(100), Some(dec!(15)));
        assert_eq!(o.net_revenue(DEFAULT_COMMISSION_RATE), dec!(85));
    }

    #[test]
    fn test_net_revenue_never_negative() {
        let o = order(dec!(10), Some(dec!(12)));
        assert_eq!(o.net_revenue(DEFAULT_COMMISSION_RATE), Decimal::ZERO);
    }
}
