//! Weekly payout cycle
//!
//! Restaurants are paid out per Monday–Sunday week (UTC). What a restaurant may
//! withdraw is the larger of its stored wallet balance and what it earned in
//! the current week, net of commission and of money already reserved by
//! pending or approved withdrawals.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Order, WithdrawalRequest};
use crate::shared::utils::non_negative;

/// Half-open window `[start, end)`; `start` is Monday 00:00 UTC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayoutCycle {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PayoutCycle {
    pub fn containing(at: DateTime<Utc>) -> Self {
        let days_from_monday = at.weekday().num_days_from_monday() as i64;
        let monday = at.date_naive() - Duration::days(days_from_monday);
        let start = monday.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::weeks(1),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Last instant of the Sunday, for display.
    pub fn last_day(&self) -> DateTime<Utc> {
        self.end - Duration::milliseconds(1)
    }
}

/// How the effective available balance was reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceBreakdown {
    pub wallet_balance: Decimal,
    pub cycle_start: DateTime<Utc>,
    pub cycle_end: DateTime<Utc>,
    pub delivered_orders: usize,
    pub cycle_gross: Decimal,
    pub cycle_commission: Decimal,
    pub cycle_net: Decimal,
    /// Pending and approved withdrawals requested inside the cycle.
    pub reserved: Decimal,
    pub cycle_payout: Decimal,
    pub available: Decimal,
}

/// Compute the breakdown for one restaurant.
///
/// `orders` and `requests` may include records outside the cycle or with
/// other statuses; they are filtered here.
pub fn compute_available(
    cycle: PayoutCycle,
    wallet_balance: Decimal,
    orders: &[Order],
    requests: &[WithdrawalRequest],
    commission_rate: Decimal,
) -> BalanceBreakdown {
    let delivered: Vec<&Order> = orders
        .iter()
        .filter(|order| order.is_delivered() && cycle.contains(order.settled_at()))
        .collect();

    let cycle_gross: Decimal = delivered.iter().map(|order| order.total_amount).sum();
    let cycle_commission: Decimal = delivered.iter().map(|order| order.commission(commission_rate)).sum();
    let cycle_net: Decimal = delivered.iter().map(|order| order.net_revenue(commission_rate)).sum();

    let reserved: Decimal = requests
        .iter()
        .filter(|request| request.status.reserves_funds() && cycle.contains(request.requested_at))
        .map(|request| request.amount)
        .sum();

    let cycle_payout = non_negative(cycle_net - reserved);
    let wallet_balance = non_negative(wallet_balance);

    BalanceBreakdown {
        wallet_balance,
        cycle_start: cycle.start,
        cycle_end: cycle.end,
        delivered_orders: delivered.len(),
        cycle_gross,
        cycle_commission,
        cycle_net,
        reserved,
        cycle_payout,
        available: wallet_balance.max(cycle_payout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OrderStatus, WithdrawalStatus};
    use crate::shared::constants::DEFAULT_COMMISSION_RATE;
    use chrono::{TimeZone, Weekday};
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn delivered(total: Decimal, when: DateTime<Utc>) -> Order {
        Order {
            id: crate::shared::utils::generate_id(),
            restaurant_id: "rest-1".to_string(),
            status: OrderStatus::Delivered,
            total_amount: total,
            commission_amount: None,
            delivered_at: Some(when),
            created_at: when,
        }
    }

    fn request(amount: Decimal, status: WithdrawalStatus, when: DateTime<Utc>) -> WithdrawalRequest {
        let mut req = WithdrawalRequest::new("rest-1", amount, when);
        req.status = status;
        req
    }

    #[test]
    fn test_cycle_starts_on_monday() {
        // 2026-10-21 is a Wednesday
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 15));

        assert_eq!(cycle.start, at(2026, 10, 19, 0));
        assert_eq!(cycle.end, at(2026, 10, 26, 0));
        assert_eq!(cycle.start.weekday(), Weekday::Mon);
        assert_eq!(cycle.last_day().weekday(), Weekday::Sun);
    }

    #[test]
    fn test_cycle_boundaries() {
        let monday = at(2026, 10, 19, 0);
        let sunday_night = Utc.with_ymd_and_hms(2026, 10, 25, 23, 59, 59).unwrap();

        assert_eq!(PayoutCycle::containing(monday).start, monday);
        assert_eq!(PayoutCycle::containing(sunday_night).start, monday);

        let cycle = PayoutCycle::containing(monday);
        assert!(cycle.contains(monday));
        assert!(cycle.contains(sunday_night));
        assert!(!cycle.contains(at(2026, 10, 26, 0)));
        assert!(!cycle.contains(at(2026, 10, 18, 23)));
    }

    #[test]
    fn test_cycle_payout_uses_fallback_commission() {
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 12));
        let orders = vec![
            delivered(dec!(100), at(2026, 10, 19, 10)),
            delivered(dec!(50), at(2026, 10, 20, 10)),
        ];

        let breakdown = compute_available(cycle, Decimal::ZERO, &orders, &[], DEFAULT_COMMISSION_RATE);

        assert_eq!(breakdown.delivered_orders, 2);
        assert_eq!(breakdown.cycle_gross, dec!(150));
        assert_eq!(breakdown.cycle_commission, dec!(15));
        assert_eq!(breakdown.cycle_net, dec!(135));
        assert_eq!(breakdown.cycle_payout, dec!(135));
        assert_eq!(breakdown.available, dec!(135));
    }

    #[test]
    fn test_orders_outside_cycle_or_undelivered_are_ignored() {
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 12));
        let mut cancelled = delivered(dec!(80), at(2026, 10, 20, 10));
        cancelled.status = OrderStatus::Cancelled;
        let orders = vec![
            delivered(dec!(100), at(2026, 10, 12, 10)),
            delivered(dec!(100), at(2026, 10, 26, 1)),
            cancelled,
        ];

        let breakdown = compute_available(cycle, Decimal::ZERO, &orders, &[], DEFAULT_COMMISSION_RATE);

        assert_eq!(breakdown.delivered_orders, 0);
        assert_eq!(breakdown.cycle_payout, Decimal::ZERO);
    }

    #[test]
    fn test_reserved_withdrawals_reduce_payout() {
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 12));
        let orders = vec![delivered(dec!(200), at(2026, 10, 19, 10))];
        let requests = vec![
            request(dec!(50), WithdrawalStatus::Pending, at(2026, 10, 20, 9)),
            request(dec!(30), WithdrawalStatus::Approved, at(2026, 10, 20, 10)),
            request(dec!(70), WithdrawalStatus::Rejected, at(2026, 10, 20, 11)),
            request(dec!(90), WithdrawalStatus::Approved, at(2026, 10, 10, 11)),
        ];

        let breakdown = compute_available(cycle, Decimal::ZERO, &orders, &requests, DEFAULT_COMMISSION_RATE);

        assert_eq!(breakdown.reserved, dec!(80));
        assert_eq!(breakdown.cycle_payout, dec!(100));
    }

    #[test]
    fn test_available_is_the_greater_source() {
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 12));
        let orders = vec![delivered(dec!(100), at(2026, 10, 19, 10))];

        let richer_wallet = compute_available(cycle, dec!(500), &orders, &[], DEFAULT_COMMISSION_RATE);
        assert_eq!(richer_wallet.available, dec!(500));

        let richer_cycle = compute_available(cycle, dec!(20), &orders, &[], DEFAULT_COMMISSION_RATE);
        assert_eq!(richer_cycle.available, dec!(90));
    }

    #[test]
    fn test_payout_floors_at_zero() {
        let cycle = PayoutCycle::containing(at(2026, 10, 21, 12));
        let orders = vec![delivered(dec!(10), at(2026, 10, 19, 10))];
        let requests = vec![request(dec!(50), WithdrawalStatus::Pending, at(2026, 10, 20, 9))];

        let breakdown = compute_available(cycle, Decimal::ZERO, &orders, &requests, DEFAULT_COMMISSION_RATE);

        assert_eq!(breakdown.cycle_payout, Decimal::ZERO);
        assert_eq!(breakdown.available, Decimal::ZERO);
    }
}
