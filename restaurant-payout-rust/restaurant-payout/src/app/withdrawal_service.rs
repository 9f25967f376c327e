use chrono::Utc;
use restaurant_wallet_core::core::cycle::{compute_available, BalanceBreakdown, PayoutCycle};
use restaurant_wallet_core::core::withdrawals::{
    ensure_available, ensure_no_pending, status_totals, validate_amount, StatusTotals, WithdrawalFilter,
};
use restaurant_wallet_core::{
    LedgerError, LedgerRepository, Page, PageRequest, Restaurant, RestaurantRepository, Wallet,
    WalletRepository, WithdrawalRepository, WithdrawalRequest, WithdrawalStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::infrastructure::config::Config;
use crate::infrastructure::logger::Logger;
use crate::infrastructure::notification::{EmailMessage, Notifier};

/// A request row with the owning restaurant's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalView {
    #[serde(flatten)]
    pub request: WithdrawalRequest,
    pub restaurant_name: Option<String>,
    pub restaurant_external_id: Option<String>,
}

impl WithdrawalView {
    fn new(request: WithdrawalRequest, restaurant: Option<&Restaurant>) -> Self {
        Self {
            restaurant_name: restaurant.map(|r| r.name.clone()),
            restaurant_external_id: restaurant.map(|r| r.external_id.clone()),
            request,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalStats {
    pub total_requests: usize,
    pub total_amount: Decimal,
    pub by_status: BTreeMap<String, StatusTotals>,
}

#[derive(Debug, Clone)]
pub struct WithdrawalServiceSettings {
    pub commission_rate: Decimal,
    pub admin_email: String,
    pub notifications_enabled: bool,
}

impl WithdrawalServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            commission_rate: config.withdrawals.commission_rate,
            admin_email: config.notifications.admin_email.clone(),
            notifications_enabled: config.notifications.enabled,
        }
    }
}

/// Create, approve and reject withdrawal requests against the wallet ledger.
///
/// Each operation is a plain read-modify-write of the stored records. Two
/// concurrent calls for the same wallet may race; the last write wins.
pub struct WithdrawalService {
    repo: Arc<dyn LedgerRepository>,
    notifier: Arc<dyn Notifier>,
    settings: WithdrawalServiceSettings,
}

impl WithdrawalService {
    pub fn new(
        repo: Arc<dyn LedgerRepository>,
        notifier: Arc<dyn Notifier>,
        settings: WithdrawalServiceSettings,
    ) -> Self {
        Self {
            repo,
            notifier,
            settings,
        }
    }

    pub async fn available_balance(&self, restaurant_id: &str) -> Result<BalanceBreakdown, LedgerError> {
        let wallet = self.repo.wallet_or_default(restaurant_id).await?;
        let requests = self.repo.list_requests_for_restaurant(restaurant_id).await?;
        self.breakdown(&wallet, &requests).await
    }

    async fn breakdown(&self, wallet: &Wallet, requests: &[WithdrawalRequest]) -> Result<BalanceBreakdown, LedgerError> {
        let cycle = PayoutCycle::current();
        let orders = self
            .repo
            .delivered_orders(&wallet.restaurant_id, cycle.start, cycle.end)
            .await?;
        Ok(compute_available(
            cycle,
            wallet.total_balance,
            &orders,
            requests,
            self.settings.commission_rate,
        ))
    }

    pub async fn create_request(&self, restaurant_id: &str, amount: Decimal) -> Result<WithdrawalRequest, LedgerError> {
        let amount = validate_amount(amount)?;

        let existing = self.repo.list_requests_for_restaurant(restaurant_id).await?;
        ensure_no_pending(restaurant_id, &existing)?;

        let original = self.repo.wallet_or_default(restaurant_id).await?;
        let breakdown = self.breakdown(&original, &existing).await?;
        ensure_available(amount, &breakdown)?;

        let now = Utc::now();
        let mut wallet = original.clone();
        let mut request = WithdrawalRequest::new(restaurant_id, amount, now);
        request.transaction_id = Some(wallet.record_withdrawal(&request, now));

        self.store(&original, &wallet, &request).await?;
        Logger::withdrawal_requested(&request.id, restaurant_id, amount);

        let restaurant = self.repo.get_restaurant(restaurant_id).await.ok().flatten();
        let name = restaurant.as_ref().map_or(restaurant_id, |r| r.name.as_str());
        self.notify(
            Some(self.settings.admin_email.clone()),
            format!("New withdrawal request from {}", name),
            format!(
                "{} requested a withdrawal of {}.\nAvailable before the request: {}\nRequest id: {}",
                name, amount, breakdown.available, request.id
            ),
        )
        .await;

        Ok(request)
    }

    /// Writes the wallet, then the request. If the request cannot be written
    /// the wallet is put back, so a retry never debits or refunds twice.
    async fn store(&self, original: &Wallet, wallet: &Wallet, request: &WithdrawalRequest) -> Result<(), LedgerError> {
        self.repo.save_wallet(wallet).await?;
        if let Err(e) = self.repo.save_request(request).await {
            if let Err(restore) = self.repo.save_wallet(original).await {
                tracing::error!(
                    request_id = %request.id,
                    restaurant_id = %wallet.restaurant_id,
                    error = %restore,
                    "Failed to restore wallet after request write failed"
                );
            }
            return Err(e);
        }
        Ok(())
    }

    async fn load_request(&self, request_id: &str) -> Result<WithdrawalRequest, LedgerError> {
        self.repo
            .get_request(request_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Withdrawal request {}", request_id)))
    }

    pub async fn approve(&self, request_id: &str, admin_id: &str) -> Result<WithdrawalRequest, LedgerError> {
        let mut request = self.load_request(request_id).await?;
        let now = Utc::now();
        request.approve(admin_id, now)?;

        let original = self.repo.wallet_or_default(&request.restaurant_id).await?;
        let mut wallet = original.clone();
        request.transaction_id = Some(wallet.complete_withdrawal(&request, now));

        self.store(&original, &wallet, &request).await?;
        Logger::withdrawal_approved(&request.id, admin_id);

        self.notify_restaurant(
            &request.restaurant_id,
            "Your withdrawal request was approved".to_string(),
            format!("Your withdrawal of {} has been approved and will be paid out shortly.", request.amount),
        )
        .await;

        Ok(request)
    }

    pub async fn reject(
        &self,
        request_id: &str,
        admin_id: &str,
        reason: Option<String>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let mut request = self.load_request(request_id).await?;
        let now = Utc::now();
        request.reject(admin_id, reason, now)?;

        let original = self.repo.wallet_or_default(&request.restaurant_id).await?;
        let mut wallet = original.clone();
        let tx_id = wallet.cancel_withdrawal(&request, now);
        if request.transaction_id.is_none() {
            request.transaction_id = Some(tx_id);
        }

        self.store(&original, &wallet, &request).await?;
        Logger::withdrawal_rejected(&request.id, admin_id, request.amount);

        let reason_line = request
            .rejection_reason
            .as_deref()
            .map(|r| format!("\nReason: {}", r))
            .unwrap_or_default();
        self.notify_restaurant(
            &request.restaurant_id,
            "Your withdrawal request was rejected".to_string(),
            format!(
                "Your withdrawal of {} was rejected and the amount returned to your wallet.{}",
                request.amount, reason_line
            ),
        )
        .await;

        Ok(request)
    }

    /// `restaurant_scope` limits the lookup to one restaurant; other
    /// restaurants' requests read as missing.
    pub async fn get_request(&self, request_id: &str, restaurant_scope: Option<&str>) -> Result<WithdrawalView, LedgerError> {
        let request = self.load_request(request_id).await?;
        if restaurant_scope.is_some_and(|owner| owner != request.restaurant_id) {
            return Err(LedgerError::not_found(format!("Withdrawal request {}", request_id)));
        }
        let restaurant = self.repo.get_restaurant(&request.restaurant_id).await?;
        Ok(WithdrawalView::new(request, restaurant.as_ref()))
    }

    pub async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        status: Option<WithdrawalStatus>,
        page: PageRequest,
    ) -> Result<Page<WithdrawalView>, LedgerError> {
        let filter = WithdrawalFilter {
            status,
            ..WithdrawalFilter::default()
        };
        let requests = self.repo.list_requests_for_restaurant(restaurant_id).await?;
        let restaurant = self.repo.get_restaurant(restaurant_id).await?;
        let restaurants: HashMap<String, Restaurant> =
            restaurant.into_iter().map(|r| (r.id.clone(), r)).collect();

        Ok(self.paginate(filter.apply(requests, &restaurants), &restaurants, page))
    }

    pub async fn list_all(&self, filter: &WithdrawalFilter, page: PageRequest) -> Result<Page<WithdrawalView>, LedgerError> {
        let requests = self.repo.list_requests().await?;
        let restaurants = self.restaurant_index().await?;
        Ok(self.paginate(filter.apply(requests, &restaurants), &restaurants, page))
    }

    fn paginate(
        &self,
        sorted: Vec<WithdrawalRequest>,
        restaurants: &HashMap<String, Restaurant>,
        page: PageRequest,
    ) -> Page<WithdrawalView> {
        Page::from_sorted(sorted, page).map(|request| {
            let restaurant = restaurants.get(&request.restaurant_id);
            WithdrawalView::new(request, restaurant)
        })
    }

    async fn restaurant_index(&self) -> Result<HashMap<String, Restaurant>, LedgerError> {
        Ok(self
            .repo
            .list_restaurants()
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect())
    }

    /// Wallet with its history newest first. Unknown restaurants get an
    /// empty wallet.
    pub async fn wallet(&self, restaurant_id: &str) -> Result<Wallet, LedgerError> {
        let mut wallet = self.repo.wallet_or_default(restaurant_id).await?;
        wallet.transactions = wallet.history();
        Ok(wallet)
    }

    pub async fn stats(&self, restaurant_id: Option<&str>) -> Result<WithdrawalStats, LedgerError> {
        let requests = match restaurant_id {
            Some(id) => self.repo.list_requests_for_restaurant(id).await?,
            None => self.repo.list_requests().await?,
        };

        Ok(WithdrawalStats {
            total_requests: requests.len(),
            total_amount: requests.iter().map(|r| r.amount).sum(),
            by_status: status_totals(&requests)
                .into_iter()
                .map(|(status, totals)| (status.as_str().to_string(), totals))
                .collect(),
        })
    }

    async fn notify_restaurant(&self, restaurant_id: &str, subject: String, body: String) {
        let email = match self.repo.get_restaurant(restaurant_id).await {
            Ok(restaurant) => restaurant.and_then(|r| r.email),
            Err(e) => {
                Logger::warn(&format!("Could not load restaurant {} for notification: {}", restaurant_id, e));
                None
            }
        };
        if email.is_none() {
            Logger::debug(&format!("No email on file for restaurant {}", restaurant_id));
        }
        self.notify(email, subject, body).await;
    }

    /// Best-effort delivery: failures are logged and swallowed.
    async fn notify(&self, to: Option<String>, subject: String, body: String) {
        if !self.settings.notifications_enabled {
            return;
        }
        let Some(to) = to.filter(|to| !to.trim().is_empty()) else {
            return;
        };
        let message = EmailMessage { to, subject, body };
        if let Err(e) = self.notifier.send(&message).await {
            Logger::notification_failed(&message.to, &message.subject, &e.to_string());
        }
    }
}
