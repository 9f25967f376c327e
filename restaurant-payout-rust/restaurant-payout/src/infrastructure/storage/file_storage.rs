use async_trait::async_trait;
use chrono::{DateTime, Utc};
use restaurant_wallet_core::{
    LedgerError, Order, OrderRepository, Restaurant, RestaurantRepository, Wallet, WalletRepository,
    WithdrawalRepository, WithdrawalRequest,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const WALLETS_FILE: &str = "wallets.json";
const WITHDRAWALS_FILE: &str = "withdrawals.json";
const RESTAURANTS_FILE: &str = "restaurants.json";
const ORDERS_FILE: &str = "orders.json";

#[derive(Debug, Clone, Serialize)]
pub struct StorageHealth {
    pub is_healthy: bool,
    pub persistent: bool,
    pub total_wallets: usize,
    pub total_withdrawals: usize,
    pub total_restaurants: usize,
    pub total_orders: usize,
}

/// JSON document store. Every collection sits behind its own mutex and is
/// rewritten in full after each mutation. Without a data directory nothing
/// touches disk.
pub struct Storage {
    data_dir: Option<PathBuf>,
    wallets: Mutex<HashMap<String, Wallet>>,
    withdrawals: Mutex<Vec<WithdrawalRequest>>,
    restaurants: Mutex<Vec<Restaurant>>,
    orders: Mutex<Vec<Order>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, LedgerError> {
    mutex
        .lock()
        .map_err(|_| LedgerError::storage("storage lock poisoned"))
}

fn load_file<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T, LedgerError> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(&path)?;
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&data).map_err(|e| LedgerError::storage(format!("{}: {}", name, e)))
}

impl Storage {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        let storage = Storage {
            wallets: Mutex::new(load_file(&data_dir, WALLETS_FILE)?),
            withdrawals: Mutex::new(load_file(&data_dir, WITHDRAWALS_FILE)?),
            restaurants: Mutex::new(load_file(&data_dir, RESTAURANTS_FILE)?),
            orders: Mutex::new(load_file(&data_dir, ORDERS_FILE)?),
            data_dir: Some(data_dir),
        };

        Ok(storage)
    }

    pub fn in_memory() -> Self {
        Storage {
            data_dir: None,
            wallets: Mutex::new(HashMap::new()),
            withdrawals: Mutex::new(Vec::new()),
            restaurants: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
        }
    }

    fn persist<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), LedgerError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(value)?;
        // Write then rename so a crash never leaves half a document behind.
        let tmp = dir.join(format!("{}.tmp", name));
        fs::write(&tmp, data)?;
        fs::rename(&tmp, dir.join(name))?;
        Ok(())
    }

    /// Applies `change` to a copy of the collection and only swaps the copy
    /// in once it is on disk, so a failed write leaves memory untouched.
    fn commit<T, F>(&self, mutex: &Mutex<T>, name: &str, change: F) -> Result<(), LedgerError>
    where
        T: Clone + Serialize,
        F: FnOnce(&mut T),
    {
        let mut current = lock(mutex)?;
        let mut next = current.clone();
        change(&mut next);
        self.persist(name, &next)?;
        *current = next;
        Ok(())
    }

    /// Seed or replace a restaurant record.
    pub fn insert_restaurant(&self, restaurant: Restaurant) -> Result<(), LedgerError> {
        self.commit(&self.restaurants, RESTAURANTS_FILE, |restaurants| {
            restaurants.retain(|r| r.id != restaurant.id);
            restaurants.push(restaurant);
        })
    }

    /// Seed or replace an order record.
    pub fn insert_order(&self, order: Order) -> Result<(), LedgerError> {
        self.commit(&self.orders, ORDERS_FILE, |orders| {
            orders.retain(|o| o.id != order.id);
            orders.push(order);
        })
    }

    pub async fn check_health(&self) -> StorageHealth {
        // Verify the data directory is still writable
        let writable = match &self.data_dir {
            Some(dir) => {
                let test_file = dir.join("health_check.tmp");
                fs::write(&test_file, "health_check").is_ok() && fs::remove_file(&test_file).is_ok()
            }
            None => true,
        };

        let counts = (
            lock(&self.wallets).map(|w| w.len()),
            lock(&self.withdrawals).map(|w| w.len()),
            lock(&self.restaurants).map(|r| r.len()),
            lock(&self.orders).map(|o| o.len()),
        );

        match counts {
            (Ok(wallets), Ok(withdrawals), Ok(restaurants), Ok(orders)) => StorageHealth {
                is_healthy: writable,
                persistent: self.data_dir.is_some(),
                total_wallets: wallets,
                total_withdrawals: withdrawals,
                total_restaurants: restaurants,
                total_orders: orders,
            },
            _ => StorageHealth {
                is_healthy: false,
                persistent: self.data_dir.is_some(),
                total_wallets: 0,
                total_withdrawals: 0,
                total_restaurants: 0,
                total_orders: 0,
            },
        }
    }
}

#[async_trait]
impl WalletRepository for Storage {
    async fn get_wallet(&self, restaurant_id: &str) -> Result<Option<Wallet>, LedgerError> {
        Ok(lock(&self.wallets)?.get(restaurant_id).cloned())
    }

    async fn save_wallet(&self, wallet: &Wallet) -> Result<(), LedgerError> {
        self.commit(&self.wallets, WALLETS_FILE, |wallets| {
            wallets.insert(wallet.restaurant_id.clone(), wallet.clone());
        })
    }
}

#[async_trait]
impl WithdrawalRepository for Storage {
    async fn save_request(&self, request: &WithdrawalRequest) -> Result<(), LedgerError> {
        self.commit(&self.withdrawals, WITHDRAWALS_FILE, |withdrawals| {
            match withdrawals.iter_mut().find(|r| r.id == request.id) {
                Some(existing) => *existing = request.clone(),
                None => withdrawals.push(request.clone()),
            }
        })
    }

    async fn get_request(&self, id: &str) -> Result<Option<WithdrawalRequest>, LedgerError> {
        Ok(lock(&self.withdrawals)?.iter().find(|r| r.id == id).cloned())
    }

    async fn list_requests_for_restaurant(&self, restaurant_id: &str) -> Result<Vec<WithdrawalRequest>, LedgerError> {
        Ok(lock(&self.withdrawals)?
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn list_requests(&self) -> Result<Vec<WithdrawalRequest>, LedgerError> {
        Ok(lock(&self.withdrawals)?.clone())
    }
}

#[async_trait]
impl OrderRepository for Storage {
    async fn delivered_orders(
        &self,
        restaurant_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, LedgerError> {
        Ok(lock(&self.orders)?
            .iter()
            .filter(|o| o.restaurant_id == restaurant_id && o.is_delivered())
            .filter(|o| {
                let settled = o.settled_at();
                settled >= from && settled < to
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RestaurantRepository for Storage {
    async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, LedgerError> {
        Ok(lock(&self.restaurants)?.iter().find(|r| r.id == id).cloned())
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, LedgerError> {
        Ok(lock(&self.restaurants)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use restaurant_wallet_core::OrderStatus;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn order(id: &str, restaurant_id: &str, status: OrderStatus, delivered_at: Option<DateTime<Utc>>) -> Order {
        Order {
            id: id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            status,
            total_amount: dec!(50),
            commission_amount: None,
            delivered_at,
            created_at: Utc::now() - Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let storage = Storage::new(dir.path()).unwrap();
            let mut wallet = Wallet::with_balance("rest-1", dec!(120));
            let request = WithdrawalRequest::new("rest-1", dec!(20), Utc::now());
            wallet.record_withdrawal(&request, Utc::now());

            storage.save_wallet(&wallet).await.unwrap();
            storage.save_request(&request).await.unwrap();
            storage
                .insert_restaurant(Restaurant {
                    id: "rest-1".to_string(),
                    name: "Golden Dragon".to_string(),
                    external_id: "RST-001".to_string(),
                    email: None,
                })
                .unwrap();
        }

        let reopened = Storage::new(dir.path()).unwrap();
        let wallet = reopened.get_wallet("rest-1").await.unwrap().unwrap();
        assert_eq!(wallet.total_balance, dec!(100));
        assert_eq!(wallet.transactions.len(), 1);
        assert_eq!(reopened.list_requests().await.unwrap().len(), 1);
        assert!(reopened.get_restaurant("rest-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_request_replaces_existing() {
        let storage = Storage::in_memory();
        let mut request = WithdrawalRequest::new("rest-1", dec!(20), Utc::now());
        storage.save_request(&request).await.unwrap();

        request.approve("admin-1", Utc::now()).unwrap();
        storage.save_request(&request).await.unwrap();

        let all = storage.list_requests_for_restaurant("rest-1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_pending());
    }

    #[tokio::test]
    async fn test_delivered_orders_window() {
        let storage = Storage::in_memory();
        let now = Utc::now();
        storage.insert_order(order("o1", "rest-1", OrderStatus::Delivered, Some(now))).unwrap();
        storage
            .insert_order(order("o2", "rest-1", OrderStatus::Delivered, Some(now - Duration::days(10))))
            .unwrap();
        storage.insert_order(order("o3", "rest-1", OrderStatus::Cancelled, Some(now))).unwrap();
        storage.insert_order(order("o4", "rest-2", OrderStatus::Delivered, Some(now))).unwrap();

        let found = storage
            .delivered_orders("rest-1", now - Duration::days(1), now + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "o1");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(WALLETS_FILE), "{ not json").unwrap();

        assert!(matches!(Storage::new(dir.path()), Err(LedgerError::Storage(_))));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        storage.save_wallet(&Wallet::with_balance("rest-1", dec!(100))).await.unwrap();

        // A directory in the temp file's place makes the write fail.
        let blocker = dir.path().join(format!("{}.tmp", WALLETS_FILE));
        fs::create_dir(&blocker).unwrap();

        let result = storage.save_wallet(&Wallet::with_balance("rest-1", dec!(5))).await;
        assert!(matches!(result, Err(LedgerError::Storage(_))));
        let wallet = storage.get_wallet("rest-1").await.unwrap().unwrap();
        assert_eq!(wallet.total_balance, dec!(100));

        fs::remove_dir(&blocker).unwrap();
        let reopened = Storage::new(dir.path()).unwrap();
        assert_eq!(reopened.get_wallet("rest-1").await.unwrap().unwrap().total_balance, dec!(100));
    }

    #[tokio::test]
    async fn test_check_health() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        let health = storage.check_health().await;
        assert!(health.is_healthy);
        assert!(health.persistent);

        let health = Storage::in_memory().check_health().await;
        assert!(health.is_healthy);
        assert!(!health.persistent);
    }
}
