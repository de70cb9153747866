use crate::domain::notification::Notification;
use crate::domain::order::{Order, OrderItem, OrderStatus, OrderStatusHistory, RescueContribution};
use crate::domain::ports::{NotificationStore, OrderStore};
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for order records, keyed by order id.
pub const CF_ORDERS: &str = "orders";
/// Column Family for order line snapshots, keyed by order id.
pub const CF_ORDER_ITEMS: &str = "order_items";
/// Column Family for status history lists, keyed by order id.
pub const CF_ORDER_HISTORY: &str = "order_history";
/// Column Family for rescue contributions, keyed by order id.
pub const CF_CONTRIBUTIONS: &str = "contributions";
/// Column Family for notifications, keyed by notification id.
pub const CF_NOTIFICATIONS: &str = "notifications";

/// A persistent store implementation using RocksDB.
///
/// The order graph (order, items, contribution) is written through a single
/// `WriteBatch`, so a crash can never leave a half-committed order behind.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [
            CF_ORDERS,
            CF_ORDER_ITEMS,
            CF_ORDER_HISTORY,
            CF_CONTRIBUTIONS,
            CF_NOTIFICATIONS,
        ]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
        .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            StoreError::Io(std::io::Error::other(format!(
                "column family {name} not found"
            )))
        })
    }

    fn get_value<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_value<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        self.db.put_cf(cf, key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(serde_json::from_slice(&value)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl OrderStore for RocksDbStore {
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        contribution: RescueContribution,
    ) -> Result<()> {
        let key = order.id.as_bytes();
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_ORDERS)?, key, serde_json::to_vec(&order)?);
        batch.put_cf(self.cf(CF_ORDER_ITEMS)?, key, serde_json::to_vec(&items)?);
        batch.put_cf(
            self.cf(CF_CONTRIBUTIONS)?,
            key,
            serde_json::to_vec(&contribution)?,
        );
        self.db.write(batch)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>> {
        self.get_value(CF_ORDERS, id.as_bytes())
    }

    async fn by_payment_reference(&self, reference: &str) -> Result<Option<Order>> {
        let orders: Vec<Order> = self.scan(CF_ORDERS)?;
        Ok(orders
            .into_iter()
            .find(|o| o.payment_reference.as_deref() == Some(reference)))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.scan(CF_ORDERS)?;
        orders.retain(|o| o.user_id == user_id);
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.scan(CF_ORDERS)?;
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        Ok(self
            .get_value(CF_ORDER_ITEMS, order_id.as_bytes())?
            .unwrap_or_default())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Option<Order>> {
        let Some(mut order): Option<Order> = self.get_value(CF_ORDERS, id.as_bytes())? else {
            return Ok(None);
        };
        order.status = status;
        if tracking_number.is_some() {
            order.tracking_number = tracking_number;
        }
        order.updated_at = Utc::now();
        self.put_value(CF_ORDERS, id.as_bytes(), &order)?;
        Ok(Some(order))
    }

    async fn append_history(&self, entry: OrderStatusHistory) -> Result<()> {
        let key = entry.order_id.as_bytes().to_vec();
        let mut history: Vec<OrderStatusHistory> = self
            .get_value(CF_ORDER_HISTORY, &key)?
            .unwrap_or_default();
        history.push(entry);
        self.put_value(CF_ORDER_HISTORY, &key, &history)
    }

    async fn history(&self, order_id: Uuid) -> Result<Vec<OrderStatusHistory>> {
        Ok(self
            .get_value(CF_ORDER_HISTORY, order_id.as_bytes())?
            .unwrap_or_default())
    }

    async fn contribution_for(&self, order_id: Uuid) -> Result<Option<RescueContribution>> {
        self.get_value(CF_CONTRIBUTIONS, order_id.as_bytes())
    }

    async fn has_purchased(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let orders: Vec<Order> = self.scan(CF_ORDERS)?;
        for order in orders.into_iter().filter(|o| o.user_id == user_id) {
            let items: Vec<OrderItem> = self
                .get_value(CF_ORDER_ITEMS, order.id.as_bytes())?
                .unwrap_or_default();
            if items.iter().any(|i| i.product_id == product_id) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl NotificationStore for RocksDbStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        self.put_value(
            CF_NOTIFICATIONS,
            notification.id.as_bytes(),
            &notification,
        )
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        self.get_value(CF_NOTIFICATIONS, id.as_bytes())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut list: Vec<Notification> = self.scan(CF_NOTIFICATIONS)?;
        list.retain(|n| n.user_id == user_id);
        list.sort_by_key(|n| n.created_at);
        Ok(list)
    }

    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let Some(mut notification): Option<Notification> =
            self.get_value(CF_NOTIFICATIONS, id.as_bytes())?
        else {
            return Ok(None);
        };
        notification.is_read = true;
        self.put_value(CF_NOTIFICATIONS, id.as_bytes(), &notification)?;
        Ok(Some(notification))
    }
}
