//! In-memory store implementations backed by `Arc<RwLock<HashMap>>`.
//! Used by the demo binary and throughout the test suite; the same ports
//! are implemented by the RocksDB adapter for persistent setups.

use crate::domain::cart::CartItem;
use crate::domain::catalog::{Product, Review};
use crate::domain::notification::Notification;
use crate::domain::order::{Order, OrderItem, OrderStatus, OrderStatusHistory, RescueContribution};
use crate::domain::ports::{
    CartStore, NotificationStore, OrderStore, ProductStore, ReviewStore, UserStore,
};
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id, product);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryReviewStore {
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: Review) -> Result<()> {
        let mut reviews = self.reviews.write().await;
        reviews.push(review);
        Ok(())
    }

    async fn for_product(&self, product_id: Uuid) -> Result<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCartStore {
    items: Arc<RwLock<HashMap<(Uuid, Uuid), CartItem>>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn upsert(&self, item: CartItem) -> Result<CartItem> {
        let mut items = self.items.write().await;
        let key = (item.user_id, item.product_id);
        let merged = match items.get(&key) {
            Some(existing) => {
                let mut line = existing.clone();
                line.quantity += item.quantity;
                line
            }
            None => item,
        };
        items.insert(key, merged.clone());
        Ok(merged)
    }

    async fn get(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>> {
        let items = self.items.read().await;
        Ok(items.get(&(user_id, product_id)).cloned())
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Option<CartItem>> {
        let mut items = self.items.write().await;
        match items.get_mut(&(user_id, product_id)) {
            Some(line) => {
                line.quantity = quantity;
                Ok(Some(line.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let mut items = self.items.write().await;
        Ok(items.remove(&(user_id, product_id)).is_some())
    }

    async fn remove_products(&self, user_id: Uuid, product_ids: &[Uuid]) -> Result<()> {
        let mut items = self.items.write().await;
        for product_id in product_ids {
            items.remove(&(user_id, *product_id));
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|line| line.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct OrderState {
    orders: HashMap<Uuid, Order>,
    items: HashMap<Uuid, Vec<OrderItem>>,
    history: HashMap<Uuid, Vec<OrderStatusHistory>>,
    contributions: HashMap<Uuid, RescueContribution>,
}

/// Holds the whole order graph behind a single lock so that
/// `create_order` is atomic: the order, its items and its contribution
/// become visible in one step.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<OrderState>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        contribution: RescueContribution,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.items.insert(order.id, items);
        state.contributions.insert(order.id, contribution);
        state.orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn by_payment_reference(&self, reference: &str) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .find(|o| o.payment_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        let state = self.state.read().await;
        Ok(state.items.get(&order_id).cloned().unwrap_or_default())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Option<Order>> {
        let mut state = self.state.write().await;
        match state.orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                if tracking_number.is_some() {
                    order.tracking_number = tracking_number;
                }
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    async fn append_history(&self, entry: OrderStatusHistory) -> Result<()> {
        let mut state = self.state.write().await;
        state.history.entry(entry.order_id).or_default().push(entry);
        Ok(())
    }

    async fn history(&self, order_id: Uuid) -> Result<Vec<OrderStatusHistory>> {
        let state = self.state.read().await;
        Ok(state.history.get(&order_id).cloned().unwrap_or_default())
    }

    async fn contribution_for(&self, order_id: Uuid) -> Result<Option<RescueContribution>> {
        let state = self.state.read().await;
        Ok(state.contributions.get(&order_id).cloned())
    }

    async fn has_purchased(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.orders.values().any(|order| {
            order.user_id == user_id
                && state
                    .items
                    .get(&order.id)
                    .is_some_and(|items| items.iter().any(|i| i.product_id == product_id))
        }))
    }
}

#[derive(Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut list: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by_key(|n| n.created_at);
        Ok(list)
    }

    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&id) {
            Some(notification) => {
                notification.is_read = true;
                Ok(Some(notification.clone()))
            }
            None => Ok(None),
        }
    }
}
