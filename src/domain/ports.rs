use super::cart::CartItem;
use super::catalog::{Product, Review};
use super::notification::Notification;
use super::order::{
    Order, OrderItem, OrderStatus, OrderStatusHistory, PaymentMethod, RescueContribution,
};
use super::payment::PaymentOutcome;
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: Product) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Product>>;
    async fn all(&self) -> Result<Vec<Product>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: Review) -> Result<()>;
    async fn for_product(&self, product_id: Uuid) -> Result<Vec<Review>>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds a line, merging quantities when the `(user, product)` line
    /// already exists. Returns the resulting line.
    async fn upsert(&self, item: CartItem) -> Result<CartItem>;
    async fn get(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>>;
    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Option<CartItem>>;
    /// Removes one line; returns whether it existed.
    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;
    /// Removes every line of `user_id` whose product is in `product_ids`.
    /// Lines for other products are left untouched.
    async fn remove_products(&self, user_id: Uuid, product_ids: &[Uuid]) -> Result<()>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order graph as one atomic unit: either the order, all
    /// of its items and its rescue contribution become visible together,
    /// or none of them do.
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        contribution: RescueContribution,
    ) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Order>>;
    async fn by_payment_reference(&self, reference: &str) -> Result<Option<Order>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
    async fn list_all(&self) -> Result<Vec<Order>>;
    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>>;
    /// Single update of status and, when supplied, tracking number.
    /// Returns the updated order, or `None` when the order is unknown.
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Option<Order>>;
    async fn append_history(&self, entry: OrderStatusHistory) -> Result<()>;
    async fn history(&self, order_id: Uuid) -> Result<Vec<OrderStatusHistory>>;
    async fn contribution_for(&self, order_id: Uuid) -> Result<Option<RescueContribution>>;
    /// Whether any committed order of `user_id` contains `product_id`.
    async fn has_purchased(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Notification>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;
    /// Flips the read flag; returns the updated notification, or `None`
    /// when unknown.
    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>>;
}

/// Fire-and-forget email collaborator. Callers log and swallow failures;
/// delivery is best-effort with no retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Payment gateway collaborator. Simulated in this crate; the contract is
/// what a real integration would honor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        amount: Decimal,
        currency: &str,
        method: PaymentMethod,
    ) -> Result<PaymentOutcome>;
}

pub type UserStoreRef = Arc<dyn UserStore>;
pub type ProductStoreRef = Arc<dyn ProductStore>;
pub type ReviewStoreRef = Arc<dyn ReviewStore>;
pub type CartStoreRef = Arc<dyn CartStore>;
pub type OrderStoreRef = Arc<dyn OrderStore>;
pub type NotificationStoreRef = Arc<dyn NotificationStore>;
pub type MailerRef = Arc<dyn Mailer>;
pub type PaymentGatewayRef = Arc<dyn PaymentGateway>;
