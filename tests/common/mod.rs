#![allow(dead_code)]

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::application::checkout::CheckoutService;
use storefront::application::status::OrderStatusService;
use storefront::config::AppConfig;
use storefront::domain::catalog::Product;
use storefront::domain::ports::{PaymentGatewayRef, UserStore};
use storefront::domain::user::{Principal, Role, User};
use storefront::infrastructure::email::RecordingMailer;
use storefront::infrastructure::in_memory::{
    InMemoryCartStore, InMemoryNotificationStore, InMemoryOrderStore, InMemoryProductStore,
    InMemoryReviewStore, InMemoryUserStore,
};
use storefront::infrastructure::payment::SimulatedGateway;
use uuid::Uuid;

/// Fully wired in-memory application for integration tests.
pub struct World {
    pub users: Arc<InMemoryUserStore>,
    pub products: Arc<InMemoryProductStore>,
    pub reviews: Arc<InMemoryReviewStore>,
    pub cart: Arc<InMemoryCartStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub notifications: Arc<InMemoryNotificationStore>,
    pub mailer: Arc<RecordingMailer>,
    pub checkout: CheckoutService,
    pub status: OrderStatusService,
}

/// World with a gateway that approves every charge.
pub fn world() -> World {
    world_with_gateway(Arc::new(SimulatedGateway::always_approve()))
}

/// World with the probabilistic gateway; charges with the `other` payment
/// method deterministically come back `Pending`.
pub fn simulated_world() -> World {
    world_with_gateway(Arc::new(SimulatedGateway::new()))
}

fn world_with_gateway(gateway: PaymentGatewayRef) -> World {
    let config = Arc::new(AppConfig::default());
    let users = Arc::new(InMemoryUserStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());
    let cart = Arc::new(InMemoryCartStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());
    let notifications = Arc::new(InMemoryNotificationStore::new());
    let mailer = Arc::new(RecordingMailer::new());

    let checkout = CheckoutService::new(
        products.clone(),
        cart.clone(),
        orders.clone(),
        notifications.clone(),
        gateway,
        mailer.clone(),
        config.clone(),
    );
    let status = OrderStatusService::new(
        orders.clone(),
        notifications.clone(),
        users.clone(),
        mailer.clone(),
        config,
    );

    World {
        users,
        products,
        reviews,
        cart,
        orders,
        notifications,
        mailer,
        checkout,
        status,
    }
}

pub async fn seed_user(world: &World, full_name: &str, email: &str, role: Role) -> Principal {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        role,
        created_at: Utc::now(),
    };
    world.users.insert(user.clone()).await.unwrap();
    Principal::from(&user)
}

pub fn product(name: &str, price: Decimal) -> Product {
    Product {
        id: Uuid::new_v4(),
        sku: None,
        name: name.to_string(),
        description: None,
        price,
        category_id: "accessories".to_string(),
        in_stock: true,
        manufacturing_cost: Decimal::ZERO,
        transport_cost: Decimal::ZERO,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
