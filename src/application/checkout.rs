use crate::application::{emails, pricing};
use crate::config::AppConfig;
use crate::domain::notification::{self, Notification};
use crate::domain::order::{
    generate_order_number, Order, OrderItem, OrderItemRequest, OrderStatus, PaymentMethod,
    RescueContribution,
};
use crate::domain::payment::PaymentOutcome;
use crate::domain::ports::{
    CartStoreRef, MailerRef, NotificationStoreRef, OrderStoreRef, PaymentGatewayRef,
    ProductStoreRef,
};
use crate::domain::user::Principal;
use crate::error::{Result, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A validated checkout submission. `user_id` must match the calling
/// principal; items reference catalog products by id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub shipping_address_id: Option<Uuid>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

/// Orchestrates the order-creation pipeline: pricing, gateway charge,
/// atomic persistence of the order graph, cart cleanup, notification and
/// confirmation email.
pub struct CheckoutService {
    products: ProductStoreRef,
    cart: CartStoreRef,
    orders: OrderStoreRef,
    notifications: NotificationStoreRef,
    gateway: PaymentGatewayRef,
    mailer: MailerRef,
    config: Arc<AppConfig>,
}

impl CheckoutService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        products: ProductStoreRef,
        cart: CartStoreRef,
        orders: OrderStoreRef,
        notifications: NotificationStoreRef,
        gateway: PaymentGatewayRef,
        mailer: MailerRef,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            products,
            cart,
            orders,
            notifications,
            gateway,
            mailer,
            config,
        }
    }

    /// Places an order for the calling principal.
    ///
    /// The order, its items and the rescue contribution are committed as one
    /// atomic unit after the gateway accepts the charge. A declined charge
    /// surfaces as a `Validation` error and commits nothing. Cart cleanup,
    /// the confirmation notification and the email happen after the commit;
    /// only the email is allowed to fail without affecting the outcome.
    pub async fn place_order(
        &self,
        principal: &Principal,
        request: CheckoutRequest,
    ) -> Result<Order> {
        if request.user_id != principal.id {
            return Err(StoreError::Forbidden(
                "cannot create an order for another user".to_string(),
            ));
        }
        if request.items.is_empty() {
            return Err(StoreError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let pricing = pricing::price_order(self.products.as_ref(), &request.items).await?;

        let outcome = self
            .gateway
            .charge(pricing.total, &self.config.currency, request.payment_method)
            .await?;
        let (status, payment_reference) = match outcome {
            PaymentOutcome::Succeeded { reference } => (OrderStatus::Processing, Some(reference)),
            PaymentOutcome::Pending { reference } => (OrderStatus::Pending, Some(reference)),
            PaymentOutcome::Failed { reason } => {
                return Err(StoreError::Validation(format!("payment failed: {reason}")));
            }
        };

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            order_number: generate_order_number(),
            user_id: request.user_id,
            shipping_address_id: request.shipping_address_id,
            status,
            subtotal: pricing.subtotal,
            shipping_cost: pricing.shipping_cost,
            tax: pricing.tax,
            total: pricing.total,
            currency: self.config.currency.clone(),
            payment_method: request.payment_method,
            payment_reference,
            notes: request.notes,
            tracking_number: None,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<OrderItem> = pricing
            .items
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: line.product.id,
                product_name: line.product.name.clone(),
                unit_price: line.product.price,
                quantity: line.quantity,
                total: line.line_total,
                manufacturing_cost: line.product.manufacturing_cost,
                transport_cost: line.product.transport_cost,
            })
            .collect();
        let contribution = RescueContribution::for_order(&order);

        self.orders
            .create_order(order.clone(), items, contribution)
            .await?;
        info!(order_number = %order.order_number, total = %order.total, "order committed");

        // Cart lines for the ordered products only; concurrent cart edits in
        // this window are not guarded against.
        let ordered_products: Vec<Uuid> =
            request.items.iter().map(|item| item.product_id).collect();
        self.cart
            .remove_products(order.user_id, &ordered_products)
            .await?;

        self.notifications
            .insert(Notification::new(
                order.user_id,
                Some(order.id),
                notification::KIND_ORDER_CONFIRMATION,
                "Order Confirmed",
                format!(
                    "Thank you for your purchase! Your order {} has been placed. \
                     We are preparing your order.",
                    order.order_number
                ),
            ))
            .await?;

        let (subject, html) =
            emails::order_confirmation(&self.config, &order, &principal.full_name);
        if let Err(e) = self.mailer.send(&principal.email, &subject, &html).await {
            warn!(order_number = %order.order_number, error = %e, "confirmation email failed");
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::CartItem;
    use crate::domain::catalog::Product;
    use crate::domain::ports::{
        CartStore, NotificationStore, OrderStore, PaymentGateway, ProductStore,
    };
    use crate::domain::user::{Role, User};
    use crate::infrastructure::email::RecordingMailer;
    use crate::infrastructure::in_memory::{
        InMemoryCartStore, InMemoryNotificationStore, InMemoryOrderStore, InMemoryProductStore,
    };
    use crate::infrastructure::payment::SimulatedGateway;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct DecliningGateway;

    #[async_trait]
    impl PaymentGateway for DecliningGateway {
        async fn charge(
            &self,
            _amount: Decimal,
            _currency: &str,
            _method: PaymentMethod,
        ) -> Result<PaymentOutcome> {
            Ok(PaymentOutcome::Failed {
                reason: "card declined by the issuing bank".to_string(),
            })
        }
    }

    struct PendingGateway;

    #[async_trait]
    impl PaymentGateway for PendingGateway {
        async fn charge(
            &self,
            _amount: Decimal,
            _currency: &str,
            _method: PaymentMethod,
        ) -> Result<PaymentOutcome> {
            Ok(PaymentOutcome::Pending {
                reference: "PAY-000001".to_string(),
            })
        }
    }

    struct World {
        products: Arc<InMemoryProductStore>,
        cart: Arc<InMemoryCartStore>,
        orders: Arc<InMemoryOrderStore>,
        notifications: Arc<InMemoryNotificationStore>,
        mailer: Arc<RecordingMailer>,
        config: Arc<AppConfig>,
    }

    impl World {
        fn new() -> Self {
            Self {
                products: Arc::new(InMemoryProductStore::new()),
                cart: Arc::new(InMemoryCartStore::new()),
                orders: Arc::new(InMemoryOrderStore::new()),
                notifications: Arc::new(InMemoryNotificationStore::new()),
                mailer: Arc::new(RecordingMailer::new()),
                config: Arc::new(AppConfig::default()),
            }
        }

        fn service(&self, gateway: PaymentGatewayRef) -> CheckoutService {
            CheckoutService::new(
                self.products.clone(),
                self.cart.clone(),
                self.orders.clone(),
                self.notifications.clone(),
                gateway,
                self.mailer.clone(),
                self.config.clone(),
            )
        }
    }

    fn customer() -> Principal {
        Principal::from(&User {
            id: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            full_name: "Anna Keller".to_string(),
            role: Role::Customer,
            created_at: Utc::now(),
        })
    }

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: None,
            name: name.to_string(),
            description: None,
            price,
            category_id: "toys".to_string(),
            in_stock: true,
            manufacturing_cost: dec!(1.00),
            transport_cost: dec!(0.50),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn seed_catalog(world: &World) -> (Product, Product) {
        let collar = product("Collar", dec!(50.00));
        let leash = product("Leash", dec!(25.00));
        world.products.insert(collar.clone()).await.unwrap();
        world.products.insert(leash.clone()).await.unwrap();
        (collar, leash)
    }

    fn request(user_id: Uuid, items: Vec<OrderItemRequest>) -> CheckoutRequest {
        CheckoutRequest {
            user_id,
            shipping_address_id: None,
            payment_method: PaymentMethod::Card,
            notes: None,
            items,
        }
    }

    #[tokio::test]
    async fn test_place_order_commits_full_graph() {
        let world = World::new();
        let (collar, leash) = seed_catalog(&world).await;
        let anna = customer();
        let service = world.service(Arc::new(SimulatedGateway::always_approve()));

        let order = service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![
                        OrderItemRequest {
                            product_id: collar.id,
                            quantity: 2,
                        },
                        OrderItemRequest {
                            product_id: leash.id,
                            quantity: 1,
                        },
                    ],
                ),
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total, dec!(125.00));
        assert_eq!(order.subtotal, dec!(115.63));
        assert_eq!(order.tax, dec!(9.37));
        assert!(order.payment_reference.is_some());

        let items = world.orders.items(order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        let collar_line = items.iter().find(|i| i.product_id == collar.id).unwrap();
        assert_eq!(collar_line.total, dec!(100.00));
        assert_eq!(collar_line.product_name, "Collar");
        assert_eq!(collar_line.unit_price * Decimal::from(collar_line.quantity), collar_line.total);

        let contribution = world
            .orders
            .contribution_for(order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(contribution.amount, dec!(37.50));
        assert_eq!(contribution.currency, "CHF");

        let notifications = world
            .notifications
            .list_for_user(anna.id)
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "order_confirmation");
        assert_eq!(notifications[0].order_id, Some(order.id));

        let sent = world.mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "anna@example.com");
        assert!(sent[0].subject.contains(&order.order_number));
    }

    #[tokio::test]
    async fn test_cart_cleanup_is_selective() {
        let world = World::new();
        let (collar, leash) = seed_catalog(&world).await;
        let anna = customer();
        world
            .cart
            .upsert(CartItem::new(anna.id, collar.id, 2))
            .await
            .unwrap();
        world
            .cart
            .upsert(CartItem::new(anna.id, leash.id, 1))
            .await
            .unwrap();

        let service = world.service(Arc::new(SimulatedGateway::always_approve()));
        service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![OrderItemRequest {
                        product_id: collar.id,
                        quantity: 2,
                    }],
                ),
            )
            .await
            .unwrap();

        let remaining = world.cart.list_for_user(anna.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].product_id, leash.id);
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_no_rows() {
        let world = World::new();
        let anna = customer();
        let service = world.service(Arc::new(SimulatedGateway::always_approve()));

        let err = service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![OrderItemRequest {
                        product_id: Uuid::new_v4(),
                        quantity: 1,
                    }],
                ),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(world.orders.list_for_user(anna.id).await.unwrap().is_empty());
        assert!(world
            .notifications
            .list_for_user(anna.id)
            .await
            .unwrap()
            .is_empty());
        assert!(world.mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_declined_payment_blocks_commit() {
        let world = World::new();
        let (collar, _) = seed_catalog(&world).await;
        let anna = customer();
        let service = world.service(Arc::new(DecliningGateway));

        let err = service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![OrderItemRequest {
                        product_id: collar.id,
                        quantity: 1,
                    }],
                ),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(world.orders.list_for_user(anna.id).await.unwrap().is_empty());
        assert!(world
            .notifications
            .list_for_user(anna.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_pending_payment_commits_as_pending() {
        let world = World::new();
        let (collar, _) = seed_catalog(&world).await;
        let anna = customer();
        let service = world.service(Arc::new(PendingGateway));

        let order = service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![OrderItemRequest {
                        product_id: collar.id,
                        quantity: 1,
                    }],
                ),
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_reference.as_deref(), Some("PAY-000001"));
    }

    #[tokio::test]
    async fn test_checkout_for_other_user_is_forbidden() {
        let world = World::new();
        let anna = customer();
        let service = world.service(Arc::new(SimulatedGateway::always_approve()));

        let err = service
            .place_order(
                &anna,
                request(
                    Uuid::new_v4(),
                    vec![OrderItemRequest {
                        product_id: Uuid::new_v4(),
                        quantity: 1,
                    }],
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_mailer_failure_does_not_fail_checkout() {
        let world = World::new();
        let (collar, _) = seed_catalog(&world).await;
        let anna = customer();
        world.mailer.fail_next();
        let service = world.service(Arc::new(SimulatedGateway::always_approve()));

        let order = service
            .place_order(
                &anna,
                request(
                    anna.id,
                    vec![OrderItemRequest {
                        product_id: collar.id,
                        quantity: 1,
                    }],
                ),
            )
            .await
            .unwrap();

        // Order and notification exist even though the email bounced.
        assert!(world.orders.get(order.id).await.unwrap().is_some());
        assert_eq!(
            world
                .notifications
                .list_for_user(anna.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let world = World::new();
        let anna = customer();
        let service = world.service(Arc::new(SimulatedGateway::always_approve()));

        let err = service
            .place_order(&anna, request(anna.id, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
