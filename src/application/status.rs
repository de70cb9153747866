use crate::application::emails;
use crate::config::AppConfig;
use crate::domain::notification::{self, Notification};
use crate::domain::order::{Order, OrderStatus, OrderStatusHistory};
use crate::domain::ports::{MailerRef, NotificationStoreRef, OrderStoreRef, UserStoreRef};
use crate::domain::user::Principal;
use crate::error::{Result, StoreError};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Records order status transitions: appends the immutable history row,
/// updates the order, and emits the matching notification and email.
///
/// No transition-legality check is performed; any status value is accepted
/// and the history log preserves whatever sequence actually happened.
pub struct OrderStatusService {
    orders: OrderStoreRef,
    notifications: NotificationStoreRef,
    users: UserStoreRef,
    mailer: MailerRef,
    config: Arc<AppConfig>,
}

impl OrderStatusService {
    pub fn new(
        orders: OrderStoreRef,
        notifications: NotificationStoreRef,
        users: UserStoreRef,
        mailer: MailerRef,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            orders,
            notifications,
            users,
            mailer,
            config,
        }
    }

    /// Admin-initiated status update, optionally attaching a tracking
    /// number.
    pub async fn update_status(
        &self,
        principal: &Principal,
        order_id: Uuid,
        new_status: &str,
        tracking_number: Option<String>,
    ) -> Result<Order> {
        if !principal.is_admin() {
            return Err(StoreError::Forbidden(
                "only admins may update order status".to_string(),
            ));
        }
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))?;

        self.transition(
            order,
            OrderStatus::from(new_status),
            tracking_number,
            format!("Status updated by admin {}", principal.full_name),
        )
        .await
    }

    /// Webhook-side resolution of a `pending` payment: the gateway confirms
    /// or rejects the charge identified by its reference, and the order
    /// moves to `processing` or `cancelled` accordingly.
    pub async fn resolve_payment(&self, reference: &str, succeeded: bool) -> Result<Order> {
        let order = self
            .orders
            .by_payment_reference(reference)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order for payment {reference}")))?;

        let (new_status, note) = if succeeded {
            (
                OrderStatus::Processing,
                "Payment confirmed by gateway".to_string(),
            )
        } else {
            (
                OrderStatus::Cancelled,
                "Payment rejected by gateway".to_string(),
            )
        };
        self.transition(order, new_status, None, note).await
    }

    async fn transition(
        &self,
        order: Order,
        new_status: OrderStatus,
        tracking_number: Option<String>,
        note: String,
    ) -> Result<Order> {
        self.orders
            .append_history(OrderStatusHistory {
                id: Uuid::new_v4(),
                order_id: order.id,
                old_status: order.status.clone(),
                new_status: new_status.clone(),
                note,
                created_at: Utc::now(),
            })
            .await?;

        let updated = self
            .orders
            .update_status(order.id, new_status.clone(), tracking_number.clone())
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order {}", order.id)))?;

        let title = new_status.title();
        let message = status_message(&updated, &new_status, tracking_number.as_deref());
        self.notifications
            .insert(Notification::new(
                updated.user_id,
                Some(updated.id),
                notification::KIND_ORDER_STATUS_UPDATE,
                title,
                message,
            ))
            .await?;

        self.send_status_email(&updated, &new_status, tracking_number.as_deref())
            .await;
        Ok(updated)
    }

    /// Best-effort: a missing user or a mailer failure is logged and
    /// swallowed, never surfaced to the caller.
    async fn send_status_email(
        &self,
        order: &Order,
        status: &OrderStatus,
        tracking_number: Option<&str>,
    ) {
        let user = match self.users.get(order.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(order_number = %order.order_number, "order user missing, skipping email");
                return;
            }
            Err(e) => {
                warn!(order_number = %order.order_number, error = %e, "user lookup failed");
                return;
            }
        };

        let email = match status {
            OrderStatus::Shipped => Some(emails::order_shipped(
                &self.config,
                order,
                &user.full_name,
                tracking_number,
            )),
            OrderStatus::Delivered => {
                Some(emails::order_delivered(&self.config, order, &user.full_name))
            }
            OrderStatus::Cancelled => {
                Some(emails::order_cancelled(&self.config, order, &user.full_name))
            }
            OrderStatus::Refunded => {
                Some(emails::order_refunded(&self.config, order, &user.full_name))
            }
            _ => None,
        };

        if let Some((subject, html)) = email
            && let Err(e) = self.mailer.send(&user.email, &subject, &html).await
        {
            warn!(order_number = %order.order_number, error = %e, "status email failed");
        }
    }
}

/// Notification body for a transition into `status`.
fn status_message(order: &Order, status: &OrderStatus, tracking_number: Option<&str>) -> String {
    let number = &order.order_number;
    match status {
        OrderStatus::Processing => format!("We are preparing your order {number}."),
        OrderStatus::Shipped => {
            let mut message = format!("Great news! Your order {number} is on its way.");
            if let Some(tracking) = tracking_number {
                message.push_str(&format!(" Tracking Number: {tracking}"));
            }
            message
        }
        OrderStatus::Delivered => {
            format!("Your order {number} has arrived! We hope you love your new items.")
        }
        OrderStatus::Cancelled => format!(
            "Your order {number} has been cancelled. If you have questions, please contact us."
        ),
        OrderStatus::Refunded => {
            format!("A refund has been processed for your order {number}.")
        }
        other => format!("The status of your order {number} has been updated to {other}."),
    }
}
