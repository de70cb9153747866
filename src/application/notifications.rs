use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationStoreRef, OrderStoreRef};
use crate::domain::user::Principal;
use crate::error::{Result, StoreError};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub message: String,
}

/// Direct notification management. Most notifications are created as side
/// effects of checkout and status updates; this service covers the rest.
pub struct NotificationService {
    notifications: NotificationStoreRef,
    orders: OrderStoreRef,
}

impl NotificationService {
    pub fn new(notifications: NotificationStoreRef, orders: OrderStoreRef) -> Self {
        Self {
            notifications,
            orders,
        }
    }

    /// Creates a notification. When an order is referenced it must exist and
    /// belong to the addressed user; a mismatch is a validation failure, not
    /// an authorization one.
    pub async fn create(
        &self,
        principal: &Principal,
        request: NotificationRequest,
    ) -> Result<Notification> {
        if !principal.owns_or_admin(request.user_id) {
            return Err(StoreError::Forbidden(
                "cannot create a notification for another user".to_string(),
            ));
        }
        if let Some(order_id) = request.order_id {
            let order = self
                .orders
                .get(order_id)
                .await?
                .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))?;
            if order.user_id != request.user_id {
                return Err(StoreError::Validation(
                    "notification user_id does not match the order's user_id".to_string(),
                ));
            }
        }

        let notification = Notification::new(
            request.user_id,
            request.order_id,
            request.kind,
            request.title,
            request.message,
        );
        self.notifications.insert(notification.clone()).await?;
        Ok(notification)
    }

    pub async fn list_for_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
    ) -> Result<Vec<Notification>> {
        if !principal.owns_or_admin(user_id) {
            return Err(StoreError::Forbidden(
                "cannot view another user's notifications".to_string(),
            ));
        }
        self.notifications.list_for_user(user_id).await
    }

    /// Only the addressee may mark a notification as read.
    pub async fn mark_read(
        &self,
        principal: &Principal,
        notification_id: Uuid,
    ) -> Result<Notification> {
        let notification = self
            .notifications
            .get(notification_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("notification {notification_id}")))?;
        if notification.user_id != principal.id {
            return Err(StoreError::Forbidden(
                "cannot mark another user's notification as read".to_string(),
            ));
        }
        self.notifications
            .mark_read(notification_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("notification {notification_id}")))
    }
}
