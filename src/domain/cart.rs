use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cart line, keyed by `(user_id, product_id)`. Lines are deleted once
/// their product is part of a placed order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartItem {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(user_id: Uuid, product_id: Uuid, quantity: u32) -> Self {
        Self {
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}
