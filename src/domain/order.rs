use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Share of every order total set aside as a rescue contribution.
pub const RESCUE_RATE: Decimal = dec!(0.30);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Twint,
    #[serde(other)]
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Twint => write!(f, "twint"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Order lifecycle states. The happy path is
/// `pending → processing → shipped → delivered`; `cancelled` and `refunded`
/// branch off at any point. Transition legality is deliberately not
/// enforced: admins may set any status, and the history log keeps the full
/// audit trail either way.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    Other(String),
}

impl OrderStatus {
    /// Notification title for a transition into this status.
    pub fn title(&self) -> String {
        match self {
            Self::Processing => "Processing".to_string(),
            Self::Shipped => "Order Shipped".to_string(),
            Self::Delivered => "Order Delivered".to_string(),
            Self::Cancelled => "Order Cancelled".to_string(),
            Self::Refunded => "Order Refunded".to_string(),
            Self::Pending => "Order Pending".to_string(),
            Self::Other(s) => format!("Order {}", capitalize(s)),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "refunded" => Self::Refunded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Refunded => write!(f, "refunded"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A placed order. Monetary fields satisfy
/// `total == subtotal + shipping_cost + tax` up to one rounding unit, with
/// `subtotal` the tax-exclusive share of the tax-inclusive `total`.
/// Apart from status and tracking number (owned by the status-update flow),
/// an order is immutable once created.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub shipping_address_id: Option<Uuid>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item snapshot taken at order time. Product renames or price changes
/// after the fact never touch these rows. `total == unit_price * quantity`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
    pub manufacturing_cost: Decimal,
    pub transport_cost: Decimal,
}

/// One requested line of a checkout, before product resolution.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Append-only audit record of a status transition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderStatusHistory {
    pub id: Uuid,
    pub order_id: Uuid,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-percentage donation derived from an order; exactly one is created
/// per committed order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RescueContribution {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl RescueContribution {
    pub fn for_order(order: &Order) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order.id,
            amount: (order.total * RESCUE_RATE).round_dp(2),
            currency: order.currency.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Generates a human-facing order number: `ORD-` plus ten upper-case hex
/// characters drawn from a v4 UUID. Collisions are not actively checked;
/// the suffix is wide enough that batches in the tens of thousands stay
/// collision-free in practice.
pub fn generate_order_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", hex[..10].to_uppercase())
}
