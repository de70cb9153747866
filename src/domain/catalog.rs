use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

/// A catalog product. `price` is the gross, tax-inclusive price shown to
/// customers; the tax share is only backed out at order time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: Uuid,
    #[serde(default)]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub manufacturing_cost: Decimal,
    #[serde(default)]
    pub transport_cost: Decimal,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Review {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Read model for catalog queries: the persisted product plus review
/// aggregates. The `Product` entity itself never carries these fields.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub rating: Decimal,
    pub review_count: usize,
}

impl ProductView {
    pub fn from_reviews(product: Product, reviews: &[Review]) -> Self {
        let review_count = reviews.len();
        let rating = if review_count == 0 {
            Decimal::ZERO
        } else {
            let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
            (Decimal::from(sum) / Decimal::from(review_count as u64)).round_dp(1)
        };
        Self {
            product,
            rating,
            review_count,
        }
    }
}
