use crate::domain::catalog::{ProductView, Review};
use crate::domain::ports::{OrderStoreRef, ProductStoreRef, ReviewStoreRef};
use crate::domain::user::Principal;
use crate::error::{Result, StoreError};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewRequest {
    pub product_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Catalog queries and reviews. Products are returned as `ProductView`
/// read models with review aggregates computed per request; the persisted
/// entity is never mutated to carry them.
pub struct CatalogService {
    products: ProductStoreRef,
    reviews: ReviewStoreRef,
    orders: OrderStoreRef,
}

impl CatalogService {
    pub fn new(
        products: ProductStoreRef,
        reviews: ReviewStoreRef,
        orders: OrderStoreRef,
    ) -> Self {
        Self {
            products,
            reviews,
            orders,
        }
    }

    pub async fn list_products(&self) -> Result<Vec<ProductView>> {
        let mut views = Vec::new();
        for product in self.products.all().await? {
            let reviews = self.reviews.for_product(product.id).await?;
            views.push(ProductView::from_reviews(product, &reviews));
        }
        Ok(views)
    }

    pub async fn get_product(&self, product_id: Uuid) -> Result<ProductView> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("product {product_id}")))?;
        let reviews = self.reviews.for_product(product_id).await?;
        Ok(ProductView::from_reviews(product, &reviews))
    }

    /// Reviews are restricted to verified buyers of the product.
    pub async fn add_review(
        &self,
        principal: &Principal,
        request: ReviewRequest,
    ) -> Result<Review> {
        if self.products.get(request.product_id).await?.is_none() {
            return Err(StoreError::not_found(format!(
                "product {}",
                request.product_id
            )));
        }
        if !self
            .orders
            .has_purchased(principal.id, request.product_id)
            .await?
        {
            return Err(StoreError::Forbidden(
                "you must purchase this product to review it".to_string(),
            ));
        }

        let review = Review {
            id: Uuid::new_v4(),
            product_id: request.product_id,
            user_id: principal.id,
            rating: request.rating,
            title: request.title,
            body: request.body,
            created_at: Utc::now(),
        };
        self.reviews.insert(review.clone()).await?;
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::order::{
        generate_order_number, Order, OrderItem, OrderStatus, PaymentMethod, RescueContribution,
    };
    use crate::domain::ports::{OrderStore, ProductStore, ReviewStore};
    use crate::domain::user::Role;
    use crate::infrastructure::in_memory::{
        InMemoryOrderStore, InMemoryProductStore, InMemoryReviewStore,
    };
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: None,
            name: "Collar".to_string(),
            description: None,
            price: dec!(50.00),
            category_id: "collars".to_string(),
            in_stock: true,
            manufacturing_cost: dec!(0),
            transport_cost: dec!(0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            full_name: "Anna Keller".to_string(),
            role: Role::Customer,
        }
    }

    fn service() -> (
        Arc<InMemoryProductStore>,
        Arc<InMemoryReviewStore>,
        Arc<InMemoryOrderStore>,
        CatalogService,
    ) {
        let products = Arc::new(InMemoryProductStore::new());
        let reviews = Arc::new(InMemoryReviewStore::new());
        let orders = Arc::new(InMemoryOrderStore::new());
        let service = CatalogService::new(products.clone(), reviews.clone(), orders.clone());
        (products, reviews, orders, service)
    }

    async fn seed_purchase(orders: &InMemoryOrderStore, user_id: Uuid, product_id: Uuid) {
        let order = Order {
            id: Uuid::new_v4(),
            order_number: generate_order_number(),
            user_id,
            shipping_address_id: None,
            status: OrderStatus::Delivered,
            subtotal: dec!(46.25),
            shipping_cost: dec!(0),
            tax: dec!(3.75),
            total: dec!(50.00),
            currency: "CHF".to_string(),
            payment_method: PaymentMethod::Card,
            payment_reference: None,
            notes: None,
            tracking_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let items = vec![OrderItem {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id,
            product_name: "Collar".to_string(),
            unit_price: dec!(50.00),
            quantity: 1,
            total: dec!(50.00),
            manufacturing_cost: dec!(0),
            transport_cost: dec!(0),
        }];
        let contribution = RescueContribution::for_order(&order);
        orders.create_order(order, items, contribution).await.unwrap();
    }

    #[tokio::test]
    async fn test_views_carry_review_aggregates() {
        let (products, reviews, _, service) = service();
        let p = product();
        products.insert(p.clone()).await.unwrap();
        for rating in [5, 4] {
            reviews
                .insert(Review {
                    id: Uuid::new_v4(),
                    product_id: p.id,
                    user_id: Uuid::new_v4(),
                    rating,
                    title: None,
                    body: None,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let view = service.get_product(p.id).await.unwrap();
        assert_eq!(view.review_count, 2);
        assert_eq!(view.rating, dec!(4.5));

        let listed = service.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].review_count, 2);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (_, _, _, service) = service();
        let err = service.get_product(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_review_requires_purchase() {
        let (products, _, orders, service) = service();
        let p = product();
        products.insert(p.clone()).await.unwrap();
        let anna = principal();

        let request = ReviewRequest {
            product_id: p.id,
            rating: 5,
            title: None,
            body: None,
        };
        let err = service
            .add_review(&anna, request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        seed_purchase(&orders, anna.id, p.id).await;
        let review = service.add_review(&anna, request).await.unwrap();
        assert_eq!(review.user_id, anna.id);
        assert_eq!(review.rating, 5);
    }
}
