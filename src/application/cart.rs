use crate::domain::cart::CartItem;
use crate::domain::ports::CartStoreRef;
use crate::domain::user::Principal;
use crate::error::{Result, StoreError};
use uuid::Uuid;

/// Cart mutations for the calling principal. All operations are scoped to
/// the principal's own cart; reading another user's cart is forbidden.
pub struct CartService {
    cart: CartStoreRef,
}

impl CartService {
    pub fn new(cart: CartStoreRef) -> Self {
        Self { cart }
    }

    /// Adds a product to the cart; an existing line's quantity is increased.
    pub async fn add(
        &self,
        principal: &Principal,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<CartItem> {
        self.cart
            .upsert(CartItem::new(principal.id, product_id, quantity))
            .await
    }

    pub async fn set_quantity(
        &self,
        principal: &Principal,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<CartItem> {
        self.cart
            .set_quantity(principal.id, product_id, quantity)
            .await?
            .ok_or_else(|| StoreError::not_found("cart item".to_string()))
    }

    pub async fn remove(&self, principal: &Principal, product_id: Uuid) -> Result<()> {
        if self.cart.remove(principal.id, product_id).await? {
            Ok(())
        } else {
            Err(StoreError::not_found("cart item".to_string()))
        }
    }

    pub async fn list(&self, principal: &Principal, user_id: Uuid) -> Result<Vec<CartItem>> {
        if !principal.owns_or_admin(user_id) {
            return Err(StoreError::Forbidden(
                "cannot view another user's cart".to_string(),
            ));
        }
        self.cart.list_for_user(user_id).await
    }
}
