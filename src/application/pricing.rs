use crate::domain::catalog::Product;
use crate::domain::order::OrderItemRequest;
use crate::domain::ports::ProductStore;
use crate::error::{Result, StoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Swiss standard VAT rate, applied tax-inclusively: catalog prices already
/// contain the tax, so it is backed out arithmetically at order time.
pub const TAX_RATE: Decimal = dec!(0.081);

/// Shipping is DDP and free to the customer.
pub const SHIPPING_COST: Decimal = Decimal::ZERO;

/// One resolved checkout line: the product snapshot at pricing time and the
/// gross line total (`product.price * quantity`).
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Monetary outcome of pricing a cart. Subtotal, tax and total are each
/// rounded to 2 decimals independently, so `subtotal + tax` may differ from
/// `total` by one rounding unit. That discrepancy is accepted and tested,
/// not reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub items: Vec<PricedItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Extracts net and tax from a tax-inclusive gross amount:
/// `net = gross / (1 + rate)`, `tax = gross - net`.
pub fn tax_inclusive_totals(gross: Decimal) -> (Decimal, Decimal, Decimal) {
    let net = gross / (Decimal::ONE + TAX_RATE);
    let tax = gross - net;
    (net.round_dp(2), tax.round_dp(2), gross.round_dp(2))
}

/// Resolves every requested product and computes the order totals under the
/// tax-inclusive regime. Any unresolvable product reference aborts the whole
/// computation; no partial pricing is ever returned.
pub async fn price_order(
    products: &dyn ProductStore,
    items: &[OrderItemRequest],
) -> Result<Pricing> {
    let mut priced = Vec::with_capacity(items.len());
    let mut gross_total = Decimal::ZERO;

    for item in items {
        let product = products
            .get(item.product_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("product {}", item.product_id)))?;
        let line_total = product.price * Decimal::from(item.quantity);
        gross_total += line_total;
        priced.push(PricedItem {
            product,
            quantity: item.quantity,
            line_total,
        });
    }

    let (subtotal, tax, total) = tax_inclusive_totals(gross_total + SHIPPING_COST);
    Ok(Pricing {
        items: priced,
        subtotal,
        shipping_cost: SHIPPING_COST,
        tax,
        total,
    })
}
