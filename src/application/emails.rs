//! HTML email bodies for the order lifecycle. Each builder returns
//! `(subject, html_body)`; dispatch and failure handling live with the
//! callers.

use crate::config::AppConfig;
use crate::domain::order::Order;

fn wrap(config: &AppConfig, heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
         <div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\
         <h1>{heading}</h1>\
         {body}\
         <p style=\"margin-top: 30px;\">Best regards,<br>The {shop} Team</p>\
         </div></body></html>",
        shop = config.shop_name,
    )
}

pub fn order_confirmation(config: &AppConfig, order: &Order, recipient: &str) -> (String, String) {
    let subject = format!("Order Confirmation - {}", order.order_number);
    let body = format!(
        "<p>Dear {recipient},</p>\
         <p>We've received your order and we're getting it ready. You'll \
         receive another email when your order has been shipped.</p>\
         <p><strong>Order Number:</strong> {number}</p>\
         <p><strong>Total:</strong> {currency} {total:.2}</p>\
         <p><strong>Payment Method:</strong> {method}</p>\
         <p>With every purchase, 30% goes to rescue dogs in need.</p>",
        number = order.order_number,
        currency = order.currency,
        total = order.total,
        method = order.payment_method,
    );
    (subject, wrap(config, &config.shop_name, &body))
}

pub fn order_shipped(
    config: &AppConfig,
    order: &Order,
    recipient: &str,
    tracking_number: Option<&str>,
) -> (String, String) {
    let subject = format!("Your Order Has Shipped - {}", order.order_number);
    let tracking_info = tracking_number
        .map(|t| format!("<p><strong>Tracking Number:</strong> {t}</p>"))
        .unwrap_or_default();
    let body = format!(
        "<p>Dear {recipient},</p>\
         <p>Great news! Your order has been shipped and is on its way to you.</p>\
         <p><strong>Order Number:</strong> {number}</p>\
         {tracking_info}\
         <p><strong>Estimated Delivery:</strong> 3-7 business days</p>",
        number = order.order_number,
    );
    (subject, wrap(config, "Your Order is On Its Way!", &body))
}

pub fn order_delivered(config: &AppConfig, order: &Order, recipient: &str) -> (String, String) {
    let subject = format!("Your Order Has Been Delivered - {}", order.order_number);
    let body = format!(
        "<p>Dear {recipient},</p>\
         <p>Your order ({number}) has been successfully delivered!</p>\
         <p>We hope you and your furry friend love your new products.</p>",
        number = order.order_number,
    );
    (subject, wrap(config, "Delivery Confirmed", &body))
}

pub fn order_cancelled(config: &AppConfig, order: &Order, recipient: &str) -> (String, String) {
    let subject = format!("Order Cancelled - {}", order.order_number);
    let body = format!(
        "<p>Dear {recipient},</p>\
         <p>Your order ({number}) has been cancelled.</p>\
         <p>If you have already paid for this order, a refund will be \
         processed shortly.</p>",
        number = order.order_number,
    );
    (subject, wrap(config, "Order Cancelled", &body))
}

pub fn order_refunded(config: &AppConfig, order: &Order, recipient: &str) -> (String, String) {
    let subject = format!("Refund Processed - {}", order.order_number);
    let body = format!(
        "<p>Dear {recipient},</p>\
         <p>A refund has been processed for your order ({number}).</p>\
         <p>The amount of {currency} {total:.2} should appear in your account \
         within 5-10 business days, depending on your bank.</p>",
        number = order.order_number,
        currency = order.currency,
        total = order.total,
    );
    (subject, wrap(config, "Refund Processed", &body))
}
