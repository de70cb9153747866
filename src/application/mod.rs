pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod emails;
pub mod notifications;
pub mod pricing;
pub mod status;
