pub mod cart;
pub mod catalog;
pub mod notification;
pub mod order;
pub mod payment;
pub mod ports;
pub mod user;
