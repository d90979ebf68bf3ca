pub mod builder;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fireworks;
pub mod handshake;
pub mod notify;
pub mod pricing;

pub use crate::domain::model::{CartItem, PackageSelection, Quote};
pub use crate::domain::ports::{CartObserver, OrderWebhook, PaymentGateway, Storage};
pub use crate::utils::error::Result;
