// Adapters layer: concrete implementations of the domain ports (storage, payment, webhook).

pub mod payment;
pub mod storage;
pub mod webhook;
