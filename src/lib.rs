pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::toml_config::AppConfig;
pub use crate::core::{builder::PackageBuilder, cart::CartService, checkout::CheckoutService};
pub use utils::error::{Result, ShopError};
