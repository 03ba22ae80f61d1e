//! # stockroom-core
//!
//! Types shared by every Stockroom crate: configuration, roles, and the rows
//! the store hands to the web layer.

// Configuration types shared across all Stockroom crates
pub mod config;
pub mod model;
pub mod role;

pub use config::{
    AppConfig, BootstrapConfig, CONFIG_PATH_ENV, ConfigError, DatabaseConfig, InventoryConfig,
    ServerConfig, SessionBackend, SessionConfig,
};
pub use model::{
    Category, CategoryStock, CurrentUser, InventorySummary, LowStockItem, NewProduct, Product,
    UserCredentials, UserIdentity,
};
pub use role::{Role, RoleGuard};
