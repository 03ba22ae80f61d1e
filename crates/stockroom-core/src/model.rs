//! Rows exchanged between the store and the web layer.

use crate::role::Role;

/// Identity of a user as currently recorded in the `users`/`roles` tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: i64,
    pub username: String,
    pub role_id: i64,
    pub role: Role,
}

/// Identity plus the stored password hash, used only while logging in.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub identity: UserIdentity,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// The verified caller of a gated request.
///
/// Built fresh from the store on every request; never taken from the cached
/// copy in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub identity: UserIdentity,
}

impl CurrentUser {
    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn role(&self) -> &Role {
        &self.identity.role
    }

    pub fn is_admin(&self) -> bool {
        self.identity.role == Role::Administrator
    }

    pub fn is_manager(&self) -> bool {
        self.identity.role == Role::Manager
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A product joined with its category name.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: String,
    pub unit_price: f64,
    pub stock_quantity: i64,
}

/// A validated product ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category_id: i64,
    pub unit_price: f64,
    pub stock_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStock {
    pub category_name: String,
    pub total_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockItem {
    pub name: String,
    pub stock_quantity: i64,
}

/// Aggregate figures for the summary page.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub total_value: f64,
    pub total_products: i64,
    pub stock_by_category: Vec<CategoryStock>,
    pub low_stock_items: Vec<LowStockItem>,
}
