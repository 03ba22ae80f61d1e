//! Form payloads and their validation.
//!
//! Fields arrive as raw strings so that a missing or malformed value can be
//! reported on the re-rendered form instead of as an extractor rejection.

use serde::Deserialize;
use std::num::NonZeroU64;
use stockroom_core::{Category, NewProduct, Product};

pub const LOGIN_REQUIRED: &str = "Username and password are required.";
pub const LOGIN_INVALID: &str = "Invalid username or password.";
pub const LOGIN_STORE_FAILURE: &str = "Database error occurred.";

pub const ADD_PRODUCT_REQUIRED: &str = "All fields are required.";
pub const ADD_PRODUCT_NUMBERS: &str = "Unit price and stock quantity must be valid numbers >= 0.";
pub const ADD_PRODUCT_CATEGORY: &str = "Select a valid category.";

pub const DRAW_STOCK_REQUIRED: &str = "Product and a valid quantity (> 0) are required.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub stock_quantity: String,
}

impl AddProductForm {
    /// Check the submission against the known categories.
    pub fn validate(&self, categories: &[Category]) -> Result<NewProduct, &'static str> {
        let name = self.name.trim();
        let category_id = self.category_id.trim();
        let unit_price = self.unit_price.trim();
        let stock_quantity = self.stock_quantity.trim();

        if [name, category_id, unit_price, stock_quantity]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(ADD_PRODUCT_REQUIRED);
        }

        let unit_price = unit_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or(ADD_PRODUCT_NUMBERS)?;
        let stock_quantity = stock_quantity
            .parse::<u32>()
            .map_err(|_| ADD_PRODUCT_NUMBERS)?;

        let category_id = category_id
            .parse::<i64>()
            .ok()
            .filter(|id| categories.iter().any(|c| c.id == *id))
            .ok_or(ADD_PRODUCT_CATEGORY)?;

        Ok(NewProduct {
            name: name.to_string(),
            category_id,
            unit_price,
            stock_quantity,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrawStockForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// A well-formed withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    pub product_id: i64,
    pub quantity: NonZeroU64,
}

impl DrawStockForm {
    pub fn validate(&self) -> Result<Withdrawal, &'static str> {
        let product_id = self
            .product_id
            .trim()
            .parse::<i64>()
            .map_err(|_| DRAW_STOCK_REQUIRED)?;
        let quantity = self
            .quantity
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or(DRAW_STOCK_REQUIRED)?;
        Ok(Withdrawal {
            product_id,
            quantity,
        })
    }
}

/// Message for a refused withdrawal, quoting the freshest stock figure.
pub fn shortfall_message(products: &[Product], withdrawal: &Withdrawal) -> String {
    let product = products.iter().find(|p| p.id == withdrawal.product_id);
    let name = product.map_or("selected product", |p| p.name.as_str());
    let available = product.map_or_else(|| "N/A".to_string(), |p| p.stock_quantity.to_string());
    format!(
        "Insufficient stock for {name}. Requested: {}, Available: {available}.",
        withdrawal.quantity
    )
}
