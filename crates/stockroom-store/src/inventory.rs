//! Products, categories and the guarded stock withdrawal.

use crate::error::conflict_or;
use crate::{Store, StoreError};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::num::NonZeroU64;
use stockroom_core::{
    Category, CategoryStock, InventorySummary, LowStockItem, NewProduct, Product,
};

const PRODUCTS: &str = r#"
    SELECT p.id, p.name, p.category_id, c.name AS category_name, p.unit_price, p.stock_quantity
    FROM products p
    JOIN categories c ON p.category_id = c.id
    ORDER BY p.name, p.id
"#;

const PRODUCT_BY_ID: &str = r#"
    SELECT p.id, p.name, p.category_id, c.name AS category_name, p.unit_price, p.stock_quantity
    FROM products p
    JOIN categories c ON p.category_id = c.id
    WHERE p.id = ?
"#;

/// The stock check lives in the WHERE clause, so the read and the write are
/// one atomic step.
const WITHDRAW: &str =
    "UPDATE products SET stock_quantity = stock_quantity - ? WHERE id = ? AND stock_quantity >= ?";

const STOCK_BY_CATEGORY: &str = r#"
    SELECT c.name AS category_name, SUM(p.stock_quantity) AS total_stock
    FROM products p
    JOIN categories c ON p.category_id = c.id
    GROUP BY c.name
    ORDER BY total_stock DESC, c.name
"#;

const LOW_STOCK: &str = r#"
    SELECT name, stock_quantity
    FROM products
    WHERE stock_quantity < ?
    ORDER BY stock_quantity ASC, name
"#;

/// Result of [`Store::withdraw_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// The full quantity was removed.
    Withdrawn,
    /// Nothing changed: the product is missing or holds less than requested.
    InsufficientStock,
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        unit_price: row.try_get("unit_price")?,
        stock_quantity: row.try_get("stock_quantity")?,
    })
}

impl Store {
    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    pub async fn create_category(&self, name: &str) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or(e, format!("category '{name}'")))?;
        Ok(result.last_insert_rowid())
    }

    /// All products with their category names, ordered by product name.
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(PRODUCTS).fetch_all(&self.pool).await?;
        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    pub async fn find_product(&self, product_id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(PRODUCT_BY_ID)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    pub async fn insert_product(&self, product: &NewProduct) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO products (name, category_id, unit_price, stock_quantity) VALUES (?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(product.category_id)
        .bind(product.unit_price)
        .bind(i64::from(product.stock_quantity))
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Remove `quantity` units of `product_id` if, and only if, at least that
    /// many are in stock at the moment of the write.
    pub async fn withdraw_stock(
        &self,
        product_id: i64,
        quantity: NonZeroU64,
    ) -> Result<WithdrawOutcome, StoreError> {
        // Stock is an i64 column; anything larger can never be covered.
        let Ok(quantity) = i64::try_from(quantity.get()) else {
            return Ok(WithdrawOutcome::InsufficientStock);
        };
        let result = sqlx::query(WITHDRAW)
            .bind(quantity)
            .bind(product_id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            0 => Ok(WithdrawOutcome::InsufficientStock),
            _ => Ok(WithdrawOutcome::Withdrawn),
        }
    }

    /// Aggregates for the summary page.
    pub async fn inventory_summary(
        &self,
        low_stock_threshold: i64,
    ) -> Result<InventorySummary, StoreError> {
        let (total_value,): (Option<f64>,) =
            sqlx::query_as("SELECT SUM(unit_price * stock_quantity) FROM products")
                .fetch_one(&self.pool)
                .await?;

        let (total_products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let stock_by_category = sqlx::query(STOCK_BY_CATEGORY)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(CategoryStock {
                    category_name: row.try_get("category_name")?,
                    total_stock: row.try_get("total_stock")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let low_stock_items = sqlx::query_as::<_, (String, i64)>(LOW_STOCK)
            .bind(low_stock_threshold)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(name, stock_quantity)| LowStockItem {
                name,
                stock_quantity,
            })
            .collect();

        Ok(InventorySummary {
            total_value: total_value.unwrap_or(0.0),
            total_products,
            stock_by_category,
            low_stock_items,
        })
    }
}
