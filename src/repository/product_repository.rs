//! Product repository.

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{Product, ProductPayload};

const PRODUCT_COLUMNS: &str = "id, name, price, category, stock, image_url, banner_url, \
                               is_featured, discount, created_at";

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    pub async fn list(&self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_product).collect())
    }

    /// Create a product, defaulting the image to a placeholder when the
    /// payload carries none.
    pub async fn create(&self, payload: &ProductPayload) -> RepoResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products
                (name, price, category, stock, image_url, banner_url, is_featured, discount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(payload.stock)
        .bind(payload.image_url_or_default())
        .bind(&payload.banner_url)
        .bind(payload.is_featured)
        .bind(payload.discount.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(map_product(&row))
    }

    /// Full-field update.
    pub async fn update(&self, id: i32, payload: &ProductPayload) -> RepoResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, price = $3, category = $4, stock = $5,
                image_url = $6, banner_url = $7, is_featured = $8, discount = $9
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(payload.stock)
        .bind(payload.image_url_or_default())
        .bind(&payload.banner_url)
        .bind(payload.is_featured)
        .bind(payload.discount.unwrap_or(0))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_product(&row))
    }

    /// Delete a product.
    pub async fn delete(&self, id: i32) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn map_product(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        category: row.get("category"),
        stock: row.get("stock"),
        image_url: row.get("image_url"),
        banner_url: row.get("banner_url"),
        is_featured: row.get("is_featured"),
        discount: row.get("discount"),
        created_at: row.get("created_at"),
    }
}
