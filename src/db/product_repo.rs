// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{NewProduct, Product, ProductStatus},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &NewProduct) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = payload.status.unwrap_or_default();
        // O responsável só é gravado para produtos pendentes
        let pending_user = match status {
            ProductStatus::Pendente => payload.pending_user.as_deref().map(str::trim),
            _ => None,
        };

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, price, stock, description, status, pending_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.category.trim())
        .bind(payload.price)
        .bind(payload.stock)
        .bind(&payload.description)
        .bind(status)
        .bind(pending_user)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn update<'e, E>(&self, executor: E, product: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = $2, category = $3, price = $4, stock = $5,
                description = $6, status = $7, pending_user = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.description)
        .bind(product.status)
        .bind(&product.pending_user)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Produto"))?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }
}
