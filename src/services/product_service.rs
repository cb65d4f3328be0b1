// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    domain::lifecycle::{TransitionError, check_product_transition},
    models::product::{NewProduct, Product, ProductPatch, ProductStatus, is_blank},
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(repo: ProductRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.repo.list().await
    }

    pub async fn create(&self, payload: &NewProduct) -> Result<Product, AppError> {
        let product = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Produto {} cadastrado ({})", product.name, product.status);
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut product = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;
        let previous = product.status;

        let target = patch.status.filter(|to| *to != previous);
        if let Some(to) = target {
            check_product_transition(previous, to, patch.pending_user.as_deref())?;
        }

        product.apply_patch(patch);
        if product.status == ProductStatus::Pendente && is_blank(product.pending_user.as_deref()) {
            return Err(TransitionError::PendingUserRequired.into());
        }

        let updated = self.repo.update(&mut *tx, &product).await?;
        tx.commit().await?;

        if let Some(to) = target {
            tracing::info!("Produto {}: '{}' -> '{}'", updated.name, previous, to);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(&self.pool, id).await?;
        tracing::info!("Produto {} removido", id);
        Ok(())
    }
}
