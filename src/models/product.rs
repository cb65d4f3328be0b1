// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::procedure::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Disponivel,
    Vendido,
    Consumido,
    Pendente,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Disponivel
    }
}

impl ProductStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Disponivel => "disponivel",
            ProductStatus::Vendido => "vendido",
            ProductStatus::Consumido => "consumido",
            ProductStatus::Pendente => "pendente",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// --- Produto / item de estoque ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Pomada Modeladora")]
    pub name: String,
    #[schema(example = "Cabelo")]
    pub category: String,
    #[schema(example = "39.90")]
    pub price: Decimal,
    #[schema(example = 12)]
    pub stock: i32,
    pub description: Option<String>,
    pub status: ProductStatus,

    // Só existe enquanto o status for "pendente"
    #[schema(example = "Carlos")]
    pub pending_user: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        let mut err = ValidationError::new("range");
        err.message = Some("O estoque não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn pending_user_error() -> ValidationError {
    let mut err = ValidationError::new("required");
    err.message = Some("Informe o responsável pelo produto pendente.".into());
    err
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[serde(default)]
    pub stock: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_user: Option<String>,
}

impl NewProduct {
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(err) = validate_stock(self.stock) {
            errors.add("stock", err);
        }
        if self.status == Some(ProductStatus::Pendente) && is_blank(self.pending_user.as_deref()) {
            errors.add("pendingUser", pending_user_error());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_user: Option<String>,
}

impl ProductPatch {
    pub fn status_change(status: ProductStatus, pending_user: Option<String>) -> Self {
        Self { status: Some(status), pending_user, ..Default::default() }
    }

    /// Checagens que não dependem do estado atual do produto.
    pub fn validate_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            let mut err = ValidationError::new("length");
            err.message = Some("O nome é obrigatório.".into());
            errors.add("name", err);
        }
        if let Some(price) = &self.price {
            if let Err(err) = validate_not_negative(price) {
                errors.add("price", err);
            }
        }
        if let Some(stock) = self.stock {
            if let Err(err) = validate_stock(stock) {
                errors.add("stock", err);
            }
        }
        if self.status == Some(ProductStatus::Pendente) && is_blank(self.pending_user.as_deref()) {
            errors.add("pendingUser", pending_user_error());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Product {
    /// Aplica o patch. O responsável só sobrevive enquanto o produto estiver pendente.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(user) = &patch.pending_user {
            self.pending_user = Some(user.trim().to_string());
        }
        if self.status != ProductStatus::Pendente {
            self.pending_user = None;
        }
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(status: ProductStatus) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Pomada".into(),
            category: "Cabelo".into(),
            price: Decimal::new(3990, 2),
            stock: 3,
            description: None,
            status,
            pending_user: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pending_without_user_is_invalid() {
        let patch = ProductPatch::status_change(ProductStatus::Pendente, Some("   ".into()));
        let errors = patch.validate_fields().unwrap_err();
        assert!(errors.field_errors().contains_key("pendingUser"));
    }

    #[test]
    fn leaving_pending_clears_the_user() {
        let mut p = product(ProductStatus::Disponivel);
        p.apply_patch(&ProductPatch::status_change(ProductStatus::Pendente, Some(" Carlos ".into())));
        assert_eq!(p.pending_user.as_deref(), Some("Carlos"));

        p.apply_patch(&ProductPatch::status_change(ProductStatus::Vendido, None));
        assert_eq!(p.status, ProductStatus::Vendido);
        assert!(p.pending_user.is_none());
    }

    #[test]
    fn negative_stock_is_rejected_on_create() {
        let payload = NewProduct {
            name: "Shampoo".into(),
            category: "Cabelo".into(),
            price: Decimal::new(2500, 2),
            stock: -1,
            description: None,
            status: None,
            pending_user: None,
        };
        assert!(payload.validate().is_ok());
        assert!(payload.validate_consistency().is_err());
    }
}
