//! The persistence collaborator as seen by the withdrawal desk and catalog.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Category, NewProduct, Product, ProductId, ProductUpdate, Withdrawal, WithdrawalRequest};

/// Machine-readable failure class reported by the persistence side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    NotFound,
    /// Stock changed on the persistence side and no longer covers the request.
    StockConflict,
    /// A record with the same unique name already exists.
    Duplicate,
    Rejected,
    Unavailable,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::StockConflict => "stock changed after the item was added to the cart",
            Self::Duplicate => "already exists",
            Self::Rejected => "rejected",
            Self::Unavailable => "persistence unavailable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NotFound, message)
    }

    pub fn stock_conflict(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::StockConflict, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Duplicate, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Rejected, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Unavailable, message)
    }

    pub fn is_stock_conflict(&self) -> bool {
        self.kind == GatewayErrorKind::StockConflict
    }

    pub fn is_duplicate(&self) -> bool {
        self.kind == GatewayErrorKind::Duplicate
    }
}

/// Source of truth for products, categories and withdrawals.
///
/// Every call is a suspension point; implementations decide the transport.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn load_products(&self) -> Result<Vec<Product>, GatewayError>;

    async fn load_categories(&self) -> Result<Vec<Category>, GatewayError>;

    /// Withdrawal history, newest first.
    async fn load_withdrawals(&self) -> Result<Vec<Withdrawal>, GatewayError>;

    /// Registers the whole request atomically and decrements stock.
    async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal, GatewayError>;

    /// Names are unique; a clash fails with [`GatewayErrorKind::Duplicate`].
    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError>;

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, GatewayError>;

    /// Names are unique; a clash fails with [`GatewayErrorKind::Duplicate`].
    async fn create_category(&self, name: String) -> Result<Category, GatewayError>;
}

#[async_trait]
impl<G: InventoryGateway + ?Sized> InventoryGateway for std::sync::Arc<G> {
    async fn load_products(&self) -> Result<Vec<Product>, GatewayError> {
        (**self).load_products().await
    }

    async fn load_categories(&self) -> Result<Vec<Category>, GatewayError> {
        (**self).load_categories().await
    }

    async fn load_withdrawals(&self) -> Result<Vec<Withdrawal>, GatewayError> {
        (**self).load_withdrawals().await
    }

    async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal, GatewayError> {
        (**self).create_withdrawal(request).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError> {
        (**self).create_product(product).await
    }

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, GatewayError> {
        (**self).update_product(id, update).await
    }

    async fn create_category(&self, name: String) -> Result<Category, GatewayError> {
        (**self).create_category(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_conflict_message_names_the_cause() {
        let error = GatewayError::stock_conflict("Tornillos: requested 5, available 2");
        assert!(error.is_stock_conflict());
        assert_eq!(
            error.to_string(),
            "stock changed after the item was added to the cart: Tornillos: requested 5, available 2"
        );
    }

    #[test]
    fn other_kinds_are_not_conflicts() {
        assert!(!GatewayError::unavailable("actor closed").is_stock_conflict());
        assert_eq!(GatewayError::rejected("bad").to_string(), "rejected: bad");
    }
}
