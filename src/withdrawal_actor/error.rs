use thiserror::Error;

use crate::domain::{ProductId, ValidationError};

/// Errors that can occur while registering or reading withdrawals.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WithdrawalRecordError {
    #[error("Withdrawal not found: {0}")]
    NotFound(String),
    #[error("Invalid withdrawal: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
    #[error("Product {product_id} rejected the withdrawal: {reason}")]
    ProductRejected { product_id: ProductId, reason: String },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
