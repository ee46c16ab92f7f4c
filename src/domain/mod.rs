//! Warehouse records, free of any actor or gateway concerns.

pub mod category;
pub mod product;
pub mod user;
pub mod withdrawal;

pub use category::*;
pub use product::*;
pub use user::*;
pub use withdrawal::*;

use thiserror::Error;

/// Invariant violations caught by the validating constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("a withdrawal needs at least one item")]
    NoItems,
    #[error("quantity for product {product_id} must be at least 1")]
    ZeroQuantity { product_id: ProductId },
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(field: &'static str, value: impl AsRef<str>) -> Result<String, ValidationError> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trims `value`, mapping blank text to `None`.
pub(crate) fn optional(value: Option<impl AsRef<str>>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}
