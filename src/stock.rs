//! Quantity checks against a product's last known stock.

use thiserror::Error;

use crate::domain::Product;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("invalid quantity {0}: quantities must be at least 1")]
    InvalidQuantity(i64),
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
}

/// Checks that `requested` more units may join the `existing_in_cart` units
/// already held for `product`.
///
/// The ceiling is always the product's total stock: the existing cart
/// quantity is part of the proposed total. Returns the accepted total.
pub fn validate_quantity(product: &Product, requested: i64, existing_in_cart: u32) -> Result<u32, StockError> {
    let requested = u64::try_from(requested)
        .ok()
        .filter(|&q| q >= 1)
        .ok_or(StockError::InvalidQuantity(requested))?;

    let total = u64::from(existing_in_cart) + requested;
    if total > u64::from(product.stock) {
        return Err(StockError::InsufficientStock {
            requested: total,
            available: product.stock,
        });
    }
    // total <= stock, so it fits
    Ok(total as u32)
}

/// Checks an absolute quantity, as used when a cart line is replaced.
pub fn validate_absolute(product: &Product, quantity: i64) -> Result<u32, StockError> {
    validate_quantity(product, quantity, 0)
}
