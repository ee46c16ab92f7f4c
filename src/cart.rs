//! The per-session withdrawal cart.

use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductId, WithdrawalItem};
use crate::stock::{self, StockError};

/// A pending withdrawal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Snapshot of the product when it was first added.
    pub product: Product,
}

/// Ordered collection of pending lines, at most one per product.
///
/// Lines keep insertion order. Quantities are checked against stock only when
/// a line is added or changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// The merged total is checked against `product.stock`. On failure the
    /// cart is left unchanged. Returns the line's new quantity.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<u32, StockError> {
        match self.position(product.id) {
            Some(index) => {
                let line = &mut self.items[index];
                let total = stock::validate_quantity(product, quantity, line.quantity)?;
                line.quantity = total;
                Ok(total)
            }
            None => {
                let accepted = stock::validate_quantity(product, quantity, 0)?;
                self.items.push(CartItem {
                    product_id: product.id,
                    quantity: accepted,
                    product: product.clone(),
                });
                Ok(accepted)
            }
        }
    }

    /// Removes the line for `product_id`. Absent lines are not an error.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<CartItem> {
        self.position(product_id).map(|index| self.items.remove(index))
    }

    /// Replaces the quantity of the line for `product` with `quantity`.
    ///
    /// A quantity of zero or less removes the line. The new quantity is checked
    /// against the live `product.stock`, not the old cart quantity. Returns the
    /// line's quantity afterwards, or `None` when no line remains.
    pub fn update_quantity(&mut self, product: &Product, quantity: i64) -> Result<Option<u32>, StockError> {
        if quantity <= 0 {
            self.remove_item(product.id);
            return Ok(None);
        }
        let Some(index) = self.position(product.id) else {
            return Ok(None);
        };
        let accepted = stock::validate_absolute(product, quantity)?;
        self.items[index].quantity = accepted;
        Ok(Some(accepted))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Request lines built from the cart's product snapshots.
    pub fn to_withdrawal_items(&self) -> Vec<WithdrawalItem> {
        self.items
            .iter()
            .map(|item| WithdrawalItem {
                product_id: item.product_id,
                quantity: item.quantity,
                product: item.product.clone(),
            })
            .collect()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product_id)
    }
}
