use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = NewProduct;
    type UpdateParams = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn from_create_params(id: ProductId, params: NewProduct) -> Result<Self, ProductError> {
        Ok(Product::new(id, params)?)
    }

    /// Applies an edit; name and category must stay non-blank.
    fn on_update(&mut self, update: ProductUpdate) -> Result<(), ProductError> {
        Ok(self.apply(update)?)
    }

    /// Product names are unique across the catalog.
    fn check_unique(&self, stored: &Self) -> Result<(), ProductError> {
        if self.name == stored.name {
            return Err(ProductError::DuplicateName(self.name.clone()));
        }
        Ok(())
    }

    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `Withdraw(amount)`: Decrements stock, never below zero
    /// - `Restock(amount)`: Increments stock
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::Withdraw(0) | ProductAction::Restock(0) => Err(ProductError::InvalidQuantity(0)),
            ProductAction::Withdraw(amount) => {
                if self.stock >= amount {
                    self.stock -= amount;
                    Ok(ProductActionResult::StockLevel(self.stock))
                } else {
                    Err(ProductError::InsufficientStock {
                        requested: amount,
                        available: self.stock,
                    })
                }
            }
            ProductAction::Restock(amount) => {
                self.stock = self
                    .stock
                    .checked_add(amount)
                    .ok_or(ProductError::InvalidQuantity(amount))?;
                Ok(ProductActionResult::StockLevel(self.stock))
            }
        }
    }
}
