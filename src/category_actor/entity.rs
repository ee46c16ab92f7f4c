use std::convert::Infallible;

use super::error::CategoryError;
use crate::actor_framework::Entity;
use crate::domain::{Category, CategoryId};

/// Categories are created once and never edited: products hold the name, so a
/// rename would orphan them.
impl Entity for Category {
    type Id = CategoryId;
    type CreateParams = String;
    type UpdateParams = Infallible;
    type Action = Infallible;
    type ActionResult = Infallible;
    type Error = CategoryError;

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn from_create_params(id: CategoryId, name: String) -> Result<Self, CategoryError> {
        Ok(Category::new(id, name)?)
    }

    fn on_update(&mut self, update: Infallible) -> Result<(), CategoryError> {
        match update {}
    }

    fn check_unique(&self, stored: &Self) -> Result<(), CategoryError> {
        if self.name == stored.name {
            return Err(CategoryError::DuplicateName(self.name.clone()));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Infallible) -> Result<Infallible, CategoryError> {
        match action {}
    }
}
