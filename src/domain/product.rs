use serde::{Deserialize, Serialize};

use super::{optional, required, ValidationError};

pub type ProductId = u64;

/// A stocked item in the warehouse.
///
/// Stock levels are unsigned, so a negative stock cannot be represented.
/// Instances are built through [`Product::new`], which enforces the name and
/// category invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Name of the owning category.
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
}

/// Creation parameters for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
}

/// Partial edit of a product. `description: Some("")` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
}

impl Product {
    pub fn new(id: ProductId, params: NewProduct) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("product name", &params.name)?,
            description: optional(params.description),
            category: required("category", &params.category)?,
            stock: params.stock,
            min_stock: params.min_stock,
        })
    }

    /// A product is low on stock once it reaches its minimum.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Applies `update` in place. Nothing changes when a field is rejected.
    pub fn apply(&mut self, update: ProductUpdate) -> Result<(), ValidationError> {
        let name = update.name.map(|n| required("product name", n)).transpose()?;
        let category = update.category.map(|c| required("category", c)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = update.description {
            self.description = optional(Some(description));
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(min_stock) = update.min_stock {
            self.min_stock = min_stock;
        }
        Ok(())
    }
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: impl Into<String>, stock: u32, min_stock: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: category.into(),
            stock,
            min_stock,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
