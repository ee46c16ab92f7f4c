use serde::{Deserialize, Serialize};

use super::{required, ValidationError};

pub type CategoryId = u64;

/// A named product grouping. Products refer to it by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("category name", name)?,
        })
    }
}
