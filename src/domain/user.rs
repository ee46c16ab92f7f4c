use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// The authenticated user registering a withdrawal.
///
/// Supplied by the caller's authentication layer; this crate never looks it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub section: String,
}

impl SessionUser {
    pub fn new(id: UserId, name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            section: section.into(),
        }
    }
}
