use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional, required, Product, ProductId, UserId, ValidationError};

pub type WithdrawalId = u64;

/// One line of a withdrawal: how many units of which product.
///
/// `product` is the snapshot held by the cart when the withdrawal was
/// submitted, not a fresh read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Product,
}

/// Everything the persistence side needs to register a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub registering_user_id: UserId,
    pub registering_user_name: String,
    pub registering_user_section: String,
    pub withdrawer_name: String,
    pub withdrawer_section: String,
    pub notes: Option<String>,
    pub items: Vec<WithdrawalItem>,
}

/// A registered stock withdrawal. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: WithdrawalId,
    pub items: Vec<WithdrawalItem>,
    pub total_items: u64,
    pub user_id: UserId,
    pub user_name: String,
    pub user_section: String,
    pub withdrawer_name: String,
    pub withdrawer_section: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WithdrawalRequest {
    pub fn total_items(&self) -> u64 {
        sum_quantities(&self.items)
    }
}

impl Withdrawal {
    /// Builds the record for `request`, computing `total_items` from its lines.
    pub fn record(
        id: WithdrawalId,
        request: WithdrawalRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if request.items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if let Some(item) = request.items.iter().find(|item| item.quantity == 0) {
            return Err(ValidationError::ZeroQuantity { product_id: item.product_id });
        }

        Ok(Self {
            id,
            total_items: sum_quantities(&request.items),
            user_id: request.registering_user_id,
            user_name: request.registering_user_name,
            user_section: request.registering_user_section,
            withdrawer_name: required("withdrawer name", request.withdrawer_name)?,
            withdrawer_section: required("withdrawer section", request.withdrawer_section)?,
            notes: optional(request.notes),
            items: request.items,
            created_at,
        })
    }
}

fn sum_quantities(items: &[WithdrawalItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}
