use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use super::{ActorClient, ProductClient};
use crate::actor_framework::{FrameworkError, ResourceClient, ResourceError};
use crate::domain::{ProductId, ValidationError, Withdrawal, WithdrawalRequest};
use crate::product_actor::ProductError;
use crate::withdrawal_actor::WithdrawalRecordError;

/// Client for interacting with the Withdrawal actor.
///
/// Registering a withdrawal orchestrates the Product actor: every line's stock
/// is taken first, and lines already taken are put back if a later line or the
/// record itself fails, so a request is applied whole or not at all.
#[derive(Clone)]
pub struct WithdrawalClient {
    inner: ResourceClient<Withdrawal>,
    product_client: ProductClient,
}

impl WithdrawalClient {
    pub fn new(inner: ResourceClient<Withdrawal>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    #[instrument(
        skip(self, request),
        fields(
            withdrawer_section = %request.withdrawer_section,
            lines = request.items.len(),
            total_items = request.total_items()
        )
    )]
    pub async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal, WithdrawalRecordError> {
        info!("Processing create_withdrawal request");

        if request.items.is_empty() {
            error!("Withdrawal has no lines");
            return Err(ValidationError::NoItems.into());
        }

        // Step 1: Take stock for every line
        let mut taken: Vec<(ProductId, u32)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            match self.product_client.withdraw_stock(item.product_id, item.quantity).await {
                Ok(remaining) => {
                    debug!(product_id = item.product_id, remaining, "Stock taken");
                    taken.push((item.product_id, item.quantity));
                }
                Err(e) => {
                    error!(product_id = item.product_id, error = %e, "Stock withdrawal failed");
                    self.put_back(&taken).await;
                    return Err(line_error(item.product_id, e));
                }
            }
        }

        // Step 2: Record the withdrawal
        let id = match self.inner.create(request).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Recording withdrawal failed");
                self.put_back(&taken).await;
                return Err(Self::map_error(e));
            }
        };

        info!(withdrawal_id = id, "Withdrawal registered");
        self.get(id)
            .await?
            .ok_or_else(|| WithdrawalRecordError::NotFound(id.to_string()))
    }

    /// Compensation: returns stock taken by a request that did not complete.
    async fn put_back(&self, taken: &[(ProductId, u32)]) {
        for &(product_id, quantity) in taken.iter().rev() {
            if let Err(e) = self.product_client.restock(product_id, quantity).await {
                warn!(product_id, quantity, error = %e, "Could not return stock");
            }
        }
    }
}

fn line_error(product_id: ProductId, e: ProductError) -> WithdrawalRecordError {
    match e {
        ProductError::InsufficientStock { requested, available } => WithdrawalRecordError::InsufficientStock {
            product_id,
            requested,
            available,
        },
        ProductError::NotFound(_) => WithdrawalRecordError::ProductNotFound(product_id),
        ProductError::InvalidQuantity(_) => ValidationError::ZeroQuantity { product_id }.into(),
        ProductError::Invalid(e) => e.into(),
        rejected @ ProductError::DuplicateName(_) => WithdrawalRecordError::ProductRejected {
            product_id,
            reason: rejected.to_string(),
        },
        ProductError::ActorCommunicationError(msg) => WithdrawalRecordError::ActorCommunicationError(msg),
    }
}

#[async_trait]
impl ActorClient<Withdrawal> for WithdrawalClient {
    type Error = WithdrawalRecordError;

    fn inner(&self) -> &ResourceClient<Withdrawal> {
        &self.inner
    }

    fn map_error(e: ResourceError<WithdrawalRecordError>) -> WithdrawalRecordError {
        match e {
            ResourceError::Entity(e) => e,
            ResourceError::Framework(FrameworkError::NotFound(id)) => WithdrawalRecordError::NotFound(id),
            ResourceError::Framework(e) => WithdrawalRecordError::ActorCommunicationError(e.to_string()),
        }
    }
}
