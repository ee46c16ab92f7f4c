use async_trait::async_trait;
use tracing::{debug, instrument};

use super::ActorClient;
use crate::actor_framework::{FrameworkError, ResourceClient, ResourceError};
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(product_name = %params.name))]
    pub async fn create_product(&self, params: NewProduct) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        self.stock_action(id, ProductAction::CheckStock).await
    }

    /// Removes `quantity` units; answers with the remaining stock.
    #[instrument(skip(self))]
    pub async fn withdraw_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        self.stock_action(id, ProductAction::Withdraw(quantity)).await
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        self.stock_action(id, ProductAction::Restock(quantity)).await
    }

    async fn stock_action(&self, id: ProductId, action: ProductAction) -> Result<u32, ProductError> {
        debug!("Sending request");
        let ProductActionResult::StockLevel(level) =
            self.inner.perform_action(id, action).await.map_err(Self::map_error)?;
        Ok(level)
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: ResourceError<ProductError>) -> ProductError {
        match e {
            ResourceError::Entity(e) => e,
            ResourceError::Framework(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            ResourceError::Framework(e) => ProductError::ActorCommunicationError(e.to_string()),
        }
    }
}
