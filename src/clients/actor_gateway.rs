use async_trait::async_trait;
use tracing::instrument;

use super::{ActorClient, CategoryClient, ProductClient, WithdrawalClient};
use crate::category_actor::CategoryError;
use crate::domain::{Category, NewProduct, Product, ProductId, ProductUpdate, Withdrawal, WithdrawalRequest};
use crate::gateway::{GatewayError, InventoryGateway};
use crate::product_actor::ProductError;
use crate::withdrawal_actor::WithdrawalRecordError;

/// [`InventoryGateway`] backed by the in-process actors.
#[derive(Clone)]
pub struct ActorGateway {
    products: ProductClient,
    categories: CategoryClient,
    withdrawals: WithdrawalClient,
}

impl ActorGateway {
    pub fn new(products: ProductClient, categories: CategoryClient, withdrawals: WithdrawalClient) -> Self {
        Self {
            products,
            categories,
            withdrawals,
        }
    }
}

#[async_trait]
impl InventoryGateway for ActorGateway {
    async fn load_products(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.products.list().await?)
    }

    async fn load_categories(&self) -> Result<Vec<Category>, GatewayError> {
        Ok(self.categories.list().await?)
    }

    async fn load_withdrawals(&self) -> Result<Vec<Withdrawal>, GatewayError> {
        let mut withdrawals = self.withdrawals.list().await?;
        withdrawals.reverse();
        Ok(withdrawals)
    }

    #[instrument(skip(self, request))]
    async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal, GatewayError> {
        Ok(self.withdrawals.create_withdrawal(request).await?)
    }

    #[instrument(skip(self, product))]
    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError> {
        let id = self.products.create_product(product).await?;
        self.products
            .get(id)
            .await?
            .ok_or_else(|| GatewayError::not_found(format!("product {id} missing after creation")))
    }

    #[instrument(skip(self, update))]
    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, GatewayError> {
        Ok(self.products.update_product(id, update).await?)
    }

    #[instrument(skip(self))]
    async fn create_category(&self, name: String) -> Result<Category, GatewayError> {
        let id = self.categories.create_category(name).await?;
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| GatewayError::not_found(format!("category {id} missing after creation")))
    }
}

impl From<ProductError> for GatewayError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(_) => GatewayError::not_found(e.to_string()),
            ProductError::DuplicateName(_) => GatewayError::duplicate(e.to_string()),
            ProductError::InsufficientStock { .. } => GatewayError::stock_conflict(e.to_string()),
            ProductError::InvalidQuantity(_) | ProductError::Invalid(_) => GatewayError::rejected(e.to_string()),
            ProductError::ActorCommunicationError(_) => GatewayError::unavailable(e.to_string()),
        }
    }
}

impl From<CategoryError> for GatewayError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::NotFound(_) => GatewayError::not_found(e.to_string()),
            CategoryError::DuplicateName(_) => GatewayError::duplicate(e.to_string()),
            CategoryError::Invalid(_) => GatewayError::rejected(e.to_string()),
            CategoryError::ActorCommunicationError(_) => GatewayError::unavailable(e.to_string()),
        }
    }
}

impl From<WithdrawalRecordError> for GatewayError {
    fn from(e: WithdrawalRecordError) -> Self {
        match e {
            WithdrawalRecordError::NotFound(_) | WithdrawalRecordError::ProductNotFound(_) => {
                GatewayError::not_found(e.to_string())
            }
            WithdrawalRecordError::InsufficientStock { .. } => GatewayError::stock_conflict(e.to_string()),
            WithdrawalRecordError::Invalid(_) | WithdrawalRecordError::ProductRejected { .. } => {
                GatewayError::rejected(e.to_string())
            }
            WithdrawalRecordError::ActorCommunicationError(_) => GatewayError::unavailable(e.to_string()),
        }
    }
}
