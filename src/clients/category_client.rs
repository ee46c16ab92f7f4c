use async_trait::async_trait;
use tracing::{debug, instrument};

use super::ActorClient;
use crate::actor_framework::{FrameworkError, ResourceClient, ResourceError};
use crate::category_actor::CategoryError;
use crate::domain::{Category, CategoryId};

/// Client for interacting with the Category actor.
#[derive(Clone)]
pub struct CategoryClient {
    inner: ResourceClient<Category>,
}

impl CategoryClient {
    pub fn new(inner: ResourceClient<Category>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: String) -> Result<CategoryId, CategoryError> {
        debug!("Sending request");
        self.inner.create(name).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Category> for CategoryClient {
    type Error = CategoryError;

    fn inner(&self) -> &ResourceClient<Category> {
        &self.inner
    }

    fn map_error(e: ResourceError<CategoryError>) -> CategoryError {
        match e {
            ResourceError::Entity(e) => e,
            ResourceError::Framework(FrameworkError::NotFound(id)) => CategoryError::NotFound(id),
            ResourceError::Framework(e) => CategoryError::ActorCommunicationError(e.to_string()),
        }
    }
}
