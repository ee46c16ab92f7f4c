//! # Actor Client
//!
//! Shared read operations for every typed client. Implementors only say how
//! to reach their [`ResourceClient`] and how to translate its errors.

use async_trait::async_trait;
use tracing::debug;

use crate::actor_framework::{Entity, ResourceClient, ResourceError};

#[async_trait]
pub trait ActorClient<T: Entity>: Send + Sync {
    type Error: Send;

    fn inner(&self) -> &ResourceClient<T>;

    fn map_error(e: ResourceError<T::Error>) -> Self::Error;

    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        debug!(id = %id, "Sending get request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        debug!("Sending list request");
        self.inner().list().await.map_err(Self::map_error)
    }
}
