//! Category records.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::ResourceActor;
use crate::clients::CategoryClient;
use crate::domain::Category;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Category actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Category>, CategoryClient) {
    let category_id_counter = Arc::new(AtomicU64::new(1));
    let next_category_id = move || category_id_counter.fetch_add(1, Ordering::SeqCst);

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_category_id);
    (actor, CategoryClient::new(generic_client))
}
