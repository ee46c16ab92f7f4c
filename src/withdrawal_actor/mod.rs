//! Withdrawal records. Stock bookkeeping lives in [`crate::clients::WithdrawalClient`].

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::ResourceActor;
use crate::clients::{ProductClient, WithdrawalClient};
use crate::domain::Withdrawal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Withdrawal actor and a client wired to `product_client`.
pub fn new(buffer_size: usize, product_client: ProductClient) -> (ResourceActor<Withdrawal>, WithdrawalClient) {
    let withdrawal_id_counter = Arc::new(AtomicU64::new(1));
    let next_withdrawal_id = move || withdrawal_id_counter.fetch_add(1, Ordering::SeqCst);

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_withdrawal_id);
    (actor, WithdrawalClient::new(generic_client, product_client))
}
