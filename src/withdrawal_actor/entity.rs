use std::convert::Infallible;

use chrono::Utc;

use super::error::WithdrawalRecordError;
use crate::actor_framework::Entity;
use crate::domain::{Withdrawal, WithdrawalId, WithdrawalRequest};

impl Entity for Withdrawal {
    type Id = WithdrawalId;
    type CreateParams = WithdrawalRequest;
    type UpdateParams = Infallible;
    type Action = Infallible;
    type ActionResult = Infallible;
    type Error = WithdrawalRecordError;

    fn id(&self) -> &WithdrawalId {
        &self.id
    }

    /// Stamps the record with the creation time.
    fn from_create_params(id: WithdrawalId, request: WithdrawalRequest) -> Result<Self, WithdrawalRecordError> {
        Ok(Withdrawal::record(id, request, Utc::now())?)
    }

    fn on_update(&mut self, update: Infallible) -> Result<(), WithdrawalRecordError> {
        match update {}
    }

    fn handle_action(&mut self, action: Infallible) -> Result<Infallible, WithdrawalRecordError> {
        match action {}
    }
}
