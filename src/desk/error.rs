use thiserror::Error;

use crate::domain::ProductId;
use crate::gateway::GatewayError;
use crate::stock::StockError;

/// Everything the withdrawal desk can refuse, each with a message fit for
/// showing to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error(transparent)]
    Stock(#[from] StockError),
    #[error("product {0} is not in the loaded product list")]
    UnknownProduct(ProductId),
    #[error("the cart is empty")]
    EmptyCart,
    #[error("the withdrawer's name is required")]
    MissingWithdrawerName,
    #[error("the withdrawer's section is required")]
    MissingWithdrawerSection,
    #[error("no user is signed in")]
    NotAuthenticated,
    #[error("a withdrawal is already being submitted")]
    TransactionInProgress,
    /// The only error raised after the request left the desk. Local state is
    /// exactly as it was before the attempt.
    #[error("the withdrawal could not be registered: {0}")]
    SubmissionFailed(GatewayError),
    #[error("could not load data: {0}")]
    Gateway(GatewayError),
}

impl WithdrawalError {
    /// True when the failure was detected locally, before any gateway call.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::SubmissionFailed(_) | Self::Gateway(_))
    }
}
