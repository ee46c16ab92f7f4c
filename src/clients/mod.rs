//! Typed clients over the generic resource actors.

pub mod actor_client;
pub mod actor_gateway;
pub mod category_client;
pub mod product_client;
pub mod withdrawal_client;

pub use actor_client::ActorClient;
pub use actor_gateway::ActorGateway;
pub use category_client::CategoryClient;
pub use product_client::ProductClient;
pub use withdrawal_client::WithdrawalClient;
