//! Stock withdrawals for a small warehouse.
//!
//! A [`desk::WithdrawalDesk`] holds one user's cart and submits it as a single
//! withdrawal through an [`gateway::InventoryGateway`]. The crate ships an
//! in-process gateway, [`clients::ActorGateway`], backed by one actor per
//! record type and started with [`app_system::WarehouseSystem`].

pub mod actor_framework;
pub mod app_system;
pub mod cart;
pub mod catalog;
pub mod category_actor;
pub mod clients;
pub mod config;
pub mod desk;
pub mod domain;
pub mod gateway;
pub mod product_actor;
pub mod reports;
pub mod stock;
pub mod withdrawal_actor;

#[cfg(test)]
mod mock_framework;

pub use cart::{Cart, CartItem};
pub use catalog::{Catalog, CatalogError};
pub use config::WarehouseConfig;
pub use desk::{TransactionState, WithdrawalDesk, WithdrawalError};
pub use gateway::{GatewayError, GatewayErrorKind, InventoryGateway};
pub use reports::InventoryReport;
