//! System orchestration, startup, and shutdown logic.

pub mod tracing;
pub mod warehouse_system;

pub use self::tracing::*;
pub use warehouse_system::*;
