use tracing::{error, info};

use crate::clients::{ActorGateway, CategoryClient, ProductClient, WithdrawalClient};
use crate::config::WarehouseConfig;
use crate::{category_actor, product_actor, withdrawal_actor};

/// The in-process inventory backend: one actor per record type.
///
/// Responsible for starting the actors, wiring the withdrawal client to the
/// product actor, and shutting everything down.
pub struct WarehouseSystem {
    pub product_client: ProductClient,
    pub category_client: CategoryClient,
    pub withdrawal_client: WithdrawalClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl WarehouseSystem {
    /// Spawns the actors. Must be called from within a tokio runtime.
    pub fn new(config: &WarehouseConfig) -> Self {
        let buffer_size = config.actor_buffer_size;

        // 1. Product Service
        let (product_actor, product_client) = product_actor::new(buffer_size);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Category Service
        let (category_actor, category_client) = category_actor::new(buffer_size);
        let category_handle = tokio::spawn(category_actor.run());

        // 3. Withdrawal Service, which takes stock through the product client
        let (withdrawal_actor, withdrawal_client) = withdrawal_actor::new(buffer_size, product_client.clone());
        let withdrawal_handle = tokio::spawn(withdrawal_actor.run());

        info!(buffer_size, "Warehouse system started");
        Self {
            product_client,
            category_client,
            withdrawal_client,
            handles: vec![product_handle, category_handle, withdrawal_handle],
        }
    }

    /// A gateway over this system's actors, for the desk and the catalog.
    pub fn gateway(&self) -> ActorGateway {
        ActorGateway::new(
            self.product_client.clone(),
            self.category_client.clone(),
            self.withdrawal_client.clone(),
        )
    }

    /// Closes the request channels and waits for every actor to stop.
    ///
    /// Actors only stop once every client clone is gone, so gateways handed
    /// out by [`Self::gateway`] must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Drop clients to close channels
        drop(self.withdrawal_client);
        drop(self.category_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
