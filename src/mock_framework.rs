//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use crate::domain::{Category, NewProduct, Product, ProductId, ProductUpdate, Withdrawal, WithdrawalRequest};
use crate::gateway::{GatewayError, InventoryGateway};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Notify};

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it reads each request from `receiver`, checks
/// it, and answers through the request's responder.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<Response<Vec<T>, T::Error>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

// =============================================================================
// FAKE GATEWAY
// =============================================================================

/// In-memory [`InventoryGateway`] that records every call it receives.
///
/// `create_withdrawal` behaves like the real backend: it decrements stock
/// and prepends the new record, unless a failure was queued with
/// [`FakeGateway::fail_next_withdrawal`].
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    products: Vec<Product>,
    categories: Vec<Category>,
    withdrawals: Vec<Withdrawal>,
    calls: Vec<&'static str>,
    submitted: Vec<WithdrawalRequest>,
    next_withdrawal_failure: Option<GatewayError>,
    failing_product_loads: bool,
    hold: Option<Arc<Notify>>,
    product_load_hold: Option<Arc<Notify>>,
}

impl FakeGateway {
    pub fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::default();
        gateway.lock().products = products;
        gateway
    }

    pub fn with_categories(self, names: &[&str]) -> Self {
        self.lock().categories = names
            .iter()
            .zip(1..)
            .map(|(name, id)| Category::new(id, name).unwrap())
            .collect();
        self
    }

    /// Names of the gateway methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn submitted(&self) -> Vec<WithdrawalRequest> {
        self.lock().submitted.clone()
    }

    pub fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.lock().products.iter().find(|p| p.id == id).map(|p| p.stock)
    }

    pub fn set_stock(&self, id: ProductId, stock: u32) {
        if let Some(product) = self.lock().products.iter_mut().find(|p| p.id == id) {
            product.stock = stock;
        }
    }

    pub fn fail_next_withdrawal(&self, error: GatewayError) {
        self.lock().next_withdrawal_failure = Some(error);
    }

    pub fn fail_product_loads(&self, failing: bool) {
        self.lock().failing_product_loads = failing;
    }

    /// Makes `create_withdrawal` wait until the returned handle is notified.
    pub fn hold_withdrawals(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.lock().hold = Some(notify.clone());
        notify
    }

    /// Makes `load_products` wait, before reading the list, until the
    /// returned handle is notified.
    pub fn hold_product_loads(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.lock().product_load_hold = Some(notify.clone());
        notify
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: &'static str) {
        self.lock().calls.push(call);
    }
}

#[async_trait]
impl InventoryGateway for FakeGateway {
    async fn load_products(&self) -> Result<Vec<Product>, GatewayError> {
        let hold = {
            let mut state = self.lock();
            state.calls.push("load_products");
            state.product_load_hold.clone()
        };
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let state = self.lock();
        if state.failing_product_loads {
            return Err(GatewayError::unavailable("product list unreachable"));
        }
        Ok(state.products.clone())
    }

    async fn load_categories(&self) -> Result<Vec<Category>, GatewayError> {
        self.record("load_categories");
        Ok(self.lock().categories.clone())
    }

    async fn load_withdrawals(&self) -> Result<Vec<Withdrawal>, GatewayError> {
        self.record("load_withdrawals");
        Ok(self.lock().withdrawals.clone())
    }

    async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal, GatewayError> {
        self.record("create_withdrawal");
        let hold = {
            let mut state = self.lock();
            state.submitted.push(request.clone());
            state.hold.clone()
        };
        if let Some(hold) = hold {
            hold.notified().await;
        }

        let mut state = self.lock();
        if let Some(error) = state.next_withdrawal_failure.take() {
            return Err(error);
        }
        for item in &request.items {
            let product = state
                .products
                .iter_mut()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| GatewayError::not_found(format!("product {}", item.product_id)))?;
            if product.stock < item.quantity {
                return Err(GatewayError::stock_conflict(format!(
                    "{}: requested {}, available {}",
                    product.name, item.quantity, product.stock
                )));
            }
        }
        for item in &request.items {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock -= item.quantity;
            }
        }
        let id = state.withdrawals.len() as u64 + 1;
        let withdrawal = Withdrawal::record(id, request, chrono::Utc::now())
            .map_err(|e| GatewayError::rejected(e.to_string()))?;
        state.withdrawals.insert(0, withdrawal.clone());
        Ok(withdrawal)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError> {
        self.record("create_product");
        let mut state = self.lock();
        let id = state.products.len() as u64 + 1;
        let product = Product::new(id, product).map_err(|e| GatewayError::rejected(e.to_string()))?;
        if state.products.iter().any(|p| p.name == product.name) {
            return Err(GatewayError::duplicate(product.name));
        }
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, GatewayError> {
        self.record("update_product");
        let mut state = self.lock();
        let mut product = state
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found(format!("product {id}")))?;
        product.apply(update).map_err(|e| GatewayError::rejected(e.to_string()))?;
        if state.products.iter().any(|p| p.id != id && p.name == product.name) {
            return Err(GatewayError::duplicate(product.name));
        }
        if let Some(stored) = state.products.iter_mut().find(|p| p.id == id) {
            *stored = product.clone();
        }
        Ok(product)
    }

    async fn create_category(&self, name: String) -> Result<Category, GatewayError> {
        self.record("create_category");
        let mut state = self.lock();
        let id = state.categories.len() as u64 + 1;
        let category = Category::new(id, name).map_err(|e| GatewayError::rejected(e.to_string()))?;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(GatewayError::duplicate(category.name));
        }
        state.categories.push(category.clone());
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ActorClient, CategoryClient};
    use crate::domain::Category;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Category>(10);
        let client = CategoryClient::new(inner);

        let create_task = tokio::spawn({
            let client = client.clone();
            async move { client.create_category("Limpieza".to_string()).await }
        });

        let (name, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(name, "Limpieza");
        responder.send(Ok(1)).unwrap();
        assert_eq!(create_task.await.unwrap(), Ok(1));

        let list_task = tokio::spawn(async move { client.list().await });
        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder.send(Ok(vec![Category::new(1, "Limpieza").unwrap()])).unwrap();

        let listed = list_task.await.unwrap().unwrap();
        assert_eq!(listed.len(), 1);
    }
}
