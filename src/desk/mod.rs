//! # Withdrawal Desk
//!
//! One user's session at the warehouse counter: a cart, local copies of the
//! product list and withdrawal history, and the confirm step that turns the
//! cart into a registered withdrawal.
//!
//! Confirmation walks `Idle -> Validating -> Submitting -> {Committed | Failed}`
//! and settles back to `Idle`. Validation happens under the session lock
//! before anything is sent; only the gateway call itself is awaited. While a
//! confirmation is in flight the cart may still be edited, but a second
//! confirmation is refused with [`WithdrawalError::TransactionInProgress`].
//!
//! The desk never adjusts stock itself. After a committed withdrawal it
//! reloads the product list from the gateway, which is the only way it learns
//! the new stock levels.

mod error;

pub use error::WithdrawalError;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, instrument, warn};

use crate::cart::{Cart, CartItem};
use crate::domain::{Category, Product, ProductId, SessionUser, Withdrawal, WithdrawalRequest};
use crate::gateway::InventoryGateway;
use crate::reports::InventoryReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Committed,
    Failed,
}

#[derive(Debug, Default)]
struct Session {
    cart: Cart,
    products: Vec<Product>,
    categories: Vec<Category>,
    /// Newest first.
    withdrawals: Vec<Withdrawal>,
    state: TransactionState,
    last_outcome: Option<TransactionState>,
    products_stale: bool,
}

pub struct WithdrawalDesk<G> {
    gateway: G,
    session: Mutex<Session>,
}

impl<G: InventoryGateway> WithdrawalDesk<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // --- Local caches ---

    /// Replaces the local product list with the gateway's.
    #[instrument(skip(self))]
    pub async fn refresh_products(&self) -> Result<(), WithdrawalError> {
        match self.gateway.load_products().await {
            Ok(products) => {
                debug!(product_count = products.len(), "Products loaded");
                let mut session = self.session();
                session.products = products;
                session.products_stale = false;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Loading products failed");
                self.session().products_stale = true;
                Err(WithdrawalError::Gateway(e))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn refresh_categories(&self) -> Result<(), WithdrawalError> {
        let categories = self.gateway.load_categories().await.map_err(WithdrawalError::Gateway)?;
        debug!(category_count = categories.len(), "Categories loaded");
        self.session().categories = categories;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn refresh_withdrawals(&self) -> Result<(), WithdrawalError> {
        let withdrawals = self.gateway.load_withdrawals().await.map_err(WithdrawalError::Gateway)?;
        debug!(withdrawal_count = withdrawals.len(), "Withdrawals loaded");
        self.session().withdrawals = withdrawals;
        Ok(())
    }

    pub async fn refresh_all(&self) -> Result<(), WithdrawalError> {
        self.refresh_categories().await?;
        self.refresh_products().await?;
        self.refresh_withdrawals().await
    }

    pub fn products(&self) -> Vec<Product> {
        self.session().products.clone()
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.session().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.session().categories.clone()
    }

    /// Withdrawal history, newest first.
    pub fn withdrawals(&self) -> Vec<Withdrawal> {
        self.session().withdrawals.clone()
    }

    /// True after a product reload failed, until one succeeds.
    pub fn products_stale(&self) -> bool {
        self.session().products_stale
    }

    pub fn report(&self, top_limit: usize) -> InventoryReport {
        let session = self.session();
        InventoryReport::build(&session.products, &session.withdrawals, top_limit)
    }

    // --- Cart ---

    pub fn cart(&self) -> Cart {
        self.session().cart.clone()
    }

    pub fn cart_total_items(&self) -> u64 {
        self.session().cart.total_items()
    }

    /// Adds `quantity` units of a loaded product to the cart.
    #[instrument(skip(self))]
    pub fn add_to_cart(&self, product_id: ProductId, quantity: i64) -> Result<u32, WithdrawalError> {
        let mut session = self.session();
        let product = session
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(WithdrawalError::UnknownProduct(product_id))?;

        match session.cart.add_item(&product, quantity) {
            Ok(total) => {
                info!(product_name = %product.name, total, "Added to cart");
                Ok(total)
            }
            Err(e) => {
                warn!(product_name = %product.name, error = %e, "Cart add rejected");
                Err(e.into())
            }
        }
    }

    /// Sets the cart quantity for a product; zero or less removes the line.
    ///
    /// The check uses the loaded product's stock, falling back to the cart's
    /// snapshot when the product is no longer in the list.
    #[instrument(skip(self))]
    pub fn update_cart_quantity(&self, product_id: ProductId, quantity: i64) -> Result<Option<u32>, WithdrawalError> {
        let mut session = self.session();
        let live = session
            .products
            .iter()
            .find(|p| p.id == product_id)
            .or_else(|| session.cart.get(product_id).map(|item| &item.product))
            .cloned();

        let Some(product) = live else {
            return if quantity <= 0 {
                Ok(None)
            } else {
                Err(WithdrawalError::UnknownProduct(product_id))
            };
        };

        session.cart.update_quantity(&product, quantity).map_err(|e| {
            warn!(error = %e, "Cart update rejected");
            WithdrawalError::from(e)
        })
    }

    pub fn remove_from_cart(&self, product_id: ProductId) -> Option<CartItem> {
        self.session().cart.remove_item(product_id)
    }

    pub fn clear_cart(&self) {
        self.session().cart.clear();
    }

    // --- Confirmation ---

    pub fn state(&self) -> TransactionState {
        self.session().state
    }

    /// Terminal state of the most recent submitted attempt, if any.
    pub fn last_outcome(&self) -> Option<TransactionState> {
        self.session().last_outcome
    }

    /// Registers the cart as one withdrawal on behalf of `current_user`.
    ///
    /// Checks run in order and the first failure wins: no confirmation in
    /// flight, a signed-in user, a non-empty cart, a withdrawer name, a
    /// withdrawer section. None of these failures reaches the gateway.
    ///
    /// On success the withdrawal heads the history, the cart is emptied and
    /// products are reloaded. A failed reload does not undo the withdrawal;
    /// it leaves [`Self::products_stale`] set. On
    /// [`WithdrawalError::SubmissionFailed`] nothing local changes.
    #[instrument(
        skip(self, withdrawer_name, withdrawer_section, notes, current_user),
        fields(withdrawer_section = %withdrawer_section.trim())
    )]
    pub async fn confirm_withdrawal(
        &self,
        withdrawer_name: &str,
        withdrawer_section: &str,
        notes: Option<&str>,
        current_user: Option<&SessionUser>,
    ) -> Result<Withdrawal, WithdrawalError> {
        let (request, in_flight) = self.begin(withdrawer_name, withdrawer_section, notes, current_user)?;
        info!(
            lines = request.items.len(),
            total_items = request.total_items(),
            "Submitting withdrawal"
        );

        match self.gateway.create_withdrawal(request).await {
            Ok(withdrawal) => {
                {
                    let mut session = self.session();
                    session.withdrawals.insert(0, withdrawal.clone());
                    session.cart.clear();
                }
                // Settled before the reload, so dropping this future mid-reload
                // still reports the commit.
                in_flight.settle(TransactionState::Committed);
                info!(withdrawal_id = withdrawal.id, "Withdrawal committed");

                if let Err(e) = self.refresh_products().await {
                    warn!(error = %e, "Product reload after withdrawal failed, shown stock is stale");
                }
                Ok(withdrawal)
            }
            Err(e) => {
                error!(error = %e, "Withdrawal submission failed");
                in_flight.settle(TransactionState::Failed);
                Err(WithdrawalError::SubmissionFailed(e))
            }
        }
    }

    fn begin(
        &self,
        withdrawer_name: &str,
        withdrawer_section: &str,
        notes: Option<&str>,
        current_user: Option<&SessionUser>,
    ) -> Result<(WithdrawalRequest, InFlight<'_>), WithdrawalError> {
        let mut session = self.session();
        if session.state != TransactionState::Idle {
            warn!("Confirmation refused, another one is in flight");
            return Err(WithdrawalError::TransactionInProgress);
        }

        session.state = TransactionState::Validating;
        match build_request(&session.cart, withdrawer_name, withdrawer_section, notes, current_user) {
            Ok(request) => {
                session.state = TransactionState::Submitting;
                drop(session);
                Ok((request, InFlight::new(&self.session)))
            }
            Err(e) => {
                session.state = TransactionState::Idle;
                warn!(error = %e, "Withdrawal rejected");
                Err(e)
            }
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        lock(&self.session)
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    // Session updates are single assignments, so a poisoned lock still holds
    // consistent data.
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_request(
    cart: &Cart,
    withdrawer_name: &str,
    withdrawer_section: &str,
    notes: Option<&str>,
    current_user: Option<&SessionUser>,
) -> Result<WithdrawalRequest, WithdrawalError> {
    let user = current_user.ok_or(WithdrawalError::NotAuthenticated)?;
    if cart.is_empty() {
        return Err(WithdrawalError::EmptyCart);
    }
    let withdrawer_name = withdrawer_name.trim();
    if withdrawer_name.is_empty() {
        return Err(WithdrawalError::MissingWithdrawerName);
    }
    let withdrawer_section = withdrawer_section.trim();
    if withdrawer_section.is_empty() {
        return Err(WithdrawalError::MissingWithdrawerSection);
    }

    Ok(WithdrawalRequest {
        registering_user_id: user.id,
        registering_user_name: user.name.clone(),
        registering_user_section: user.section.clone(),
        withdrawer_name: withdrawer_name.to_string(),
        withdrawer_section: withdrawer_section.to_string(),
        notes: notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
        items: cart.to_withdrawal_items(),
    })
}

/// Marks a confirmation as in flight. Dropping it unsettled (the confirm
/// future was cancelled) returns the desk to `Idle`.
struct InFlight<'a> {
    session: &'a Mutex<Session>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(session: &'a Mutex<Session>) -> Self {
        Self { session, settled: false }
    }

    fn settle(mut self, outcome: TransactionState) {
        let mut session = lock(self.session);
        session.state = TransactionState::Idle;
        session.last_outcome = Some(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Confirmation dropped before it settled");
            lock(self.session).state = TransactionState::Idle;
        }
    }
}
