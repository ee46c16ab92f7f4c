use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any record type must implement to be stored by a [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type UpdateParams: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    /// Rejection raised by the lifecycle hooks and action handler.
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the assigned id and creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, update: Self::UpdateParams) -> Result<(), Self::Error>;

    /// Rejects `self` when it clashes with an already stored record, e.g. on a
    /// unique name. Runs inside the actor, so checks never race each other.
    fn check_unique(&self, _stored: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a record-specific action.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Transport-level failures between a client and its actor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("actor closed")]
    ActorClosed,
    #[error("actor dropped the response channel")]
    ActorDropped,
    #[error("item not found: {0}")]
    NotFound(String),
}

/// Either a transport failure or a rejection raised by the entity itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error(transparent)]
    Entity(E),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type ResourceResult<T, E> = Result<T, ResourceError<E>>;
pub type Response<T, E> = oneshot::Sender<ResourceResult<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        update: T::UpdateParams,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns a collection of records and serves requests one at a time.
///
/// Records are kept ordered by id so `List` answers in creation order.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update { id, update, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, update));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }
        debug!("Resource actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> ResourceResult<T::Id, T::Error> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(ResourceError::Entity)?;
        item.on_create().map_err(ResourceError::Entity)?;
        for stored in self.store.values() {
            item.check_unique(stored).map_err(ResourceError::Entity)?;
        }
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    fn handle_update(&mut self, id: T::Id, update: T::UpdateParams) -> ResourceResult<T, T::Error> {
        // Apply to a copy so a rejected update leaves the stored record untouched.
        let mut candidate = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        candidate.on_update(update).map_err(ResourceError::Entity)?;
        for (stored_id, stored) in &self.store {
            if *stored_id != id {
                candidate.check_unique(stored).map_err(ResourceError::Entity)?;
            }
        }
        self.store.insert(id, candidate.clone());
        Ok(candidate)
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> ResourceResult<T::ActionResult, T::Error> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.handle_action(action).map_err(|e| {
            warn!(id = %id, error = %e, "Action rejected");
            ResourceError::Entity(e)
        })
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> ResourceResult<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> ResourceResult<T::Id, T::Error> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> ResourceResult<Option<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> ResourceResult<Vec<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, update: T::UpdateParams) -> ResourceResult<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Update { id, update, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> ResourceResult<T::ActionResult, T::Error> {
        self.call(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Record Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u64,
        label: String,
        value: u32,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum CounterError {
        #[error("label must not be blank")]
        BlankLabel,
        #[error("counter would overflow")]
        Overflow,
        #[error("label already used: {0}")]
        DuplicateLabel(String),
    }

    #[derive(Debug)]
    enum CounterAction {
        Bump(u32),
    }

    impl Entity for Counter {
        type Id = u64;
        type CreateParams = String;
        type UpdateParams = String;
        type Action = CounterAction;
        type ActionResult = u32;
        type Error = CounterError;

        fn id(&self) -> &u64 {
            &self.id
        }

        fn from_create_params(id: u64, label: String) -> Result<Self, CounterError> {
            if label.trim().is_empty() {
                return Err(CounterError::BlankLabel);
            }
            Ok(Self { id, label, value: 0 })
        }

        fn on_update(&mut self, label: String) -> Result<(), CounterError> {
            if label.trim().is_empty() {
                return Err(CounterError::BlankLabel);
            }
            self.label = label;
            Ok(())
        }

        fn check_unique(&self, stored: &Self) -> Result<(), CounterError> {
            if self.label == stored.label {
                return Err(CounterError::DuplicateLabel(self.label.clone()));
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, CounterError> {
            match action {
                CounterAction::Bump(by) => {
                    self.value = self.value.checked_add(by).ok_or(CounterError::Overflow)?;
                    Ok(self.value)
                }
            }
        }
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_create_list_and_action() {
        let client = spawn_counters();

        let first = client.create("a".into()).await.unwrap();
        let second = client.create("b".into()).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let value = client.perform_action(first, CounterAction::Bump(3)).await.unwrap();
        assert_eq!(value, 3);

        let listed = client.list().await.unwrap();
        let labels: Vec<_> = listed.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(listed[0].value, 3);
    }

    #[tokio::test]
    async fn test_rejected_create_is_not_stored() {
        let client = spawn_counters();

        let result = client.create("   ".into()).await;
        assert_eq!(result, Err(ResourceError::Entity(CounterError::BlankLabel)));
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_record() {
        let client = spawn_counters();
        let id = client.create("kept".into()).await.unwrap();

        let result = client.update(id, "".into()).await;
        assert!(matches!(result, Err(ResourceError::Entity(CounterError::BlankLabel))));

        let stored = client.get(id).await.unwrap().unwrap();
        assert_eq!(stored.label, "kept");
    }

    #[tokio::test]
    async fn test_duplicate_label_is_rejected_on_create_and_update() {
        let client = spawn_counters();
        let first = client.create("a".into()).await.unwrap();
        let second = client.create("b".into()).await.unwrap();

        let created = client.create("a".into()).await;
        assert_eq!(created, Err(ResourceError::Entity(CounterError::DuplicateLabel("a".into()))));

        let updated = client.update(second, "a".into()).await;
        assert_eq!(updated, Err(ResourceError::Entity(CounterError::DuplicateLabel("a".into()))));

        // Keeping its own label is not a clash.
        assert!(client.update(first, "a".into()).await.is_ok());
        assert_eq!(client.list().await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_store_one_label() {
        let client = spawn_counters();

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.create("same".into()).await })
            })
            .collect();
        let mut accepted = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_item_reports_not_found() {
        let client = spawn_counters();

        let result = client.perform_action(42, CounterAction::Bump(1)).await;
        assert_eq!(
            result,
            Err(ResourceError::Framework(FrameworkError::NotFound("42".into())))
        );
    }

    #[tokio::test]
    async fn test_closed_actor_reports_actor_closed() {
        let (actor, client) = ResourceActor::<Counter>::new(1, || 1);
        drop(actor);

        let result = client.list().await;
        assert_eq!(result, Err(ResourceError::Framework(FrameworkError::ActorClosed)));
    }
}
