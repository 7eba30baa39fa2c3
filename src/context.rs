use crate::orientation::OrientationSample;
use crate::sensor::{SensorSource, SensorSubscription, SubscriptionState};
use crate::store::{Mutation, StateStore, StoreError};
use crate::{event, warn};
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::{Mutex, RwLock};

/// Asynchronous operations UI code and the sensor bridge dispatch.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    RequestPermission,
    AccelOff,
    HandleOrientation(OrientationSample),
}

/// Struct bundling the state store with the sensor subscription feeding it,
/// handed to every subsystem that reads state or dispatches actions.
pub struct AppContext {
    /// The store, shared with the sensor forwarding task.
    store: Arc<RwLock<StateStore>>,
    /// The orientation listener lifecycle.
    subscription: Mutex<SensorSubscription>,
}

impl AppContext {
    /// Creates a new context around an already composed store.
    ///
    /// # Arguments
    /// - `store`: The application's state store.
    /// - `source`: The platform orientation source.
    pub fn new(store: StateStore, source: Arc<dyn SensorSource>) -> Self {
        let store = Arc::new(RwLock::new(store));
        let subscription = Mutex::new(SensorSubscription::new(source, Arc::clone(&store)));
        Self { store, subscription }
    }

    /// Provides a cloned reference to the state store.
    pub fn store(&self) -> Arc<RwLock<StateStore>> { Arc::clone(&self.store) }

    pub async fn subscription_state(&self) -> SubscriptionState {
        self.subscription.lock().await.state()
    }

    /// Runs an action to completion.
    pub async fn dispatch(&self, action: Action) {
        match action {
            Action::RequestPermission => {
                event!("Dispatch {action}");
                self.subscription.lock().await.request_permission().await;
            }
            Action::AccelOff => {
                event!("Dispatch {action}");
                self.subscription.lock().await.accel_off().await;
            }
            Action::HandleOrientation(_) => dispatch_to_store(&self.store, action).await,
        }
    }

    /// Applies a mutation to the store.
    pub async fn commit(&self, mutation: Mutation) -> Result<(), StoreError> {
        self.store.write().await.commit(mutation)
    }
}

/// Runs an action that only touches the store. The sensor forwarder feeds its
/// samples through here without holding the context.
pub(crate) async fn dispatch_to_store(store: &RwLock<StateStore>, action: Action) {
    event!("Dispatch {action}");
    match action {
        Action::HandleOrientation(sample) => {
            store.read().await.handle_orientation(&sample);
        }
        other => warn!("Action {other} needs the sensor subscription, ignoring it"),
    }
}
