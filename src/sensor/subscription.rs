use super::source::{ListenerHandle, PermissionState, SensorSource};
use crate::context::{self, Action};
use crate::orientation::OrientationSample;
use crate::store::StateStore;
use crate::{error, event, info, log, warn};
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum SubscriptionState {
    Unsubscribed,
    PermissionPending,
    Subscribed,
}

/// The one listener registered while subscribed, plus the task forwarding its samples.
struct ActiveListener {
    handle: ListenerHandle,
    cancel: CancellationToken,
    forwarder: JoinHandle<()>,
}

/// Owns the orientation listener lifecycle and mirrors it into `accel_state`.
///
/// At most one listener is registered at any time, and the handle acquired on
/// subscription is the one removed on [`SensorSubscription::accel_off`].
pub struct SensorSubscription {
    source: Arc<dyn SensorSource>,
    store: Arc<RwLock<StateStore>>,
    state: SubscriptionState,
    listener: Option<ActiveListener>,
}

impl SensorSubscription {
    pub fn new(source: Arc<dyn SensorSource>, store: Arc<RwLock<StateStore>>) -> Self {
        Self { source, store, state: SubscriptionState::Unsubscribed, listener: None }
    }

    /// The lifecycle state; a listener whose source has closed it reads as unsubscribed.
    pub fn state(&self) -> SubscriptionState {
        match &self.listener {
            Some(active) if active.forwarder.is_finished() => SubscriptionState::Unsubscribed,
            _ => self.state,
        }
    }

    pub fn is_subscribed(&self) -> bool { self.state() == SubscriptionState::Subscribed }

    /// Acquires sensor access and starts forwarding samples to the store.
    ///
    /// Denial, rejection and missing sensors are logged and leave the
    /// subscription in [`SubscriptionState::Unsubscribed`]; nothing is
    /// surfaced to the caller. A rejected request is not retried.
    pub async fn request_permission(&mut self) {
        self.release_closed_listener().await;
        if self.listener.is_some() {
            log!("Orientation listener already active, ignoring permission request");
            return;
        }
        if self.source.requires_permission() {
            self.state = SubscriptionState::PermissionPending;
            match self.source.request_permission().await {
                Ok(PermissionState::Granted) => info!("Orientation permission granted"),
                Ok(other) => {
                    warn!("Orientation permission not granted: {other}");
                    self.state = SubscriptionState::Unsubscribed;
                    return;
                }
                Err(e) => {
                    error!("Orientation permission request failed: {e}");
                    self.state = SubscriptionState::Unsubscribed;
                    return;
                }
            }
        }
        self.subscribe().await;
    }

    async fn subscribe(&mut self) {
        let (tx, rx) = unbounded_channel();
        let handle = match self.source.add_listener(tx).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Could not register orientation listener: {e}");
                self.state = SubscriptionState::Unsubscribed;
                self.store.write().await.set_accel_state(false);
                return;
            }
        };
        self.store.write().await.set_accel_state(true);
        let cancel = CancellationToken::new();
        let forwarder = tokio::spawn(Self::forward(rx, cancel.clone(), Arc::clone(&self.store)));
        self.listener = Some(ActiveListener { handle, cancel, forwarder });
        self.state = SubscriptionState::Subscribed;
        info!("Orientation tracking on");
    }

    /// Drops the registration of a listener whose forwarder already ended
    /// because the source closed it.
    async fn release_closed_listener(&mut self) {
        let Some(active) = self.listener.take_if(|active| active.forwarder.is_finished()) else {
            return;
        };
        let id = active.handle.id();
        if !self.source.remove_listener(active.handle).await {
            event!("Closed orientation listener {id} was already gone at the source");
        }
        if let Err(e) = active.forwarder.await {
            error!("Orientation forwarder ended abnormally: {e}");
        }
        self.state = SubscriptionState::Unsubscribed;
        log!("Released closed orientation listener {id}");
    }

    /// Stops orientation tracking.
    ///
    /// Idempotent: without an active listener only `accel_state` is reset.
    pub async fn accel_off(&mut self) {
        if let Some(active) = self.listener.take() {
            active.cancel.cancel();
            let id = active.handle.id();
            if !self.source.remove_listener(active.handle).await {
                warn!("Orientation listener {id} was already gone at the source");
            }
            if let Err(e) = active.forwarder.await {
                error!("Orientation forwarder ended abnormally: {e}");
            }
            info!("Orientation tracking off");
        } else {
            event!("Orientation tracking already off");
        }
        self.state = SubscriptionState::Unsubscribed;
        self.store.write().await.set_accel_state(false);
    }

    /// Dispatches every received sample, unmodified, as
    /// [`Action::HandleOrientation`] until cancelled. If the source drops the
    /// listener instead, `accel_state` is cleared.
    async fn forward(
        mut rx: UnboundedReceiver<OrientationSample>,
        cancel: CancellationToken,
        store: Arc<RwLock<StateStore>>,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                sample = rx.recv() => {
                    let Some(sample) = sample else {
                        warn!("Orientation source closed the listener");
                        store.write().await.set_accel_state(false);
                        break;
                    };
                    context::dispatch_to_store(&store, Action::HandleOrientation(sample)).await;
                }
            }
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        if let Some(active) = &self.listener {
            active.cancel.cancel();
        }
    }
}
