use super::source::{ListenerHandle, PermissionState, SensorError, SensorSource};
use crate::orientation::OrientationSample;
use crate::{event, log};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use strum_macros::{Display, EnumString};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// How a [`ScriptedSensor`] answers permission requests.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PermissionPolicy {
    /// No explicit grant needed, listeners register right away.
    NotRequired,
    Granted,
    Denied,
    /// The request itself fails instead of resolving.
    Rejected,
    /// The device has no orientation sensor at all.
    Unsupported,
}

/// In-process orientation source fed by [`ScriptedSensor::emit`].
pub struct ScriptedSensor {
    policy: PermissionPolicy,
    listeners: Mutex<HashMap<u64, UnboundedSender<OrientationSample>>>,
    next_id: AtomicU64,
    permission_requests: AtomicUsize,
}

impl ScriptedSensor {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self {
            policy,
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            permission_requests: AtomicUsize::new(0),
        }
    }

    /// Delivers a sample to every registered listener, dropping closed ones.
    ///
    /// # Returns
    /// - The number of listeners that received the sample.
    pub async fn emit(&self, sample: OrientationSample) -> usize {
        let mut listeners = self.listeners.lock().await;
        listeners.retain(|id, sink| {
            let alive = sink.send(sample).is_ok();
            if !alive {
                event!("Dropping closed listener {id}");
            }
            alive
        });
        listeners.len()
    }

    pub async fn listener_count(&self) -> usize { self.listeners.lock().await.len() }

    pub fn permission_requests(&self) -> usize { self.permission_requests.load(Ordering::Relaxed) }
}

#[async_trait]
impl SensorSource for ScriptedSensor {
    fn requires_permission(&self) -> bool {
        matches!(
            self.policy,
            PermissionPolicy::Granted | PermissionPolicy::Denied | PermissionPolicy::Rejected
        )
    }

    async fn request_permission(&self) -> Result<PermissionState, SensorError> {
        self.permission_requests.fetch_add(1, Ordering::Relaxed);
        match self.policy {
            PermissionPolicy::Granted | PermissionPolicy::NotRequired => Ok(PermissionState::Granted),
            PermissionPolicy::Denied => Ok(PermissionState::Denied),
            PermissionPolicy::Rejected => Err(SensorError::PermissionRejected),
            PermissionPolicy::Unsupported => Err(SensorError::Unsupported),
        }
    }

    async fn add_listener(
        &self,
        sink: UnboundedSender<OrientationSample>,
    ) -> Result<ListenerHandle, SensorError> {
        if self.policy == PermissionPolicy::Unsupported {
            return Err(SensorError::Unsupported);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().await.insert(id, sink);
        log!("Orientation listener {id} registered");
        Ok(ListenerHandle::new(id))
    }

    async fn remove_listener(&self, handle: ListenerHandle) -> bool {
        let removed = self.listeners.lock().await.remove(&handle.id()).is_some();
        if removed {
            log!("Orientation listener {} removed", handle.id());
        }
        removed
    }
}
