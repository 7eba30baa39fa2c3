use crate::orientation::OrientationSample;
use async_trait::async_trait;
use strum_macros::Display;
use tokio::sync::mpsc::UnboundedSender;

/// Outcome of an explicit permission request, as reported by the platform.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
}

#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum SensorError {
    /// The asynchronous permission request was rejected outright.
    PermissionRejected,
    /// The device has no orientation sensor.
    Unsupported,
}

impl std::error::Error for SensorError {}

/// Registration token for one listener.
///
/// Removing a listener consumes its handle.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn new(id: u64) -> Self { Self(id) }

    pub fn id(&self) -> u64 { self.0 }
}

/// Platform source of device orientation samples.
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Whether listeners may only be registered after an explicit grant.
    fn requires_permission(&self) -> bool;

    /// Asks the platform for access to the orientation sensor.
    async fn request_permission(&self) -> Result<PermissionState, SensorError>;

    /// Registers a sink receiving every subsequent sample.
    async fn add_listener(
        &self,
        sink: UnboundedSender<OrientationSample>,
    ) -> Result<ListenerHandle, SensorError>;

    /// Unregisters a listener.
    ///
    /// # Returns
    /// - `false` if the source did not know the handle.
    async fn remove_listener(&self, handle: ListenerHandle) -> bool;
}
