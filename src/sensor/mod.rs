//! Orientation sensor access: the platform source abstraction, the
//! permission/listener lifecycle and a scriptable in-process source.

mod scripted;
mod source;
mod subscription;
#[cfg(test)]
mod tests;

pub use scripted::{PermissionPolicy, ScriptedSensor};
pub use source::SensorSource;
pub use subscription::{SensorSubscription, SubscriptionState};
