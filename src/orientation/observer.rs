use super::heading::ViewDirection;
use std::sync::atomic::{AtomicU64, Ordering};

/// Viewpoint of the rendering engine, owned by the engine and lent to the core.
///
/// The core only ever writes the two scalar fields; it never replaces the
/// observer object itself.
pub trait ObserverHandle: Send + Sync {
    fn set_yaw(&self, yaw: f64);
    fn set_pitch(&self, pitch: f64);
    fn yaw(&self) -> f64;
    fn pitch(&self) -> f64;
}

/// Observer with lock-free yaw/pitch storage, shareable between the engine and the store.
#[derive(Debug, Default)]
pub struct SharedObserver {
    yaw_bits: AtomicU64,
    pitch_bits: AtomicU64,
}

impl SharedObserver {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw_bits: AtomicU64::new(yaw.to_bits()), pitch_bits: AtomicU64::new(pitch.to_bits()) }
    }

    /// Returns both fields as a [`ViewDirection`].
    pub fn direction(&self) -> ViewDirection { ViewDirection { yaw: self.yaw(), pitch: self.pitch() } }
}

impl ObserverHandle for SharedObserver {
    fn set_yaw(&self, yaw: f64) { self.yaw_bits.store(yaw.to_bits(), Ordering::Release); }

    fn set_pitch(&self, pitch: f64) { self.pitch_bits.store(pitch.to_bits(), Ordering::Release); }

    fn yaw(&self) -> f64 { f64::from_bits(self.yaw_bits.load(Ordering::Acquire)) }

    fn pitch(&self) -> f64 { f64::from_bits(self.pitch_bits.load(Ordering::Acquire)) }
}

/// Writes a computed heading and pitch into an observer.
pub struct ObserverOrientationUpdater;

impl ObserverOrientationUpdater {
    /// Applies heading and pitch to the observer's yaw and pitch fields.
    ///
    /// # Arguments
    /// - `observer`: The engine's observer, borrowed for the write.
    /// - `heading`: Compass heading in radians, stored as yaw.
    /// - `pitch`: Tilt relative to the horizon in radians.
    pub fn apply(observer: &dyn ObserverHandle, heading: f64, pitch: f64) {
        observer.set_yaw(heading);
        observer.set_pitch(pitch);
    }

    pub fn apply_direction(observer: &dyn ObserverHandle, direction: ViewDirection) {
        Self::apply(observer, direction.yaw, direction.pitch);
    }
}
