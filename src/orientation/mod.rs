//! Turns raw device-orientation samples into a viewing direction and writes it
//! into the rendering engine's observer.

mod heading;
mod observer;
mod sample;
#[cfg(test)]
mod tests;

pub use heading::{HeadingCalculator, ViewDirection};
pub use observer::{ObserverHandle, ObserverOrientationUpdater, SharedObserver};
pub use sample::OrientationSample;
