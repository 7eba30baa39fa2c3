use super::sample::OrientationSample;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::{Display, Formatter};

/// Viewing direction derived from one orientation sample, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDirection {
    /// Compass heading, used directly as the observer's yaw.
    pub yaw: f64,
    /// Tilt relative to the horizon.
    pub pitch: f64,
}

impl Display for ViewDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[yaw: {:.2}°, pitch: {:.2}°]", self.yaw.to_degrees(), self.pitch.to_degrees())
    }
}

/// Stateless sensor fusion from device Euler angles to a compass heading.
///
/// Two mutually exclusive paths exist: platforms that deliver their own compass
/// bearing (`vendor_heading`) are taken at their word, all others go through
/// the rotation-matrix projection in [`HeadingCalculator::euler_heading`].
pub struct HeadingCalculator;

impl HeadingCalculator {
    /// Computes the compass heading for a sample.
    ///
    /// # Arguments
    /// - `sample`: The raw orientation reading.
    ///
    /// # Returns
    /// - The heading in radians. Samples without any usable angle yield `0.0`.
    pub fn compute_heading(sample: &OrientationSample) -> f64 {
        match sample.vendor_heading {
            Some(vendor) => vendor.to_radians(),
            None if sample.alpha.is_some() => Self::euler_heading(sample),
            None => 0.0,
        }
    }

    /// Computes the viewing pitch, identical for both heading paths.
    ///
    /// # Returns
    /// - `beta - π/2` in radians, or `0.0` when `beta` is missing.
    pub fn compute_pitch(sample: &OrientationSample) -> f64 {
        sample.beta.map_or(0.0, |beta| beta.to_radians() - FRAC_PI_2)
    }

    /// Resolves a full viewing direction for a sample.
    ///
    /// # Returns
    /// - `None` when the sample carries neither a vendor heading nor `alpha`; the
    ///   observer must then keep its previous orientation.
    pub fn solve(sample: &OrientationSample) -> Option<ViewDirection> {
        if sample.vendor_heading.is_none() && sample.alpha.is_none() {
            return None;
        }
        Some(ViewDirection { yaw: Self::compute_heading(sample), pitch: Self::compute_pitch(sample) })
    }

    /// Projects the device's back-facing axis onto the horizontal plane and
    /// derives the heading from the resulting `(Vx, Vy)` components.
    ///
    /// Uses the single-argument arctangent followed by a two-branch quadrant
    /// correction. For `Vx >= 0 && Vy >= 0` the raw `atan` result is returned.
    /// A `0/0` projection (device lying flat) is coalesced to `0.0`.
    fn euler_heading(sample: &OrientationSample) -> f64 {
        let (v_x, v_y) = Self::projection(sample);

        let mut heading = (v_x / v_y).atan();
        if v_y < 0.0 {
            heading += PI;
        } else if v_x < 0.0 {
            heading += TAU;
        }

        if heading.is_finite() { heading } else { 0.0 }
    }

    /// Exposes the horizontal projection components, mainly for diagnostics.
    ///
    /// # Returns
    /// - `(Vx, Vy)` for the sample's Euler angles, missing angles taken as `0`.
    #[allow(clippy::similar_names)]
    pub fn projection(sample: &OrientationSample) -> (f64, f64) {
        let x = sample.beta.unwrap_or(0.0).to_radians();
        let y = sample.gamma.unwrap_or(0.0).to_radians();
        let z = sample.alpha.unwrap_or(0.0).to_radians();
        let (s_x, _) = x.sin_cos();
        let (s_y, c_y) = y.sin_cos();
        let (s_z, c_z) = z.sin_cos();
        (-c_z * s_y - s_z * s_x * c_y, -s_z * s_y + c_z * s_x * c_y)
    }
}
