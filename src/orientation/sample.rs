use std::fmt::{Display, Formatter};

/// One reading from the device's rotation sensor.
///
/// Angles are device-frame Euler angles in degrees. Any of them may be missing
/// depending on the platform; `vendor_heading` is only delivered by platforms
/// that already fuse the magnetometer into a compass bearing (degrees clockwise
/// from north).
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct OrientationSample {
    pub absolute: bool,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    #[serde(rename = "webkitCompassHeading", alias = "vendorHeading")]
    pub vendor_heading: Option<f64>,
}

impl OrientationSample {
    /// Builds a sample from the three Euler angles, as delivered by generic platforms.
    pub fn from_euler(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            absolute: true,
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            vendor_heading: None,
        }
    }

    /// Builds a sample carrying a platform compass heading and the device tilt.
    pub fn from_vendor(heading: f64, beta: Option<f64>) -> Self {
        Self {
            absolute: true,
            alpha: None,
            beta,
            gamma: None,
            vendor_heading: Some(heading),
        }
    }
}

impl Display for OrientationSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |d| format!("{d:.2}"));
        write!(
            f,
            "[a: {}, b: {}, g: {}, vendor: {}, abs: {}]",
            fmt_opt(self.alpha),
            fmt_opt(self.beta),
            fmt_opt(self.gamma),
            fmt_opt(self.vendor_heading),
            self.absolute
        )
    }
}
