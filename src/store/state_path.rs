use super::app_state::{LocationRecord, UiFlag};
use super::error::StoreError;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum_macros::{Display as StrumDisplay, EnumString};

/// Segment that routes the rest of a path into the opaque engine tree.
pub const ENGINE_ROOT: &str = "stel";

/// The two location slots held by the store.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, StrumDisplay, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum LocationSlot {
    AutoDetectedLocation,
    CurrentLocation,
}

/// Fields of a [`LocationRecord`], addressable in either camel or snake case.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, StrumDisplay, EnumString)]
pub enum LocationField {
    #[strum(to_string = "short_name", serialize = "shortName")]
    ShortName,
    #[strum(to_string = "country")]
    Country,
    #[strum(to_string = "street_address", serialize = "streetAddress")]
    StreetAddress,
    #[strum(to_string = "lat")]
    Lat,
    #[strum(to_string = "lng")]
    Lng,
    #[strum(to_string = "alt")]
    Alt,
    #[strum(to_string = "accuracy")]
    Accuracy,
}

impl LocationField {
    pub fn read(self, loc: &LocationRecord) -> StateValue {
        match self {
            LocationField::ShortName => StateValue::Text(loc.short_name.clone()),
            LocationField::Country => StateValue::Text(loc.country.clone()),
            LocationField::StreetAddress => StateValue::Text(loc.street_address.clone()),
            LocationField::Lat => StateValue::Number(loc.lat),
            LocationField::Lng => StateValue::Number(loc.lng),
            LocationField::Alt => StateValue::Number(loc.alt),
            LocationField::Accuracy => StateValue::Number(loc.accuracy),
        }
    }

    /// Writes `value` into the matching field of `loc`.
    ///
    /// # Returns
    /// - `Err(StoreError::TypeMismatch)` if text is written to a numeric field or vice versa.
    pub fn assign(self, loc: &mut LocationRecord, value: StateValue) -> Result<(), StoreError> {
        match (self, value) {
            (LocationField::ShortName, StateValue::Text(t)) => loc.short_name = t,
            (LocationField::Country, StateValue::Text(t)) => loc.country = t,
            (LocationField::StreetAddress, StateValue::Text(t)) => loc.street_address = t,
            (LocationField::Lat, StateValue::Number(n)) => loc.lat = n,
            (LocationField::Lng, StateValue::Number(n)) => loc.lng = n,
            (LocationField::Alt, StateValue::Number(n)) => loc.alt = n,
            (LocationField::Accuracy, StateValue::Number(n)) => loc.accuracy = n,
            (field, _) => {
                return Err(StoreError::TypeMismatch {
                    path: field.to_string(),
                    expected: field.kind(),
                });
            }
        }
        Ok(())
    }

    fn kind(self) -> &'static str {
        match self {
            LocationField::ShortName | LocationField::Country | LocationField::StreetAddress => {
                "text"
            }
            _ => "number",
        }
    }
}

/// A field of the application state, resolved from a dotted path.
///
/// The set of addressable fields is closed; only the opaque engine tree and
/// module namespaces carry free-form tails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatePath {
    Flag(UiFlag),
    UseAutoLocation,
    AccelState,
    SelectedObject,
    /// A whole location record if the field is `None`, one of its fields otherwise.
    Location(LocationSlot, Option<LocationField>),
    /// Keys below the engine tree root; empty addresses the whole tree.
    Engine(Vec<String>),
    Module { name: String, field: String },
}

impl StatePath {
    /// Parses a dotted path such as `showFPS`, `currentLocation.lat`,
    /// `stel.core.lines_visible` or `<module>.<field>`.
    ///
    /// # Returns
    /// - `Err(StoreError::UnknownPath)` for empty segments or unknown root keys.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(StoreError::UnknownPath(path.to_string()));
        }
        let unknown = || StoreError::UnknownPath(path.to_string());
        match segments.as_slice() {
            ["useAutoLocation"] => Ok(StatePath::UseAutoLocation),
            ["accelState"] => Ok(StatePath::AccelState),
            ["selectedObject"] => Ok(StatePath::SelectedObject),
            [root, rest @ ..] if *root == ENGINE_ROOT => {
                Ok(StatePath::Engine(rest.iter().map(ToString::to_string).collect()))
            }
            [slot] if LocationSlot::from_str(slot).is_ok() => {
                Ok(StatePath::Location(LocationSlot::from_str(slot).map_err(|_| unknown())?, None))
            }
            [slot, field] if LocationSlot::from_str(slot).is_ok() => {
                let slot = LocationSlot::from_str(slot).map_err(|_| unknown())?;
                let field = LocationField::from_str(field).map_err(|_| unknown())?;
                Ok(StatePath::Location(slot, Some(field)))
            }
            [flag] => UiFlag::from_str(flag).map(StatePath::Flag).map_err(|_| unknown()),
            [name, rest @ ..] if LocationSlot::from_str(name).is_err() => {
                Ok(StatePath::Module { name: (*name).to_string(), field: rest.iter().join(".") })
            }
            _ => Err(unknown()),
        }
    }

    /// Root key this path lives under, used to keep module names from shadowing state fields.
    pub fn is_root_key(name: &str) -> bool {
        matches!(name, "useAutoLocation" | "accelState" | "selectedObject")
            || name == ENGINE_ROOT
            || LocationSlot::from_str(name).is_ok()
            || UiFlag::from_str(name).is_ok()
    }
}

impl FromStr for StatePath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl Display for StatePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatePath::Flag(flag) => write!(f, "{flag}"),
            StatePath::UseAutoLocation => write!(f, "useAutoLocation"),
            StatePath::AccelState => write!(f, "accelState"),
            StatePath::SelectedObject => write!(f, "selectedObject"),
            StatePath::Location(slot, None) => write!(f, "{slot}"),
            StatePath::Location(slot, Some(field)) => write!(f, "{slot}.{field}"),
            StatePath::Engine(keys) if keys.is_empty() => write!(f, "{ENGINE_ROOT}"),
            StatePath::Engine(keys) => write!(f, "{ENGINE_ROOT}.{}", keys.iter().join(".")),
            StatePath::Module { name, field } => write!(f, "{name}.{field}"),
        }
    }
}

/// A value read from or written to a [`StatePath`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Location(LocationRecord),
    Json(serde_json::Value),
}

impl StateValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Bool(_) => "bool",
            StateValue::Number(_) => "number",
            StateValue::Text(_) => "text",
            StateValue::Location(_) => "location",
            StateValue::Json(_) => "json",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            StateValue::Json(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Converts a value coming out of the engine tree into the closest typed variant.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => StateValue::Bool(*b),
            serde_json::Value::Number(n) => {
                n.as_f64().map_or_else(|| StateValue::Json(value.clone()), StateValue::Number)
            }
            serde_json::Value::String(s) => StateValue::Text(s.clone()),
            other => StateValue::Json(other.clone()),
        }
    }

    /// Converts the value for storage in the engine tree.
    ///
    /// Non-finite numbers have no JSON representation and become `null`.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            StateValue::Bool(b) => serde_json::Value::Bool(b),
            StateValue::Number(n) => {
                serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            StateValue::Text(t) => serde_json::Value::String(t),
            StateValue::Location(loc) => serde_json::to_value(loc).unwrap_or(serde_json::Value::Null),
            StateValue::Json(v) => v,
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self { StateValue::Bool(value) }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self { StateValue::Number(value) }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self { StateValue::Number(f64::from(value)) }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self { StateValue::Text(value.to_string()) }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self { StateValue::Text(value) }
}

impl From<LocationRecord> for StateValue {
    fn from(value: LocationRecord) -> Self { StateValue::Location(value) }
}

impl From<serde_json::Value> for StateValue {
    fn from(value: serde_json::Value) -> Self { StateValue::Json(value) }
}
