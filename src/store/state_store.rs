use super::app_state::{ApplicationState, LocationRecord};
use super::error::StoreError;
use super::module::StoreModule;
use super::mutation::Mutation;
use super::state_path::{LocationSlot, StatePath, StateValue};
use crate::orientation::{
    HeadingCalculator, ObserverHandle, ObserverOrientationUpdater, OrientationSample, ViewDirection,
};
use crate::{event, info, log};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Central holder of the application state.
///
/// All mutations are synchronous and run to completion; the location
/// mutations keep two invariants between them:
/// - while `use_auto_location` is set, `current_location` equals the last
///   auto-detected location,
/// - writing `current_location` directly switches to manual mode.
pub struct StateStore {
    state: ApplicationState,
    modules: BTreeMap<String, Box<dyn StoreModule>>,
    observer: Arc<dyn ObserverHandle>,
}

impl StateStore {
    /// Creates a store with default state and merges the supplied extension modules.
    ///
    /// # Arguments
    /// - `observer`: The rendering engine's observer, written on every orientation update.
    /// - `modules`: `(name, module)` pairs; names become path prefixes.
    ///
    /// # Returns
    /// - `Err(StoreError::DuplicateModule)` if a name repeats or shadows a state field.
    pub fn new(
        observer: Arc<dyn ObserverHandle>,
        modules: Vec<(String, Box<dyn StoreModule>)>,
    ) -> Result<Self, StoreError> {
        let mut registered = BTreeMap::new();
        for (name, module) in modules {
            if StatePath::is_root_key(&name) || registered.contains_key(&name) {
                return Err(StoreError::DuplicateModule(name));
            }
            log!("Register store module for extension: {name}");
            registered.insert(name, module);
        }
        if !registered.is_empty() {
            info!("Store composed with modules: {}", registered.keys().join(", "));
        }
        Ok(Self { state: ApplicationState::default(), modules: registered, observer })
    }

    pub fn state(&self) -> &ApplicationState { &self.state }

    pub fn module(&self, name: &str) -> Option<&dyn StoreModule> {
        self.modules.get(name).map(|m| m.as_ref())
    }

    /// Applies a named mutation.
    pub fn commit(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        event!("Commit {mutation}");
        match mutation {
            Mutation::ReplaceEngineState(tree) => self.replace_engine_state(tree),
            Mutation::ToggleBool(path) => {
                self.toggle_bool(&StatePath::parse(&path)?)?;
            }
            Mutation::SetValue { path, value } => self.set_value(&StatePath::parse(&path)?, value)?,
            Mutation::SetAutoDetectedLocation(loc) => self.set_auto_detected_location(&loc),
            Mutation::SetUseAutoLocation(flag) => self.set_use_auto_location(flag),
            Mutation::SetCurrentLocation(loc) => self.set_current_location(&loc),
            Mutation::SetSelectedObject(obj) => self.set_selected_object(obj),
        }
        Ok(())
    }

    /// Replaces the opaque engine state tree without looking at it.
    pub fn replace_engine_state(&mut self, tree: serde_json::Value) { self.state.stel = tree; }

    /// Stores a copy of `loc` as the auto-detected location, mirrored into the
    /// current location while auto mode is on.
    pub fn set_auto_detected_location(&mut self, loc: &LocationRecord) {
        self.state.auto_detected_location = loc.clone();
        if self.state.use_auto_location {
            self.state.current_location = loc.clone();
        }
    }

    /// Switches between auto-detected and manual location.
    ///
    /// Turning auto mode on immediately copies the last auto-detected location
    /// into the current location.
    pub fn set_use_auto_location(&mut self, flag: bool) {
        self.state.use_auto_location = flag;
        if flag {
            self.state.current_location = self.state.auto_detected_location.clone();
        }
    }

    /// Sets a user-chosen location, always leaving auto mode.
    pub fn set_current_location(&mut self, loc: &LocationRecord) {
        self.state.use_auto_location = false;
        self.state.current_location = loc.clone();
    }

    pub fn set_selected_object(&mut self, obj: Option<serde_json::Value>) {
        self.state.selected_object = obj;
    }

    pub(crate) fn set_accel_state(&mut self, on: bool) { self.state.accel_state = on; }

    /// Computes the viewing direction for a sample and writes it into the observer.
    ///
    /// # Returns
    /// - The applied direction, or `None` if the sample carried no heading source
    ///   and the observer was left untouched.
    pub fn handle_orientation(&self, sample: &OrientationSample) -> Option<ViewDirection> {
        let direction = HeadingCalculator::solve(sample)?;
        ObserverOrientationUpdater::apply_direction(self.observer.as_ref(), direction);
        event!("Orientation {sample} -> {direction}");
        Some(direction)
    }

    /// Reads the value at `path`.
    pub fn value(&self, path: &StatePath) -> Result<StateValue, StoreError> {
        match path {
            StatePath::Flag(flag) => Ok(StateValue::Bool(flag.get(&self.state.flags))),
            StatePath::UseAutoLocation => Ok(StateValue::Bool(self.state.use_auto_location)),
            StatePath::AccelState => Ok(StateValue::Bool(self.state.accel_state)),
            StatePath::SelectedObject => Ok(StateValue::Json(
                self.state.selected_object.clone().unwrap_or(serde_json::Value::Null),
            )),
            StatePath::Location(slot, field) => {
                let loc = self.location(*slot);
                Ok(field.map_or_else(|| StateValue::Location(loc.clone()), |f| f.read(loc)))
            }
            StatePath::Engine(keys) => {
                let mut node = &self.state.stel;
                for key in keys {
                    node = node
                        .get(key.as_str())
                        .ok_or_else(|| StoreError::UnknownPath(path.to_string()))?;
                }
                Ok(StateValue::from_json(node))
            }
            StatePath::Module { name, field } => self
                .modules
                .get(name)
                .and_then(|m| m.read(field))
                .ok_or_else(|| StoreError::UnknownPath(path.to_string())),
        }
    }

    /// Overwrites the value at `path`.
    ///
    /// Location paths go through the location mutations so both location
    /// invariants hold; `accelState` belongs to the sensor subscription and is
    /// read-only here.
    pub fn set_value(&mut self, path: &StatePath, value: StateValue) -> Result<(), StoreError> {
        let mismatch = |expected| StoreError::TypeMismatch { path: path.to_string(), expected };
        match path {
            StatePath::Flag(flag) => {
                *flag.get_mut(&mut self.state.flags) = value.as_bool().ok_or_else(|| mismatch("bool"))?;
            }
            StatePath::UseAutoLocation => {
                self.set_use_auto_location(value.as_bool().ok_or_else(|| mismatch("bool"))?);
            }
            StatePath::AccelState => return Err(StoreError::ReadOnly(path.to_string())),
            StatePath::SelectedObject => {
                self.set_selected_object(match value.into_json() {
                    serde_json::Value::Null => None,
                    obj => Some(obj),
                });
            }
            StatePath::Location(slot, field) => {
                let loc = match (field, value) {
                    (None, StateValue::Location(loc)) => loc,
                    (None, _) => return Err(mismatch("location")),
                    (Some(field), value) => {
                        let mut loc = self.location(*slot).clone();
                        field.assign(&mut loc, value).map_err(|e| e.at(&path.to_string()))?;
                        loc
                    }
                };
                match slot {
                    LocationSlot::AutoDetectedLocation => self.set_auto_detected_location(&loc),
                    LocationSlot::CurrentLocation => self.set_current_location(&loc),
                }
            }
            StatePath::Engine(keys) => self.write_engine(path, keys, value.into_json())?,
            StatePath::Module { name, field } => {
                let module =
                    self.modules.get_mut(name).ok_or_else(|| StoreError::UnknownPath(path.to_string()))?;
                module.write(field, value).map_err(|e| e.at(&path.to_string()))?;
            }
        }
        Ok(())
    }

    /// Flips the boolean at `path`.
    ///
    /// An absent engine-tree or module field is treated as `false` and becomes `true`.
    ///
    /// # Returns
    /// - The new value of the field.
    pub fn toggle_bool(&mut self, path: &StatePath) -> Result<bool, StoreError> {
        let current = match self.value(path) {
            Ok(value) => value.as_bool().ok_or_else(|| StoreError::TypeMismatch {
                path: path.to_string(),
                expected: "bool",
            })?,
            Err(StoreError::UnknownPath(_))
                if matches!(path, StatePath::Engine(_))
                    || matches!(path, StatePath::Module { name, .. } if self.modules.contains_key(name)) =>
            {
                false
            }
            Err(e) => return Err(e),
        };
        self.set_value(path, StateValue::Bool(!current))?;
        Ok(!current)
    }

    fn location(&self, slot: LocationSlot) -> &LocationRecord {
        match slot {
            LocationSlot::AutoDetectedLocation => &self.state.auto_detected_location,
            LocationSlot::CurrentLocation => &self.state.current_location,
        }
    }

    /// Writes into the engine tree, creating intermediate objects on the way.
    fn write_engine(
        &mut self,
        path: &StatePath,
        keys: &[String],
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let Some((last, parents)) = keys.split_last() else {
            self.replace_engine_state(value);
            return Ok(());
        };
        if self.state.stel.is_null() {
            self.state.stel = serde_json::Value::Object(serde_json::Map::new());
        }
        let mut node = &mut self.state.stel;
        for key in parents {
            let serde_json::Value::Object(map) = node else {
                return Err(StoreError::NotAContainer(path.to_string()));
            };
            node = map
                .entry(key.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        }
        let serde_json::Value::Object(map) = node else {
            return Err(StoreError::NotAContainer(path.to_string()));
        };
        map.insert(last.clone(), value);
        Ok(())
    }
}
