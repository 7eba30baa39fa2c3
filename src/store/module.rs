use super::error::StoreError;
use super::state_path::StateValue;
use std::collections::BTreeMap;

/// State bundle contributed by an extension and merged into the store's namespace.
///
/// The store never interprets module contents; it only routes
/// `<module>.<field>` paths to the owning module.
pub trait StoreModule: Send + Sync {
    /// Reads a field, `None` if the module has no such field.
    fn read(&self, field: &str) -> Option<StateValue>;
    /// Writes a field.
    ///
    /// # Returns
    /// - An error if the module rejects the field or the value.
    fn write(&mut self, field: &str, value: StateValue) -> Result<(), StoreError>;
    /// Lists the fields currently held, for snapshots and logging.
    fn fields(&self) -> Vec<String>;
}

/// Plain key/value module state, enough for extensions that only hold UI settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleState {
    values: BTreeMap<String, StateValue>,
}

impl ModuleState {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with(mut self, field: &str, value: StateValue) -> Self {
        self.values.insert(field.to_string(), value);
        self
    }
}

impl StoreModule for ModuleState {
    fn read(&self, field: &str) -> Option<StateValue> { self.values.get(field).cloned() }

    fn write(&mut self, field: &str, value: StateValue) -> Result<(), StoreError> {
        if let Some(existing) = self.values.get(field) {
            if existing.kind() != value.kind() {
                return Err(StoreError::TypeMismatch {
                    path: field.to_string(),
                    expected: existing.kind(),
                });
            }
        }
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn fields(&self) -> Vec<String> { self.values.keys().cloned().collect() }
}
