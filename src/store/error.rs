use std::fmt::{Display, Formatter};

/// Failures of path-based access and store construction.
///
/// None of these are raised for control flow; every mutation either applies
/// completely or returns one of these without touching the state.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum StoreError {
    UnknownPath(String),
    TypeMismatch { path: String, expected: &'static str },
    ReadOnly(String),
    DuplicateModule(String),
    NotAContainer(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UnknownPath(path) => write!(f, "unknown state path '{path}'"),
            StoreError::TypeMismatch { path, expected } => {
                write!(f, "'{path}' expects a {expected} value")
            }
            StoreError::ReadOnly(path) => write!(f, "'{path}' is read-only"),
            StoreError::DuplicateModule(name) => write!(f, "module name '{name}' is already taken"),
            StoreError::NotAContainer(path) => write!(f, "'{path}' is not an object"),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Re-targets a field-level error to the full path it was raised for.
    pub(super) fn at(self, full_path: &str) -> Self {
        match self {
            StoreError::TypeMismatch { expected, .. } => {
                StoreError::TypeMismatch { path: full_path.to_string(), expected }
            }
            other => other,
        }
    }
}
