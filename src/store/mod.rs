//! The central application state store: typed state, generic path-based
//! access, the location invariants and extension module composition.

mod app_state;
mod error;
mod module;
mod mutation;
mod state_path;
mod state_store;

pub use app_state::LocationRecord;
pub use error::StoreError;
pub use module::{ModuleState, StoreModule};
pub use mutation::Mutation;
pub use state_store::StateStore;
