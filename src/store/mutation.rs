use super::app_state::LocationRecord;
use super::state_path::StateValue;
use strum_macros::Display;

/// Every mutation the store accepts, named as UI code commits them.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum Mutation {
    ReplaceEngineState(serde_json::Value),
    ToggleBool(String),
    SetValue { path: String, value: StateValue },
    SetAutoDetectedLocation(LocationRecord),
    SetUseAutoLocation(bool),
    SetCurrentLocation(LocationRecord),
    SetSelectedObject(Option<serde_json::Value>),
}
