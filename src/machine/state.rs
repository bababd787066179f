use serde::{Deserialize, Serialize};

use crate::data::Value;

/// Final accumulator and the complete memory array, as written to the
/// state dump.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub accumulator: Value,
    pub memory: Vec<Value>,
}

impl MachineState {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
