//! Structured YAML form of an FSM spec.
//!
//! Field order follows the struct and transition keys use the flat
//! `"(state, SYMBOL)"` grammar, so a spec fits in a single flat document.

use crate::error::FsmError;
use crate::spec::FsmSpec;

/// Serializes a spec to YAML.
pub fn to_yaml(spec: &FsmSpec) -> Result<String, FsmError> {
    Ok(serde_yaml::to_string(spec)?)
}

/// Deserializes a spec from YAML. The result is not validated.
pub fn from_yaml(text: &str) -> Result<FsmSpec, FsmError> {
    Ok(serde_yaml::from_str(text)?)
}

impl FsmSpec {
    pub fn to_yaml(&self) -> Result<String, FsmError> {
        to_yaml(self)
    }

    pub fn from_yaml(text: &str) -> Result<Self, FsmError> {
        from_yaml(text)
    }
}
