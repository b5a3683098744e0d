use crate::Result;
use lagoon_layered::LayeredOptions;
use lagoon_physics::{AnnealOptions, PhysicsOptions, SolverKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a [`crate::Session`] or the worker entry points need, as one serde value.
///
/// Every section defaults independently, so `{}` and `{"physics": {"gravity": 0}}` are both
/// complete configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub solver: SolverKind,
    pub physics: PhysicsOptions,
    pub layered: LayeredOptions,
    pub anneal: AnnealOptions,
    /// Kinetic energy below which a session reports the simulation as frozen.
    pub freeze_energy: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            physics: PhysicsOptions::default(),
            layered: LayeredOptions::default(),
            anneal: AnnealOptions::default(),
            freeze_energy: 0.1,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns a copy with `overrides` deep-merged on top. Objects merge key by key; any other
    /// value replaces what was there.
    pub fn merged(&self, overrides: &Value) -> Result<Self> {
        let mut base = self.to_value()?;
        deep_merge_value(&mut base, overrides);
        Self::from_value(base)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
