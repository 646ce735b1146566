use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Live DEX metrics of a single device, keyed by metric name in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FleetStatus(pub Map<String, Value>);

impl FleetStatus {
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}
