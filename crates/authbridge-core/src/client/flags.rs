use schemars::JsonSchema;

/// Feature flags for the AuthBridge SDK client.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, JsonSchema)]
pub struct Flags {
    /// Report the host framework identity in outgoing request telemetry.
    #[serde(default = "default_true", rename = "enableTelemetry")]
    pub enable_telemetry: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            enable_telemetry: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Flags {
    /// Create a new `Flags` instance from a map of flag names and values.
    pub fn load_from_map(map: std::collections::HashMap<String, bool>) -> Self {
        let map = map
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::Bool(v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).expect("Valid map")
    }
}
