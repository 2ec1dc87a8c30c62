use serde::{Deserialize, Serialize};

/// One unit of work produced by a data provider.
///
/// The payload is opaque to the orchestrator; only the provider that produced
/// it (and whatever consumes `GenerateBatch`) knows its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch(serde_json::Value);

impl Batch {
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Batch {
    fn from(payload: serde_json::Value) -> Self {
        Self::new(payload)
    }
}
