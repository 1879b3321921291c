use serde::{Deserialize, Serialize};

use kindstore_types::KEY_SEPARATOR;

use crate::error::{StoreError, StoreResult};

/// Object store settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend key holding the shared id counter.
    pub counter_key: String,
}

impl StoreConfig {
    /// Reject settings that would collide with entry keys.
    pub fn validate(&self) -> StoreResult<()> {
        if self.counter_key.is_empty() {
            return Err(StoreError::Config("counter_key must not be empty".into()));
        }
        if self.counter_key.contains(KEY_SEPARATOR) {
            return Err(StoreError::Config(format!(
                "counter_key {:?} must not contain {KEY_SEPARATOR:?}",
                self.counter_key
            )));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            counter_key: "object_counter".to_string(),
        }
    }
}
