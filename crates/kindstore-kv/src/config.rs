use serde::{Deserialize, Serialize};

/// Connection settings for the Redis backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL, e.g. `redis://localhost:6379/0`.
    pub url: String,
    /// Maximum pooled connections.
    pub pool_size: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RedisConfig::default();
        assert_eq!(c.url, "redis://localhost:6379");
        assert_eq!(c.pool_size, 8);
    }
}
