use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use kindstore_kv::RedisConfig;
use kindstore_store::StoreConfig;

/// Which key-value backend the CLI talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local; contents vanish when the command exits.
    #[default]
    Memory,
    Redis,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub backend: BackendKind,
    pub store: StoreConfig,
    pub redis: RedisConfig,
    /// Per-command timeout in milliseconds. No timeout when unset.
    pub timeout_ms: Option<u64>,
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let c = CliConfig::load(None).unwrap();
        assert_eq!(c.backend, BackendKind::Memory);
        assert_eq!(c.store.counter_key, "object_counter");
        assert!(c.timeout().is_none());
    }

    #[test]
    fn load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend = "redis"
timeout_ms = 1500

[redis]
url = "redis://cache:6379/2"
"#
        )
        .unwrap();

        let c = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.backend, BackendKind::Redis);
        assert_eq!(c.redis.url, "redis://cache:6379/2");
        assert_eq!(c.redis.pool_size, 8);
        assert_eq!(c.store, StoreConfig::default());
        assert_eq!(c.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn load_custom_counter_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\ncounter_key = \"ids\"").unwrap();
        let c = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.store.counter_key, "ids");
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn unknown_backend_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"etcd\"").unwrap();
        assert!(CliConfig::load(Some(file.path())).is_err());
    }
}
