//! Sync engine configuration.

use crate::error::SyncResult;
use hatake_core::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the synchronizer and bulk coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Currency all listing prices are normalized to. Default: USD.
    #[serde(default = "default_canonical_currency")]
    pub canonical_currency: CurrencyCode,
    /// Maximum in-flight per-entry syncs during a bulk operation.
    /// Default: 8.
    #[serde(default = "default_bulk_parallelism")]
    pub bulk_parallelism: usize,
    /// Timeout applied to each index store call (ms). A timeout is
    /// reported as a retryable rejection. Default: 2,000.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_canonical_currency() -> CurrencyCode {
    CurrencyCode::Usd
}

fn default_bulk_parallelism() -> usize {
    8
}

fn default_store_timeout_ms() -> u64 {
    2_000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            canonical_currency: default_canonical_currency(),
            bulk_parallelism: default_bulk_parallelism(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from the path in `HATAKE_SYNC_CONFIG`, falling back to
    /// defaults when unset.
    pub fn load() -> SyncResult<Self> {
        match std::env::var("HATAKE_SYNC_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.canonical_currency, CurrencyCode::Usd);
        assert_eq!(config.bulk_parallelism, 8);
        assert_eq!(config.store_timeout_ms, 2_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SyncConfig = toml::from_str("canonical_currency = \"SEK\"").unwrap();
        assert_eq!(config.canonical_currency, CurrencyCode::Sek);
        assert_eq!(config.bulk_parallelism, 8);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&SyncConfig::default()).unwrap();
        assert!(toml_str.contains("canonical_currency"));
        assert!(toml_str.contains("bulk_parallelism"));
    }
}
