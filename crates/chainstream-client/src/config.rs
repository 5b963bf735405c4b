//! Client configuration.
//!
//! Loaded from YAML; every field has a default so a config file only needs
//! the values that differ. `CHAINSTREAM_RPC_URL` and
//! `CHAINSTREAM_SS58_FORMAT` override the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use chainstream_core::DEFAULT_SS58_FORMAT;
use chainstream_observability::LogConfig;
use chainstream_rpc::{HttpClientConfig, RetryConfig};

use crate::error::ClientError;

pub const ENV_RPC_URL: &str = "CHAINSTREAM_RPC_URL";
pub const ENV_SS58_FORMAT: &str = "CHAINSTREAM_SS58_FORMAT";

/// Where the stream pallet sits in the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalletConfig {
    pub name: String,
    pub storage_item: String,
    pub pallet_index: u8,
    pub create_call: u8,
    pub update_call: u8,
    pub set_status_call: u8,
}

impl Default for PalletConfig {
    fn default() -> Self {
        Self {
            name: "Stream".into(),
            storage_item: "Streams".into(),
            pallet_index: 33,
            create_call: 0,
            update_call: 1,
            set_status_call: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node HTTP JSON-RPC endpoint.
    pub rpc_url: String,
    pub ss58_format: u16,
    pub request_timeout_ms: u64,
    pub retry: RetryConfig,
    pub pallet: PalletConfig,
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:9933".into(),
            ss58_format: DEFAULT_SS58_FORMAT,
            request_timeout_ms: 30_000,
            retry: RetryConfig::default(),
            pallet: PalletConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ClientError> {
        serde_yaml::from_str(yaml).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Read a YAML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_yaml_str(&yaml)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ClientError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ClientError> {
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(format) = lookup(ENV_SS58_FORMAT) {
            self.ss58_format = format
                .parse()
                .map_err(|e| ClientError::Config(format!("{ENV_SS58_FORMAT}={format}: {e}")))?;
        }
        Ok(())
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            retry: self.retry.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml_str(
            "rpc_url: http://node:9933\npallet:\n  pallet_index: 12\nretry:\n  max_retries: 0\n",
        )
        .unwrap();
        assert_eq!(config.rpc_url, "http://node:9933");
        assert_eq!(config.pallet.pallet_index, 12);
        assert_eq!(config.pallet.name, "Stream");
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.ss58_format, DEFAULT_SS58_FORMAT);
    }

    #[test]
    fn overrides_win_over_file() {
        let env: HashMap<&str, &str> =
            [(ENV_RPC_URL, "http://other:9933"), (ENV_SS58_FORMAT, "42")].into();
        let mut config = ClientConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.rpc_url, "http://other:9933");
        assert_eq!(config.ss58_format, 42);
    }

    #[test]
    fn bad_format_override_is_a_config_error() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_SS58_FORMAT).then(|| "cord".to_string()))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        assert!(ClientConfig::from_yaml_str("retry: [1, 2").is_err());
    }
}
