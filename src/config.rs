// ABOUTME: TOML configuration naming the default provider and per-provider static fields
// ABOUTME: Loaded once at startup and handed to the client builder

use crate::client::error::{DispatchError, DispatchResult};
use crate::client::types::ProviderConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Dispatch configuration
///
/// ```toml
/// [default]
/// provider = "ssl"
/// timeout_secs = 30
///
/// [providers.ssl]
/// url = "http://sms.sslwireless.com/pushapi"
/// user = "demo"
/// pass = "secret"
/// sid = "DEMO"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub default: DefaultSettings,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSettings {
    pub provider: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for one provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    /// Endpoint override; the provider's own URL is used when absent
    pub url: Option<String>,
    /// Every other key: credentials, sender ids and similar static fields
    #[serde(flatten)]
    pub fields: ProviderConfig,
}

impl SmsConfig {
    pub fn from_toml_str(text: &str) -> DispatchResult<Self> {
        toml::from_str(text)
            .map_err(|e| DispatchError::Configuration(format!("Invalid SMS config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> DispatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DispatchError::Configuration(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn default_provider(&self) -> &str {
        &self.default.provider
    }

    pub fn provider_settings(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(name)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default.timeout_secs)
    }
}
