// ABOUTME: Provider registry and client builder for creating dispatch clients by provider name
// ABOUTME: Resolves registered factories with config and URL overrides, failing fast on unknown names

use crate::client::default::SmsClient;
use crate::client::error::{DispatchError, DispatchResult};
use crate::client::request::DEFAULT_TIMEOUT;
use crate::client::traits::Provider;
use crate::client::types::ProviderConfig;
use crate::config::SmsConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Constructor for a provider from its static config and an optional URL override
pub type ProviderFactory = fn(ProviderConfig, Option<String>) -> Arc<dyn Provider>;

/// Explicit mapping from provider name to factory
///
/// Adding a provider means registering one more factory; the dispatch
/// client does not change.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one under the same name
    pub fn register(mut self, name: impl Into<String>, factory: ProviderFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered provider names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate a provider by name
    pub fn create(
        &self,
        name: &str,
        config: ProviderConfig,
        url: Option<String>,
    ) -> DispatchResult<Arc<dyn Provider>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            DispatchError::Configuration(format!("Invalid SMS provider name is given: {name}"))
        })?;
        debug!("Creating SMS provider {}", name);
        Ok(factory(config, url))
    }
}

/// Builder for dispatch clients resolved through a `ProviderRegistry`
///
/// ```rust,ignore
/// let client = ClientBuilder::new(&registry)
///     .provider("ssl")
///     .config(credentials)
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ClientBuilder<'a> {
    registry: &'a ProviderRegistry,
    provider: Option<String>,
    config: ProviderConfig,
    url: Option<String>,
    timeout: Duration,
}

impl<'a> ClientBuilder<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self {
            registry,
            provider: None,
            config: ProviderConfig::new(),
            url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Start from the default provider and settings of a loaded config
    pub fn from_config(registry: &'a ProviderRegistry, config: &SmsConfig) -> DispatchResult<Self> {
        let name = config.default_provider();
        let settings = config.provider_settings(name).ok_or_else(|| {
            DispatchError::Configuration(format!("No settings for SMS provider: {name}"))
        })?;

        let mut builder = Self::new(registry)
            .provider(name)
            .config(settings.fields.clone())
            .timeout(config.timeout());
        builder.url = settings.url.clone();
        Ok(builder)
    }

    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.provider = Some(name.into());
        self
    }

    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the provider's default endpoint
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the provider without building a client
    pub fn build_provider(self) -> DispatchResult<Arc<dyn Provider>> {
        let name = self
            .provider
            .ok_or_else(|| DispatchError::Configuration("No SMS provider selected".to_string()))?;
        self.registry.create(&name, self.config, self.url)
    }

    /// Build a client sending through the default HTTP transport
    pub fn build(self) -> DispatchResult<SmsClient> {
        let timeout = self.timeout;
        let provider = self.build_provider()?;
        Ok(SmsClient::new(provider)?.with_timeout(timeout))
    }
}
