pub mod client;
pub mod config;
pub mod validation;


// Re-export the main client API for easy access
pub use client::{
    ClientBuilder, DispatchError, DispatchReport, DispatchResult, HttpTransport, Params, Provider,
    ProviderConfig, ProviderRegistry, ProviderResponse, SmsClient, Summary, Transport,
};
pub use config::SmsConfig;
pub use validation::{FieldMap, Rule, RuleSet};

/// A specialized `Result` type for SMS dispatch setup.
///
/// Dispatching itself never fails: `send` and `send_with_fallback` return a
/// `DispatchReport` accounting for every recipient. Errors only surface
/// while loading configuration or resolving a provider.
///
/// # Examples
///
/// ## Basic SMS Sending
///
/// ```rust,no_run
/// use sms_dispatch::{
///     ClientBuilder, FieldMap, Params, Provider, ProviderConfig, ProviderRegistry,
///     ProviderResponse, Rule, RuleSet,
/// };
/// use std::sync::Arc;
///
/// struct Gateway {
///     url: String,
///     config: ProviderConfig,
/// }
///
/// impl Provider for Gateway {
///     fn url(&self) -> &str {
///         &self.url
///     }
///
///     fn config(&self) -> &ProviderConfig {
///         &self.config
///     }
///
///     fn map_params(&self, recipient: &str, message: &str, _params: &Params) -> Option<FieldMap> {
///         let mut fields = FieldMap::new();
///         fields.insert("to".into(), recipient.into());
///         fields.insert("text".into(), message.into());
///         Some(fields)
///     }
///
///     fn validation_rules(&self) -> RuleSet {
///         RuleSet::new()
///             .field("to", [Rule::Required, Rule::Numeric])
///             .field("api_key", [Rule::Required])
///     }
///
///     fn parse_response(&self, raw: &str) -> ProviderResponse {
///         if raw.starts_with("OK") {
///             ProviderResponse::accepted(raw)
///         } else {
///             ProviderResponse::rejected(raw)
///         }
///     }
/// }
///
/// fn gateway(config: ProviderConfig, url: Option<String>) -> Arc<dyn Provider> {
///     Arc::new(Gateway {
///         url: url.unwrap_or_else(|| "https://gateway.example.com/send".to_string()),
///         config,
///     })
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = ProviderRegistry::new().register("gateway", gateway);
///
///     let mut config = ProviderConfig::new();
///     config.insert("api_key".into(), "secret".into());
///
///     let client = ClientBuilder::new(&registry)
///         .provider("gateway")
///         .config(config)
///         .build()?;
///
///     let report = client
///         .send(vec!["8801711000000", "8801811000000"], "Hello, World!", &Params::new())
///         .await;
///
///     println!("{}", serde_json::to_string_pretty(&report)?);
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, DispatchError>;
