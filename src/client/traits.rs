// ABOUTME: Capability traits for pluggable SMS gateway providers and the HTTP transport
// ABOUTME: Providers supply URL, field mapping, validation rules and response parsing; transports move bytes

use crate::client::error::DispatchResult;
use crate::client::request::RequestOptions;
use crate::client::types::{Params, ProviderConfig, ProviderResponse};
use crate::validation::{FieldMap, RuleSet};
use bytes::Bytes;
use reqwest::StatusCode;

/// Upstream SMS gateway integration
///
/// Implementations must be read-only after construction: one provider is
/// shared by every dispatch running against a client.
pub trait Provider: Send + Sync {
    /// Endpoint receiving the form-encoded request
    fn url(&self) -> &str;

    /// Static fields merged into every request
    ///
    /// On a key collision these values replace the mapped ones.
    fn config(&self) -> &ProviderConfig;

    /// Translate one recipient, the message and caller params into request fields
    ///
    /// `None` or an empty map marks the recipient as unmappable.
    fn map_params(&self, recipient: &str, message: &str, params: &Params) -> Option<FieldMap>;

    /// Rules the merged request fields must satisfy
    fn validation_rules(&self) -> RuleSet;

    /// Interpret the raw body returned by the gateway
    ///
    /// Called with an empty body when a fallback dispatch lost the first
    /// response to a transport failure.
    fn parse_response(&self, raw: &str) -> ProviderResponse;
}

/// Raw answer from the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    /// Placeholder parsed when a fallback dispatch has no first response
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::new(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes one prepared request
///
/// Implementations perform exactly one attempt per call; retries are the
/// dispatch engine's concern.
pub trait Transport {
    async fn execute(&self, options: &RequestOptions) -> DispatchResult<RawResponse>;
}
