// ABOUTME: reqwest-backed transport performing one form-encoded POST per request
// ABOUTME: Normalizes connector failures and empty bodies into transport errors with an identifying code

use crate::client::error::{DispatchError, DispatchResult};
use crate::client::request::{Method, RequestOptions};
use crate::client::traits::{RawResponse, Transport};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP transport built on a shared `reqwest::Client`
///
/// The client's connection pool is reused across requests. Each response
/// is owned by the `execute` call and dropped before it returns, on success
/// and on every error path.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> DispatchResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DispatchError::Configuration(format!("HTTP client setup failed: {e}")))?;
        Ok(Self::with_client(client))
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, options: &RequestOptions) -> DispatchResult<RawResponse> {
        let request = match options.method {
            Method::Post => self.client.post(&options.url),
        };

        debug!(
            "POST {} ({} fields, timeout {:?})",
            options.url, options.field_count, options.timeout
        );

        let response = request
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(options.body.clone())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(connector_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(connector_error)?;

        if body.is_empty() {
            let message = format!(
                "HTTP transport error #empty_response | no response body (status {status})"
            );
            warn!("{}", message);
            return Err(if status.is_success() {
                DispatchError::transport(message)
            } else {
                DispatchError::transport_with_code(status.as_u16(), message)
            });
        }

        Ok(RawResponse { status, body })
    }
}

fn connector_error(err: reqwest::Error) -> DispatchError {
    let message = format!("HTTP transport error #{} | {}", failure_code(&err), err);
    warn!("{}", message);
    DispatchError::transport(message)
}

/// Short identifier for the class of connector failure
fn failure_code(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_redirect() {
        "redirect"
    } else if err.is_body() {
        "body"
    } else if err.is_decode() {
        "decode"
    } else if err.is_builder() {
        "builder"
    } else if err.is_request() {
        "request"
    } else {
        "unknown"
    }
}
