// ABOUTME: Builds transport-ready request options from validated provider fields
// ABOUTME: Form-encodes every field into the POST body with a fixed per-request timeout

use crate::validation::FieldMap;
use std::time::Duration;

/// Default time allowed for a single upstream call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method used for gateway requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
}

/// A single upstream request, built fresh for every recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub url: String,
    pub method: Method,
    /// `application/x-www-form-urlencoded` body
    pub body: String,
    /// Number of encoded fields
    pub field_count: usize,
    pub timeout: Duration,
}

/// Turns validated fields into `RequestOptions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    timeout: Duration,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RequestBuilder {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn build(&self, url: &str, fields: &FieldMap) -> RequestOptions {
        RequestOptions {
            url: url.to_string(),
            method: Method::Post,
            body: encode_form(fields),
            field_count: fields.len(),
            timeout: self.timeout,
        }
    }
}

fn encode_form(fields: &FieldMap) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
