// ABOUTME: SMS dispatch client module providing provider-driven multi-recipient sending
// ABOUTME: Exports the dispatch client, provider and transport traits, registry, builder and result types

//! SMS Dispatch Client Module
//!
//! This module sends one message to many recipients through a pluggable
//! upstream HTTP gateway:
//!
//! * **Provider trait** - URL, field mapping, validation rules and response parsing per gateway
//! * **Transport trait** - one HTTP POST per call, `reqwest` by default
//! * **Independent recipients** - every recipient is mapped, validated, sent and logged on its own
//! * **Fallback** - `send_with_fallback` retries a recipient once after a rejection or transport failure
//! * **Registry** - providers are looked up by name through explicit factories
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_dispatch::client::{ClientBuilder, Params, ProviderRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::new().register("ssl", ssl_provider);
//! let client = ClientBuilder::new(&registry)
//!     .provider("ssl")
//!     .config(credentials)
//!     .build()?;
//!
//! let report = client
//!     .send_with_fallback(["8801711000000", "8801811000000"], "Hello!", &Params::new())
//!     .await;
//!
//! println!("{} of {} sent", report.summary.sent, report.summary.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! For each recipient the client runs:
//!
//! 1. `Provider::map_params` - nothing mapped fails with 422
//! 2. merge of `Provider::config` over the mapped fields
//! 3. `Provider::validation_rules` - violations fail with 422 and the full message list
//! 4. `RequestBuilder::build` - form-encoded POST with a 30 second default timeout
//! 5. `Transport::execute` then `Provider::parse_response`
//!
//! Per-recipient failures never escape `send`/`send_with_fallback`; the
//! returned `DispatchReport` always accounts for every recipient once.

pub mod builder;
pub mod default;
pub mod error;
pub mod request;
pub mod traits;
pub mod transport;
pub mod types;

pub use builder::{ClientBuilder, ProviderFactory, ProviderRegistry};
pub use default::SmsClient;
pub use error::{DispatchError, DispatchResult, FailureKind};
pub use request::{DEFAULT_TIMEOUT, Method, RequestBuilder, RequestOptions};
pub use traits::{Provider, RawResponse, Transport};
pub use transport::HttpTransport;
pub use types::{
    DispatchLog, DispatchReport, FailureDetail, FailureResponse, OutcomeMap, Params,
    ProviderConfig, ProviderResponse, Recipients, SendOutcome, Summary,
};
