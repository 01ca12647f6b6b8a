// ABOUTME: Default SMS dispatch client running map, validate, build, execute and parse for every recipient
// ABOUTME: Applies the single-retry fallback policy and folds each outcome into the dispatch log

use crate::client::error::{DispatchError, DispatchResult};
use crate::client::request::{RequestBuilder, RequestOptions};
use crate::client::traits::{Provider, RawResponse, Transport};
use crate::client::transport::HttpTransport;
use crate::client::types::{
    DispatchLog, DispatchReport, FailureDetail, Params, ProviderResponse, Recipients,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Dispatch client bound to one provider
///
/// Recipients are processed one at a time in input order. A failure for
/// one recipient is recorded in the log and never stops the batch. The
/// client keeps no state between calls, so identical inputs against a
/// deterministic provider produce identical reports.
pub struct SmsClient<T = HttpTransport> {
    provider: Arc<dyn Provider>,
    transport: T,
    requests: RequestBuilder,
}

impl SmsClient<HttpTransport> {
    /// Create a client sending through a fresh `HttpTransport`
    pub fn new(provider: Arc<dyn Provider>) -> DispatchResult<Self> {
        Ok(Self::with_transport(provider, HttpTransport::new()?))
    }
}

impl<T: Transport> SmsClient<T> {
    pub fn with_transport(provider: Arc<dyn Provider>, transport: T) -> Self {
        Self {
            provider,
            transport,
            requests: RequestBuilder::default(),
        }
    }

    /// Set the time allowed for each upstream call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.requests = RequestBuilder::new(timeout);
        self
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.requests.timeout()
    }

    /// Send the message to every recipient with a single attempt each
    pub async fn send(
        &self,
        recipients: impl Into<Recipients>,
        message: &str,
        params: &Params,
    ) -> DispatchReport {
        self.dispatch(recipients, message, params, false).await
    }

    /// Send the message, retrying once per recipient after a rejection or transport failure
    pub async fn send_with_fallback(
        &self,
        recipients: impl Into<Recipients>,
        message: &str,
        params: &Params,
    ) -> DispatchReport {
        self.dispatch(recipients, message, params, true).await
    }

    /// Process every recipient and aggregate the outcomes
    pub async fn dispatch(
        &self,
        recipients: impl Into<Recipients>,
        message: &str,
        params: &Params,
        fallback: bool,
    ) -> DispatchReport {
        let recipients = recipients.into();
        let mut log = DispatchLog::new();

        debug!(
            "Dispatching to {} recipient(s) (fallback: {})",
            recipients.len(),
            fallback
        );

        for recipient in recipients.iter() {
            match self.deliver(recipient, message, params, fallback, &mut log).await {
                Ok(response) => {
                    debug!("Sent to {}", recipient);
                    log.record_sent(recipient, response);
                }
                Err(e) => {
                    warn!("Sending to {} failed ({}): {}", recipient, e.code(), e);
                    log.record_failed(recipient, FailureDetail::from(e));
                }
            }
        }

        let report = DispatchReport::from(log);
        info!(
            "Dispatch finished: {} sent, {} failed, {} total",
            report.summary.sent, report.summary.failed, report.summary.total
        );
        report
    }

    async fn deliver(
        &self,
        recipient: &str,
        message: &str,
        params: &Params,
        fallback: bool,
        log: &mut DispatchLog,
    ) -> DispatchResult<ProviderResponse> {
        let options = self.prepare(recipient, message, params)?;

        let raw = match self.transport.execute(&options).await {
            Ok(raw) => raw,
            Err(e) if fallback => {
                log.record_failed(recipient, FailureDetail::from(&e));
                RawResponse::empty()
            }
            Err(e) => return Err(e),
        };

        let response = self.provider.parse_response(&raw.text());
        if response.success {
            return Ok(response);
        }

        if !fallback {
            return Err(DispatchError::ProviderRejection(response.message()));
        }

        info!("SMS sending to {} failed, retrying once", recipient);
        // a failed retry is always reported as 500
        let retry = self
            .attempt(&options)
            .await
            .map_err(|e| match e {
                DispatchError::Transport { message, .. } => DispatchError::transport(message),
                other => other,
            })
            .inspect_err(|e| error!("Second try for {} failed: {}", recipient, e))?;
        info!("Second try for {} succeeded", recipient);
        Ok(retry)
    }

    /// Map, merge, validate and build the request for one recipient
    fn prepare(
        &self,
        recipient: &str,
        message: &str,
        params: &Params,
    ) -> DispatchResult<RequestOptions> {
        let mut fields = self
            .provider
            .map_params(recipient, message, params)
            .filter(|fields| !fields.is_empty())
            .ok_or(DispatchError::Mapping)?;

        fields.extend(
            self.provider
                .config()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        self.provider
            .validation_rules()
            .validate(&fields)
            .map_err(|failure| DispatchError::Validation(failure.messages()))?;

        Ok(self.requests.build(self.provider.url(), &fields))
    }

    async fn attempt(&self, options: &RequestOptions) -> DispatchResult<ProviderResponse> {
        let raw = self.transport.execute(options).await?;
        let response = self.provider.parse_response(&raw.text());
        if response.success {
            Ok(response)
        } else {
            Err(DispatchError::ProviderRejection(response.message()))
        }
    }
}
