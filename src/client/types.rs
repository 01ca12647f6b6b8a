// ABOUTME: Supporting types for SMS dispatch including recipients, provider responses and the dispatch log
// ABOUTME: Folds per-recipient outcomes into a summary that always accounts for every recipient exactly once

use crate::client::error::{DispatchError, FailureKind};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Extra key/value data supplied by the caller for the provider's mapping step
pub type Params = BTreeMap<String, String>;

/// Static provider fields (credentials, sender ids) merged into every request
pub type ProviderConfig = BTreeMap<String, String>;

/// Ordered, de-duplicated list of recipient identifiers for one dispatch
///
/// A single recipient converts into a one-element list. Repeated
/// identifiers keep their first position only, so every recipient gets
/// exactly one outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    pub fn new<I, S>(recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let unique = recipients
            .into_iter()
            .map(Into::<String>::into)
            .filter(|recipient| seen.insert(recipient.clone()))
            .collect();
        Recipients(unique)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Recipients {
    fn from(recipient: &str) -> Self {
        Recipients(vec![recipient.to_string()])
    }
}

impl From<String> for Recipients {
    fn from(recipient: String) -> Self {
        Recipients(vec![recipient])
    }
}

impl From<Vec<String>> for Recipients {
    fn from(recipients: Vec<String>) -> Self {
        Recipients::new(recipients)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(recipients: Vec<&str>) -> Self {
        Recipients::new(recipients)
    }
}

impl From<&[&str]> for Recipients {
    fn from(recipients: &[&str]) -> Self {
        Recipients::new(recipients.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(recipients: [&str; N]) -> Self {
        Recipients::new(recipients)
    }
}

/// Provider's interpretation of a raw upstream answer
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProviderResponse {
    /// Whether the provider accepted the message
    pub success: bool,
    /// Provider-specific detail, a plain string or structured data
    pub response: Value,
}

impl ProviderResponse {
    pub fn accepted(response: impl Into<Value>) -> Self {
        Self {
            success: true,
            response: response.into(),
        }
    }

    pub fn rejected(response: impl Into<Value>) -> Self {
        Self {
            success: false,
            response: response.into(),
        }
    }

    /// Response detail as a single line of text
    pub fn message(&self) -> String {
        match &self.response {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Failure detail stored in the log
///
/// Validation failures keep their full message list; every other failure
/// carries one message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FailureResponse {
    Validation(Vec<String>),
    Message(String),
}

/// Logged outcome for a recipient that could not be sent
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FailureDetail {
    /// Always false
    pub success: bool,
    pub response: FailureResponse,
    /// Normalized failure code (422, 500 or an explicit transport code)
    #[serde(skip)]
    pub code: u16,
    #[serde(skip)]
    pub kind: FailureKind,
}

impl From<&DispatchError> for FailureDetail {
    fn from(err: &DispatchError) -> Self {
        let response = match err {
            DispatchError::Validation(messages) => FailureResponse::Validation(messages.clone()),
            other => FailureResponse::Message(other.to_string()),
        };

        FailureDetail {
            success: false,
            response,
            code: err.code(),
            kind: err.kind(),
        }
    }
}

impl From<DispatchError> for FailureDetail {
    fn from(err: DispatchError) -> Self {
        FailureDetail::from(&err)
    }
}

/// Final outcome of one recipient
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SendOutcome<'a> {
    Sent(&'a ProviderResponse),
    Failed(&'a FailureDetail),
}

/// Map keyed by recipient that iterates in insertion order
///
/// Replacing an existing key keeps its original position. Removed entries
/// leave an empty slot behind, so lookups and removals stay constant time
/// on large batches.
#[derive(Debug, Clone)]
pub struct OutcomeMap<T> {
    slots: Vec<Option<(String, T)>>,
    index: HashMap<String, usize>,
}

impl<T> Default for OutcomeMap<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OutcomeMap<T> {
    pub fn get(&self, recipient: &str) -> Option<&T> {
        let slot = *self.index.get(recipient)?;
        self.slots[slot].as_ref().map(|(_, value)| value)
    }

    pub fn contains(&self, recipient: &str) -> bool {
        self.index.contains_key(recipient)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.slots
            .iter()
            .flatten()
            .map(|(key, value)| (key.as_str(), value))
    }

    fn insert(&mut self, recipient: &str, value: T) {
        match self.index.get(recipient) {
            Some(&slot) => self.slots[slot] = Some((recipient.to_string(), value)),
            None => {
                self.index.insert(recipient.to_string(), self.slots.len());
                self.slots.push(Some((recipient.to_string(), value)));
            }
        }
    }

    fn remove(&mut self, recipient: &str) -> Option<T> {
        let slot = self.index.remove(recipient)?;
        self.slots[slot].take().map(|(_, value)| value)
    }
}

impl<T: PartialEq> PartialEq for OutcomeMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Serialize> Serialize for OutcomeMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Per-recipient outcomes of one dispatch
///
/// Recording an outcome for a recipient removes it from the other side, so
/// a recipient is never both sent and failed.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DispatchLog {
    pub sent: OutcomeMap<ProviderResponse>,
    pub failed: OutcomeMap<FailureDetail>,
}

impl DispatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&mut self, recipient: &str, response: ProviderResponse) {
        self.failed.remove(recipient);
        self.sent.insert(recipient, response);
    }

    pub fn record_failed(&mut self, recipient: &str, detail: FailureDetail) {
        self.sent.remove(recipient);
        self.failed.insert(recipient, detail);
    }

    pub fn outcome(&self, recipient: &str) -> Option<SendOutcome<'_>> {
        if let Some(response) = self.sent.get(recipient) {
            return Some(SendOutcome::Sent(response));
        }
        self.failed.get(recipient).map(SendOutcome::Failed)
    }

    pub fn summarize(&self) -> Summary {
        let sent = self.sent.len();
        let failed = self.failed.len();
        Summary {
            sent,
            failed,
            total: sent + failed,
        }
    }
}

/// Counts derived from a dispatch log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

/// Result of one `send`/`send_with_fallback` call
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DispatchReport {
    pub summary: Summary,
    pub log: DispatchLog,
}

impl From<DispatchLog> for DispatchReport {
    fn from(log: DispatchLog) -> Self {
        DispatchReport {
            summary: log.summarize(),
            log,
        }
    }
}

impl DispatchReport {
    /// True when at least one recipient was processed and none failed
    pub fn is_complete_success(&self) -> bool {
        self.summary.total > 0 && self.summary.failed == 0
    }

    pub fn outcome(&self, recipient: &str) -> Option<SendOutcome<'_>> {
        self.log.outcome(recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_recipient_normalizes_to_one_element() {
        let recipients = Recipients::from("8801711000000");
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients.iter().collect::<Vec<_>>(), vec!["8801711000000"]);
    }

    #[test]
    fn test_duplicate_recipients_keep_first_position() {
        let recipients = Recipients::from(vec!["b", "a", "b", "c", "a"]);
        assert_eq!(recipients.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_log_keeps_recipient_in_exactly_one_side() {
        let mut log = DispatchLog::new();
        log.record_failed("a", DispatchError::transport("timed out").into());
        assert!(log.failed.contains("a"));

        log.record_sent("a", ProviderResponse::accepted("ok"));
        assert!(log.sent.contains("a"));
        assert!(!log.failed.contains("a"));
        assert_eq!(log.summarize(), Summary { sent: 1, failed: 0, total: 1 });
    }

    #[test]
    fn test_large_batch_moves_between_sides_in_order() {
        let recipients: Vec<String> = (0..10_000).map(|n| format!("88017{n:08}")).collect();
        let mut log = DispatchLog::new();
        for recipient in &recipients {
            log.record_failed(recipient, DispatchError::transport("timed out").into());
        }
        for recipient in recipients.iter().step_by(2) {
            log.record_sent(recipient, ProviderResponse::accepted("ok"));
        }

        assert_eq!(log.summarize(), Summary { sent: 5_000, failed: 5_000, total: 10_000 });
        let failed: Vec<&str> = log.failed.iter().map(|(key, _)| key).collect();
        let expected: Vec<&str> = recipients.iter().skip(1).step_by(2).map(String::as_str).collect();
        assert_eq!(failed, expected);
        assert!(log.failed.get(&recipients[0]).is_none());
        assert!(log.failed.get(&recipients[9_999]).is_some());
        assert!(matches!(log.outcome(&recipients[4_000]), Some(SendOutcome::Sent(_))));

        // a recipient moved back goes to the end
        log.record_failed(&recipients[0], DispatchError::Mapping.into());
        assert_eq!(log.failed.iter().last().map(|(key, _)| key), Some(recipients[0].as_str()));
        assert_eq!(log.sent.len(), 4_999);
    }

    #[test]
    fn test_outcome_maps_compare_by_visible_entries() {
        let mut left = DispatchLog::new();
        left.record_failed("a", DispatchError::Mapping.into());
        left.record_sent("a", ProviderResponse::accepted("ok"));

        let mut right = DispatchLog::new();
        right.record_sent("a", ProviderResponse::accepted("ok"));
        assert_eq!(left, right);
    }

    #[test]
    fn test_large_duplicate_batch_keeps_first_positions() {
        let recipients = Recipients::new((0..20_000).map(|n| format!("{}", n % 5_000)));
        assert_eq!(recipients.len(), 5_000);
        assert_eq!(recipients.iter().next(), Some("0"));
        assert_eq!(recipients.iter().last(), Some("4999"));
    }

    #[test]
    fn test_summary_counts() {
        let mut log = DispatchLog::new();
        log.record_sent("a", ProviderResponse::accepted("ok"));
        log.record_failed("b", DispatchError::Mapping.into());
        log.record_failed("c", DispatchError::ProviderRejection("no".into()).into());

        let report = DispatchReport::from(log);
        assert_eq!(report.summary, Summary { sent: 1, failed: 2, total: 3 });
        assert!(!report.is_complete_success());
        assert!(matches!(report.outcome("b"), Some(SendOutcome::Failed(_))));
        assert!(report.outcome("z").is_none());
    }

    #[test]
    fn test_failure_detail_shapes() {
        let mapping = FailureDetail::from(DispatchError::Mapping);
        assert_eq!(mapping.code, 422);
        assert_eq!(
            mapping.response,
            FailureResponse::Message("Failed to map the params.".into())
        );

        let validation = FailureDetail::from(DispatchError::Validation(vec![
            "The user field is required.".into(),
            "The sid field is required.".into(),
        ]));
        assert_eq!(validation.code, 422);
        assert_eq!(validation.kind, FailureKind::Validation);
        assert!(matches!(validation.response, FailureResponse::Validation(ref m) if m.len() == 2));

        let transport = FailureDetail::from(DispatchError::transport_with_code(503, "unavailable"));
        assert_eq!(transport.code, 503);
        assert!(!transport.success);
    }

    #[test]
    fn test_report_serializes_in_insertion_order() {
        let mut log = DispatchLog::new();
        log.record_sent("z", ProviderResponse::accepted(json!({"id": 7})));
        log.record_failed("a", DispatchError::Validation(vec!["bad".into()]).into());
        log.record_sent("m", ProviderResponse::accepted("ok"));

        let report = DispatchReport::from(log);
        let text = serde_json::to_string(&report).unwrap();
        assert_eq!(
            text,
            r#"{"summary":{"sent":2,"failed":1,"total":3},"log":{"sent":{"z":{"success":true,"response":{"id":7}},"m":{"success":true,"response":"ok"}},"failed":{"a":{"success":false,"response":["bad"]}}}}"#
        );
    }

    #[test]
    fn test_provider_response_message() {
        assert_eq!(ProviderResponse::rejected("rejected").message(), "rejected");
        assert_eq!(ProviderResponse::rejected(json!({"code": 1})).message(), r#"{"code":1}"#);
        assert_eq!(ProviderResponse::rejected(Value::Null).message(), "");
    }
}
