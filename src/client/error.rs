// ABOUTME: Dispatch error types covering mapping, validation, transport and provider failures
// ABOUTME: Normalizes every failure into a status-like code and a failure kind for the dispatch log

use serde::Serialize;
use thiserror::Error;

/// Detail used when a provider cannot map a recipient into request fields
pub const MAPPING_FAILED: &str = "Failed to map the params.";

/// Code carried by mapping and validation failures
pub const UNPROCESSABLE: u16 = 422;

/// Code used when a failure does not carry an explicit one
pub const INTERNAL: u16 = 500;

/// Comprehensive error type for SMS dispatch operations
///
/// Per-recipient variants (`Mapping`, `Validation`, `Transport`,
/// `ProviderRejection`) are always folded into the dispatch log and never
/// escape `send`/`send_with_fallback`. `Configuration` is raised while
/// building a client, before any recipient is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Provider produced no request fields for the recipient
    #[error("Failed to map the params.")]
    Mapping,

    /// Merged request fields failed the provider's validation rules
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// HTTP request did not complete or returned nothing usable
    #[error("{message}")]
    Transport {
        /// Explicit code from the transport layer, e.g. an HTTP status
        code: Option<u16>,
        message: String,
    },

    /// Provider parsed the upstream answer as unsuccessful
    #[error("{0}")]
    ProviderRejection(String),

    /// Unknown provider name, unreadable configuration or client setup failure
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Tag identifying which stage of the pipeline failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Mapping,
    Validation,
    Transport,
    ProviderRejection,
    Configuration,
}

impl DispatchError {
    /// Create a transport error without an explicit code
    pub fn transport(message: impl Into<String>) -> Self {
        DispatchError::Transport {
            code: None,
            message: message.into(),
        }
    }

    /// Create a transport error carrying an explicit code
    pub fn transport_with_code(code: u16, message: impl Into<String>) -> Self {
        DispatchError::Transport {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::Mapping => FailureKind::Mapping,
            DispatchError::Validation(_) => FailureKind::Validation,
            DispatchError::Transport { .. } => FailureKind::Transport,
            DispatchError::ProviderRejection(_) => FailureKind::ProviderRejection,
            DispatchError::Configuration(_) => FailureKind::Configuration,
        }
    }

    /// Normalized failure code
    ///
    /// Mapping and validation failures are 422. An explicit transport code
    /// is kept when it is at least 100; everything else is 500.
    pub fn code(&self) -> u16 {
        match self {
            DispatchError::Mapping | DispatchError::Validation(_) => UNPROCESSABLE,
            DispatchError::Transport {
                code: Some(code), ..
            } if *code >= 100 => *code,
            _ => INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_and_validation_are_unprocessable() {
        assert_eq!(DispatchError::Mapping.code(), 422);
        assert_eq!(
            DispatchError::Validation(vec!["The to field is required.".into()]).code(),
            422
        );
        assert_eq!(DispatchError::Mapping.to_string(), "Failed to map the params.");
    }

    #[test]
    fn test_transport_code_normalization() {
        assert_eq!(DispatchError::transport("boom").code(), 500);
        assert_eq!(DispatchError::transport_with_code(28, "timed out").code(), 500);
        assert_eq!(DispatchError::transport_with_code(503, "unavailable").code(), 503);
        assert_eq!(DispatchError::transport_with_code(100, "continue").code(), 100);
    }

    #[test]
    fn test_rejection_and_configuration_default_to_internal() {
        let rejected = DispatchError::ProviderRejection("rejected".into());
        assert_eq!(rejected.code(), 500);
        assert_eq!(rejected.kind(), FailureKind::ProviderRejection);
        assert_eq!(rejected.to_string(), "rejected");

        let config = DispatchError::Configuration("Invalid SMS provider name: nope".into());
        assert_eq!(config.code(), 500);
        assert_eq!(config.kind(), FailureKind::Configuration);
    }
}
