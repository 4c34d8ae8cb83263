// src/core/error.rs

//! Error taxonomy for a scan session.
//!
//! Validation problems are handed straight back to the caller of `submit`.
//! Transport and decode failures are captured into the session's error slot
//! instead, so the session always settles in a stable state.

use thiserror::Error;

/// The target or configuration was rejected before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("target must not be empty")]
    EmptyTarget,
}

/// The request never produced a usable response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("scan service unreachable: {0}")]
    Unreachable(String),

    #[error("scan service returned HTTP {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Sub-reason of a [`DecodeError`], for callers that want a specific message
/// without matching on payload details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeReason {
    MalformedJson,
    MissingResult,
    InvalidResult,
    MissingReport,
    MalformedReport,
}

/// The response arrived but its body could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("result missing from response")]
    MissingResult,

    #[error("result has an unexpected shape: {0}")]
    InvalidResult(String),

    #[error("report data missing from response")]
    MissingReport,

    #[error("report data is not valid base64: {0}")]
    MalformedReport(String),
}

impl DecodeError {
    pub fn reason(&self) -> DecodeReason {
        match self {
            DecodeError::MalformedJson(_) => DecodeReason::MalformedJson,
            DecodeError::MissingResult => DecodeReason::MissingResult,
            DecodeError::InvalidResult(_) => DecodeReason::InvalidResult,
            DecodeError::MissingReport => DecodeReason::MissingReport,
            DecodeError::MalformedReport(_) => DecodeReason::MalformedReport,
        }
    }

    /// Whether the failure concerns only the report payload, leaving the
    /// decoded result intact.
    pub fn is_report_only(&self) -> bool {
        matches!(self, DecodeError::MissingReport | DecodeError::MalformedReport(_))
    }
}

/// What ends up in a session's error slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Returned by `submit` when the request is refused without touching the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a scan is already in progress")]
    Busy,

    #[error("no previous scan configuration to reuse")]
    NothingToRepeat,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid endpoint URL '{value}': {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint URL '{0}' cannot carry a path")]
    EndpointNotABase(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_embeds_code() {
        let err = TransportError::Status { status: 502, detail: None };
        assert_eq!(err.to_string(), "scan service returned HTTP 502");

        let err = TransportError::Status {
            status: 500,
            detail: Some("PDF generation failed: boom".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "scan service returned HTTP 500: PDF generation failed: boom"
        );
    }

    #[test]
    fn test_report_only_classification() {
        assert!(DecodeError::MissingReport.is_report_only());
        assert!(DecodeError::MalformedReport("bad".into()).is_report_only());
        assert!(!DecodeError::MissingResult.is_report_only());
        assert_eq!(DecodeError::MissingResult.reason(), DecodeReason::MissingResult);
    }

    #[test]
    fn test_session_error_is_transparent() {
        let err: SessionError = DecodeError::MissingResult.into();
        assert_eq!(err.to_string(), "result missing from response");
    }
}
