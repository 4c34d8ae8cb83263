// src/core/narrative.rs

//! Reading of the AI narrative section when it reports its own failure.
//!
//! This never affects the session: the rest of the result stays valid and only
//! the narrative panel degrades.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::models::{AiError, AiSection, ScanResult};

/// A standalone 4xx/5xx status code inside a free-form message.
static RE_EMBEDDED_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([45]\d{2})\b").unwrap());

static RE_RATE_LIMIT_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)rate.?limit|quota|resource.?(has been )?exhausted|too many requests")
        .unwrap()
});

const RATE_LIMITED_STATUS: u16 = 429;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamAnalysisError {
    pub kind: String,
    pub message: Option<String>,
    pub status: Option<u16>,
    pub rate_limited: bool,
}

impl UpstreamAnalysisError {
    pub fn from_ai_error(err: &AiError) -> Self {
        let message = err.message.clone().or_else(|| err.raw.clone());
        let status = message.as_deref().and_then(embedded_status);
        let rate_limited = status == Some(RATE_LIMITED_STATUS)
            || message.as_deref().is_some_and(|m| RE_RATE_LIMIT_PHRASE.is_match(m));

        Self { kind: err.kind.clone(), message, status, rate_limited }
    }

    /// Text for the narrative panel.
    pub fn user_message(&self) -> String {
        if self.rate_limited {
            return "The AI analysis service is rate limited right now (HTTP 429). \
                    Scan findings below are complete; run the scan again later for a narrative."
                .to_string();
        }
        let reason = match self.kind.as_str() {
            "no_api_key" => "no API key is configured on the scan server".to_string(),
            "safety_block" => "the model declined to answer".to_string(),
            "no_candidates" | "no_parts" => "the model returned an empty answer".to_string(),
            "json_not_found" | "json_parse_failed" => {
                "the model answer could not be parsed".to_string()
            }
            _ => match (&self.message, self.status) {
                (Some(m), _) => m.clone(),
                (None, Some(status)) => format!("upstream returned HTTP {status}"),
                (None, None) => self.kind.clone(),
            },
        };
        format!("AI analysis unavailable: {reason}.")
    }
}

/// The narrative failure of a result, if its AI section reports one.
pub fn analysis_failure(result: &ScanResult) -> Option<UpstreamAnalysisError> {
    match &result.ai {
        Some(AiSection::Failed(err)) => Some(UpstreamAnalysisError::from_ai_error(err)),
        _ => None,
    }
}

fn embedded_status(message: &str) -> Option<u16> {
    RE_EMBEDDED_STATUS
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
