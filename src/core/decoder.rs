// src/core/decoder.rs

//! Interprets the body of a successful response from the combined scan endpoint.
//!
//! Plain mode: the body is the result itself, or `{"result": ...}`.
//! Report mode: the body is `{"result": ..., "reportBase64": "..."}`. The result
//! and the report are validated independently, so a broken report never costs
//! the caller a good result.

use base64::{engine::general_purpose, Engine as _};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::error::DecodeError;
use crate::core::models::ScanResult;

/// Keys under which the report payload may arrive.
const REPORT_KEYS: &[&str] = &["reportBase64", "pdf_base64"];

/// A decoded response. `report` is `None` in plain mode; in report mode it
/// holds either the decoded document or the reason it is unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    pub result: ScanResult,
    pub report: Option<Result<Vec<u8>, DecodeError>>,
}

/// Decodes a response body.
///
/// Fails only when the result itself cannot be produced. Report problems are
/// returned inside [`DecodedResponse::report`].
pub fn decode(body: &str, export_report: bool) -> Result<DecodedResponse, DecodeError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| DecodeError::MalformedJson(e.to_string()))?;

    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::InvalidResult("expected a JSON object".to_string()));
    };

    if export_report {
        // The result is required here; the report is checked on its own.
        let result_value = match envelope.remove("result") {
            Some(Value::Null) | None => return Err(DecodeError::MissingResult),
            Some(v) => v,
        };
        let result = parse_result(result_value)?;
        let report = Some(decode_report(&envelope));
        Ok(DecodedResponse { result, report })
    } else {
        let result_value = match envelope.remove("result") {
            Some(inner @ Value::Object(_)) => inner,
            Some(Value::Null) | None => Value::Object(envelope),
            Some(other) => {
                // A scalar `result` key means this is not an envelope.
                envelope.insert("result".to_string(), other);
                Value::Object(envelope)
            }
        };
        let result = parse_result(result_value)?;
        Ok(DecodedResponse { result, report: None })
    }
}

fn parse_result(value: Value) -> Result<ScanResult, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::InvalidResult("result is not a JSON object".to_string()));
    }
    let result: ScanResult =
        serde_json::from_value(value).map_err(|e| DecodeError::InvalidResult(e.to_string()))?;
    debug!(
        scan_target = %result.target,
        risk_score = result.risk_score,
        ports = result.ports.len(),
        alerts = result.alerts.len(),
        pages = result.pages.len(),
        "Decoded scan result."
    );
    Ok(result)
}

fn decode_report(envelope: &Map<String, Value>) -> Result<Vec<u8>, DecodeError> {
    // Null or blank values under one key fall through to the next.
    let payload = REPORT_KEYS
        .iter()
        .filter_map(|key| envelope.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        });

    let encoded = match payload {
        None => {
            warn!("Report requested but no report payload in response.");
            return Err(DecodeError::MissingReport);
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(DecodeError::MalformedReport("payload is not a string".to_string()));
        }
    };

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::MalformedReport(e.to_string()))?;
    debug!(bytes = bytes.len(), "Decoded report payload.");
    Ok(bytes)
}
