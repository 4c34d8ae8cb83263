// src/core/mod.rs

/// Data structures shared by every part of the client: the scan configuration,
/// the normalized `ScanResult` and its findings.
pub mod models;

/// Typed errors for validation, transport, decoding and configuration.
pub mod error;

/// Risk score to severity band.
pub mod risk;

/// Grouping of alerts by severity label and the summary counts derived from it.
pub mod findings;

/// Interpretation of a completed response body, plain or with an embedded report.
pub mod decoder;

/// The transport seam and the request URL for the combined scan endpoint.
pub mod client;

/// The session state machine and the orchestrator that drives it.
pub mod session;

/// Local save of a decoded report.
pub mod report;

/// How a failed AI narrative is presented.
pub mod narrative;

/// Static guidance for well-known ports.
pub mod knowledge_base;
