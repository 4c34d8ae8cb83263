// src/core/models.rs

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::core::error::ValidationError;

// --- Scan Configuration ---

/// How aggressive the remote scan should be. Sent on the wire as `fast`,
/// `deep` or `extreme`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Fast,
    Deep,
    Extreme,
}

impl ScanMode {
    /// The next mode in display order, wrapping around. Used by the form to cycle modes.
    pub fn next(self) -> Self {
        match self {
            ScanMode::Fast => ScanMode::Deep,
            ScanMode::Deep => ScanMode::Extreme,
            ScanMode::Extreme => ScanMode::Fast,
        }
    }
}

/// Everything the caller chooses before a scan is issued.
///
/// A configuration is immutable once a request carrying it is in flight: the
/// orchestrator keeps its own validated copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanConfiguration {
    pub target: String,
    pub mode: ScanMode,
    pub crawl: bool,
    pub use_llm: bool,
    pub export_report: bool,
}

impl ScanConfiguration {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into(), ..Default::default() }
    }

    /// Returns the configuration with its target trimmed, or a validation error
    /// if nothing is left after trimming.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        let trimmed = self.target.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTarget);
        }
        self.target = trimmed.to_string();
        Ok(self)
    }
}

// --- Findings ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortFinding {
    pub port: u16,
    #[serde(default = "unknown_state")]
    pub state: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub protocol: Option<String>,
}

fn unknown_state() -> String {
    "unknown".to_string()
}

impl PortFinding {
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case("open")
    }
}

/// A single alert from the vulnerability audit. `severity` is a free-form label
/// as the auditor reports it; see `core::findings` for how labels are bucketed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "WireAlert")]
pub struct Alert {
    pub name: String,
    pub severity: String,
    pub code: Option<i64>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
    pub confidence: Option<String>,
}

/// ZAP sends both `alert` and `name`, `risk` for the label and `pluginId` as a string.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireAlert {
    name: Option<String>,
    alert: Option<String>,
    severity: Option<String>,
    risk: Option<String>,
    #[serde(deserialize_with = "lenient_code")]
    code: Option<i64>,
    #[serde(rename = "pluginId", deserialize_with = "lenient_code")]
    plugin_id: Option<i64>,
    url: Option<String>,
    description: Option<String>,
    solution: Option<String>,
    confidence: Option<String>,
}

impl From<WireAlert> for Alert {
    fn from(wire: WireAlert) -> Self {
        Alert {
            name: wire.name.or(wire.alert).unwrap_or_default(),
            severity: wire.severity.or(wire.risk).unwrap_or_default(),
            code: wire.code.or(wire.plugin_id),
            url: wire.url,
            description: wire.description,
            solution: wire.solution,
            confidence: wire.confidence,
        }
    }
}

/// A crawled page. Upstream sends either a bare URL or an object; both end up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageFinding {
    pub url: String,
    pub title: Option<String>,
    pub depth: Option<u32>,
    pub found_links: Vec<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePage {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        depth: Option<u32>,
        #[serde(default)]
        found_links: Vec<String>,
        #[serde(default)]
        error: Option<String>,
    },
}

impl From<WirePage> for PageFinding {
    fn from(page: WirePage) -> Self {
        match page {
            WirePage::Url(url) => PageFinding { url, ..Default::default() },
            WirePage::Detailed { url, title, depth, found_links, error } => {
                PageFinding { url, title, depth, found_links, error }
            }
        }
    }
}

// --- AI Narrative ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "WireAiSummary")]
pub struct AiSummary {
    pub executive_summary: String,
    pub technical_analysis: String,
    pub conclusion: String,
    pub remediation: Vec<String>,
}

/// Both spellings may arrive together; snake_case wins.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireAiSummary {
    executive_summary: Option<String>,
    #[serde(rename = "executiveSummary")]
    executive_summary_camel: Option<String>,
    technical_analysis: Option<String>,
    #[serde(rename = "technicalAnalysis")]
    technical_analysis_camel: Option<String>,
    conclusion: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    remediation: Vec<String>,
}

impl From<WireAiSummary> for AiSummary {
    fn from(wire: WireAiSummary) -> Self {
        AiSummary {
            executive_summary: wire.executive_summary.or(wire.executive_summary_camel).unwrap_or_default(),
            technical_analysis: wire.technical_analysis.or(wire.technical_analysis_camel).unwrap_or_default(),
            conclusion: wire.conclusion.unwrap_or_default(),
            remediation: wire.remediation,
        }
    }
}

/// The narrative generator's own failure report, e.g. `{"error": "exception", "message": "429 ..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "WireAiError")]
pub struct AiError {
    #[serde(rename = "error")]
    pub kind: String,
    pub message: Option<String>,
    pub raw: Option<String>,
}

/// `error` is usually a short kind string, but some generators nest an object there.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireAiError {
    error: Value,
    kind: Option<String>,
    message: Option<String>,
    raw: Option<String>,
}

impl From<WireAiError> for AiError {
    fn from(wire: WireAiError) -> Self {
        let from_error = match wire.error {
            Value::Null => None,
            Value::String(kind) => Some(kind),
            other => Some(other.to_string()),
        };
        AiError {
            kind: from_error.or(wire.kind).unwrap_or_default(),
            message: wire.message,
            raw: wire.raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiSection {
    Summary(AiSummary),
    Failed(AiError),
}

impl AiSection {
    fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let reports_failure = value.get("error").is_some() || value.get("kind").is_some();
        let parsed = if reports_failure {
            serde_json::from_value::<AiError>(value).map(AiSection::Failed)
        } else {
            serde_json::from_value::<AiSummary>(value).map(AiSection::Summary)
        };
        match parsed {
            Ok(section) => Some(section),
            Err(e) => {
                debug!(error = %e, "AI section has an unexpected shape, ignoring.");
                None
            }
        }
    }
}

// --- Main Result ---

/// The normalized outcome of one combined scan.
///
/// Built from whatever the service sent: every nested section is optional
/// upstream and becomes an empty collection here, so presentation code never
/// has to deal with missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "WireResult")]
pub struct ScanResult {
    pub target: String,
    pub scan_mode: String,
    /// Always within `[0, 100]`.
    pub risk_score: f64,
    pub llm_used: bool,
    pub ports: Vec<PortFinding>,
    pub alerts: Vec<Alert>,
    pub pages: Vec<PageFinding>,
    pub xhr_calls: Vec<String>,
    pub js_files: Vec<String>,
    pub zap_mode: Option<String>,
    pub ai: Option<AiSection>,
}

impl ScanResult {
    pub fn open_ports(&self) -> impl Iterator<Item = &PortFinding> {
        self.ports.iter().filter(|p| p.is_open())
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireNmap {
    ports: Value,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireZap {
    mode: Option<String>,
    alerts: Value,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireCrawler {
    pages: Value,
    xhr_calls: Value,
    xhr: Value,
    js_files: Value,
}

/// The result exactly as the service may send it: flat keys, nested tool
/// sections, snake_case or camelCase.
///
/// Every spelling has its own slot, so a body that carries two spellings of
/// the same field is still accepted. Snake_case wins, then camelCase. Tool
/// sections are kept as raw values and read leniently.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireResult {
    target: Option<String>,
    scan_mode: Option<String>,
    #[serde(rename = "scanMode")]
    scan_mode_camel: Option<String>,
    mode: Option<String>,
    risk_score: Value,
    #[serde(rename = "riskScore")]
    risk_score_camel: Value,
    llm_used: Option<bool>,
    #[serde(rename = "llmUsed")]
    llm_used_camel: Option<bool>,
    ports: Value,
    alerts: Value,
    pages: Value,
    nmap: Value,
    zap: Value,
    crawler: Value,
    crawl: Value,
    ai: Value,
}

impl From<WireResult> for ScanResult {
    fn from(wire: WireResult) -> Self {
        let nmap: WireNmap = section(wire.nmap, "nmap");
        let zap: WireZap = section(wire.zap, "zap");
        let crawler: WireCrawler = section(prefer(wire.crawler, wire.crawl), "crawler");

        let pages: Vec<WirePage> = collect_items(prefer(wire.pages, crawler.pages), "pages");

        ScanResult {
            target: wire.target.unwrap_or_default(),
            scan_mode: wire.scan_mode.or(wire.scan_mode_camel).or(wire.mode).unwrap_or_default(),
            risk_score: normalize_score(&prefer(wire.risk_score, wire.risk_score_camel)),
            llm_used: wire.llm_used.or(wire.llm_used_camel).unwrap_or(false),
            ports: collect_items(prefer(wire.ports, nmap.ports), "ports"),
            alerts: collect_items(prefer(wire.alerts, zap.alerts), "alerts"),
            pages: pages.into_iter().map(PageFinding::from).collect(),
            xhr_calls: collect_urls(prefer(crawler.xhr_calls, crawler.xhr), "xhr_calls"),
            js_files: collect_urls(crawler.js_files, "js_files"),
            zap_mode: zap.mode,
            ai: AiSection::from_value(wire.ai),
        }
    }
}

// --- Normalization Helpers ---

/// The first value unless it is missing or null. Flat keys win over nested
/// tool sections, and snake_case over camelCase.
fn prefer(first: Value, second: Value) -> Value {
    if first.is_null() { second } else { first }
}

/// Reads a nested tool section. A missing section or one with an unexpected
/// shape reads as empty.
fn section<T: DeserializeOwned + Default>(value: Value, name: &str) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        debug!(section = name, error = %e, "Section has an unexpected shape, treating as empty.");
        T::default()
    })
}

/// Clamps a score into `[0, 100]`. Missing, non-numeric and non-finite values become 0.
pub fn normalize_score(value: &Value) -> f64 {
    match value.as_f64() {
        Some(score) if score.is_finite() => score.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Deserializes every element of a JSON array, skipping the ones that do not fit.
/// Anything that is not an array yields an empty list.
fn collect_items<T: DeserializeOwned>(value: Value, section: &str) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!(section, error = %e, "Skipping malformed entry.");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        _ => {
            debug!(section, "Section is not a list, treating as empty.");
            Vec::new()
        }
    }
}

/// Lists of URLs, given either as strings or as objects with a `url` field.
fn collect_urls(value: Value, section: &str) -> Vec<String> {
    collect_items::<Value>(value, section)
        .into_iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(url),
            Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Alert codes arrive as numbers or as numeric strings (`"pluginId": "10038"`).
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}
