// src/core/findings.rs

//! Groups alerts by their per-alert severity label, and condenses a result into
//! the counts the summary panel shows.
//!
//! Per-alert labels are a separate signal from the overall numeric score; nothing
//! here touches `risk_score` beyond reporting its band.

use crate::core::models::{Alert, ScanResult};
use crate::core::risk::{classify, RiskBand};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The four recognized alert labels, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SeverityBucket {
    High,
    Medium,
    Low,
    Informational,
}

impl SeverityBucket {
    /// Case-insensitive exact match of a free-form label against the bucket names.
    pub fn from_label(label: &str) -> Option<Self> {
        SeverityBucket::iter().find(|bucket| bucket.as_str().eq_ignore_ascii_case(label))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityBucket::High => "High",
            SeverityBucket::Medium => "Medium",
            SeverityBucket::Low => "Low",
            SeverityBucket::Informational => "Informational",
        }
    }
}

/// Alerts partitioned into the four buckets, each preserving input order.
///
/// Alerts whose label matches no bucket are kept apart in `unrecognized` so
/// they are neither counted in a bucket nor lost.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGroups<'a> {
    buckets: [(SeverityBucket, Vec<&'a Alert>); 4],
    pub unrecognized: Vec<&'a Alert>,
}

impl<'a> AlertGroups<'a> {
    pub fn get(&self, bucket: SeverityBucket) -> &[&'a Alert] {
        self.buckets
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, alerts)| alerts.as_slice())
            .unwrap_or(&[])
    }

    /// Buckets in display order High → Medium → Low → Informational, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityBucket, &[&'a Alert])> {
        self.buckets.iter().map(|(bucket, alerts)| (*bucket, alerts.as_slice()))
    }

    /// Number of alerts across the four buckets, excluding unrecognized labels.
    pub fn recognized_count(&self) -> usize {
        self.buckets.iter().map(|(_, alerts)| alerts.len()).sum()
    }
}

/// Stable partition of `alerts` by severity label.
pub fn group_by_severity(alerts: &[Alert]) -> AlertGroups<'_> {
    let mut groups = AlertGroups {
        buckets: [
            (SeverityBucket::High, Vec::new()),
            (SeverityBucket::Medium, Vec::new()),
            (SeverityBucket::Low, Vec::new()),
            (SeverityBucket::Informational, Vec::new()),
        ],
        unrecognized: Vec::new(),
    };

    for alert in alerts {
        match SeverityBucket::from_label(&alert.severity) {
            Some(bucket) => {
                if let Some((_, slot)) = groups.buckets.iter_mut().find(|(b, _)| *b == bucket) {
                    slot.push(alert);
                }
            }
            None => groups.unrecognized.push(alert),
        }
    }

    groups
}

/// Condensed view of a result for the summary panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanSummary {
    pub risk_score: f64,
    /// `None` only for the empty summary shown before any result exists;
    /// every summary built from a result carries its band.
    pub band: Option<RiskBand>,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub informational: usize,
    pub unrecognized: usize,
    pub open_ports: usize,
    pub pages: usize,
}

impl ScanSummary {
    pub fn from_result(result: &ScanResult) -> Self {
        let groups = group_by_severity(&result.alerts);
        Self {
            risk_score: result.risk_score,
            band: Some(classify(result.risk_score)),
            high: groups.get(SeverityBucket::High).len(),
            medium: groups.get(SeverityBucket::Medium).len(),
            low: groups.get(SeverityBucket::Low).len(),
            informational: groups.get(SeverityBucket::Informational).len(),
            unrecognized: groups.unrecognized.len(),
            open_ports: result.open_ports().count(),
            pages: result.pages.len(),
        }
    }
}
