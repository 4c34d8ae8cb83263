// src/core/risk.rs

//! Maps the overall numeric risk score of a scan onto a discrete band.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum::{Display, EnumIter};

/// Discrete severity band, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RiskBand {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskBand {
    /// Inclusive lower bound of the band's score interval.
    pub fn lower_bound(self) -> f64 {
        match self {
            RiskBand::Info => 0.0,
            RiskBand::Low => 20.0,
            RiskBand::Medium => 40.0,
            RiskBand::High => 60.0,
            RiskBand::Critical => 80.0,
        }
    }

    /// Closed-open score interval within `[0, 100]`. `Critical` is the only band
    /// that also includes 100 itself, through `classify`.
    pub fn range(self) -> Range<f64> {
        let upper = match self {
            RiskBand::Info => 20.0,
            RiskBand::Low => 40.0,
            RiskBand::Medium => 60.0,
            RiskBand::High => 80.0,
            RiskBand::Critical => f64::INFINITY,
        };
        self.lower_bound()..upper
    }

    /// One-line reading of the band for the summary panel.
    pub fn headline(self) -> &'static str {
        match self {
            RiskBand::Info => "No meaningful exposure detected",
            RiskBand::Low => "Minor exposure, review when convenient",
            RiskBand::Medium => "Noticeable exposure, plan remediation",
            RiskBand::High => "Significant exposure, remediate soon",
            RiskBand::Critical => "Severe exposure, act immediately",
        }
    }
}

/// Classifies a score, checking thresholds from the highest band down.
///
/// Total over the real line: anything below 20, including negative values
/// and NaN, lands in `Info`. Callers are expected to clamp upstream.
pub fn classify(score: f64) -> RiskBand {
    if score >= 80.0 {
        RiskBand::Critical
    } else if score >= 60.0 {
        RiskBand::High
    } else if score >= 40.0 {
        RiskBand::Medium
    } else if score >= 20.0 {
        RiskBand::Low
    } else {
        RiskBand::Info
    }
}
