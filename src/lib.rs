// src/lib.rs

//! Client for a remote security-scan service: submits a combined scan, decodes
//! the result (and optional PDF report), and classifies it for display.

pub mod config;
pub mod core;
pub mod logging;

pub use crate::core::error::{DecodeError, SessionError, SubmitError, TransportError, ValidationError};
pub use crate::core::models::{ScanConfiguration, ScanMode, ScanResult};
pub use crate::core::session::{ReportStatus, ScanOrchestrator, ScanSession, ScanStatus};
