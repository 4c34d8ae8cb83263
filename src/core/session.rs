// src/core/session.rs

//! One scan session and the orchestrator that drives it.
//!
//! Lifecycle: `Idle → Scanning → Success | Error`, and `Success | Error → Scanning`
//! on the next submit. The `Scanning` status doubles as the in-flight guard: a
//! submit that finds the session scanning is refused and leaves no trace.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use strum::Display;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

use crate::core::client::{build_scan_url, status_error, validate_endpoint, Transport};
use crate::core::decoder::{decode, DecodedResponse};
use crate::core::error::{ConfigError, DecodeError, SessionError, SubmitError, TransportError};
use crate::core::models::{ScanConfiguration, ScanResult};
use crate::core::report::save_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
    Success,
    Error,
}

/// What happened to the binary report of the last scan, tracked separately
/// from the result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReportStatus {
    #[default]
    NotRequested,
    /// Requested, but the response carried no usable payload.
    Unavailable(DecodeError),
    Saving,
    Saved(PathBuf),
    SaveFailed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanSession {
    pub status: ScanStatus,
    /// Configuration of the most recent accepted submit.
    pub config: Option<ScanConfiguration>,
    pub result: Option<ScanResult>,
    pub error: Option<SessionError>,
    pub report: ReportStatus,
    pub completed_at: Option<DateTime<Utc>>,
    /// Bumped on every accepted submit; late report saves from an older scan check it.
    generation: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scanning(&self) -> bool {
        self.status == ScanStatus::Scanning
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn begin(&mut self, config: ScanConfiguration) -> Result<u64, SubmitError> {
        if self.is_scanning() {
            return Err(SubmitError::Busy);
        }
        self.status = ScanStatus::Scanning;
        self.config = Some(config);
        self.result = None;
        self.error = None;
        self.report = ReportStatus::NotRequested;
        self.generation += 1;
        Ok(self.generation)
    }

    fn fail(&mut self, err: SessionError) {
        self.status = ScanStatus::Error;
        self.error = Some(err);
        self.completed_at = Some(Utc::now());
    }

    fn succeed(&mut self, result: ScanResult, report: ReportStatus) {
        self.status = ScanStatus::Success;
        self.result = Some(result);
        self.report = report;
        self.completed_at = Some(Utc::now());
    }

    fn settle_report(&mut self, generation: u64, report: ReportStatus) {
        if self.generation == generation && self.report == ReportStatus::Saving {
            self.report = report;
        }
    }
}

/// Held for the lifetime of an accepted submit. If the submit is dropped or
/// unwinds before it settles the session, the drop moves the session from
/// `Scanning` to `Error` so the next submit is not refused forever.
struct InFlight {
    session: Arc<Mutex<ScanSession>>,
    generation: u64,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.generation == self.generation && session.is_scanning() {
            warn!(generation = self.generation, "Scan abandoned before it finished.");
            session.fail(TransportError::Unreachable("scan aborted".to_string()).into());
        }
    }
}

/// Returned by a submit that was accepted and ran to a terminal state.
#[derive(Debug)]
pub struct SubmitReceipt {
    pub status: ScanStatus,
    /// The fire-and-forget report save, when one was started. Dropping it does
    /// not cancel the save.
    pub report_save: Option<JoinHandle<()>>,
}

/// Owns one session and runs submits against the scan service.
///
/// Cheap to clone; clones share the same session.
pub struct ScanOrchestrator<T> {
    transport: Arc<T>,
    endpoint: Url,
    report_dir: PathBuf,
    session: Arc<Mutex<ScanSession>>,
}

impl<T> Clone for ScanOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            endpoint: self.endpoint.clone(),
            report_dir: self.report_dir.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl<T: Transport> ScanOrchestrator<T> {
    pub fn new(transport: T, endpoint: Url, report_dir: PathBuf) -> Result<Self, ConfigError> {
        validate_endpoint(&endpoint)?;
        Ok(Self {
            transport: Arc::new(transport),
            endpoint,
            report_dir,
            session: Arc::new(Mutex::new(ScanSession::new())),
        })
    }

    pub fn snapshot(&self) -> ScanSession {
        self.lock().clone()
    }

    pub fn status(&self) -> ScanStatus {
        self.lock().status
    }

    /// Runs one scan to completion.
    ///
    /// Refused with [`SubmitError::Validation`] when the target is blank and
    /// with [`SubmitError::Busy`] while another scan is in flight; in both
    /// cases nothing is sent and the session is untouched. Otherwise the
    /// session ends in `Success` or `Error` and the receipt says which. A
    /// submit abandoned mid-flight (timeout, abort, panic) leaves the session
    /// in `Error` with a "scan aborted" transport error.
    pub async fn submit(&self, config: ScanConfiguration) -> Result<SubmitReceipt, SubmitError> {
        let config = config.validated().inspect_err(|e| {
            warn!(error = %e, "Scan submit rejected by validation.");
        })?;

        let in_flight = self.begin(config.clone()).inspect_err(|_| {
            warn!(scan_target = %config.target, "Scan submit ignored, a scan is already in flight.");
        })?;
        let generation = in_flight.generation;
        info!(
            scan_target = %config.target,
            mode = %config.mode,
            crawl = config.crawl,
            use_llm = config.use_llm,
            export_report = config.export_report,
            generation,
            "Scan started."
        );

        let outcome = self.fetch(&config).await;
        let receipt = self.apply(generation, outcome);
        drop(in_flight);
        info!(status = %receipt.status, generation, "Scan finished.");
        Ok(receipt)
    }

    /// Fetches the report by re-running the full scan with the last
    /// configuration, report export switched on. Nothing is cached, so this
    /// costs a complete remote scan.
    pub async fn download_report(&self) -> Result<SubmitReceipt, SubmitError> {
        let previous = self.lock().config.clone();
        let mut config = previous.ok_or(SubmitError::NothingToRepeat)?;
        config.export_report = true;
        self.submit(config).await
    }

    fn begin(&self, config: ScanConfiguration) -> Result<InFlight, SubmitError> {
        let generation = self.lock().begin(config)?;
        Ok(InFlight { session: Arc::clone(&self.session), generation })
    }

    async fn fetch(&self, config: &ScanConfiguration) -> Result<DecodedResponse, SessionError> {
        let url = build_scan_url(&self.endpoint, config)
            .map_err(|e| TransportError::Unreachable(format!("invalid scan URL: {e}")))?;

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            let err = status_error(&response);
            error!(status = response.status, error = %err, "Scan service returned an error status.");
            return Err(err.into());
        }

        decode(&response.body, config.export_report).map_err(|e| {
            error!(reason = ?e.reason(), error = %e, "Failed to decode scan response.");
            SessionError::from(e)
        })
    }

    fn apply(&self, generation: u64, outcome: Result<DecodedResponse, SessionError>) -> SubmitReceipt {
        let decoded = match outcome {
            Ok(decoded) => decoded,
            Err(err) => {
                self.lock().fail(err);
                return SubmitReceipt { status: ScanStatus::Error, report_save: None };
            }
        };

        let (report, bytes) = match decoded.report {
            None => (ReportStatus::NotRequested, None),
            Some(Err(err)) => {
                warn!(reason = ?err.reason(), error = %err, "Report unavailable, keeping result.");
                (ReportStatus::Unavailable(err), None)
            }
            Some(Ok(bytes)) => (ReportStatus::Saving, Some(bytes)),
        };

        self.lock().succeed(decoded.result, report);
        let report_save = bytes.map(|bytes| self.spawn_report_save(generation, bytes));
        SubmitReceipt { status: ScanStatus::Success, report_save }
    }

    fn spawn_report_save(&self, generation: u64, bytes: Vec<u8>) -> JoinHandle<()> {
        let dir = self.report_dir.clone();
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let report = match save_report(&dir, &bytes).await {
                Ok(path) => ReportStatus::Saved(path),
                Err(e) => ReportStatus::SaveFailed(e.to_string()),
            };
            session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .settle_report(generation, report);
        })
    }

    fn lock(&self) -> MutexGuard<'_, ScanSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
