// tests/scan_session.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use fastscan_tui::core::client::{RawResponse, Transport};
use fastscan_tui::core::findings::ScanSummary;
use fastscan_tui::core::risk::{classify, RiskBand};
use fastscan_tui::{
    DecodeError, ReportStatus, ScanConfiguration, ScanMode, ScanOrchestrator, ScanStatus, SessionError,
    SubmitError, TransportError, ValidationError,
};
use tempfile::TempDir;
use tokio::sync::Notify;
use url::Url;

/// Hands out queued responses in order and records every URL it was asked for.
#[derive(Clone, Default)]
struct StubTransport {
    responses: Arc<Mutex<VecDeque<Result<RawResponse, TransportError>>>>,
    calls: Arc<Mutex<Vec<Url>>>,
}

impl StubTransport {
    fn with(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses.into())), ..Default::default() }
    }

    fn ok(status: u16, body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse { status, body: body.to_string() })
    }

    fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(url.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TransportError::Unreachable("no response queued".to_string())))
    }
}

/// Blocks inside `get` until released, so a test can act while a scan is in flight.
#[derive(Clone, Default)]
struct GatedTransport {
    entered: Arc<Notify>,
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

impl Transport for GatedTransport {
    async fn get(&self, _url: &Url) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(RawResponse { status: 200, body: r#"{"riskScore": 5}"#.to_string() })
    }
}

/// Never answers its first request; answers later ones at once.
#[derive(Clone, Default)]
struct StallingTransport {
    calls: Arc<AtomicUsize>,
}

impl Transport for StallingTransport {
    async fn get(&self, _url: &Url) -> Result<RawResponse, TransportError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        Ok(RawResponse { status: 200, body: r#"{"riskScore": 42}"#.to_string() })
    }
}

fn endpoint() -> Url {
    Url::parse("http://scanner.test:8000").unwrap()
}

fn orchestrator<T: Transport>(transport: T, dir: &TempDir) -> ScanOrchestrator<T> {
    ScanOrchestrator::new(transport, endpoint(), dir.path().to_path_buf()).unwrap()
}

fn query(url: &Url, key: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_plain_mode_success() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![StubTransport::ok(
        200,
        r#"{"riskScore": 72, "ports": [{"port": 443, "state": "open"}], "alerts": [], "pages": []}"#,
    )]);
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let receipt = orchestrator.submit(ScanConfiguration::new("https://example.com")).await.unwrap();

    assert_eq!(receipt.status, ScanStatus::Success);
    assert!(receipt.report_save.is_none());
    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Success);
    let result = session.result.unwrap();
    assert_eq!(result.risk_score, 72.0);
    assert_eq!(classify(result.risk_score), RiskBand::High);
    assert_eq!(ScanSummary::from_result(&result).open_ports, 1);
    assert_eq!(session.report, ReportStatus::NotRequested);
    assert!(session.completed_at.is_some());
}

#[tokio::test]
async fn test_request_carries_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![StubTransport::ok(200, r#"{"riskScore": 0}"#)]);
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let config = ScanConfiguration {
        target: "  example.com ".to_string(),
        mode: ScanMode::Extreme,
        crawl: true,
        use_llm: false,
        export_report: false,
    };
    orchestrator.submit(config).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let url = &calls[0];
    assert_eq!(url.path(), "/scan/combined");
    assert_eq!(query(url, "target").as_deref(), Some("example.com"));
    assert_eq!(query(url, "mode").as_deref(), Some("extreme"));
    assert_eq!(query(url, "crawl").as_deref(), Some("true"));
    assert_eq!(query(url, "use_llm").as_deref(), Some("false"));
    assert_eq!(query(url, "pdf").as_deref(), Some("false"));
}

#[tokio::test]
async fn test_report_mode_without_report_keeps_result() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![StubTransport::ok(200, r#"{"result": {"riskScore": 10}}"#)]);
    let orchestrator = orchestrator(transport, &temp_dir);

    let mut config = ScanConfiguration::new("example.com");
    config.export_report = true;
    let receipt = orchestrator.submit(config).await.unwrap();

    assert_eq!(receipt.status, ScanStatus::Success);
    assert!(receipt.report_save.is_none());
    let session = orchestrator.snapshot();
    assert_eq!(session.result.unwrap().risk_score, 10.0);
    assert_eq!(session.report, ReportStatus::Unavailable(DecodeError::MissingReport));
    assert!(session.error.is_none());
    assert!(!temp_dir.path().join("scan-report.pdf").exists());
}

#[tokio::test]
async fn test_report_mode_saves_report() {
    let temp_dir = TempDir::new().unwrap();
    let encoded = general_purpose::STANDARD.encode(b"%PDF-1.7 fake");
    let body = format!(r#"{{"result": {{"riskScore": 55}}, "reportBase64": "{encoded}"}}"#);
    let transport = StubTransport::with(vec![StubTransport::ok(200, &body)]);
    let orchestrator = orchestrator(transport, &temp_dir);

    let mut config = ScanConfiguration::new("example.com");
    config.export_report = true;
    let receipt = orchestrator.submit(config).await.unwrap();
    receipt.report_save.expect("save task").await.unwrap();

    let path = temp_dir.path().join("scan-report.pdf");
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 fake");
    assert_eq!(orchestrator.snapshot().report, ReportStatus::Saved(path));
}

#[tokio::test]
async fn test_blank_target_is_rejected_without_request() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::default();
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let err = orchestrator.submit(ScanConfiguration::new("   ")).await.unwrap_err();

    assert_eq!(err, SubmitError::Validation(ValidationError::EmptyTarget));
    assert!(transport.calls().is_empty());
    assert_eq!(orchestrator.status(), ScanStatus::Idle);
}

#[tokio::test]
async fn test_second_submit_while_scanning_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let transport = GatedTransport::default();
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let first = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.submit(ScanConfiguration::new("a.example")).await }
    });
    transport.entered.notified().await;
    assert_eq!(orchestrator.status(), ScanStatus::Scanning);
    let before = orchestrator.snapshot();

    let second = orchestrator.submit(ScanConfiguration::new("b.example")).await;

    assert_eq!(second.unwrap_err(), SubmitError::Busy);
    assert_eq!(orchestrator.snapshot(), before);

    transport.release.notify_one();
    let receipt = first.await.unwrap().unwrap();
    assert_eq!(receipt.status, ScanStatus::Success);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.snapshot().config.unwrap().target, "a.example");
}

#[tokio::test]
async fn test_error_status_fails_session() {
    let temp_dir = TempDir::new().unwrap();
    let transport =
        StubTransport::with(vec![StubTransport::ok(502, r#"{"detail": "nmap crashed"}"#)]);
    let orchestrator = orchestrator(transport, &temp_dir);

    let receipt = orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();

    assert_eq!(receipt.status, ScanStatus::Error);
    let session = orchestrator.snapshot();
    assert!(session.result.is_none());
    let message = session.error_message().unwrap();
    assert!(message.contains("502"));
    assert!(message.contains("nmap crashed"));
}

#[tokio::test]
async fn test_unreachable_service_fails_session() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![Err(TransportError::Unreachable(
        "connection refused".to_string(),
    ))]);
    let orchestrator = orchestrator(transport, &temp_dir);

    orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();

    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Error);
    assert!(matches!(session.error, Some(SessionError::Transport(TransportError::Unreachable(_)))));
}

#[tokio::test]
async fn test_malformed_body_fails_session() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![StubTransport::ok(200, "<html>gateway</html>")]);
    let orchestrator = orchestrator(transport, &temp_dir);

    orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();

    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Error);
    assert!(matches!(session.error, Some(SessionError::Decode(DecodeError::MalformedJson(_)))));
}

#[tokio::test]
async fn test_resubmit_after_error_clears_it() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![
        StubTransport::ok(500, ""),
        StubTransport::ok(200, r#"{"riskScore": 90}"#),
    ]);
    let orchestrator = orchestrator(transport, &temp_dir);

    orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();
    assert_eq!(orchestrator.status(), ScanStatus::Error);

    orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();
    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Success);
    assert!(session.error.is_none());
    assert_eq!(classify(session.result.unwrap().risk_score), RiskBand::Critical);
}

#[tokio::test]
async fn test_download_report_resubmits_with_export() {
    let temp_dir = TempDir::new().unwrap();
    let encoded = general_purpose::STANDARD.encode(b"report");
    let body = format!(r#"{{"result": {{"riskScore": 30}}, "pdf_base64": "{encoded}"}}"#);
    let transport = StubTransport::with(vec![
        StubTransport::ok(200, r#"{"riskScore": 30}"#),
        StubTransport::ok(200, &body),
    ]);
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();
    let receipt = orchestrator.download_report().await.unwrap();
    receipt.report_save.expect("save task").await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(query(&calls[0], "pdf").as_deref(), Some("false"));
    assert_eq!(query(&calls[1], "pdf").as_deref(), Some("true"));
    assert_eq!(query(&calls[1], "target").as_deref(), Some("example.com"));
    assert!(matches!(orchestrator.snapshot().report, ReportStatus::Saved(_)));
}

#[tokio::test]
async fn test_download_report_needs_previous_scan() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::default();
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let err = orchestrator.download_report().await.unwrap_err();

    assert_eq!(err, SubmitError::NothingToRepeat);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_abandoned_submit_releases_guard() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StallingTransport::default();
    let orchestrator = orchestrator(transport.clone(), &temp_dir);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        orchestrator.submit(ScanConfiguration::new("example.com")),
    )
    .await;
    assert!(timed_out.is_err());

    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Error);
    assert!(session.error_message().unwrap().contains("scan aborted"));

    let receipt = orchestrator.submit(ScanConfiguration::new("example.com")).await.unwrap();
    assert_eq!(receipt.status, ScanStatus::Success);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_report_save_failure_keeps_result() {
    let temp_dir = TempDir::new().unwrap();
    // A regular file where the report directory should be.
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let encoded = general_purpose::STANDARD.encode(b"%PDF-1.7");
    let body = format!(r#"{{"result": {{"riskScore": 65}}, "reportBase64": "{encoded}"}}"#);
    let transport = StubTransport::with(vec![StubTransport::ok(200, &body)]);
    let orchestrator = ScanOrchestrator::new(transport, endpoint(), blocker).unwrap();

    let mut config = ScanConfiguration::new("example.com");
    config.export_report = true;
    let receipt = orchestrator.submit(config).await.unwrap();
    receipt.report_save.expect("save task").await.unwrap();

    let session = orchestrator.snapshot();
    assert_eq!(session.status, ScanStatus::Success);
    assert_eq!(session.result.unwrap().risk_score, 65.0);
    assert!(session.error.is_none());
    assert!(matches!(session.report, ReportStatus::SaveFailed(_)));
}

#[tokio::test]
async fn test_report_mode_without_result_fails_session() {
    let temp_dir = TempDir::new().unwrap();
    let encoded = general_purpose::STANDARD.encode(b"%PDF-1.7");
    let body = format!(r#"{{"reportBase64": "{encoded}"}}"#);
    let transport = StubTransport::with(vec![StubTransport::ok(200, &body)]);
    let orchestrator = orchestrator(transport, &temp_dir);

    let mut config = ScanConfiguration::new("example.com");
    config.export_report = true;
    let receipt = orchestrator.submit(config).await.unwrap();

    assert_eq!(receipt.status, ScanStatus::Error);
    assert!(receipt.report_save.is_none());
    let session = orchestrator.snapshot();
    assert!(session.result.is_none());
    assert_eq!(session.error, Some(SessionError::Decode(DecodeError::MissingResult)));
    assert!(!temp_dir.path().join("scan-report.pdf").exists());
}

#[tokio::test]
async fn test_malformed_report_keeps_result() {
    let temp_dir = TempDir::new().unwrap();
    let transport = StubTransport::with(vec![StubTransport::ok(
        200,
        r#"{"result": {"riskScore": 22}, "reportBase64": "%%% not base64 %%%"}"#,
    )]);
    let orchestrator = orchestrator(transport, &temp_dir);

    let mut config = ScanConfiguration::new("example.com");
    config.export_report = true;
    let receipt = orchestrator.submit(config).await.unwrap();

    assert_eq!(receipt.status, ScanStatus::Success);
    assert!(receipt.report_save.is_none());
    let session = orchestrator.snapshot();
    assert_eq!(session.result.unwrap().risk_score, 22.0);
    assert!(matches!(session.report, ReportStatus::Unavailable(DecodeError::MalformedReport(_))));
    assert!(!temp_dir.path().join("scan-report.pdf").exists());
}
