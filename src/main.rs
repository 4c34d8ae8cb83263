// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use fastscan_tui::config::Settings;
use fastscan_tui::core::client::HttpTransport;
use fastscan_tui::core::error::SubmitError;
use fastscan_tui::core::session::{ScanOrchestrator, ScanStatus, SubmitReceipt};
use fastscan_tui::logging;

mod app;
mod ui;

use app::{App, AppState};

/// Outcome of a background submit, reported back to the event loop.
type SubmitOutcome = Result<ScanStatus, SubmitError>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = logging::initialize_logging()?;
    let settings = Settings::from_env()?;
    info!(
        endpoint = %settings.endpoint,
        report_dir = %settings.report_dir.display(),
        log = %log_path.display(),
        "Starting fastscan-tui."
    );

    let orchestrator = ScanOrchestrator::new(HttpTransport::new()?, settings.endpoint, settings.report_dir)?;
    let mut app = App::new(orchestrator);

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let (tx, mut rx) = mpsc::channel::<SubmitOutcome>(4);
    let run_result = run(&mut terminal, &mut app, &tx, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    run_result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tx: &mpsc::Sender<SubmitOutcome>,
    rx: &mut mpsc::Receiver<SubmitOutcome>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, tx)?;
        }

        while let Ok(outcome) = rx.try_recv() {
            match outcome {
                Ok(status) => info!(status = %status, "Background scan settled."),
                Err(e) => app.notice = Some(e.to_string()),
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn handle_events(app: &mut App, tx: &mpsc::Sender<SubmitOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, tx),
                AppState::Finished => handle_finished_input(app, key.code, tx),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') { app.quit(); }
                }
            }
        }
    }
    Ok(())
}

/// Form editing: typing, option toggles, Enter to submit.
fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<SubmitOutcome>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => { app.input.pop(); },
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::F(2) => app.crawl = !app.crawl,
        KeyCode::F(3) => app.use_llm = !app.use_llm,
        KeyCode::F(4) => app.export_report = !app.export_report,
        KeyCode::Enter => {
            let config = app.configuration();
            // Validate up front so a blank target never leaves the form.
            if let Err(e) = config.clone().validated() {
                app.notice = Some(e.to_string());
                return;
            }
            app.notice = None;
            spawn_submit(app, tx, move |orchestrator| async move { orchestrator.submit(config).await });
        }
        _ => {}
    }
}

/// Result view: tabs, scrolling, new scan, report download.
fn handle_finished_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<SubmitOutcome>) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('d') => {
            app.notice = None;
            spawn_submit(app, tx, |orchestrator| async move { orchestrator.download_report().await });
        }
        KeyCode::Left => app.previous_tab(),
        KeyCode::Right => app.next_tab(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

/// Runs a submit on the runtime and reports its outcome back over `tx`.
/// The screen switches to scanning on the next tick, once the session says so.
fn spawn_submit<F, Fut>(app: &App, tx: &mpsc::Sender<SubmitOutcome>, submit: F)
where
    F: FnOnce(ScanOrchestrator<HttpTransport>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<SubmitReceipt, SubmitError>> + Send,
{
    let orchestrator = app.orchestrator.clone();
    let tx_clone = tx.clone();
    tokio::spawn(async move {
        let outcome = submit(orchestrator).await.map(|receipt| receipt.status);
        if let Err(e) = &outcome {
            warn!(error = %e, "Submit refused.");
        }
        let _ = tx_clone.send(outcome).await;
    });
}
