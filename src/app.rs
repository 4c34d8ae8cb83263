// src/app.rs

use fastscan_tui::core::client::HttpTransport;
use fastscan_tui::core::findings::ScanSummary;
use fastscan_tui::core::models::{ScanConfiguration, ScanMode};
use fastscan_tui::core::session::{ScanOrchestrator, ScanSession, ScanStatus};
use ratatui::widgets::ScrollbarState;
use strum::{Display, EnumIter, IntoEnumIterator};

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// What the screen is showing. The session's own status drives the transitions,
/// except that the user can leave a finished scan to edit the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum ResultTab {
    #[default]
    Ports,
    Alerts,
    Pages,
    #[strum(to_string = "AI Analysis")]
    Ai,
}

impl ResultTab {
    pub fn index(self) -> usize {
        ResultTab::iter().position(|t| t == self).unwrap_or(0)
    }

    fn step(self, forward: bool) -> Self {
        let tabs: Vec<ResultTab> = ResultTab::iter().collect();
        let len = tabs.len();
        let next = if forward { (self.index() + 1) % len } else { (self.index() + len - 1) % len };
        tabs[next]
    }
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub mode: ScanMode,
    pub crawl: bool,
    pub use_llm: bool,
    pub export_report: bool,
    /// Last session snapshot, refreshed every tick.
    pub session: ScanSession,
    pub summary: ScanSummary,
    /// One-off message for things the session itself does not record, such as a rejected submit.
    pub notice: Option<String>,
    pub tab: ResultTab,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub spinner_frame: usize,
    pub orchestrator: ScanOrchestrator<HttpTransport>,
}

impl App {
    pub fn new(orchestrator: ScanOrchestrator<HttpTransport>) -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            mode: ScanMode::default(),
            crawl: false,
            use_llm: true,
            export_report: false,
            session: orchestrator.snapshot(),
            summary: ScanSummary::default(),
            notice: None,
            tab: ResultTab::default(),
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            spinner_frame: 0,
            orchestrator,
        }
    }

    /// The configuration the form currently describes.
    pub fn configuration(&self) -> ScanConfiguration {
        ScanConfiguration {
            target: self.input.clone(),
            mode: self.mode,
            crawl: self.crawl,
            use_llm: self.use_llm,
            export_report: self.export_report,
        }
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.step(true);
        self.reset_scroll();
    }

    pub fn previous_tab(&mut self) {
        self.tab = self.tab.step(false);
        self.reset_scroll();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
    }

    /// Pulls the latest session state and moves the screen along with it.
    pub fn sync(&mut self) {
        let session = self.orchestrator.snapshot();
        let new_scan = session.generation() != self.session.generation();
        match session.status {
            ScanStatus::Scanning => self.state = AppState::Scanning,
            ScanStatus::Success | ScanStatus::Error
                if new_scan || self.state == AppState::Scanning =>
            {
                self.state = AppState::Finished;
                self.tab = ResultTab::default();
                self.reset_scroll();
            }
            _ => {}
        }
        if new_scan || session.result != self.session.result {
            self.summary = session.result.as_ref().map(ScanSummary::from_result).unwrap_or_default();
        }
        self.session = session;
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Scanning {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        self.sync();
    }

    pub fn quit(&mut self) { self.should_quit = true; }

    /// Back to the form for a new scan. The previous target and options stay filled in.
    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.notice = None;
        self.tab = ResultTab::default();
        self.reset_scroll();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn app() -> App {
        let orchestrator = ScanOrchestrator::new(
            HttpTransport::new().unwrap(),
            Url::parse("http://127.0.0.1:8000").unwrap(),
            std::env::temp_dir(),
        )
        .unwrap();
        App::new(orchestrator)
    }

    #[test]
    fn test_tabs_wrap_both_ways() {
        let mut app = app();
        assert_eq!(app.tab, ResultTab::Ports);
        app.previous_tab();
        assert_eq!(app.tab, ResultTab::Ai);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.tab, ResultTab::Alerts);
    }

    #[test]
    fn test_configuration_reflects_form() {
        let mut app = app();
        app.input = "example.com".to_string();
        app.cycle_mode();
        app.crawl = true;
        let config = app.configuration();
        assert_eq!(config.target, "example.com");
        assert_eq!(config.mode, ScanMode::Deep);
        assert!(config.crawl);
        assert!(!config.export_report);
    }

    #[test]
    fn test_sync_on_idle_session_keeps_form() {
        let mut app = app();
        app.sync();
        assert_eq!(app.state, AppState::Idle);
        assert!(app.session.result.is_none());
        assert_eq!(app.summary, ScanSummary::default());
    }
}
