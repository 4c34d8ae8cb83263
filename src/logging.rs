// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::fs::OpenOptions;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.as_str());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Directive used when neither `RUST_LOG` nor the project variable is set.
fn default_directive() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

/// Application data directory; log file and fallback report location live here.
pub fn get_data_dir() -> PathBuf {
    ProjectDirs::from("com", "fastscan", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

/// Picks the filter directive: `RUST_LOG` first, then `FASTSCAN_TUI_LOGLEVEL`.
pub fn resolve_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["RUST_LOG", LOG_ENV.as_str()]
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(default_directive)
}

/// Sends all tracing output to `fastscan-tui.log` in the data directory and
/// returns its path.
///
/// The terminal is owned by the UI, so nothing is written to stdout or stderr.
/// The file is appended to, so earlier sessions stay available.
pub fn initialize_logging() -> Result<PathBuf> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_path = directory.join(LOG_FILE.as_str());
    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let directive = resolve_directive(|key| std::env::var(key).ok());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(LocalTime::new(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        )))
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(PROJECT_NAME.as_str(), "FASTSCAN_TUI");
        assert_eq!(LOG_ENV.as_str(), "FASTSCAN_TUI_LOGLEVEL");
        assert_eq!(LOG_FILE.as_str(), "fastscan-tui.log");
    }

    #[test]
    fn test_directive_precedence() {
        let both = |key: &str| match key {
            "RUST_LOG" => Some("debug".to_string()),
            "FASTSCAN_TUI_LOGLEVEL" => Some("warn".to_string()),
            _ => None,
        };
        assert_eq!(resolve_directive(both), "debug");

        let project_only = |key: &str| (key == "FASTSCAN_TUI_LOGLEVEL").then(|| "trace".to_string());
        assert_eq!(resolve_directive(project_only), "trace");

        let blank = |_: &str| Some("  ".to_string());
        assert_eq!(resolve_directive(blank), "fastscan_tui=info");
    }
}
