// src/config.rs

use std::path::PathBuf;

use directories::UserDirs;
use lazy_static::lazy_static;
use url::Url;

use crate::core::client::validate_endpoint;
use crate::core::error::ConfigError;
use crate::logging::{get_data_dir, PROJECT_NAME};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

lazy_static! {
    pub static ref ENDPOINT_ENV: String = format!("{}_ENDPOINT", PROJECT_NAME.clone());
    pub static ref REPORT_DIR_ENV: String = format!("{}_REPORT_DIR", PROJECT_NAME.clone());
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the scan service; `scan/combined` is joined onto it.
    pub endpoint: Url,
    /// Where decoded reports are saved.
    pub report_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_endpoint = get(ENDPOINT_ENV.as_str()).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&raw_endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            value: raw_endpoint.clone(),
            source,
        })?;
        validate_endpoint(&endpoint)?;

        let report_dir = get(REPORT_DIR_ENV.as_str())
            .map(PathBuf::from)
            .unwrap_or_else(default_report_dir);

        Ok(Self { endpoint, report_dir })
    }
}

/// The user's download directory, or the application data directory when
/// there is none.
pub fn default_report_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(get_data_dir)
}
