//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Booking client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `BOOKING_API_URL` — backend base URL (default: `"http://localhost:8000/api"`)
/// - `BOOKING_SESSION_DIR` — root of the session slots (default: `".session"`)
/// - `BOOKING_SESSION_ID` — session whose draft is used (default: `"default"`)
/// - `BOOKING_HTTP_TIMEOUT_MS` — request timeout (default: `10000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_dir: PathBuf,
    pub session_id: String,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("BOOKING_API_URL").unwrap_or(defaults.api_url),
            session_dir: lookup("BOOKING_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
            session_id: lookup("BOOKING_SESSION_ID").unwrap_or(defaults.session_id),
            http_timeout: lookup("BOOKING_HTTP_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.http_timeout),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            session_dir: PathBuf::from(".session"),
            session_id: "default".to_string(),
            http_timeout: Duration::from_millis(10_000),
            log_level: "info".to_string(),
        }
    }
}
