//! Client configuration from environment variables.
//!
//! SCIHEALTH_API_URL            base URL of the REST API (default: the hosted service)
//! SCIHEALTH_SESSION_FILE       where the CLI keeps its session between runs
//! SCIHEALTH_HTTP_TIMEOUT_SECS  per-request transport timeout; unset or 0 disables it

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "https://v-nement-scientifique.onrender.com/api";
pub const DEFAULT_SESSION_FILE: &str = ".scihealth_session.json";

pub const ENV_API_URL: &str = "SCIHEALTH_API_URL";
pub const ENV_SESSION_FILE: &str = "SCIHEALTH_SESSION_FILE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SCIHEALTH_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self { Self::new(DEFAULT_API_URL) }
}

impl ClientConfig {
    pub fn new<S: Into<String>>(api_url: S) -> Self {
        Self { api_url: api_url.into(), session_file: PathBuf::from(DEFAULT_SESSION_FILE), http_timeout: None }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let api_url = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| {
            info!(target: "config", "{} not set, using default: {}", ENV_API_URL, DEFAULT_API_URL);
            DEFAULT_API_URL.to_string()
        });
        let session_file = lookup(ENV_SESSION_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
        let http_timeout = lookup(ENV_HTTP_TIMEOUT_SECS).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(e) => {
                warn!(target: "config", "Invalid {} value '{}': {}; no timeout", ENV_HTTP_TIMEOUT_SECS, raw, e);
                None
            }
        });
        Self { api_url: api_url.trim().to_string(), session_file, http_timeout }
    }

    /// The API URL with a trailing slash so relative endpoint joins keep its path.
    pub fn api_base_url(&self) -> String {
        let trimmed = self.api_url.trim();
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{}/", trimmed) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> ClientConfig {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ClientConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from_map(&[]);
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.api_base_url(), "https://v-nement-scientifique.onrender.com/api/");
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_map(&[
            (ENV_API_URL, " http://127.0.0.1:9000/api/ "),
            (ENV_SESSION_FILE, "/tmp/s.json"),
            (ENV_HTTP_TIMEOUT_SECS, "15"),
        ]);
        assert_eq!(cfg.api_base_url(), "http://127.0.0.1:9000/api/");
        assert_eq!(cfg.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(cfg.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_or_zero_timeout_disables_it() {
        assert_eq!(from_map(&[(ENV_HTTP_TIMEOUT_SECS, "soon")]).http_timeout, None);
        assert_eq!(from_map(&[(ENV_HTTP_TIMEOUT_SECS, "0")]).http_timeout, None);
    }
}
