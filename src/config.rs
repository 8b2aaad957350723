//! Runtime configuration read from the environment
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_CACHE_DIR: &str = ".cache";
const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub cache_dir: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
    pub page_size: u32,
    pub http_timeout: Duration,
}

impl Config {
    /// Load from the process environment after reading `.env` if present
    pub fn from_env() -> Self {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let page_size = get("MELODY_PAGE_SIZE")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let timeout_secs = get("MELODY_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            api_url: get("MELODY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_dir: PathBuf::from(get("MELODY_CACHE_DIR").unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string())),
            username: get("MELODY_USERNAME"),
            password: lookup("MELODY_PASSWORD").filter(|v| !v.is_empty()),
            page_size,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.cache_dir.join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.cache_dir, PathBuf::from(".cache"));
        assert_eq!(config.username, None);
        assert_eq!(config.password, None);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.session_file(), PathBuf::from(".cache/session.json"));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("MELODY_API_URL", "https://music.example.com/api/"),
            ("MELODY_CACHE_DIR", "/tmp/melody"),
            ("MELODY_USERNAME", " alice "),
            ("MELODY_PASSWORD", " secret "),
            ("MELODY_HTTP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.api_url, "https://music.example.com/api");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/melody"));
        assert_eq!(config.username.as_deref(), Some("alice"));
        // passwords are taken verbatim
        assert_eq!(config.password.as_deref(), Some(" secret "));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(config_from(&[("MELODY_PAGE_SIZE", "0")]).page_size, 1);
        assert_eq!(config_from(&[("MELODY_PAGE_SIZE", "500")]).page_size, 100);
        assert_eq!(config_from(&[("MELODY_PAGE_SIZE", "20")]).page_size, 20);
        assert_eq!(config_from(&[("MELODY_PAGE_SIZE", "lots")]).page_size, 50);
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = config_from(&[("MELODY_API_URL", "  "), ("MELODY_HTTP_TIMEOUT_SECS", "0")]);
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
