use std::{env, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub csrf_token: Option<String>,
    pub session_id: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend_url = lookup("BACKEND_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let timeout_secs = lookup("BACKEND_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            port,
            backend_url,
            csrf_token: lookup("BACKEND_CSRF_TOKEN").filter(|value| !value.is_empty()),
            session_id: lookup("BACKEND_SESSION_ID").filter(|value| !value.is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
