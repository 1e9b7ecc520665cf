//! HTTP client for the training plan backend.

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{
    CompletedRunEntry, CompletedRunsResponse, EditPayload, ErrorResponse, RunRecord, SavedStats,
    ScheduledRunsResponse, TodayRun, TodayRunResponse, UpdateRequest, UpdateResponse,
};
use chrono::Local;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
    csrf_token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie_header(config) {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(COOKIE, value);
            }
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.backend_url.clone(),
            client,
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// `None` when nothing is scheduled today.
    pub async fn todays_run(&self) -> Result<Option<TodayRun>, ApiError> {
        let raw: Option<TodayRunResponse> = self.get_json("/api/get-todays-run").await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let today = Local::now().date_naive().to_string();
        let mut run = raw.into_today_run(&today);
        if run.lacks_title() {
            match self.completed_runs().await {
                Ok(entries) => run.fill_from_completed(&entries),
                Err(err) => warn!("could not look up today's completed run: {err}"),
            }
        }
        Ok(Some(run))
    }

    pub async fn scheduled_runs(&self) -> Result<Vec<RunRecord>, ApiError> {
        let response: ScheduledRunsResponse = self.get_json("/api/get-scheduled-runs").await?;
        Ok(response.all_scheduled_runs.unwrap_or_default())
    }

    pub async fn completed_runs(&self) -> Result<Vec<CompletedRunEntry>, ApiError> {
        let response: CompletedRunsResponse = self.get_json("/api/get-completed-runs").await?;
        Ok(response.all_completed_runs.unwrap_or_default())
    }

    pub async fn update_completed_run(
        &self,
        payload: &EditPayload,
    ) -> Result<SavedStats, ApiError> {
        let url = self.url("/api/update-completed-run");
        let mut request = self.client.post(&url).json(&UpdateRequest { payload });
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        let body: UpdateResponse = decode(&url, response).await?;
        Ok(body.payload)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "fetching");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        decode(&url, response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(ApiError::Rejected {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    response.json().await.map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

fn cookie_header(config: &Config) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(token) = &config.csrf_token {
        parts.push(format!("csrftoken={token}"));
    }
    if let Some(session) = &config.session_id {
        parts.push(format!("sessionid={session}"));
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(csrf: Option<&str>, session: Option<&str>) -> Config {
        let mut config = Config::from_lookup(|_| None);
        config.csrf_token = csrf.map(str::to_string);
        config.session_id = session.map(str::to_string);
        config
    }

    #[test]
    fn cookie_carries_csrf_and_session() {
        assert_eq!(
            cookie_header(&config(Some("tok"), Some("sess"))).as_deref(),
            Some("csrftoken=tok; sessionid=sess")
        );
        assert_eq!(
            cookie_header(&config(None, Some("sess"))).as_deref(),
            Some("sessionid=sess")
        );
        assert_eq!(cookie_header(&config(None, None)), None);
    }

    #[test]
    fn urls_join_base_and_path() {
        let client = BackendClient::new(&config(None, None)).unwrap();
        assert_eq!(
            client.url("/api/get-todays-run"),
            "http://127.0.0.1:8000/api/get-todays-run"
        );
    }
}
