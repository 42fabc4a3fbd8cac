use std::time::Duration;

use async_trait::async_trait;
use planner_core::model::{DailyTask, ScheduleDay};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ScheduleProvider;
use crate::error::ScheduleError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Reads plans from the study-planner REST backend.
#[derive(Clone)]
pub struct HttpScheduleProvider {
    client: Client,
    config: BackendConfig,
}

impl HttpScheduleProvider {
    /// # Errors
    ///
    /// Returns `ScheduleError::Http` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, ScheduleError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ScheduleError> {
        let url = self.config.endpoint(path);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            tracing::warn!(%url, status = %response.status(), "schedule request failed");
            return Err(ScheduleError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScheduleProvider for HttpScheduleProvider {
    async fn weekly_schedule(&self) -> Result<Vec<ScheduleDay>, ScheduleError> {
        let body: WeeklyResponse = self.get("/api/schedule/weekly").await?;
        Ok(body.schedule)
    }

    async fn daily_tasks(&self) -> Result<Vec<DailyTask>, ScheduleError> {
        let body: DailyResponse = self.get("/api/tasks/daily").await?;
        Ok(body.tasks)
    }
}

#[derive(Debug, Deserialize)]
struct WeeklyResponse {
    schedule: Vec<ScheduleDay>,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    tasks: Vec<DailyTask>,
}
