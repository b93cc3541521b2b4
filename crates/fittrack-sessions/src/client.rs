//! HTTP client for the sessions API.

use std::time::Duration;

use async_trait::async_trait;
use fittrack_core::ReqwestErrorExt;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::FetchError;
use crate::types::{Session, WeatherObservation};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of sessions and their weather observations.
///
/// Both calls are single-shot: no paging, caching or retry.
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// Fetch every session available for display.
    async fn list_sessions(&self) -> Result<Vec<Session>, FetchError>;

    /// Fetch the weather observations recorded for one session.
    async fn get_weather(&self, session_id: i64) -> Result<Vec<WeatherObservation>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct SessionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SessionClient {
    /// Create a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::from(e.into_network_error()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GET {} returned {}", url, status);
            return Err(FetchError::fetch_failed(format!(
                "HTTP {} fetching {}",
                status.as_u16(),
                url
            )));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Invalid JSON from {}: {}", url, e);
            FetchError::fetch_failed(format!("Invalid response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl SessionQuery for SessionClient {
    #[instrument(skip(self), level = "info")]
    async fn list_sessions(&self) -> Result<Vec<Session>, FetchError> {
        let url = format!("{}/sessions/", self.base_url);
        let sessions: Vec<Session> = self.fetch_json(&url).await?;
        tracing::debug!("Fetched {} sessions", sessions.len());
        Ok(sessions)
    }

    #[instrument(skip(self), level = "info")]
    async fn get_weather(&self, session_id: i64) -> Result<Vec<WeatherObservation>, FetchError> {
        let url = format!("{}/sessions/{}/weather", self.base_url, session_id);
        let observations: Vec<WeatherObservation> = self.fetch_json(&url).await?;
        tracing::debug!(
            "Fetched {} weather observations for session {}",
            observations.len(),
            session_id
        );
        Ok(observations)
    }
}
