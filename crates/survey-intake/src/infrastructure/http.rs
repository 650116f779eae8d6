//! HTTP survey store
//!
//! Talks to the survey REST API under `{base_url}/surveys`.

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::SyncConfig;
use crate::domain::value_objects::{SurveyId, SurveyPayload, SurveyRecord};
use crate::error::Result;
use crate::ports::outbound::{StoreError, SurveyStore};

const SURVEYS_PATH: &str = "/surveys";

/// Survey store backed by the REST API
#[derive(Clone)]
pub struct HttpSurveyStore {
    base_url: String,
    http: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpSurveyStore {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("survey-intake/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url,
            http,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&SurveyPayload>,
        id: Option<SurveyId>,
    ) -> std::result::Result<Option<T>, StoreError> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(%method, path, status = status.as_u16(), attempt, "survey api response");

                    if status == StatusCode::NO_CONTENT {
                        return Ok(None);
                    }

                    let bytes = response
                        .bytes()
                        .await
                        .map_err(|e| StoreError::Transport(e.to_string()))?;

                    if status.is_success() {
                        if bytes.is_empty() {
                            return Ok(None);
                        }
                        return serde_json::from_slice(&bytes)
                            .map(Some)
                            .map_err(|e| StoreError::Decode(e.to_string()));
                    }

                    let message = error_message(&bytes, status);
                    match (status, id) {
                        (StatusCode::NOT_FOUND, Some(id)) => return Err(StoreError::NotFound(id)),
                        (status, _) if status.is_server_error() => StoreError::Server {
                            status: status.as_u16(),
                            message,
                        },
                        (status, _) => {
                            return Err(StoreError::Rejected {
                                status: status.as_u16(),
                                message,
                            })
                        }
                    }
                }
                Err(e) => StoreError::Transport(e.to_string()),
            };

            if error.is_retryable() && attempt < self.max_retries {
                let delay = backoff(self.retry_delay, attempt);
                warn!(%method, path, attempt, ?delay, error = %error, "retrying survey api request");
                last_error = Some(error);
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| StoreError::Transport("request failed".to_string())))
    }

    async fn expect_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&SurveyPayload>,
        id: Option<SurveyId>,
    ) -> std::result::Result<T, StoreError> {
        self.request(method, path, body, id)
            .await?
            .ok_or_else(|| StoreError::Decode("empty response body".to_string()))
    }
}

/// Pull the `message` (or `error`) out of a JSON error body, else the raw text.
fn error_message(bytes: &[u8], status: StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.message.filter(|m| !m.is_empty()).or(body.error))
        .or_else(|| {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

#[async_trait]
impl SurveyStore for HttpSurveyStore {
    async fn create(&self, payload: &SurveyPayload) -> std::result::Result<SurveyRecord, StoreError> {
        self.expect_body(Method::POST, SURVEYS_PATH, Some(payload), None).await
    }

    async fn list(&self) -> std::result::Result<Vec<SurveyRecord>, StoreError> {
        self.expect_body(Method::GET, SURVEYS_PATH, None, None).await
    }

    async fn get(&self, id: SurveyId) -> std::result::Result<SurveyRecord, StoreError> {
        let path = format!("{SURVEYS_PATH}/{id}");
        self.expect_body(Method::GET, &path, None, Some(id)).await
    }

    async fn update(
        &self,
        id: SurveyId,
        payload: &SurveyPayload,
    ) -> std::result::Result<SurveyRecord, StoreError> {
        let path = format!("{SURVEYS_PATH}/{id}");
        self.expect_body(Method::PUT, &path, Some(payload), Some(id)).await
    }

    async fn delete(&self, id: SurveyId) -> std::result::Result<(), StoreError> {
        let path = format!("{SURVEYS_PATH}/{id}");
        self.request::<serde_json::Value>(Method::DELETE, &path, None, Some(id))
            .await
            .map(|_| ())
    }

    async fn count(&self) -> std::result::Result<u64, StoreError> {
        let path = format!("{SURVEYS_PATH}/count");
        self.expect_body(Method::GET, &path, None, None).await
    }
}

/// `base * 2^attempt`, saturating instead of overflowing for large attempt counts
fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
}
