use crate::{
    error::{SdkError, SdkResult},
    models::{CalculationRequest, CalculationResponse, HealthResponse},
};
use reqwest::{
    blocking::{Client, RequestBuilder},
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    StatusCode,
};
use roi_core::config::ApiConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_VERSION_PREFIX: &str = "/v1";

pub struct CalculatorClient {
    http:     Client,
    base_url: String,
}

impl CalculatorClient {
    /// Build a client. Fails only if the API key cannot be sent as a
    /// header or the HTTP client cannot be constructed.
    pub fn new(api_key: Option<&str>, base_url: &str, timeout: Duration) -> SdkResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| SdkError::InvalidApiKey(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> SdkResult<Self> {
        Self::new(
            config.api_key.as_deref(),
            &config.base_url,
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One attempt, no retry. Any failure becomes a zeroed response
    /// carrying the error message.
    pub fn calculate_roi(&self, request: &CalculationRequest) -> CalculationResponse {
        let call = self.http.post(self.endpoint("/calculator/roi")).json(request);
        match self.execute::<CalculationResponse>(call) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("sdk: calculate_roi failed: {e}");
                CalculationResponse::failure(e.to_string())
            }
        }
    }

    pub fn health_check(&self) -> HealthResponse {
        let call = self.http.get(self.endpoint("/health"));
        match self.execute::<HealthResponse>(call) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("sdk: health_check failed: {e}");
                HealthResponse::failure(e.to_string())
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{API_VERSION_PREFIX}{path}", self.base_url)
    }

    fn execute<T: DeserializeOwned>(&self, call: RequestBuilder) -> SdkResult<T> {
        let response = call.send().map_err(classify)?;
        let status = response.status();
        let body = response.text().map_err(classify)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| SdkError::Decode(e.to_string()))
    }
}

fn classify(e: reqwest::Error) -> SdkError {
    if e.is_timeout() {
        SdkError::Timeout
    } else {
        SdkError::Transport(e)
    }
}

/// Prefer the server's own `error` string; fall back to status + body.
fn status_error(status: StatusCode, body: &str) -> SdkError {
    let payload_error = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));

    match payload_error {
        Some(message) => SdkError::Server(message),
        None => SdkError::Status {
            status: status.as_u16(),
            body: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body.to_string()
            },
        },
    }
}
