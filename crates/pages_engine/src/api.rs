use std::time::Duration;

use pages_logging::pages_debug;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Service root, e.g. `http://localhost:8000`. Paths are appended verbatim.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// POSTs a JSON body to `<base><path>` and returns the parsed JSON reply.
///
/// Any non-2xx status is a failure whose message is `HTTP <status>: <body>`.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::new(
                FailureKind::InvalidEndpoint,
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let endpoint = self.endpoint(path);
        pages_debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.map_err(map_reqwest_error)?;
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("HTTP {}: {}", status.as_u16(), text),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::MalformedResponse, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
