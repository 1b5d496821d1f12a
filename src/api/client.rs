use crate::api::types::{ErrorBody, OperationId, ParseResponse};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use std::path::Path;
use std::time::Duration;

/// Seam between the workflow and whatever answers parse requests.
#[allow(async_fn_in_trait)]
pub trait ParseBackend {
    async fn upload_and_parse(&self, file: &Path) -> ApiResult<ParseResponse>;

    async fn get_staging_data(&self, operation_id: &OperationId) -> ApiResult<ParseResponse>;
}

/// HTTP client for the parsing service. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct ParseApiClient {
    base_url: Url,
    timeout: Duration,
    http: reqwest::Client,
}

impl ParseApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let timeout = Duration::from_secs(config.timeout_seconds);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Where the service publishes the debug dump of its last parse.
    pub fn debug_log_url(&self) -> ApiResult<Url> {
        self.endpoint(&["debug"])
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Transport(format!(
                "Request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    async fn decode(&self, response: Response) -> ApiResult<ParseResponse> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            return serde_json::from_slice::<ParseResponse>(&body)
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        match serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_detail)
        {
            Some(detail) => Err(ApiError::Service {
                status: status.as_u16(),
                detail,
            }),
            None => Err(ApiError::Status(status.as_u16())),
        }
    }
}

impl ParseBackend for ParseApiClient {
    async fn upload_and_parse(&self, file: &Path) -> ApiResult<ParseResponse> {
        let content = tokio::fs::read(file).await.map_err(|source| ApiError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new().part("file", Part::bytes(content).file_name(file_name));
        let url = self.endpoint(&["api", "upload", "parse"])?;

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(response).await
    }

    async fn get_staging_data(&self, operation_id: &OperationId) -> ApiResult<ParseResponse> {
        let url = self.endpoint(&["api", "operation", operation_id.as_str(), "staging"])?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(response).await
    }
}
