//! BackendClient: concrete [`RagBackend`] and [`SummaryBackend`] over HTTP.
//!
//! Every request is a single attempt with no timeout. Uploads are multipart
//! with a `file` part; queries and summarize requests send plain form fields
//! the same way. Non-2xx answers are turned into [`RequestFailure::Server`],
//! carrying the backend's `{"error": ..}` text when there is one.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use docent_core::backend::provider::{RagBackend, SummaryBackend};
use docent_types::api::{
    DocumentFile, ErrorBody, HealthReply, IndexReceipt, QueryReply, QueryRequest, SummaryReply,
    UploadReceipt,
};
use docent_types::config::{ChunkingConfig, ClientConfig, RouteSet};
use docent_types::error::{ApiError, ConfigError, RequestFailure};
use docent_types::mode::ChatMode;

/// HTTP client bound to one chat mode's upload and query routes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    routes: RouteSet,
    index_route: String,
    summarize_route: String,
    health_route: String,
    chunking: ChunkingConfig,
}

impl BackendClient {
    /// Build a client for `mode` from the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL or a route is malformed, or if
    /// the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, mode: ChatMode) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            routes: config.routes.for_mode(mode).clone(),
            index_route: config.routes.index.clone(),
            summarize_route: config.routes.summarize.clone(),
            health_route: config.routes.health.clone(),
            chunking: config.chunking,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the backend's root route.
    pub async fn health(&self) -> Result<HealthReply, ApiError> {
        let url = self.url(&self.health_route);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::HealthCheckFailed(transport(e)))?;
        decode(response).await.map_err(ApiError::HealthCheckFailed)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn file_part(file: &DocumentFile) -> Result<Part, RequestFailure> {
        Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| {
                RequestFailure::Transport(format!("invalid MIME type '{}': {e}", file.mime))
            })
    }

    fn with_chunking(&self, form: Form) -> Form {
        form.text("max_chars", self.chunking.max_chars.to_string())
            .text("overlap", self.chunking.overlap.to_string())
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, RequestFailure> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

fn transport(err: reqwest::Error) -> RequestFailure {
    RequestFailure::Transport(err.to_string())
}

/// Map a response to `T`, or to a failure describing why it is not one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestFailure> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body,
        };
        return Err(RequestFailure::Server {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| RequestFailure::Decode(e.to_string()))
}

impl RagBackend for BackendClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ApiError> {
        let part = Self::file_part(file).map_err(ApiError::UploadFailed)?;
        let mut form = Form::new().part("file", part);
        if self.routes.send_chunking {
            form = self.with_chunking(form);
        }
        self.post(&self.routes.upload, form)
            .await
            .map_err(ApiError::UploadFailed)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, ApiError> {
        let mut form = Form::new()
            .text("query", request.query.clone())
            .text("model", request.model.clone());
        if let Some(session_id) = &request.session_id {
            form = form.text("session_id", session_id.clone());
        }
        self.post(&self.routes.query, form)
            .await
            .map_err(ApiError::QueryFailed)
    }
}

impl SummaryBackend for BackendClient {
    async fn index_document(&self, file: &DocumentFile) -> Result<IndexReceipt, ApiError> {
        let part = Self::file_part(file).map_err(ApiError::IndexFailed)?;
        let form = self.with_chunking(Form::new().part("file", part));
        self.post(&self.index_route, form)
            .await
            .map_err(ApiError::IndexFailed)
    }

    async fn summarize(&self, query: &str, model: &str) -> Result<SummaryReply, ApiError> {
        let form = Form::new()
            .text("query", query.to_string())
            .text("model", model.to_string());
        self.post(&self.summarize_route, form)
            .await
            .map_err(ApiError::SummarizeFailed)
    }
}
