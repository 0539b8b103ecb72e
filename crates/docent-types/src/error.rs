use thiserror::Error;

/// Coarse failure taxonomy surfaced at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, I/O error, or an unreadable response.
    Transport,
    /// The backend answered with a non-2xx status.
    Server,
    /// A document-grounded query was attempted with no bound session.
    PreconditionNotMet,
}

/// Why a single backend request failed.
#[derive(Debug, Clone, Error)]
pub enum RequestFailure {
    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl RequestFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            RequestFailure::Transport(_) | RequestFailure::Decode(_) => FailureKind::Transport,
            RequestFailure::Server { .. } => FailureKind::Server,
        }
    }
}

/// Errors from backend client operations, one variant per request kind.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("upload failed: {0}")]
    UploadFailed(RequestFailure),

    #[error("query failed: {0}")]
    QueryFailed(RequestFailure),

    #[error("indexing failed: {0}")]
    IndexFailed(RequestFailure),

    #[error("summarize failed: {0}")]
    SummarizeFailed(RequestFailure),

    #[error("health check failed: {0}")]
    HealthCheckFailed(RequestFailure),
}

impl ApiError {
    /// The underlying request failure.
    pub fn failure(&self) -> &RequestFailure {
        match self {
            ApiError::UploadFailed(f)
            | ApiError::QueryFailed(f)
            | ApiError::IndexFailed(f)
            | ApiError::SummarizeFailed(f)
            | ApiError::HealthCheckFailed(f) => f,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.failure().kind()
    }
}

/// Errors from the conversation orchestration layer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no document session is bound to this conversation")]
    PreconditionNotMet,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("chat driver has shut down")]
    DriverClosed,
}

impl ChatError {
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ChatError::PreconditionNotMet => Some(FailureKind::PreconditionNotMet),
            ChatError::Api(e) => Some(e.kind()),
            ChatError::DriverClosed => None,
        }
    }
}

/// Errors in the effective client configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': expected an http:// or https:// address")]
    InvalidBaseUrl(String),

    #[error("invalid route '{0}': routes must start with '/'")]
    InvalidRoute(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors reading a document from disk before upload.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(String),

    #[error("unsupported document type '{0}': only PDF files are accepted")]
    Unsupported(String),

    #[error("document is empty")]
    Empty,
}
