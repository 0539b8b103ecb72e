//! Request and response shapes exchanged with the question-answering backend.
//!
//! Field names follow the backend's JSON. Fields the backend omits on some
//! routes are optional or defaulted so one type serves every route.

use serde::{Deserialize, Serialize};

use crate::conversation::Attachment;

/// A document read into memory, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    /// File name sent in the multipart part (no directory components).
    pub name: String,
    /// MIME type sent with the part.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub const PDF_MIME: &'static str = "application/pdf";

    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Convenience constructor for PDF documents.
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, Self::PDF_MIME, bytes)
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == Self::PDF_MIME
    }

    /// Metadata-only reference suitable for attaching to a message.
    pub fn attachment(&self) -> Attachment {
        Attachment {
            name: self.name.clone(),
            size_bytes: self.size_bytes(),
        }
    }
}

/// A conversational query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    /// Session token from a prior upload; omitted from the request when `None`.
    pub session_id: Option<String>,
    pub model: String,
}

/// Successful response to a document upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub session_id: String,
    pub filename: String,
    #[serde(rename = "num_chunks", default)]
    pub chunk_count: u32,
}

/// One turn of the backend's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Successful response to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReply {
    pub answer: String,
    /// Session the backend answered in. Some routes do not echo it.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(rename = "chat_history", default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

/// Acknowledgment of an index-only upload (no session is created).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "num_chunks", default)]
    pub chunk_count: Option<u32>,
}

/// Response to a summarize request over the most recently indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReply {
    #[serde(default)]
    pub summary: Option<String>,
}

/// Response to the backend health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub message: String,
}

/// Error body the backend returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
