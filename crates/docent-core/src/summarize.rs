//! Index-then-summarize flow for a single document.
//!
//! The backend keeps one indexed document at a time and summarizes whatever
//! it indexed last. No session or conversation is involved.

use tracing::{info, warn};

use docent_types::api::DocumentFile;
use docent_types::error::ApiError;

use crate::backend::provider::SummaryBackend;

/// Shown when the backend returns an empty or missing summary.
pub const EMPTY_SUMMARY: &str = "No summary generated.";

pub struct Summarizer<B: SummaryBackend> {
    backend: B,
    query: String,
    model: String,
    processing: bool,
}

impl<B: SummaryBackend> Summarizer<B> {
    pub fn new(backend: B, query: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            backend,
            query: query.into(),
            model: model.into(),
            processing: false,
        }
    }

    /// Whether a summarize call is in progress.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Index `file`, then ask for its summary.
    ///
    /// The processing flag is cleared on every exit path.
    pub async fn summarize_document(&mut self, file: &DocumentFile) -> Result<String, ApiError> {
        self.processing = true;
        let result = self.run(file).await;
        self.processing = false;
        if let Err(err) = &result {
            warn!(file = %file.name, error = %err, "Summarize failed");
        }
        result
    }

    async fn run(&self, file: &DocumentFile) -> Result<String, ApiError> {
        let receipt = self.backend.index_document(file).await?;
        info!(
            file = %file.name,
            chunks = receipt.chunk_count.unwrap_or_default(),
            "Document indexed for summary"
        );

        let reply = self.backend.summarize(&self.query, &self.model).await?;
        Ok(reply
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| EMPTY_SUMMARY.to_string()))
    }
}
