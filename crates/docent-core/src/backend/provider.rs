//! Backend trait definitions.
//!
//! Uses RPITIT (Rust 2024 native async fn in traits). Dynamic dispatch goes
//! through [`super::box_backend::BoxRagBackend`].

use std::future::Future;

use docent_types::api::{
    DocumentFile, IndexReceipt, QueryReply, QueryRequest, SummaryReply, UploadReceipt,
};
use docent_types::error::ApiError;

/// Conversational document QA: upload a document to open a session, then
/// ask questions in that session.
///
/// Neither method retries. A failure is reported once and the caller decides
/// what the user sees.
pub trait RagBackend: Send + Sync {
    /// Short name for logs (e.g. "http").
    fn name(&self) -> &str;

    /// Send a document for ingestion and receive a session token.
    fn upload(
        &self,
        file: &DocumentFile,
    ) -> impl Future<Output = Result<UploadReceipt, ApiError>> + Send;

    /// Ask a question, optionally inside an existing session.
    fn query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryReply, ApiError>> + Send;
}

/// Index-then-summarize flow. The backend summarizes whatever document it
/// indexed last, so the two calls must be made back to back.
pub trait SummaryBackend: Send + Sync {
    fn index_document(
        &self,
        file: &DocumentFile,
    ) -> impl Future<Output = Result<IndexReceipt, ApiError>> + Send;

    fn summarize(
        &self,
        query: &str,
        model: &str,
    ) -> impl Future<Output = Result<SummaryReply, ApiError>> + Send;
}
