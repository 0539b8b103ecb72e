//! BoxRagBackend: object-safe wrapper around [`RagBackend`].
//!
//! 1. `RagBackendDyn` mirrors the trait with boxed futures.
//! 2. A blanket impl covers every `T: RagBackend`.
//! 3. `BoxRagBackend` holds `Box<dyn RagBackendDyn>` and delegates.

use std::future::Future;
use std::pin::Pin;

use docent_types::api::{DocumentFile, QueryReply, QueryRequest, UploadReceipt};
use docent_types::error::ApiError;

use super::provider::RagBackend;

/// Object-safe version of [`RagBackend`].
pub trait RagBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn upload_boxed<'a>(
        &'a self,
        file: &'a DocumentFile,
    ) -> Pin<Box<dyn Future<Output = Result<UploadReceipt, ApiError>> + Send + 'a>>;

    fn query_boxed<'a>(
        &'a self,
        request: &'a QueryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QueryReply, ApiError>> + Send + 'a>>;
}

impl<T: RagBackend> RagBackendDyn for T {
    fn name(&self) -> &str {
        RagBackend::name(self)
    }

    fn upload_boxed<'a>(
        &'a self,
        file: &'a DocumentFile,
    ) -> Pin<Box<dyn Future<Output = Result<UploadReceipt, ApiError>> + Send + 'a>> {
        Box::pin(self.upload(file))
    }

    fn query_boxed<'a>(
        &'a self,
        request: &'a QueryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QueryReply, ApiError>> + Send + 'a>> {
        Box::pin(self.query(request))
    }
}

/// Type-erased backend, so the orchestrator can be handed the HTTP client
/// or a test double without becoming generic.
pub struct BoxRagBackend {
    inner: Box<dyn RagBackendDyn + Send + Sync>,
}

impl BoxRagBackend {
    pub fn new<T: RagBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ApiError> {
        self.inner.upload_boxed(file).await
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<QueryReply, ApiError> {
        self.inner.query_boxed(request).await
    }
}

impl std::fmt::Debug for BoxRagBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxRagBackend")
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::error::RequestFailure;

    struct EchoBackend;

    impl RagBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ApiError> {
            Ok(UploadReceipt {
                message: None,
                session_id: format!("sess-{}", file.name),
                filename: file.name.clone(),
                chunk_count: 1,
            })
        }

        async fn query(&self, request: &QueryRequest) -> Result<QueryReply, ApiError> {
            if request.query == "fail" {
                return Err(ApiError::QueryFailed(RequestFailure::Transport(
                    "refused".to_string(),
                )));
            }
            Ok(QueryReply {
                answer: request.query.to_uppercase(),
                session_id: request.session_id.clone(),
                history: Vec::new(),
                debug: None,
            })
        }
    }

    #[tokio::test]
    async fn test_box_backend_delegates() {
        let backend = BoxRagBackend::new(EchoBackend);
        assert_eq!(backend.name(), "echo");

        let receipt = backend
            .upload(&DocumentFile::pdf("a.pdf", vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(receipt.session_id, "sess-a.pdf");

        let reply = backend
            .query(&QueryRequest {
                query: "hi".to_string(),
                session_id: Some("s".to_string()),
                model: "m".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.answer, "HI");
        assert_eq!(reply.session_id.as_deref(), Some("s"));
    }

    #[tokio::test]
    async fn test_box_backend_propagates_errors() {
        let backend = BoxRagBackend::new(EchoBackend);
        let err = backend
            .query(&QueryRequest {
                query: "fail".to_string(),
                session_id: None,
                model: "m".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::QueryFailed(RequestFailure::Transport(_))));
    }
}
