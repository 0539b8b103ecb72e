//! Serialized mutation on a multi-threaded runtime.
//!
//! The driver task owns the [`Orchestrator`] outright. UI commands and
//! network completions arrive on the same mpsc queue and are applied one at a
//! time, so the store and binder never need a lock. Network calls run on
//! their own tasks and post their completion back onto the queue.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use docent_types::api::DocumentFile;
use docent_types::conversation::{Conversation, ConversationId, Message};
use docent_types::error::ChatError;
use docent_types::event::{ChatEvent, ChatStatus};
use docent_types::mode::ChatMode;

use crate::event::bus::EventBus;

use super::orchestrator::{Orchestrator, QueryCompletion, SubmitOutcome, UploadCompletion};

/// Point-in-time copy of the state a presentation layer renders.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub mode: ChatMode,
    pub model: String,
    /// Most recently created first.
    pub conversations: Vec<Conversation>,
    pub current: Option<ConversationId>,
    pub status: ChatStatus,
    /// Whether the current conversation has a document session.
    pub session_bound: bool,
}

impl ChatSnapshot {
    pub fn current_conversation(&self) -> Option<&Conversation> {
        let id = self.current?;
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Messages of the current conversation, empty if none is selected.
    pub fn messages(&self) -> &[Message] {
        self.current_conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }
}

enum Command {
    Submit(String),
    Upload(DocumentFile),
    Create(oneshot::Sender<ConversationId>),
    Select(ConversationId, oneshot::Sender<()>),
    Rename(ConversationId, String, oneshot::Sender<bool>),
    Delete(ConversationId, oneshot::Sender<bool>),
    ClearCurrent,
    SetModel(String),
    Snapshot(oneshot::Sender<ChatSnapshot>),
}

enum Envelope {
    Command(Command),
    QueryDone(QueryCompletion),
    UploadDone(UploadCompletion),
}

/// Owns the orchestrator and drains the mutation queue.
pub struct ChatDriver {
    orchestrator: Orchestrator,
    rx: mpsc::Receiver<Envelope>,
    // Weak so that dropping every handle stops the driver once in-flight
    // requests have reported back.
    completions: mpsc::WeakSender<Envelope>,
}

impl ChatDriver {
    async fn run(mut self) {
        while let Some(envelope) = self.rx.recv().await {
            match envelope {
                Envelope::Command(command) => self.handle(command).await,
                Envelope::QueryDone(completion) => {
                    self.orchestrator.apply_query(completion);
                }
                Envelope::UploadDone(completion) => {
                    self.orchestrator.apply_upload(completion);
                }
            }
        }
        debug!(mode = %self.orchestrator.mode(), "Chat driver stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Submit(text) => {
                let SubmitOutcome::Dispatch(pending) = self.orchestrator.begin_submit(&text) else {
                    return;
                };
                let backend = self.orchestrator.backend();
                match self.completions.upgrade() {
                    Some(tx) => {
                        tokio::spawn(async move {
                            let completion = pending.dispatch(backend).await;
                            let _ = tx.send(Envelope::QueryDone(completion)).await;
                        });
                    }
                    None => {
                        let completion = pending.dispatch(backend).await;
                        self.orchestrator.apply_query(completion);
                    }
                }
            }
            Command::Upload(file) => {
                let pending = self.orchestrator.begin_upload(file);
                let backend = self.orchestrator.backend();
                match self.completions.upgrade() {
                    Some(tx) => {
                        tokio::spawn(async move {
                            let completion = pending.dispatch(backend).await;
                            let _ = tx.send(Envelope::UploadDone(completion)).await;
                        });
                    }
                    None => {
                        let completion = pending.dispatch(backend).await;
                        self.orchestrator.apply_upload(completion);
                    }
                }
            }
            Command::Create(reply) => {
                let _ = reply.send(self.orchestrator.create_conversation());
            }
            Command::Select(id, reply) => {
                let _ = reply.send(self.orchestrator.select_conversation(id));
            }
            Command::Rename(id, title, reply) => {
                let _ = reply.send(self.orchestrator.rename_conversation(id, &title));
            }
            Command::Delete(id, reply) => {
                let _ = reply.send(self.orchestrator.delete_conversation(id));
            }
            Command::ClearCurrent => self.orchestrator.clear_current(),
            Command::SetModel(model) => self.orchestrator.set_model(model),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn snapshot(&self) -> ChatSnapshot {
        let store = self.orchestrator.store();
        ChatSnapshot {
            mode: self.orchestrator.mode(),
            model: self.orchestrator.model().to_string(),
            conversations: store.conversations().to_vec(),
            current: store.current_id(),
            status: self.orchestrator.status(),
            session_bound: self.orchestrator.current_session_bound(),
        }
    }
}

/// Start a driver task for `orchestrator` and return a handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn(orchestrator: Orchestrator, capacity: usize) -> DriverHandle {
    let events = orchestrator.events().clone();
    let (tx, rx) = mpsc::channel(capacity);
    let driver = ChatDriver {
        orchestrator,
        rx,
        completions: tx.downgrade(),
    };
    tokio::spawn(driver.run());
    DriverHandle { tx, events }
}

/// Cloneable front door to a running [`ChatDriver`].
///
/// `submit` and `upload` return once the action is queued; results arrive as
/// [`ChatEvent`]s.
#[derive(Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<Envelope>,
    events: EventBus,
}

impl DriverHandle {
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), ChatError> {
        self.send(Command::Submit(text.into())).await
    }

    pub async fn upload(&self, file: DocumentFile) -> Result<(), ChatError> {
        self.send(Command::Upload(file)).await
    }

    pub async fn create_conversation(&self) -> Result<ConversationId, ChatError> {
        self.request(Command::Create).await
    }

    pub async fn select_conversation(&self, id: ConversationId) -> Result<(), ChatError> {
        self.request(|reply| Command::Select(id, reply)).await
    }

    pub async fn rename_conversation(
        &self,
        id: ConversationId,
        title: impl Into<String>,
    ) -> Result<bool, ChatError> {
        let title = title.into();
        self.request(|reply| Command::Rename(id, title, reply)).await
    }

    pub async fn delete_conversation(&self, id: ConversationId) -> Result<bool, ChatError> {
        self.request(|reply| Command::Delete(id, reply)).await
    }

    pub async fn clear_current(&self) -> Result<(), ChatError> {
        self.send(Command::ClearCurrent).await
    }

    pub async fn set_model(&self, model: impl Into<String>) -> Result<(), ChatError> {
        self.send(Command::SetModel(model.into())).await
    }

    pub async fn snapshot(&self) -> Result<ChatSnapshot, ChatError> {
        self.request(Command::Snapshot).await
    }

    async fn send(&self, command: Command) -> Result<(), ChatError> {
        self.tx
            .send(Envelope::Command(command))
            .await
            .map_err(|_| ChatError::DriverClosed)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ChatError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| ChatError::DriverClosed)
    }
}

impl std::fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::sync::broadcast;

    use docent_types::api::{QueryReply, QueryRequest, UploadReceipt};
    use docent_types::conversation::Sender;
    use docent_types::error::ApiError;

    use crate::backend::box_backend::BoxRagBackend;
    use crate::backend::provider::RagBackend;

    /// Answers after a delay taken from the query text ("slow" waits).
    #[derive(Clone, Default)]
    struct DelayBackend {
        queries: Arc<Mutex<Vec<QueryRequest>>>,
    }

    impl RagBackend for DelayBackend {
        fn name(&self) -> &str {
            "delay"
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
            self.queries.lock().unwrap().push(request.clone());
            if request.query.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(QueryReply {
                answer: format!("answer to {}", request.query),
                session_id: request.session_id.clone(),
                history: Vec::new(),
                debug: None,
            })
        }
    }

    fn start(mode: ChatMode, backend: DelayBackend) -> DriverHandle {
        let orchestrator = Orchestrator::for_mode(
            mode,
            Arc::new(BoxRagBackend::new(backend)),
            EventBus::new(256),
            "gemma3:1b",
        );
        spawn(orchestrator, 32)
    }

    async fn next_reply(rx: &mut broadcast::Receiver<ChatEvent>) -> Message {
        let wait = async {
            loop {
                if let ChatEvent::MessageAppended { message, .. } = rx.recv().await.unwrap() {
                    if message.sender != Sender::User {
                        return message;
                    }
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("no reply within timeout")
    }

    #[tokio::test]
    async fn test_submit_through_driver() {
        let handle = start(ChatMode::General, DelayBackend::default());
        let mut rx = handle.subscribe();

        handle.submit("hello").await.unwrap();
        let reply = next_reply(&mut rx).await;
        assert_eq!(reply.content, "answer to hello");

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.conversations.len(), 1);
        assert_eq!(snapshot.messages().len(), 2);
        assert_eq!(snapshot.current_conversation().unwrap().title, "hello");
        assert!(snapshot.status.is_idle());
    }

    #[tokio::test]
    async fn test_overlapping_submits_through_driver() {
        let handle = start(ChatMode::General, DelayBackend::default());
        let mut rx = handle.subscribe();

        handle.submit("slow question").await.unwrap();
        handle.submit("fast question").await.unwrap();
        next_reply(&mut rx).await;
        next_reply(&mut rx).await;

        let snapshot = handle.snapshot().await.unwrap();
        let texts: Vec<&str> = snapshot
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "slow question",
                "fast question",
                "answer to fast question",
                "answer to slow question",
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_then_submit_through_driver() {
        let backend = DelayBackend::default();
        let handle = start(ChatMode::Document, backend.clone());
        let mut rx = handle.subscribe();

        handle
            .upload(DocumentFile::pdf("doc.pdf", b"%PDF".to_vec()))
            .await
            .unwrap();
        let notice = next_reply(&mut rx).await;
        assert!(notice.content.contains("doc.pdf"));
        assert!(handle.snapshot().await.unwrap().session_bound);

        handle.submit("what?").await.unwrap();
        next_reply(&mut rx).await;
        let queries = backend.queries.lock().unwrap().clone();
        assert_eq!(queries[0].session_id.as_deref(), Some("sess-doc.pdf"));
    }

    #[tokio::test]
    async fn test_guard_through_driver() {
        let backend = DelayBackend::default();
        let handle = start(ChatMode::Document, backend.clone());
        let mut rx = handle.subscribe();

        handle.submit("anything").await.unwrap();
        let guard = next_reply(&mut rx).await;
        assert_eq!(guard.content, "❌ Please upload a PDF first!");
        assert!(backend.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_management_through_driver() {
        let handle = start(ChatMode::General, DelayBackend::default());

        let first = handle.create_conversation().await.unwrap();
        let second = handle.create_conversation().await.unwrap();
        assert!(handle.rename_conversation(first, "Renamed").await.unwrap());

        handle.select_conversation(first).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.current, Some(first));
        assert_eq!(snapshot.current_conversation().unwrap().title, "Renamed");

        assert!(handle.delete_conversation(first).await.unwrap());
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.current, None);
        assert_eq!(snapshot.conversations.len(), 1);
        assert_eq!(snapshot.conversations[0].id, second);

        handle.select_conversation(first).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.current, Some(first));
        assert!(snapshot.current_conversation().is_none());
        assert!(snapshot.messages().is_empty());
    }

    #[tokio::test]
    async fn test_set_model_and_clear_current() {
        let handle = start(ChatMode::General, DelayBackend::default());
        handle.create_conversation().await.unwrap();
        handle.set_model("llama3:8b").await.unwrap();
        handle.clear_current().await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.model, "llama3:8b");
        assert_eq!(snapshot.current, None);
        assert!(snapshot.messages().is_empty());
    }
}
