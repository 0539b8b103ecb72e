//! Submit and upload choreography for one conversation stack.
//!
//! Both actions are two-phase. `begin_*` performs the optimistic local
//! mutation synchronously and returns a pending request; the pending value's
//! `dispatch` future performs the network call and resolves to a completion
//! (never an error); `apply_*` folds the completion back into the store.
//! Between the phases the orchestrator is free to process other actions, so
//! two overlapping submits append their user messages in call order and
//! their answers in completion order.
//!
//! Completions carry the id of the conversation they were started from, so
//! an answer always lands in its originating conversation even if the user
//! has switched away in the meantime.

use std::sync::Arc;

use tracing::{debug, info, warn};

use docent_types::api::{DocumentFile, QueryReply, QueryRequest, UploadReceipt};
use docent_types::conversation::{Attachment, ConversationId, Message, Sender};
use docent_types::error::{ApiError, ChatError};
use docent_types::event::{ChatEvent, ChatStatus};
use docent_types::mode::ChatMode;

use crate::backend::box_backend::BoxRagBackend;
use crate::event::bus::EventBus;

use super::binder::SessionBinder;
use super::profile::ModeProfile;
use super::store::ConversationStore;

/// What `begin_submit` decided.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// The user message and a guard notice were appended; no request is made.
    Guarded { conversation_id: ConversationId },
    /// The user message was appended; the query still has to be dispatched.
    Dispatch(PendingQuery),
}

/// A query that has been recorded locally but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub conversation_id: ConversationId,
    pub request: QueryRequest,
}

impl PendingQuery {
    /// Send the query. Failures are captured in the completion.
    pub async fn dispatch(self, backend: Arc<BoxRagBackend>) -> QueryCompletion {
        let result = backend.query(&self.request).await;
        QueryCompletion {
            conversation_id: self.conversation_id,
            result,
        }
    }
}

#[derive(Debug)]
pub struct QueryCompletion {
    pub conversation_id: ConversationId,
    pub result: Result<QueryReply, ApiError>,
}

/// An upload attributed to a conversation but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub conversation_id: ConversationId,
    pub file: DocumentFile,
}

impl PendingUpload {
    pub async fn dispatch(self, backend: Arc<BoxRagBackend>) -> UploadCompletion {
        let result = backend.upload(&self.file).await;
        UploadCompletion {
            conversation_id: self.conversation_id,
            attachment: self.file.attachment(),
            result,
        }
    }
}

#[derive(Debug)]
pub struct UploadCompletion {
    pub conversation_id: ConversationId,
    pub attachment: Attachment,
    pub result: Result<UploadReceipt, ApiError>,
}

/// The single mutator of a [`ConversationStore`] and its [`SessionBinder`].
pub struct Orchestrator {
    profile: ModeProfile,
    store: ConversationStore,
    binder: SessionBinder,
    backend: Arc<BoxRagBackend>,
    events: EventBus,
    model: String,
    in_flight_queries: usize,
    in_flight_uploads: usize,
    last_error: Option<String>,
}

impl Orchestrator {
    pub fn new(
        profile: ModeProfile,
        store: ConversationStore,
        binder: SessionBinder,
        backend: Arc<BoxRagBackend>,
        events: EventBus,
        model: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            store,
            binder,
            backend,
            events,
            model: model.into(),
            in_flight_queries: 0,
            in_flight_uploads: 0,
            last_error: None,
        }
    }

    /// An orchestrator with an empty store titled for `mode`.
    pub fn for_mode(
        mode: ChatMode,
        backend: Arc<BoxRagBackend>,
        events: EventBus,
        model: impl Into<String>,
    ) -> Self {
        let profile = ModeProfile::for_mode(mode);
        let store = ConversationStore::new(profile.default_title.clone());
        Self::new(profile, store, SessionBinder::new(), backend, events, model)
    }

    pub fn profile(&self) -> &ModeProfile {
        &self.profile
    }

    pub fn mode(&self) -> ChatMode {
        self.profile.mode
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn binder(&self) -> &SessionBinder {
        &self.binder
    }

    pub fn backend(&self) -> Arc<BoxRagBackend> {
        Arc::clone(&self.backend)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn status(&self) -> ChatStatus {
        ChatStatus {
            uploading: self.in_flight_uploads > 0,
            composing: self.in_flight_queries > 0,
            last_error: self.last_error.clone(),
        }
    }

    /// Whether the current conversation has a document session.
    pub fn current_session_bound(&self) -> bool {
        self.store
            .current_id()
            .is_some_and(|id| self.binder.is_bound(&id))
    }

    // ---- conversation management ----

    pub fn create_conversation(&mut self) -> ConversationId {
        let id = self.store.create_conversation();
        self.events.publish(ChatEvent::ConversationCreated {
            conversation_id: id,
            title: self.store.default_title().to_string(),
        });
        id
    }

    /// Make `id` current. An unknown id is accepted and shows an empty view.
    pub fn select_conversation(&mut self, id: ConversationId) {
        if self.store.get(&id).is_none() {
            debug!(conversation_id = %id, "Selected conversation does not exist");
        }
        self.store.select_conversation(id);
        self.events.publish(ChatEvent::ConversationSelected {
            conversation_id: Some(id),
        });
    }

    pub fn clear_current(&mut self) {
        self.store.clear_current();
        self.events
            .publish(ChatEvent::ConversationSelected { conversation_id: None });
    }

    pub fn rename_conversation(&mut self, id: ConversationId, title: &str) -> bool {
        let renamed = self.store.rename_conversation(&id, title);
        if renamed {
            self.events.publish(ChatEvent::ConversationRenamed {
                conversation_id: id,
                title: title.to_string(),
            });
        }
        renamed
    }

    /// Delete a conversation together with its session binding.
    pub fn delete_conversation(&mut self, id: ConversationId) -> bool {
        let was_current = self.store.current_id() == Some(id);
        if !self.store.delete_conversation(&id) {
            return false;
        }
        self.binder.forget(&id);
        self.events
            .publish(ChatEvent::ConversationDeleted { conversation_id: id });
        if was_current {
            self.events
                .publish(ChatEvent::ConversationSelected { conversation_id: None });
        }
        true
    }

    // ---- submit ----

    /// Phase one of a submit: record the user message and decide whether a
    /// query goes out.
    pub fn begin_submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let conversation_id = self.ensure_current();
        self.last_error = None;
        self.append(&conversation_id, text, Sender::User, None);

        let token = self.binder.token_for(&conversation_id);
        match self.profile.policy.resolve(token) {
            Ok(session_id) => {
                self.in_flight_queries += 1;
                self.publish_status();
                debug!(
                    conversation_id = %conversation_id,
                    with_session = session_id.is_some(),
                    "Query dispatched"
                );
                SubmitOutcome::Dispatch(PendingQuery {
                    conversation_id,
                    request: QueryRequest {
                        query: text.to_string(),
                        session_id,
                        model: self.model.clone(),
                    },
                })
            }
            Err(err) => {
                info!(conversation_id = %conversation_id, "Query refused: no document session");
                let guard = self.profile.guard_message();
                self.append(&conversation_id, guard, Sender::Assistant, None);
                self.last_error = Some(err.to_string());
                self.publish_status();
                SubmitOutcome::Guarded { conversation_id }
            }
        }
    }

    /// Phase two of a submit. Returns the appended assistant message, or
    /// `None` when the conversation was deleted while the query was in flight.
    pub fn apply_query(&mut self, completion: QueryCompletion) -> Option<Message> {
        self.in_flight_queries = self.in_flight_queries.saturating_sub(1);
        let id = completion.conversation_id;

        let appended = match completion.result {
            Ok(reply) => {
                if let Some(session_id) = reply.session_id.filter(|s| !s.is_empty()) {
                    if self.store.get(&id).is_some() && !self.binder.is_bound(&id) {
                        self.bind(id, session_id);
                    }
                }
                self.append(&id, reply.answer, Sender::Assistant, None)
            }
            Err(err) => {
                warn!(conversation_id = %id, error = %err, "Query failed");
                self.last_error = Some(err.to_string());
                let notice = self.profile.query_failure(&err);
                self.append(&id, notice, Sender::Assistant, None)
            }
        };

        if appended.is_none() {
            debug!(conversation_id = %id, "Answer dropped: conversation no longer exists");
        }
        self.publish_status();
        appended
    }

    // ---- upload ----

    /// Phase one of an upload: attribute it to a conversation and raise the
    /// uploading flag.
    pub fn begin_upload(&mut self, file: DocumentFile) -> PendingUpload {
        let conversation_id = self.ensure_current();
        self.last_error = None;
        self.in_flight_uploads += 1;
        self.publish_status();
        info!(
            conversation_id = %conversation_id,
            file = %file.name,
            size_bytes = file.size_bytes(),
            "Upload dispatched"
        );
        PendingUpload {
            conversation_id,
            file,
        }
    }

    /// Phase two of an upload. The uploading flag is lowered before anything
    /// else happens. A failure leaves any earlier binding in place.
    pub fn apply_upload(&mut self, completion: UploadCompletion) -> Option<Message> {
        self.in_flight_uploads = self.in_flight_uploads.saturating_sub(1);
        let id = completion.conversation_id;
        let sender = self.profile.notice_sender;

        let appended = match completion.result {
            Ok(receipt) => {
                if self.store.get(&id).is_some() {
                    self.bind(id, receipt.session_id);
                }
                info!(
                    conversation_id = %id,
                    file = %receipt.filename,
                    chunks = receipt.chunk_count,
                    "Document ingested"
                );
                let text = self.profile.upload_confirmation(&receipt.filename);
                self.append(&id, text, sender, Some(completion.attachment))
            }
            Err(err) => {
                warn!(conversation_id = %id, error = %err, "Upload failed");
                self.last_error = Some(err.to_string());
                let text = self.profile.upload_failure(&err);
                self.append(&id, text, sender, Some(completion.attachment))
            }
        };

        if appended.is_none() {
            debug!(conversation_id = %id, "Upload notice dropped: conversation no longer exists");
        }
        self.publish_status();
        appended
    }

    // ---- one-shot helpers ----

    /// Run a full submit inline.
    ///
    /// The store ends up exactly as it would with the two-phase calls. The
    /// error return mirrors what was appended so callers can set an exit code.
    pub async fn submit_message(&mut self, text: &str) -> Result<Option<Message>, ChatError> {
        match self.begin_submit(text) {
            SubmitOutcome::Ignored => Ok(None),
            SubmitOutcome::Guarded { .. } => Err(ChatError::PreconditionNotMet),
            SubmitOutcome::Dispatch(pending) => {
                let completion = pending.dispatch(self.backend()).await;
                let failure = completion.result.as_ref().err().cloned();
                let appended = self.apply_query(completion);
                match failure {
                    Some(err) => Err(err.into()),
                    None => Ok(appended),
                }
            }
        }
    }

    /// Run a full upload inline.
    pub async fn upload_document(&mut self, file: DocumentFile) -> Result<UploadReceipt, ChatError> {
        let pending = self.begin_upload(file);
        let completion = pending.dispatch(self.backend()).await;
        let result = completion.result.clone();
        self.apply_upload(completion);
        result.map_err(ChatError::from)
    }

    // ---- internals ----

    fn ensure_current(&mut self) -> ConversationId {
        match self.store.current() {
            Some(conversation) => conversation.id,
            None => self.create_conversation(),
        }
    }

    fn append(
        &mut self,
        id: &ConversationId,
        content: impl Into<String>,
        sender: Sender,
        attachment: Option<Attachment>,
    ) -> Option<Message> {
        let message = self.store.append_to(id, content, sender, attachment)?;
        self.events.publish(ChatEvent::MessageAppended {
            conversation_id: *id,
            message: message.clone(),
        });
        Some(message)
    }

    fn bind(&mut self, id: ConversationId, session_id: String) {
        self.binder.bind(id, session_id.clone());
        self.events.publish(ChatEvent::SessionBound {
            conversation_id: id,
            session_id,
        });
    }

    fn publish_status(&self) {
        self.events.publish(ChatEvent::StatusChanged(self.status()));
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("mode", &self.profile.mode)
            .field("conversations", &self.store.len())
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .finish()
    }
}
