//! Conversation state and the orchestration of chat actions.
//!
//! - [`store::ConversationStore`] owns conversations and their message logs.
//! - [`binder::SessionBinder`] maps conversations to backend session tokens.
//! - [`orchestrator::Orchestrator`] sequences submits and uploads.
//! - [`driver::ChatDriver`] serializes all mutation onto one task.

pub mod binder;
pub mod driver;
pub mod orchestrator;
pub mod profile;
pub mod store;
