//! Conversation orchestration for Docent.
//!
//! This crate owns the in-memory conversation store, the per-conversation
//! session binding, and the choreography of uploads and queries against the
//! backend. It defines the backend "port" ([`backend::provider::RagBackend`])
//! that the infrastructure layer implements, and never depends on
//! `docent-infra` or any HTTP crate.

pub mod backend;
pub mod chat;
pub mod event;
pub mod summarize;
