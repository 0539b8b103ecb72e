//! Shared domain types for Docent.
//!
//! This crate contains the core domain types used across the Docent client:
//! conversations and messages, chat modes, backend wire shapes, client
//! configuration, events, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod mode;
