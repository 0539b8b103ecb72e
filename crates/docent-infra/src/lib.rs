//! Infrastructure layer for Docent.
//!
//! Implements the backend traits defined in `docent-core` over HTTP, loads
//! the client configuration from the data directory, and reads documents
//! from disk for upload.

pub mod config;
pub mod document;
pub mod http;
