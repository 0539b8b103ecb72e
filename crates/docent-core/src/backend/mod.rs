//! The backend port: what the orchestrator needs from the remote service.
//!
//! `docent-infra` provides the HTTP implementation; tests substitute mocks.

pub mod box_backend;
pub mod provider;
