//! Application state shared by every command.
//!
//! Holds the effective client configuration and builds mode-specific
//! backends and orchestrators from it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use docent_core::backend::box_backend::BoxRagBackend;
use docent_core::chat::orchestrator::Orchestrator;
use docent_core::event::bus::EventBus;
use docent_infra::config::{
    load_client_config, resolve_client_config, resolve_data_dir, ConfigOverrides,
};
use docent_infra::http::BackendClient;
use docent_types::config::ClientConfig;
use docent_types::mode::ChatMode;

/// Capacity of each orchestrator's event bus.
const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve configuration: config.toml, then environment, then `flags`.
    pub async fn init(flags: ConfigOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let file_config = load_client_config(&data_dir).await;
        let config = resolve_client_config(file_config, ConfigOverrides::from_env(), flags);
        config
            .validate()
            .context("Invalid client configuration")?;

        tracing::debug!(
            base_url = %config.base_url,
            model = %config.default_model,
            data_dir = %data_dir.display(),
            "Configuration resolved"
        );
        Ok(Self { config, data_dir })
    }

    pub fn backend_client(&self, mode: ChatMode) -> anyhow::Result<BackendClient> {
        BackendClient::new(&self.config, mode)
            .with_context(|| format!("Failed to create {mode} backend client"))
    }

    /// A fresh orchestrator (empty store, no bindings) for `mode`.
    pub fn orchestrator_for(&self, mode: ChatMode) -> anyhow::Result<Orchestrator> {
        let backend = Arc::new(BoxRagBackend::new(self.backend_client(mode)?));
        Ok(Orchestrator::for_mode(
            mode,
            backend,
            EventBus::new(EVENT_CAPACITY),
            self.config.default_model.clone(),
        ))
    }
}
