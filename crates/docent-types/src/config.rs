//! Client configuration types for Docent.
//!
//! `ClientConfig` represents the top-level `config.toml` that controls the
//! backend address, default model, chunking parameters and route layout.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mode::ChatMode;

/// Top-level configuration for the Docent client.
///
/// Loaded from `~/.docent/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the backend (scheme, host, port; no trailing slash needed).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model selector sent with every query and summarize request.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Chunking parameters sent to routes that expect them.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Query text used by the summarizer.
    #[serde(default = "default_summary_query")]
    pub summary_query: String,

    #[serde(default)]
    pub routes: Routes,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_model() -> String {
    "gemma3:1b".to_string()
}

fn default_summary_query() -> String {
    "Summarize this PDF".to_string()
}

impl ClientConfig {
    /// Check the address and every route before any request is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        let routes = &self.routes;
        let paths = [
            &routes.general.upload,
            &routes.general.query,
            &routes.document.upload,
            &routes.document.query,
            &routes.index,
            &routes.summarize,
            &routes.health,
        ];
        match paths.into_iter().find(|p| !p.starts_with('/')) {
            Some(bad) => Err(ConfigError::InvalidRoute(bad.clone())),
            None => Ok(()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: default_model(),
            chunking: ChunkingConfig::default(),
            summary_query: default_summary_query(),
            routes: Routes::default(),
        }
    }
}

/// Server-side chunking parameters for document uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: u32,
    #[serde(default = "default_overlap")]
    pub overlap: u32,
}

fn default_max_chars() -> u32 {
    1000
}

fn default_overlap() -> u32 {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap: default_overlap(),
        }
    }
}

/// Upload and query paths used by one chat mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSet {
    pub upload: String,
    pub query: String,
    /// Whether the upload route expects `max_chars` / `overlap` form fields.
    #[serde(default)]
    pub send_chunking: bool,
}

impl RouteSet {
    pub fn general() -> Self {
        Self {
            upload: "/agentic-rag/upload/".to_string(),
            query: "/agentic-rag/chat/".to_string(),
            send_chunking: false,
        }
    }

    pub fn document() -> Self {
        Self {
            upload: "/rag-upload-pdf/".to_string(),
            query: "/rag-qa/".to_string(),
            send_chunking: true,
        }
    }
}

/// All backend paths the client uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    #[serde(default = "RouteSet::general")]
    pub general: RouteSet,
    #[serde(default = "RouteSet::document")]
    pub document: RouteSet,
    #[serde(default = "default_index_route")]
    pub index: String,
    #[serde(default = "default_summarize_route")]
    pub summarize: String,
    #[serde(default = "default_health_route")]
    pub health: String,
}

fn default_index_route() -> String {
    "/upload-pdf-only/".to_string()
}

fn default_summarize_route() -> String {
    "/summarize-existing/".to_string()
}

fn default_health_route() -> String {
    "/".to_string()
}

impl Routes {
    /// The upload/query pair for a chat mode.
    pub fn for_mode(&self, mode: ChatMode) -> &RouteSet {
        match mode {
            ChatMode::General => &self.general,
            ChatMode::Document => &self.document,
        }
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            general: RouteSet::general(),
            document: RouteSet::document(),
            index: default_index_route(),
            summarize: default_summarize_route(),
            health: default_health_route(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_model, "gemma3:1b");
        assert_eq!(config.chunking.max_chars, 1000);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.routes.general.query, "/agentic-rag/chat/");
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.summary_query, "Summarize this PDF");
        assert_eq!(config.routes.document.upload, "/rag-upload-pdf/");
        assert!(config.routes.document.send_chunking);
        assert!(!config.routes.general.send_chunking);
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "http://rag.internal:9000"
default_model = "llama3:8b"

[chunking]
max_chars = 1500

[routes.document]
upload = "/agentic-rag/upload/"
query = "/agentic-rag/chat/"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "http://rag.internal:9000");
        assert_eq!(config.default_model, "llama3:8b");
        assert_eq!(config.chunking.max_chars, 1500);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.routes.for_mode(ChatMode::Document).query, "/agentic-rag/chat/");
        assert!(!config.routes.document.send_chunking);
        assert_eq!(config.routes.general, RouteSet::general());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert_eq!(ClientConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = ClientConfig {
            base_url: "localhost:8000".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_validate_rejects_relative_route() {
        let mut config = ClientConfig::default();
        config.routes.summarize = "summarize-existing/".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRoute("summarize-existing/".to_string()))
        );
    }
}
