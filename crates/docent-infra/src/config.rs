//! Client configuration loading for Docent.
//!
//! Reads `config.toml` from the data directory (`~/.docent/` by default)
//! into [`ClientConfig`], then layers environment and command-line
//! overrides on top. A missing or malformed file falls back to defaults.

use std::path::{Path, PathBuf};

use docent_types::config::ClientConfig;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DOCENT_DATA_DIR";
/// Environment variable overriding the backend base address.
pub const BASE_URL_ENV: &str = "DOCENT_BASE_URL";
/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "DOCENT_MODEL";

/// Load `{data_dir}/config.toml`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparsable file: a warning is logged and defaults are used.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// One layer of overrides. `None` leaves the lower layer's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl ConfigOverrides {
    /// Overrides taken from the process environment. Empty values are ignored.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            base_url: read(BASE_URL_ENV),
            model: read(MODEL_ENV),
        }
    }
}

/// Apply overrides in increasing precedence: file < env < flags.
pub fn resolve_client_config(
    mut config: ClientConfig,
    env: ConfigOverrides,
    flags: ConfigOverrides,
) -> ClientConfig {
    if let Some(base_url) = flags.base_url.or(env.base_url) {
        config.base_url = base_url;
    }
    if let Some(model) = flags.model.or(env.model) {
        config.default_model = model;
    }
    config
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `DOCENT_DATA_DIR` environment variable
/// 2. `~/.docent`
/// 3. `./.docent` when no home directory can be determined
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".docent");
    }

    PathBuf::from(".docent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_client_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_model, "gemma3:1b");
    }

    #[tokio::test]
    async fn load_client_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
base_url = "http://gpu-box:8000"
default_model = "llama3:8b"

[chunking]
max_chars = 800
overlap = 100
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://gpu-box:8000");
        assert_eq!(config.default_model, "llama3:8b");
        assert_eq!(config.chunking.max_chars, 800);
        assert_eq!(config.chunking.overlap, 100);
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "base_url = [not valid")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let file = ClientConfig {
            base_url: "http://file:1".to_string(),
            ..ClientConfig::default()
        };
        let env = ConfigOverrides {
            base_url: Some("http://env:2".to_string()),
            model: None,
        };
        let flags = ConfigOverrides {
            base_url: Some("http://flag:3".to_string()),
            model: Some("flag-model".to_string()),
        };

        let config = resolve_client_config(file.clone(), env.clone(), flags);
        assert_eq!(config.base_url, "http://flag:3");
        assert_eq!(config.default_model, "flag-model");

        let config = resolve_client_config(file.clone(), env, ConfigOverrides::default());
        assert_eq!(config.base_url, "http://env:2");
        assert_eq!(config.default_model, "gemma3:1b");

        let config = resolve_client_config(
            file,
            ConfigOverrides::default(),
            ConfigOverrides::default(),
        );
        assert_eq!(config.base_url, "http://file:1");
    }
}
