use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PapermapConfig {
    pub log_level: String,
    pub embedding: EmbeddingConfig,
    pub output: OutputConfig,
    pub sources: Vec<SourceConfig>,
}

/// One corpus source: a label and the path of its pre-segmented text file.
///
/// Sources are enumerated explicitly in the config; nothing is discovered
/// dynamically. The order of `[[sources]]` entries is the order of the
/// final dataset.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    /// Service credential. Usually supplied via `PAPERMAP_API_KEY` rather
    /// than written into the config file.
    pub api_key: Option<String>,
    /// Requested vector dimensionality; when set, returned vectors are
    /// checked against it. When unset the service's native size is accepted.
    pub dimensions: Option<usize>,
    pub timeout_secs: u64,
    /// Fixed wait between retries of a failed embedding call.
    pub retry_delay_secs: u64,
    /// Attempts per record before giving up; 0 retries until success.
    pub max_attempts: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for PapermapConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            embedding: EmbeddingConfig::default(),
            output: OutputConfig::default(),
            sources: Vec::new(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            endpoint: "https://api.openai.com/v1".into(),
            model: "text-embedding-3-small".into(),
            api_key: None,
            dimensions: None,
            timeout_secs: 30,
            retry_delay_secs: 5,
            max_attempts: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "dataset.bin".into(),
        }
    }
}

/// Returns the default config file path: `papermap.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("papermap.toml")
}

impl PapermapConfig {
    /// Load config from a TOML file (if it exists) then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            PapermapConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (PAPERMAP_API_KEY, PAPERMAP_OUTPUT, PAPERMAP_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PAPERMAP_API_KEY") {
            self.embedding.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("PAPERMAP_OUTPUT") {
            self.output.path = val;
        }
        if let Ok(val) = std::env::var("PAPERMAP_LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Resolve the output path, expanding `~` if needed.
    pub fn resolved_output_path(&self) -> PathBuf {
        expand_tilde(&self.output.path)
    }
}

impl EmbeddingConfig {
    /// True when a non-blank credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PapermapConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.embedding.provider, "openai");
        assert_eq!(config.embedding.retry_delay_secs, 5);
        assert_eq!(config.embedding.max_attempts, 0);
        assert!(!config.embedding.has_api_key());
        assert_eq!(config.output.path, "dataset.bin");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
log_level = "debug"

[embedding]
endpoint = "http://localhost:9000/v1"
model = "test-model"
dimensions = 8
max_attempts = 3

[output]
path = "/tmp/out.bin"

[[sources]]
label = "attention"
path = "corpus/attention.txt"

[[sources]]
label = "resnet"
path = "corpus/resnet.txt"
"#;
        let config: PapermapConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.embedding.endpoint, "http://localhost:9000/v1");
        assert_eq!(config.embedding.model, "test-model");
        assert_eq!(config.embedding.dimensions, Some(8));
        assert_eq!(config.embedding.max_attempts, 3);
        assert_eq!(config.output.path, "/tmp/out.bin");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].label, "attention");
        assert_eq!(config.sources[1].path, "corpus/resnet.txt");
        // defaults still apply for unset fields
        assert_eq!(config.embedding.retry_delay_secs, 5);
        assert_eq!(config.embedding.timeout_secs, 30);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = PapermapConfig::default();
        std::env::set_var("PAPERMAP_API_KEY", "sk-test");
        std::env::set_var("PAPERMAP_OUTPUT", "/tmp/override.bin");
        std::env::set_var("PAPERMAP_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
        assert!(config.embedding.has_api_key());
        assert_eq!(config.output.path, "/tmp/override.bin");
        assert_eq!(config.log_level, "trace");

        // Clean up
        std::env::remove_var("PAPERMAP_API_KEY");
        std::env::remove_var("PAPERMAP_OUTPUT");
        std::env::remove_var("PAPERMAP_LOG_LEVEL");
    }

    #[test]
    fn blank_api_key_does_not_count() {
        let config = EmbeddingConfig {
            api_key: Some("   ".into()),
            ..EmbeddingConfig::default()
        };
        assert!(!config.has_api_key());
    }
}
