//! Text-to-vector embedding via an external service.
//!
//! Provides the [`EmbeddingProvider`] trait and the remote OpenAI-compatible
//! implementation. The provider is created via [`create_provider`] from
//! configuration.

pub mod remote;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for obtaining one embedding vector per text.
///
/// Implementations return one vector of fixed, service-defined
/// dimensionality per successful call. The pipeline treats vectors as
/// opaque beyond their length and numeric type.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Create an embedding provider from config.
///
/// Currently only `"openai"` is supported (any OpenAI-compatible
/// `/embeddings` endpoint). Fails before any service call if the credential
/// is missing.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = remote::RemoteProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: openai"),
    }
}
