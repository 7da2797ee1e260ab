//! OpenAI-compatible remote embedding provider.
//!
//! Talks to any `/embeddings` endpoint speaking the OpenAI wire shape, one
//! text per request — the pipeline embeds records strictly one at a time.
//! Failures are reported to the caller; retrying is the pipeline's job.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;

/// Remote embedding provider over HTTP with bearer authentication.
#[derive(Debug)]
pub struct RemoteProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl RemoteProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.api_key.as_deref().unwrap_or_default();
        anyhow::ensure!(
            !api_key.trim().is_empty(),
            "missing embedding API key. Set PAPERMAP_API_KEY or [embedding].api_key"
        );
        anyhow::ensure!(
            !config.model.trim().is_empty(),
            "missing embedding model name"
        );

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).context("invalid embedding API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;

        let endpoint = format!("{}/embeddings", config.endpoint.trim_end_matches('/'));

        tracing::info!(endpoint = %endpoint, model = %config.model, "remote embedding provider ready");

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("embedding request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!(
                "embedding request failed ({status}): {}",
                service_error_message(&body)
            );
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("failed to parse embedding response")?;

        anyhow::ensure!(
            parsed.data.len() == 1,
            "service returned {} embeddings for one input",
            parsed.data.len()
        );
        let vector = parsed
            .data
            .into_iter()
            .next()
            .context("embedding response contained no vectors")?
            .embedding;

        if let Some(expected) = self.dimensions {
            anyhow::ensure!(
                vector.len() == expected,
                "service returned {} dimensions, expected {expected}",
                vector.len()
            );
        }

        Ok(vector)
    }
}

/// Pull the human-readable message out of an OpenAI-style error body,
/// falling back to the raw body when it isn't JSON.
fn service_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_json_body() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        assert_eq!(service_error_message(body), "Rate limit reached");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(service_error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn missing_key_is_rejected_at_construction() {
        let config = EmbeddingConfig::default();
        let err = RemoteProvider::new(&config).unwrap_err();
        assert!(err.to_string().contains("missing embedding API key"));
    }

    #[test]
    fn request_serializes_without_unset_dimensions() {
        let request = EmbeddingRequest {
            model: "test-model",
            input: "hello",
            dimensions: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("dimensions"));
        assert!(json.contains("\"input\":\"hello\""));
    }
}
