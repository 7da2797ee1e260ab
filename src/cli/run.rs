//! CLI `run` command — the full embedding ingestion pipeline.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

use crate::config::{expand_tilde, PapermapConfig};
use crate::corpus;
use crate::dataset::Dataset;
use crate::embedding;
use crate::pipeline::{CancelToken, EmbeddingClient, RetryPolicy};

/// Run the pipeline: load every source, embed every record in order, and
/// write the dataset container.
pub async fn run(config: &PapermapConfig, cancel: CancelToken) -> Result<()> {
    anyhow::ensure!(
        !config.sources.is_empty(),
        "no sources configured. Add [[sources]] entries with label and path."
    );

    // Provider construction doubles as the credential preflight: a missing
    // API key aborts here, before any service call.
    let provider: Arc<dyn embedding::EmbeddingProvider> =
        Arc::from(embedding::create_provider(&config.embedding)
            .context("failed to create embedding provider")?);
    let client = EmbeddingClient::new(provider, RetryPolicy::from_config(&config.embedding));

    // The whole corpus is loaded up front so an unreadable source aborts
    // the run before the first service call; a partial corpus is never
    // accepted.
    let mut documents = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let document = corpus::load_document(&source.label, expand_tilde(&source.path))?;
        tracing::info!(label = %source.label, lines = document.lines.len(), "source loaded");
        documents.push(document);
    }

    let records = corpus::assemble(&documents);
    let total = records.len();
    anyhow::ensure!(total > 0, "corpus is empty: nothing to embed");

    println!(
        "Embedding {total} records from {} sources with model '{}'...",
        documents.len(),
        config.embedding.model
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let embeddings = client
        .embed_records(&records, &cancel, |done| pb.set_position(done as u64))
        .await?;
    pb.finish_and_clear();

    let dataset = Dataset::build(records, embeddings)?;
    let output = config.resolved_output_path();
    dataset.write(&output)?;

    println!("Wrote {} entries to {}", dataset.len(), output.display());
    for (label, count) in dataset.group_counts() {
        println!("  {label:<16} {count}");
    }

    Ok(())
}
