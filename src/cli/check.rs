//! CLI `check` command — preflight report before a run.

use anyhow::Result;
use std::path::Path;

use crate::config::{expand_tilde, PapermapConfig};

/// Validate configuration and sources without calling the service.
///
/// Prints a report and exits nonzero if the credential is missing, no
/// sources are configured, or any source file is unreadable.
pub fn check(config: &PapermapConfig, config_path: &Path) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    println!("Papermap Preflight");
    println!("==================");
    println!();
    println!("Config:            {}", config_path.display());
    println!("Endpoint:          {}", config.embedding.endpoint);
    println!("Model:             {}", config.embedding.model);

    if config.embedding.has_api_key() {
        println!("API key:           present");
    } else {
        println!("API key:           MISSING (set PAPERMAP_API_KEY)");
        problems.push("missing API key".into());
    }

    match config.embedding.max_attempts {
        0 => println!(
            "Retry:             every {}s, unbounded (a down service stalls the run)",
            config.embedding.retry_delay_secs
        ),
        n => println!(
            "Retry:             every {}s, up to {n} attempts per record",
            config.embedding.retry_delay_secs
        ),
    }
    println!();

    println!("Sources:");
    if config.sources.is_empty() {
        println!("  (none configured)");
        problems.push("no sources configured".into());
    }

    let mut total_lines = 0usize;
    for source in &config.sources {
        let path = expand_tilde(&source.path);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let lines = contents.lines().count();
                total_lines += lines;
                println!("  {:<16} {:>5} lines  {}", source.label, lines, path.display());
            }
            Err(err) => {
                println!("  {:<16} ERROR: {err}", source.label);
                problems.push(format!("source '{}' unreadable", source.label));
            }
        }
    }
    println!();
    println!("Total records:     {total_lines}");
    println!("Output:            {}", config.resolved_output_path().display());
    println!();

    anyhow::ensure!(
        problems.is_empty(),
        "preflight failed: {}",
        problems.join("; ")
    );

    println!("Preflight OK.");
    Ok(())
}
