//! CLI `inspect` command — summarize an existing dataset container.

use anyhow::Result;
use std::path::Path;

use crate::dataset::Dataset;

/// Load a dataset container and print totals and per-label group counts.
pub fn inspect(path: &Path) -> Result<()> {
    let dataset = Dataset::read(path)?;

    println!("Dataset: {}", path.display());
    println!("{}", "=".repeat(40));
    println!("  Entries:       {}", dataset.len());
    match dataset.dimensions() {
        Some(dims) => println!("  Dimensions:    {dims}"),
        None => println!("  Dimensions:    (empty dataset)"),
    }
    println!();

    println!("By source:");
    for (label, count) in dataset.group_counts() {
        println!("  {label:<16} {count}");
    }

    Ok(())
}
