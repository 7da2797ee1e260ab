//! The final dataset — positional merge, binary persistence, summaries.
//!
//! A [`Dataset`] is the ordered `(label, text, embedding)` collection, built
//! by zipping the assembled records with their vectors and written once, as
//! a single bincode container, at the end of a successful run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::corpus::Record;

/// Container format version, bumped on any layout change.
const FORMAT_VERSION: u32 = 1;

/// Errors in dataset assembly and persistence.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Text and vector sequences disagree; refusing to truncate or pad.
    #[error("length mismatch: {records} records but {vectors} embedding vectors")]
    LengthMismatch { records: usize, vectors: usize },

    #[error("failed to {action} dataset file {path}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode dataset file {path}")]
    Decode {
        path: String,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode dataset")]
    Encode {
        #[source]
        source: bincode::Error,
    },

    #[error("unsupported dataset format version {found}")]
    Version { found: u32 },
}

/// One `(label, text, embedding)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub label: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// The ordered entry collection — the pipeline's sole durable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    format_version: u32,
    pub entries: Vec<DatasetEntry>,
}

impl Dataset {
    /// Merge records with their positionally-matching vectors.
    ///
    /// Entry `i` takes record `i`'s label and text and vector `i`. The two
    /// sequences must have identical length; anything else is a structural
    /// error, never a silent truncation or pad.
    pub fn build(
        records: Vec<Record>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, DatasetError> {
        if records.len() != embeddings.len() {
            return Err(DatasetError::LengthMismatch {
                records: records.len(),
                vectors: embeddings.len(),
            });
        }

        let entries = records
            .into_iter()
            .zip(embeddings)
            .map(|(record, embedding)| DatasetEntry {
                label: record.label,
                text: record.text,
                embedding,
            })
            .collect();

        Ok(Self {
            format_version: FORMAT_VERSION,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the first entry's vector, if any.
    pub fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }

    /// Entry counts per source label, in label order.
    pub fn group_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize to the binary container at `path`, overwriting any existing
    /// file. A failed or interrupted write means "no dataset produced" —
    /// there is no partial-write recovery.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let bytes = bincode::serialize(self).map_err(|source| DatasetError::Encode { source })?;
        std::fs::write(path, bytes).map_err(|source| DatasetError::Io {
            action: "write",
            path: path.display().to_string(),
            source,
        })
    }

    /// Read a container written by [`Dataset::write`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
            action: "read",
            path: path.display().to_string(),
            source,
        })?;
        let dataset: Self = bincode::deserialize(&bytes).map_err(|source| DatasetError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        if dataset.format_version != FORMAT_VERSION {
            return Err(DatasetError::Version {
                found: dataset.format_version,
            });
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, text: &str) -> Record {
        Record {
            label: label.into(),
            text: text.into(),
        }
    }

    #[test]
    fn build_zips_positionally() {
        let records = vec![record("a", "first"), record("b", "second")];
        let embeddings = vec![vec![0.1, 0.2], vec![0.3, 0.4]];

        let dataset = Dataset::build(records, embeddings).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.entries[0].label, "a");
        assert_eq!(dataset.entries[0].text, "first");
        assert_eq!(dataset.entries[0].embedding, vec![0.1, 0.2]);
        assert_eq!(dataset.entries[1].label, "b");
        assert_eq!(dataset.entries[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn build_refuses_length_mismatch() {
        let records = vec![record("a", "first"), record("a", "second")];
        let embeddings = vec![vec![0.1]];

        let err = Dataset::build(records, embeddings).unwrap_err();
        match err {
            DatasetError::LengthMismatch { records, vectors } => {
                assert_eq!(records, 2);
                assert_eq!(vectors, 1);
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn group_counts_by_label() {
        let records = vec![
            record("b", "1"),
            record("a", "2"),
            record("b", "3"),
            record("b", "4"),
        ];
        let embeddings = vec![vec![0.0]; 4];
        let dataset = Dataset::build(records, embeddings).unwrap();

        let counts = dataset.group_counts();
        assert_eq!(counts.get("a"), Some(&1));
        assert_eq!(counts.get("b"), Some(&3));
        // BTreeMap iterates in label order
        let labels: Vec<&str> = counts.keys().copied().collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn dimensions_of_empty_dataset() {
        let dataset = Dataset::build(vec![], vec![]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.dimensions(), None);
    }
}
