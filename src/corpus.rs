//! Corpus loading and assembly.
//!
//! A [`Document`] holds one source file's ordered lines tagged with a label;
//! [`assemble`] flattens a set of documents into the flat ordered [`Record`]
//! sequence handed to the embedding client.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One source file's ordered text lines, tagged with its label.
///
/// Immutable once read; lives only for the duration of one pipeline run.
#[derive(Debug, Clone)]
pub struct Document {
    pub label: String,
    pub lines: Vec<String>,
}

/// One `(label, text)` unit — the atomic item submitted for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    pub text: String,
}

/// Read one source file into a [`Document`].
///
/// Input files are expected to be pre-segmented, one semantic unit (title,
/// paragraph, or caption) per line; no further splitting or cleaning happens
/// here. A missing or unreadable file is an error — a partial corpus is
/// never accepted.
pub fn load_document(label: &str, path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file: {}", path.display()))?;
    let lines = contents.lines().map(str::to_owned).collect();

    Ok(Document {
        label: label.to_owned(),
        lines,
    })
}

/// Flatten documents into one ordered record sequence.
///
/// Concatenates each document's lines in the order the documents were
/// supplied, tagging every record with its document's label. No reordering,
/// filtering, or deduplication; documents may have unequal line counts.
pub fn assemble(documents: &[Document]) -> Vec<Record> {
    documents
        .iter()
        .flat_map(|doc| {
            doc.lines.iter().map(|line| Record {
                label: doc.label.clone(),
                text: line.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(label: &str, lines: &[&str]) -> Document {
        Document {
            label: label.into(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn assemble_preserves_order_and_labels() {
        let docs = vec![
            doc("a", &["a1", "a2"]),
            doc("b", &["b1"]),
            doc("c", &["c1", "c2", "c3"]),
        ];
        let records = assemble(&docs);

        assert_eq!(records.len(), 6);
        let expected = [
            ("a", "a1"),
            ("a", "a2"),
            ("b", "b1"),
            ("c", "c1"),
            ("c", "c2"),
            ("c", "c3"),
        ];
        for (record, (label, text)) in records.iter().zip(expected) {
            assert_eq!(record.label, label);
            assert_eq!(record.text, text);
        }
    }

    #[test]
    fn assemble_allows_unequal_counts() {
        let docs = vec![doc("short", &["one"]), doc("long", &["x"; 10])];
        let records = assemble(&docs);
        assert_eq!(records.len(), 11);
        assert_eq!(records[0].label, "short");
        assert!(records[1..].iter().all(|r| r.label == "long"));
    }

    #[test]
    fn assemble_empty_input() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn load_document_keeps_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Attention Is All You Need").unwrap();
        writeln!(file, "The dominant sequence transduction models...").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Figure 1: The Transformer architecture.").unwrap();

        let document = load_document("attention", file.path()).unwrap();
        assert_eq!(document.label, "attention");
        assert_eq!(document.lines.len(), 4);
        assert_eq!(document.lines[0], "Attention Is All You Need");
        // blank lines are kept; the loader does no cleaning
        assert_eq!(document.lines[2], "");
        assert_eq!(document.lines[3], "Figure 1: The Transformer architecture.");
    }

    #[test]
    fn load_document_missing_file_is_an_error() {
        let err = load_document("ghost", "/nonexistent/ghost.txt").unwrap_err();
        assert!(err.to_string().contains("failed to read source file"));
    }
}
