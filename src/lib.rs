//! Embedding ingestion pipeline for labeled scientific-paper corpora.
//!
//! papermap converts several pre-segmented text corpora into one labeled
//! dataset augmented with embedding vectors fetched from an external
//! service, for downstream similarity analysis and visualization.
//!
//! # Pipeline
//!
//! 1. **Load** — each configured source file becomes a [`corpus::Document`],
//!    one pre-segmented text unit per line.
//! 2. **Assemble** — documents are flattened into one ordered record
//!    sequence, each record tagged with its source label.
//! 3. **Embed** — every record is sent to the remote service one at a time,
//!    in order, with a fixed-delay retry loop around each call.
//! 4. **Build** — records and vectors are merged positionally; a length
//!    mismatch is a hard error, never a silent truncation.
//! 5. **Write** — the dataset is serialized to a single binary container.
//!
//! The embedding step is the only part that blocks on I/O repeatedly and the
//! only part with nontrivial failure handling: by default a failed service
//! call is retried every five seconds until it succeeds, so a permanently
//! down service stalls the run rather than failing it. Both the delay and an
//! optional attempt bound are configuration, and the loop honors a
//! cancellation token wired to Ctrl-C.
//!
//! # Modules
//!
//! - [`config`] — TOML configuration with environment variable overrides
//! - [`corpus`] — source loading and record assembly
//! - [`embedding`] — the provider trait and remote HTTP implementation
//! - [`pipeline`] — the retry loop, cancellation, and ordered embedding
//! - [`dataset`] — positional merge and binary persistence

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod embedding;
pub mod pipeline;
