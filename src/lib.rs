//! # corpus-shuffler
//!
//! Deterministic deduplication and reshuffling for text corpora.
//!
//! The engine takes a corpus of documents, splits them into sentences,
//! deduplicates the sentences per folder group inside a persistent SQLite
//! store, and re-emits them as fixed-size synthetic documents in an order
//! that depends only on sentence content and a seed. Re-running a corpus
//! with the same seed reproduces the output byte for byte, regardless of
//! input order, batching or timing.
//!
//! ## Pipeline
//!
//! ```text
//! entries ──▶ route (grouping) ──▶ segment ──▶ filter ──▶ store (dedup)
//!                                                            │
//!                   part_NNN.json ◀── pack (chunker) ◀── ordered stream
//!                                                            │
//!                                          CSV diagnostics (reports)
//! ```
//!
//! ## Module guide
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Validated per-run configuration (builder) |
//! | [`entry`] | Input document model |
//! | [`grouping`] | Relative path to group key routing |
//! | [`segmenter`] | Sentence segmentation seam (pluggable) |
//! | [`filter`] | Sentence quality checks with reason codes |
//! | [`hashing`] | Content hashes and seed-keyed order keys |
//! | [`store`] | SQLite deduplication store |
//! | [`chunker`] | Greedy packing into target-sized documents |
//! | [`reports`] | Per-group CSV diagnostics |
//! | [`runner`] | End-to-end orchestration |
//! | [`errors`] | Error taxonomy (`thiserror` + `miette`) |
//! | [`telemetry`] | Tracing bootstrap |
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use corpus_shuffler::config::ShufflerConfig;
//! use corpus_shuffler::entry::CorpusEntry;
//! use corpus_shuffler::runner::Shuffler;
//! use corpus_shuffler::segmenter::UnicodeSegmenter;
//!
//! # async fn demo() -> corpus_shuffler::errors::Result<()> {
//! let config = ShufflerConfig::builder()
//!     .with_output_path("shuffled")
//!     .with_seed(42)
//!     .build()?;
//!
//! let entries = vec![CorpusEntry::from_text(
//!     "acte/2021/hotarare_03.txt",
//!     "Consiliul a aprobat bugetul. Ședința s-a încheiat.",
//! )];
//!
//! let shuffler = Shuffler::new(config, Arc::new(UnicodeSegmenter::new()));
//! let summary = shuffler.run(&entries).await?;
//! println!("wrote {} documents", summary.total_documents());
//! # Ok(())
//! # }
//! ```

pub mod chunker;
pub mod config;
pub mod entry;
pub mod errors;
pub mod filter;
pub mod grouping;
pub mod hashing;
pub mod reports;
pub mod runner;
pub mod segmenter;
pub mod store;
pub mod telemetry;
pub mod text;
