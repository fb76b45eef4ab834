//! Error taxonomy for the shuffling engine.
//!
//! Fatal errors abort the run (`ShuffleError`); segmentation failures are
//! per-document and handled by skipping the affected document. Quality-filter
//! rejections are expected outcomes and never surface here.

use miette::Diagnostic;
use thiserror::Error;

/// Fatal errors raised while building or running a shuffle.
#[derive(Debug, Error, Diagnostic)]
pub enum ShuffleError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(corpus_shuffler::config),
        help("Check level (>= -1), target_word_count, batch_size, commit_every and output_path.")
    )]
    Configuration { message: String },

    #[error("sentence store failure: {0}")]
    #[diagnostic(
        code(corpus_shuffler::store),
        help("Ensure the SQLite store file is accessible and not corrupt; re-run the affected groups.")
    )]
    Store(#[from] sqlx::Error),

    #[error("output I/O failure: {0}")]
    #[diagnostic(code(corpus_shuffler::io))]
    Io(#[from] std::io::Error),

    #[error("report export failure: {0}")]
    #[diagnostic(code(corpus_shuffler::report))]
    Report(#[from] csv::Error),

    #[error("chunk serialization failure: {0}")]
    #[diagnostic(code(corpus_shuffler::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl ShuffleError {
    /// Shorthand for configuration violations detected before processing.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Per-document segmentation failure.
///
/// Non-fatal: the runner logs the failure and skips the document, continuing
/// with the rest of the group.
#[derive(Debug, Error, Diagnostic)]
#[error("segmentation failed: {message}")]
#[diagnostic(code(corpus_shuffler::segmentation))]
pub struct SegmentationError {
    pub message: String,
}

impl SegmentationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShuffleError>;
