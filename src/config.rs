//! Run configuration.
//!
//! A [`ShufflerConfig`] is constructed once per run through the builder,
//! validated eagerly, and immutable afterwards. Invalid values are rejected as
//! [`ShuffleError::Configuration`] before any entry is touched.

use std::path::{Path, PathBuf};

use crate::errors::{Result, ShuffleError};

/// Default approximate size of an output document, in words.
pub const DEFAULT_TARGET_WORD_COUNT: usize = 2000;
/// Default number of entries per segmentation batch.
pub const DEFAULT_BATCH_SIZE: usize = 512;
/// Default number of upserts between store commits.
pub const DEFAULT_COMMIT_EVERY: usize = 512;
/// Default ordering seed.
pub const DEFAULT_SEED: i64 = 42;

/// Validated, immutable configuration for one shuffle run.
#[derive(Debug, Clone)]
pub struct ShufflerConfig {
    level: i32,
    target_word_count: usize,
    output_path: PathBuf,
    batch_size: usize,
    seed: i64,
    commit_every: usize,
    store_file_name: String,
}

impl ShufflerConfig {
    pub fn builder() -> ShufflerConfigBuilder {
        ShufflerConfigBuilder::default()
    }

    /// Grouping depth: `-1` keeps the full folder path, `0` the top folder,
    /// `N > 0` truncates to depth `N + 1`.
    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn target_word_count(&self) -> usize {
        self.target_word_count
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn commit_every(&self) -> usize {
        self.commit_every
    }

    /// Store file path inside the output root.
    pub fn store_path(&self) -> PathBuf {
        self.output_path.join(&self.store_file_name)
    }
}

/// Builder for [`ShufflerConfig`].
#[derive(Debug, Clone)]
pub struct ShufflerConfigBuilder {
    level: i32,
    target_word_count: usize,
    output_path: PathBuf,
    batch_size: usize,
    seed: i64,
    commit_every: usize,
    store_file_name: Option<String>,
}

impl Default for ShufflerConfigBuilder {
    fn default() -> Self {
        Self {
            level: -1,
            target_word_count: DEFAULT_TARGET_WORD_COUNT,
            output_path: PathBuf::from("shuffler_output"),
            batch_size: DEFAULT_BATCH_SIZE,
            seed: DEFAULT_SEED,
            commit_every: DEFAULT_COMMIT_EVERY,
            store_file_name: None,
        }
    }
}

impl ShufflerConfigBuilder {
    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_target_word_count(mut self, target: usize) -> Self {
        self.target_word_count = target;
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_commit_every(mut self, commit_every: usize) -> Self {
        self.commit_every = commit_every;
        self
    }

    #[must_use]
    pub fn with_store_file_name(mut self, name: impl Into<String>) -> Self {
        self.store_file_name = Some(name.into());
        self
    }

    /// Validates and freezes the configuration.
    pub fn build(self) -> Result<ShufflerConfig> {
        if self.level < -1 {
            return Err(ShuffleError::config(format!(
                "level must be >= -1, got {}",
                self.level
            )));
        }
        if self.target_word_count == 0 {
            return Err(ShuffleError::config("target_word_count must be >= 1"));
        }
        if self.batch_size == 0 {
            return Err(ShuffleError::config("batch_size must be >= 1"));
        }
        if self.commit_every == 0 {
            return Err(ShuffleError::config("commit_every must be >= 1"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ShuffleError::config("output_path must not be empty"));
        }

        Ok(ShufflerConfig {
            level: self.level,
            target_word_count: self.target_word_count,
            output_path: self.output_path,
            batch_size: self.batch_size,
            seed: self.seed,
            commit_every: self.commit_every,
            store_file_name: resolve_store_file_name(self.store_file_name),
        })
    }
}

fn resolve_store_file_name(provided: Option<String>) -> String {
    if let Some(name) = provided {
        return name;
    }
    dotenvy::dotenv().ok();
    std::env::var("SHUFFLER_DB_NAME").unwrap_or_else(|_| "_sentences.db".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ShufflerConfig::builder()
            .with_store_file_name("_sents.db")
            .build()
            .unwrap();
        assert_eq!(config.level(), -1);
        assert_eq!(config.target_word_count(), 2000);
        assert_eq!(config.batch_size(), 512);
        assert_eq!(config.seed(), 42);
        assert_eq!(config.commit_every(), 512);
    }

    #[test]
    fn rejects_level_below_minus_one() {
        let err = ShufflerConfig::builder().with_level(-2).build().unwrap_err();
        assert!(matches!(err, ShuffleError::Configuration { .. }));
    }

    #[test]
    fn rejects_zero_sized_knobs() {
        assert!(ShufflerConfig::builder()
            .with_target_word_count(0)
            .build()
            .is_err());
        assert!(ShufflerConfig::builder().with_batch_size(0).build().is_err());
        assert!(ShufflerConfig::builder()
            .with_commit_every(0)
            .build()
            .is_err());
    }

    #[test]
    fn rejects_empty_output_path() {
        let err = ShufflerConfig::builder()
            .with_output_path("")
            .build()
            .unwrap_err();
        assert!(matches!(err, ShuffleError::Configuration { .. }));
    }

    #[test]
    fn store_path_lives_inside_output_root() {
        let config = ShufflerConfig::builder()
            .with_output_path("out")
            .with_store_file_name("_sents.db")
            .build()
            .unwrap();
        assert_eq!(config.store_path(), PathBuf::from("out").join("_sents.db"));
    }
}
