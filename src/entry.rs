//! Corpus entry model.
//!
//! Entries are supplied by an external corpus loader and are read-only to the
//! engine. An entry carries raw text, optionally a pre-segmented sentence
//! list, and a metadata map with the relative path used for grouping.

use rustc_hash::FxHashMap;

/// Metadata key holding an entry's corpus-relative path.
pub const REL_PATH_KEY: &str = "rel_path";

/// One document of the input corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusEntry {
    /// Raw document text. May be empty when `sentences` is present.
    pub text: String,
    /// Pre-segmented sentences, if the loader already ran a segmenter.
    /// Segmentation mode is uniform per run: either every entry carries
    /// sentences or none does.
    pub sentences: Option<Vec<String>>,
    /// Loader-owned metadata; must contain [`REL_PATH_KEY`].
    pub meta: FxHashMap<String, String>,
}

impl CorpusEntry {
    /// Builds an entry with raw text only.
    pub fn from_text(rel_path: impl Into<String>, text: impl Into<String>) -> Self {
        let mut meta = FxHashMap::default();
        meta.insert(REL_PATH_KEY.to_string(), rel_path.into());
        Self {
            text: text.into(),
            sentences: None,
            meta,
        }
    }

    /// Builds an entry with pre-segmented sentences.
    pub fn from_sentences(rel_path: impl Into<String>, sentences: Vec<String>) -> Self {
        let mut meta = FxHashMap::default();
        meta.insert(REL_PATH_KEY.to_string(), rel_path.into());
        Self {
            text: String::new(),
            sentences: Some(sentences),
            meta,
        }
    }

    /// Relative path used for group routing, if present.
    pub fn rel_path(&self) -> Option<&str> {
        self.meta.get(REL_PATH_KEY).map(String::as_str)
    }
}
