//! Sentence segmentation seam.
//!
//! Segmentation is an external capability: the engine only orchestrates it.
//! Implementations receive one batch of raw documents at a time and return a
//! per-document result, so a single failing document can be skipped without
//! aborting its group. The bundled [`UnicodeSegmenter`] splits on UAX#29
//! sentence boundaries and is sufficient when no language-specific model is
//! plugged in.

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use crate::errors::SegmentationError;

/// Splits batches of raw documents into ordered sentence lists.
///
/// Acquired once at run start and released at run end; implementations that
/// load heavy models should do so in their constructor.
#[async_trait]
pub trait SentenceSegmenter: Send + Sync {
    /// Segments each document of `texts` independently.
    ///
    /// The result has exactly one element per input document. A failed
    /// document yields `Err`; the caller skips it and continues.
    async fn segment_batch(
        &self,
        texts: &[String],
    ) -> Vec<std::result::Result<Vec<String>, SegmentationError>>;
}

/// UAX#29 sentence segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl UnicodeSegmenter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SentenceSegmenter for UnicodeSegmenter {
    async fn segment_batch(
        &self,
        texts: &[String],
    ) -> Vec<std::result::Result<Vec<String>, SegmentationError>> {
        texts
            .iter()
            .map(|text| {
                Ok(text
                    .unicode_sentences()
                    .map(|sentence| sentence.to_string())
                    .collect())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_on_sentence_boundaries() {
        let segmenter = UnicodeSegmenter::new();
        let docs = vec!["Prima propoziție. A doua propoziție!".to_string()];
        let results = segmenter.segment_batch(&docs).await;
        assert_eq!(results.len(), 1);
        let sentences = results[0].as_ref().unwrap();
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("Prima"));
        assert!(sentences[1].starts_with("A doua"));
    }

    #[tokio::test]
    async fn one_result_per_document() {
        let segmenter = UnicodeSegmenter::new();
        let docs = vec!["Una.".to_string(), String::new(), "Două. Trei.".to_string()];
        let results = segmenter.segment_batch(&docs).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].as_ref().unwrap().len(), 0);
        assert_eq!(results[2].as_ref().unwrap().len(), 2);
    }
}
