//! Chunk packing and part-file output.
//!
//! Ordered sentences are packed greedily into documents of roughly
//! `target_word_count` words. Whenever adding the next sentence would
//! overshoot the target, the packer keeps whichever of the two states (with
//! or without the sentence) lands closer to the target; on a tie the
//! sentence is included. A sentence that closes a chunk starts the next
//! buffer, so nothing is dropped.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::errors::Result;
use crate::text::word_count;

/// Greedy best-of-two packer over an ordered sentence stream.
#[derive(Debug)]
pub struct ChunkPacker {
    target: usize,
    buffer: Vec<String>,
    words: usize,
}

impl ChunkPacker {
    pub fn new(target_word_count: usize) -> Self {
        Self {
            target: target_word_count,
            buffer: Vec::new(),
            words: 0,
        }
    }

    /// Feeds the next sentence; returns a finished chunk when one closes.
    pub fn push(&mut self, sentence: String) -> Option<String> {
        let added = word_count(&sentence);
        let with = self.words + added;

        if with < self.target {
            self.buffer.push(sentence);
            self.words = with;
            return None;
        }

        // Keep whichever side of the target is closer; ties include. The
        // buffered count can sit above the target when a closing sentence was
        // itself oversized, hence the signed distance.
        let dist_with = (with - self.target) as i64;
        let dist_without = (self.target as i64 - self.words as i64).abs();
        if self.buffer.is_empty() || dist_with <= dist_without {
            self.buffer.push(sentence);
            let chunk = self.drain();
            Some(chunk)
        } else {
            let chunk = self.drain();
            self.buffer.push(sentence);
            self.words = added;
            Some(chunk)
        }
    }

    /// Flushes the trailing partial chunk, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.drain())
    }

    fn drain(&mut self) -> String {
        let chunk = self.buffer.join(" ");
        self.buffer.clear();
        self.words = 0;
        chunk
    }
}

/// Provenance marker recorded in every part file: content is shuffled and no
/// longer attributable to a single source file.
pub const SHUFFLED_ORIGIN: &str = "shuffled.none";

#[derive(Debug, Serialize)]
struct PartMetadata {
    original_file: &'static str,
}

#[derive(Debug, Serialize)]
struct PartPayload<'a> {
    title: String,
    content: &'a str,
    metadata: PartMetadata,
}

/// Writes packed chunks as numbered `part_NNN.json` files into one group
/// directory. Numbering is 1-based.
#[derive(Debug)]
pub struct ChunkFileWriter {
    dir: PathBuf,
    next_index: usize,
}

impl ChunkFileWriter {
    /// Creates the group directory (and parents) if missing.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir, next_index: 1 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of parts written so far.
    pub fn parts_written(&self) -> usize {
        self.next_index - 1
    }

    /// Serializes one chunk to the next `part_NNN.json`.
    #[instrument(skip(self, content), fields(dir = %self.dir.display()), err)]
    pub async fn write_part(&mut self, content: &str) -> Result<PathBuf> {
        let title = format!("part_{:03}", self.next_index);
        let payload = PartPayload {
            title: title.clone(),
            content,
            metadata: PartMetadata {
                original_file: SHUFFLED_ORIGIN,
            },
        };
        let path = self.dir.join(format!("{title}.json"));
        let body = serde_json::to_string_pretty(&payload)?;
        tokio::fs::write(&path, body).await?;
        self.next_index += 1;
        Ok(path)
    }
}
