//! Run orchestration.
//!
//! [`Shuffler`] wires the pipeline together: route entries to groups, detect
//! the segmentation mode, then per group ingest through filter and store,
//! export diagnostics, and pack the deterministic sentence stream into part
//! files. Groups are processed strictly sequentially in sorted key order, so
//! two runs over the same corpus touch files in the same order.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::chunker::{ChunkFileWriter, ChunkPacker};
use crate::config::ShufflerConfig;
use crate::entry::CorpusEntry;
use crate::errors::Result;
use crate::filter::{QualityFilter, RejectedSentence};
use crate::grouping::GroupKey;
use crate::reports::{self, TOP_DUPLICATES_LIMIT};
use crate::segmenter::SentenceSegmenter;
use crate::store::SentenceStore;

/// Whether entries arrive pre-segmented or as raw text.
///
/// Uniform per run; detected from the first routable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentationMode {
    PreSegmented,
    Raw,
}

/// Outcome of one group.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub group: GroupKey,
    /// Sentences seen before filtering and dedup.
    pub input_sentences: usize,
    /// Distinct normalized sentences stored.
    pub unique_sentences: u64,
    /// Sentences the quality filter turned away.
    pub rejected_sentences: usize,
    /// Part files written.
    pub documents_written: usize,
    /// Documents dropped because segmentation failed.
    pub skipped_documents: usize,
    pub output_dir: PathBuf,
}

/// Outcome of one full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub groups: Vec<GroupReport>,
}

impl RunSummary {
    pub fn total_documents(&self) -> usize {
        self.groups.iter().map(|g| g.documents_written).sum()
    }

    pub fn total_unique_sentences(&self) -> u64 {
        self.groups.iter().map(|g| g.unique_sentences).sum()
    }
}

/// Corpus shuffling engine.
pub struct Shuffler {
    config: ShufflerConfig,
    segmenter: Arc<dyn SentenceSegmenter>,
    filter: QualityFilter,
}

impl Shuffler {
    pub fn new(config: ShufflerConfig, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        Self {
            config,
            segmenter,
            filter: QualityFilter::new(),
        }
    }

    /// Runs the full pipeline over `entries`.
    ///
    /// Re-running with the same entries, seed and configuration produces
    /// byte-identical output; each group is wiped and rebuilt from scratch.
    #[instrument(skip(self, entries), fields(entries = entries.len()), err)]
    pub async fn run(&self, entries: &[CorpusEntry]) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, groups_output = %self.config.output_path().display(), "run started");

        tokio::fs::create_dir_all(self.config.output_path()).await?;

        let routed = self.route(entries);
        let mode = detect_mode(&routed);

        let store =
            SentenceStore::open(self.config.store_path(), self.config.commit_every()).await?;

        let mut groups = Vec::with_capacity(routed.len());
        for (group, group_entries) in &routed {
            let report = self
                .process_group(&store, mode, group, group_entries)
                .await?;
            info!(
                group = %report.group,
                input = report.input_sentences,
                unique = report.unique_sentences,
                rejected = report.rejected_sentences,
                documents = report.documents_written,
                "group done"
            );
            groups.push(report);
        }

        store.close().await;
        let finished_at = Utc::now();
        let summary = RunSummary {
            run_id,
            started_at,
            finished_at,
            groups,
        };
        info!(
            %run_id,
            groups = summary.groups.len(),
            documents = summary.total_documents(),
            unique_sentences = summary.total_unique_sentences(),
            "run finished"
        );
        Ok(summary)
    }

    /// Routes entries to groups. Entries without a relative path cannot be
    /// grouped and are dropped.
    fn route<'a>(&self, entries: &'a [CorpusEntry]) -> BTreeMap<GroupKey, Vec<&'a CorpusEntry>> {
        let mut routed: BTreeMap<GroupKey, Vec<&CorpusEntry>> = BTreeMap::new();
        for entry in entries {
            let Some(rel_path) = entry.rel_path() else {
                debug!("entry without rel_path dropped");
                continue;
            };
            let group = GroupKey::from_rel_path(rel_path, self.config.level());
            routed.entry(group).or_default().push(entry);
        }
        routed
    }

    async fn process_group(
        &self,
        store: &SentenceStore,
        mode: SegmentationMode,
        group: &GroupKey,
        entries: &[&CorpusEntry],
    ) -> Result<GroupReport> {
        store.reset_group(group).await?;

        let mut writer = store.begin_group(group, self.config.seed()).await?;
        let mut rejected: Vec<RejectedSentence> = Vec::new();
        let mut input_sentences = 0usize;
        let mut skipped_documents = 0usize;

        match mode {
            SegmentationMode::PreSegmented => {
                for entry in entries {
                    let Some(sentences) = entry.sentences.as_ref() else {
                        debug!(group = %group, "raw-text entry dropped from pre-segmented run");
                        continue;
                    };
                    for sentence in sentences {
                        input_sentences += 1;
                        self.ingest(&mut writer, sentence, &mut rejected).await?;
                    }
                }
            }
            SegmentationMode::Raw => {
                for batch in entries.chunks(self.config.batch_size()) {
                    let mut texts = Vec::with_capacity(batch.len());
                    for entry in batch {
                        if entry.sentences.is_some() {
                            debug!(group = %group, "pre-segmented entry dropped from raw run");
                            continue;
                        }
                        texts.push(entry.text.clone());
                    }
                    for result in self.segmenter.segment_batch(&texts).await {
                        match result {
                            Ok(sentences) => {
                                for sentence in &sentences {
                                    input_sentences += 1;
                                    self.ingest(&mut writer, sentence, &mut rejected).await?;
                                }
                            }
                            Err(err) => {
                                skipped_documents += 1;
                                warn!(group = %group, error = %err, "document skipped");
                            }
                        }
                    }
                }
            }
        }
        writer.finish().await?;

        let output_dir = self.config.output_path().join(group.to_path());
        let mut part_writer = ChunkFileWriter::create(&output_dir).await?;

        let mut packer = ChunkPacker::new(self.config.target_word_count());
        {
            let mut rows = store.ordered_texts_stream(group);
            while let Some(row) = rows.next().await {
                if let Some(chunk) = packer.push(row?) {
                    part_writer.write_part(&chunk).await?;
                }
            }
        }
        if let Some(tail) = packer.finish() {
            part_writer.write_part(&tail).await?;
        }

        let top = store.top_duplicates(group, TOP_DUPLICATES_LIMIT).await?;
        reports::write_top_duplicates(part_writer.dir(), &top)?;
        reports::write_rejected(part_writer.dir(), &rejected)?;

        Ok(GroupReport {
            group: group.clone(),
            input_sentences,
            unique_sentences: store.unique_count(group).await?,
            rejected_sentences: rejected.len(),
            documents_written: part_writer.parts_written(),
            skipped_documents,
            output_dir,
        })
    }

    async fn ingest(
        &self,
        writer: &mut crate::store::SentenceWriter,
        sentence: &str,
        rejected: &mut Vec<RejectedSentence>,
    ) -> Result<()> {
        match self.filter.check(sentence) {
            Ok(()) => writer.upsert(sentence).await?,
            Err(reason) => rejected.push(RejectedSentence {
                reason,
                text: sentence.trim().to_string(),
            }),
        }
        Ok(())
    }
}

/// Picks the run's segmentation mode from the first routed entry.
fn detect_mode(routed: &BTreeMap<GroupKey, Vec<&CorpusEntry>>) -> SegmentationMode {
    let first = routed.values().flatten().next();
    match first {
        Some(entry) if entry.sentences.is_some() => SegmentationMode::PreSegmented,
        _ => SegmentationMode::Raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::UnicodeSegmenter;

    fn shuffler(output: &std::path::Path) -> Shuffler {
        let config = ShufflerConfig::builder()
            .with_output_path(output)
            .with_target_word_count(8)
            .with_store_file_name("_sents.db")
            .build()
            .unwrap();
        Shuffler::new(config, Arc::new(UnicodeSegmenter::new()))
    }

    #[tokio::test]
    async fn entries_without_rel_path_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let shuffler = shuffler(&dir.path().join("out"));
        let mut orphan = CorpusEntry::from_text("x", "Propoziție fără adresă aici.");
        orphan.meta.clear();
        let summary = shuffler.run(&[orphan]).await.unwrap();
        assert!(summary.groups.is_empty());
    }

    #[tokio::test]
    async fn pre_segmented_entries_skip_the_segmenter() {
        let dir = tempfile::tempdir().unwrap();
        let shuffler = shuffler(&dir.path().join("out"));
        let entry = CorpusEntry::from_sentences(
            "acte/hotarare.txt",
            vec![
                "Consiliul a aprobat bugetul local.".to_string(),
                "Ședința s-a încheiat la ora cinci.".to_string(),
            ],
        );
        let summary = shuffler.run(&[entry]).await.unwrap();
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].input_sentences, 2);
        assert_eq!(summary.groups[0].unique_sentences, 2);
    }

    #[tokio::test]
    async fn mode_contradicting_entries_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let shuffler = shuffler(&dir.path().join("out"));
        let entries = vec![
            CorpusEntry::from_sentences(
                "a/unu.txt",
                vec!["Prima propoziție stabilește modul.".to_string()],
            ),
            CorpusEntry::from_text("a/doi.txt", "Text brut care contrazice modul detectat."),
        ];
        let summary = shuffler.run(&entries).await.unwrap();
        assert_eq!(summary.groups[0].input_sentences, 1);
    }
}
