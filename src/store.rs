//! Persistent sentence store.
//!
//! One SQLite file per run holds every accepted sentence keyed by
//! `(group_key, content_hash)`. Re-inserting a sentence that is already
//! present only bumps its occurrence counter, which is what makes re-running
//! a group idempotent. Ordering is read back through the precomputed
//! `order_key` column, so emission order is a pure function of content and
//! seed.
//!
//! The pool is capped at a single connection: the store has exactly one
//! writer at a time and SQLite rewards that discipline.

use std::path::Path;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, instrument};

use crate::config::DEFAULT_COMMIT_EVERY;
use crate::errors::Result;
use crate::grouping::GroupKey;
use crate::hashing::{content_hash, order_key};
use crate::text::normalize_sentence;

/// A sentence with its occurrence count, as read back for the duplicate
/// report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    pub occurrences: i64,
    pub text: String,
}

/// SQLite-backed deduplication store.
#[derive(Debug, Clone)]
pub struct SentenceStore {
    pool: SqlitePool,
    commit_every: usize,
}

impl SentenceStore {
    /// Opens (or creates) the store file and ensures the schema exists.
    #[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
    pub async fn open(path: impl AsRef<Path>, commit_every: usize) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("temp_store", "MEMORY")
            .pragma("cache_size", "-200000");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sentences (
                group_key    TEXT    NOT NULL,
                content_hash BLOB    NOT NULL,
                order_key    INTEGER NOT NULL,
                text         TEXT    NOT NULL,
                occurrences  INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (group_key, content_hash)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sentences_group_order
             ON sentences (group_key, order_key)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool, commit_every })
    }

    /// Opens with the default commit interval.
    pub async fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, DEFAULT_COMMIT_EVERY).await
    }

    /// Deletes every sentence of `group`, so the group can be re-ingested
    /// from scratch.
    #[instrument(skip(self), fields(group = %group), err)]
    pub async fn reset_group(&self, group: &GroupKey) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM sentences WHERE group_key = ?1")
            .bind(group.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();
        debug!(deleted, "group reset");
        Ok(())
    }

    /// Starts a write pass over `group`.
    ///
    /// The writer owns an open transaction; call [`SentenceWriter::finish`]
    /// to commit the tail.
    pub async fn begin_group(&self, group: &GroupKey, seed: i64) -> Result<SentenceWriter> {
        let tx = self.pool.begin().await?;
        Ok(SentenceWriter {
            pool: self.pool.clone(),
            group: group.clone(),
            seed,
            commit_every: self.commit_every,
            tx: Some(tx),
            pending: 0,
        })
    }

    /// Streams the sentence texts of `group` in deterministic order.
    ///
    /// The stream borrows the pool's single connection; finish (or drop) it
    /// before issuing further queries.
    pub fn ordered_texts_stream<'a>(&'a self, group: &'a GroupKey) -> BoxStream<'a, Result<String>> {
        sqlx::query("SELECT text FROM sentences WHERE group_key = ?1 ORDER BY order_key ASC")
            .bind(group.as_str())
            .fetch(&self.pool)
            .map(|row| -> Result<String> { Ok(row?.get::<String, _>(0)) })
            .boxed()
    }

    /// All sentence texts of `group` in deterministic order, collected.
    #[instrument(skip(self), fields(group = %group), err)]
    pub async fn ordered_texts(&self, group: &GroupKey) -> Result<Vec<String>> {
        use futures_util::TryStreamExt;
        self.ordered_texts_stream(group).try_collect().await
    }

    /// The `k` most duplicated sentences of `group`, most frequent first.
    ///
    /// Ties break on `order_key` so the report itself is deterministic.
    #[instrument(skip(self), fields(group = %group), err)]
    pub async fn top_duplicates(&self, group: &GroupKey, k: usize) -> Result<Vec<DuplicateRecord>> {
        let rows = sqlx::query(
            "SELECT occurrences, text FROM sentences
             WHERE group_key = ?1
             ORDER BY occurrences DESC, order_key ASC
             LIMIT ?2",
        )
        .bind(group.as_str())
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| DuplicateRecord {
                occurrences: row.get::<i64, _>(0),
                text: row.get::<String, _>(1),
            })
            .collect())
    }

    /// Number of distinct sentences stored for `group`.
    #[instrument(skip(self), fields(group = %group), err)]
    pub async fn unique_count(&self, group: &GroupKey) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) FROM sentences WHERE group_key = ?1")
            .bind(group.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>(0) as u64)
    }

    /// Closes the pool, flushing WAL state.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Transactional writer for one group.
///
/// Upserts accumulate inside a transaction that is committed and re-opened
/// every `commit_every` writes, bounding both memory and the window lost on a
/// crash.
pub struct SentenceWriter {
    pool: SqlitePool,
    group: GroupKey,
    seed: i64,
    commit_every: usize,
    tx: Option<Transaction<'static, Sqlite>>,
    pending: usize,
}

impl SentenceWriter {
    /// Inserts one accepted sentence, or bumps its counter when the group
    /// already holds the same normalized content.
    ///
    /// Sentences that normalize to the empty string are ignored.
    pub async fn upsert(&mut self, raw: &str) -> Result<()> {
        let normalized = normalize_sentence(raw);
        if normalized.is_empty() {
            return Ok(());
        }
        let hash = content_hash(&normalized);
        let key = order_key(&hash, self.seed);

        if self.tx.is_none() {
            self.tx = Some(self.pool.begin().await?);
        }
        if let Some(tx) = self.tx.as_mut() {
            sqlx::query(
                "INSERT INTO sentences (group_key, content_hash, order_key, text, occurrences)
                 VALUES (?1, ?2, ?3, ?4, 1)
                 ON CONFLICT (group_key, content_hash)
                 DO UPDATE SET occurrences = occurrences + 1",
            )
            .bind(self.group.as_str())
            .bind(hash.as_slice())
            .bind(key)
            .bind(raw.trim())
            .execute(&mut **tx)
            .await?;
        }

        self.pending += 1;
        if self.pending >= self.commit_every {
            self.commit().await?;
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            debug!(group = %self.group, upserts = self.pending, "batch committed");
        }
        self.pending = 0;
        Ok(())
    }

    /// Commits any uncommitted tail and consumes the writer.
    pub async fn finish(mut self) -> Result<()> {
        self.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SentenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SentenceStore::open(dir.path().join("sents.db"), 4)
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn upsert_deduplicates_on_normalized_content() {
        let (_dir, store) = temp_store().await;
        let group = GroupKey::from_rel_path("news/a.txt", -1);

        let mut writer = store.begin_group(&group, 42).await.unwrap();
        writer.upsert("Consiliul a aprobat bugetul.").await.unwrap();
        writer.upsert("  consiliul a aprobat   bugetul. ").await.unwrap();
        writer.upsert("O altă propoziție.").await.unwrap();
        writer.finish().await.unwrap();

        assert_eq!(store.unique_count(&group).await.unwrap(), 2);
        let top = store.top_duplicates(&group, 10).await.unwrap();
        assert_eq!(top[0].occurrences, 2);
        assert_eq!(top[0].text, "Consiliul a aprobat bugetul.");
    }

    #[tokio::test]
    async fn ordering_is_independent_of_insertion_order() {
        let (_dir, store) = temp_store().await;
        let group_a = GroupKey::from_rel_path("a/x.txt", -1);
        let group_b = GroupKey::from_rel_path("b/x.txt", -1);
        let sentences = [
            "Prima propoziție din corpus.",
            "A doua propoziție din corpus.",
            "A treia propoziție din corpus.",
        ];

        let mut writer = store.begin_group(&group_a, 7).await.unwrap();
        for s in &sentences {
            writer.upsert(s).await.unwrap();
        }
        writer.finish().await.unwrap();

        let mut writer = store.begin_group(&group_b, 7).await.unwrap();
        for s in sentences.iter().rev() {
            writer.upsert(s).await.unwrap();
        }
        writer.finish().await.unwrap();

        assert_eq!(
            store.ordered_texts(&group_a).await.unwrap(),
            store.ordered_texts(&group_b).await.unwrap()
        );
    }

    #[tokio::test]
    async fn reset_group_leaves_other_groups_intact() {
        let (_dir, store) = temp_store().await;
        let kept = GroupKey::from_rel_path("kept/x.txt", -1);
        let wiped = GroupKey::from_rel_path("wiped/x.txt", -1);

        for group in [&kept, &wiped] {
            let mut writer = store.begin_group(group, 42).await.unwrap();
            writer.upsert("O propoziție de test.").await.unwrap();
            writer.finish().await.unwrap();
        }

        store.reset_group(&wiped).await.unwrap();
        assert_eq!(store.unique_count(&wiped).await.unwrap(), 0);
        assert_eq!(store.unique_count(&kept).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn commit_interval_does_not_change_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = SentenceStore::open(dir.path().join("s.db"), 2).await.unwrap();
        let group = GroupKey::from_rel_path("g/x.txt", -1);

        let mut writer = store.begin_group(&group, 42).await.unwrap();
        for i in 0..7 {
            writer
                .upsert(&format!("Propoziția numărul {i} din text."))
                .await
                .unwrap();
        }
        writer.finish().await.unwrap();

        assert_eq!(store.unique_count(&group).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn blank_sentences_are_ignored() {
        let (_dir, store) = temp_store().await;
        let group = GroupKey::from_rel_path("g/x.txt", -1);

        let mut writer = store.begin_group(&group, 42).await.unwrap();
        writer.upsert("   ").await.unwrap();
        writer.upsert("").await.unwrap();
        writer.finish().await.unwrap();

        assert_eq!(store.unique_count(&group).await.unwrap(), 0);
    }
}
