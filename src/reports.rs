//! Per-group CSV diagnostics.
//!
//! Two audit files accompany each group directory: the top duplicated
//! sentences (with counts) and every sentence the quality filter rejected
//! (with its reason code). Both are advisory output, never read back by the
//! engine.

use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::errors::Result;
use crate::filter::RejectedSentence;
use crate::store::DuplicateRecord;

/// File name of the duplicate-frequency report.
pub const TOP_DUPLICATES_FILE: &str = "_top100_duplicates.csv";
/// File name of the rejection report.
pub const REJECTED_FILE: &str = "_rejected_sentences.csv";
/// How many duplicate rows the report keeps.
pub const TOP_DUPLICATES_LIMIT: usize = 100;

/// Writes `_top100_duplicates.csv` into `dir`, most frequent first.
#[instrument(skip(records), fields(dir = %dir.display(), rows = records.len()), err)]
pub fn write_top_duplicates(dir: &Path, records: &[DuplicateRecord]) -> Result<PathBuf> {
    let path = dir.join(TOP_DUPLICATES_FILE);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["rank", "count", "sentence"])?;
    for (idx, record) in records.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            record.occurrences.to_string(),
            record.text.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Writes `_rejected_sentences.csv` into `dir`, in rejection order.
#[instrument(skip(rejected), fields(dir = %dir.display(), rows = rejected.len()), err)]
pub fn write_rejected(dir: &Path, rejected: &[RejectedSentence]) -> Result<PathBuf> {
    let path = dir.join(REJECTED_FILE);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["reason", "sentence"])?;
    for sentence in rejected {
        writer.write_record([sentence.reason.as_str(), sentence.text.as_str()])?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::RejectReason;

    #[test]
    fn duplicate_report_has_header_and_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            DuplicateRecord {
                occurrences: 5,
                text: "Propoziție repetată des.".to_string(),
            },
            DuplicateRecord {
                occurrences: 2,
                text: "Propoziție repetată rar.".to_string(),
            },
        ];

        let path = write_top_duplicates(dir.path(), &records).unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next().unwrap(), "rank,count,sentence");
        assert!(lines.next().unwrap().starts_with("1,5,"));
        assert!(lines.next().unwrap().starts_with("2,2,"));
    }

    #[test]
    fn rejection_report_uses_reason_codes() {
        let dir = tempfile::tempdir().unwrap();
        let rejected = vec![RejectedSentence {
            reason: RejectReason::TooShort,
            text: "scurt".to_string(),
        }];

        let path = write_rejected(dir.path(), &rejected).unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.starts_with("reason,sentence"));
        assert!(body.contains("too_short,scurt"));
    }

    #[test]
    fn empty_reports_still_carry_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_top_duplicates(dir.path(), &[]).unwrap();
        write_rejected(dir.path(), &[]).unwrap();

        let dup = std::fs::read_to_string(dir.path().join(TOP_DUPLICATES_FILE)).unwrap();
        let rej = std::fs::read_to_string(dir.path().join(REJECTED_FILE)).unwrap();
        assert_eq!(dup.trim(), "rank,count,sentence");
        assert_eq!(rej.trim(), "reason,sentence");
    }
}
