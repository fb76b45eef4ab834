//! Sentence quality filter.
//!
//! Each raw sentence passes through an ordered list of checks before it may
//! reach the store; the first failing check wins and its reason code is
//! recorded for the rejection report.

use serde::Serialize;

use crate::text::normalize_sentence;

/// Reason a sentence was rejected, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooShort,
    TooFewLetters,
    TooFewWords,
    MostlyNonLetters,
    Boilerplate,
}

impl RejectReason {
    /// Snake-case code used in the rejection report.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too_short",
            RejectReason::TooFewLetters => "too_few_letters",
            RejectReason::TooFewWords => "too_few_words",
            RejectReason::MostlyNonLetters => "mostly_non_letters",
            RejectReason::Boilerplate => "boilerplate",
        }
    }
}

/// A sentence rejected by the filter, kept for the audit report only.
#[derive(Debug, Clone)]
pub struct RejectedSentence {
    pub reason: RejectReason,
    pub text: String,
}

/// Read-more prompts and similar site furniture, matched against the
/// normalized form.
const BOILERPLATE: [&str; 4] = ["citește", "citeste", "continua", "continuă"];

/// Accepts or rejects raw sentences.
///
/// Checks apply in a fixed order (first match wins):
/// 1. trimmed length < 10 characters → `too_short`
/// 2. fewer than 7 alphabetic characters → `too_few_letters`
/// 3. fewer than 2 word-like tokens → `too_few_words`
/// 4. alphabetic ratio below 0.50 → `mostly_non_letters`
/// 5. normalized form in the boilerplate set → `boilerplate`
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityFilter;

impl QualityFilter {
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(())` for an accepted sentence, or the first matching
    /// rejection reason.
    pub fn check(&self, raw: &str) -> Result<(), RejectReason> {
        let s = raw.trim();

        if s.chars().count() < 10 {
            return Err(RejectReason::TooShort);
        }

        let total = s.chars().count();
        let letters = s.chars().filter(|ch| ch.is_alphabetic()).count();
        if letters < 7 {
            return Err(RejectReason::TooFewLetters);
        }

        let words = s
            .split_whitespace()
            .filter(|tok| tok.chars().any(char::is_alphabetic))
            .count();
        if words < 2 {
            return Err(RejectReason::TooFewWords);
        }

        if (letters as f64) / (total.max(1) as f64) < 0.50 {
            return Err(RejectReason::MostlyNonLetters);
        }

        if BOILERPLATE.contains(&normalize_sentence(s).as_str()) {
            return Err(RejectReason::Boilerplate);
        }

        Ok(())
    }
}
