//! Sentence normalization and word counting.

/// Normalizes a sentence for dedup keying: trim, lowercase, collapse runs of
/// whitespace to single spaces.
///
/// # Examples
/// ```
/// use corpus_shuffler::text::normalize_sentence;
///
/// assert_eq!(normalize_sentence("  Consiliul  a\taprobat. "), "consiliul a aprobat.");
/// ```
pub fn normalize_sentence(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

/// Counts word-like tokens: whitespace-delimited tokens containing at least
/// one alphabetic character. `char::is_alphabetic` keeps diacritics.
///
/// # Examples
/// ```
/// use corpus_shuffler::text::word_count;
///
/// assert_eq!(word_count("Ședința a durat 2 ore."), 4);
/// assert_eq!(word_count("1234 ---"), 0);
/// ```
pub fn word_count(s: &str) -> usize {
    s.split_whitespace()
        .filter(|tok| tok.chars().any(char::is_alphabetic))
        .count()
}
