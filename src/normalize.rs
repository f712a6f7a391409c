//! Comparison-time text normalization.
//!
//! Speech history entries are stored verbatim; all canonicalization
//! happens per comparison so the remainder handed back to the caller
//! keeps its original casing and punctuation.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Punctuation inserted by TTS input text and ASR formatting, removed
/// before comparison. Includes the low/high double quotes common in
/// Central European text.
const PUNCTUATION: [char; 14] = [
    '.', ',', '!', '?', ':', ';', '"', '\'', '„', '“', '(', ')', '[', ']',
];

/// Canonicalize text for comparison: lowercase, strip the fixed
/// punctuation set, collapse whitespace runs to single spaces, trim.
pub(crate) fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove diacritics: NFD decompose, drop combining marks, NFC
/// recompose. Tolerates ASR transliteration drift ("děláte" vs
/// "delate"). Callers lowercase first so "Ě" cannot slip through as a
/// composed uppercase form.
pub(crate) fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Remove the first `count` whitespace-delimited words from `text`,
/// preserving the original casing and punctuation of the remainder.
/// Returns the empty string when `count` covers every word.
pub(crate) fn remove_leading_words(text: &str, count: usize) -> String {
    let starts = word_starts(text);
    if count >= starts.len() {
        return String::new();
    }
    text[starts[count]..].trim_start().to_string()
}

/// Byte offset of the first character of each run of non-whitespace.
fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            starts.push(i);
            in_word = true;
        }
    }
    starts
}
