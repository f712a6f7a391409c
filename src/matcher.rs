//! Three-strategy echo matching against a single TTS utterance.
//!
//! Given a transcript and one recently spoken utterance, decide whether
//! the transcript starts with an echo of the utterance and where the
//! echo ends. Three strategies run in order:
//!
//! 1. **Full containment**: the whole transcript lies inside the
//!    utterance (the microphone opened mid-playback and captured only a
//!    fragment).
//! 2. **Consecutive prefix**: the transcript starts with an unbroken
//!    run of words fuzzily matching the utterance word-for-word.
//! 3. **Sliding prefix**: a transcript prefix of roughly the
//!    utterance's word count scores above the match threshold against
//!    the whole utterance.

use crate::config::EchoFilterConfig;
use crate::normalize::{normalize, remove_leading_words, strip_diacritics};
use crate::similarity::Similarity;
use tracing::trace;

/// Transcript prefixes within this many words of the utterance's word
/// count are tried by the sliding-prefix strategy.
const PREFIX_WINDOW: usize = 2;

/// Minimum transcript word count for full containment to count as
/// echo. Shorter fragments appear inside an utterance too easily by
/// chance.
const MIN_CONTAINMENT_WORDS: usize = 3;

/// Minimum unbroken run of word matches for the consecutive-prefix
/// strategy.
const MIN_CONSECUTIVE_MATCHES: usize = 3;

/// Which strategy classified the echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    Containment,
    ConsecutivePrefix,
    SlidingPrefix,
}

/// A detected leading echo: what remains of the transcript once the
/// echoed words are removed, and how confident the match was.
#[derive(Debug, Clone)]
pub(crate) struct EchoMatch {
    /// Remainder of the original transcript, casing and punctuation
    /// intact. Empty when the entire transcript was echo.
    pub remainder: String,
    /// Match confidence in `[0.0, 1.0]`.
    pub score: f64,
    /// The strategy that fired.
    pub strategy: Strategy,
}

/// Match `text` against one spoken utterance and strip the echoed
/// leading portion. Returns `None` when no strategy fires; the caller
/// keeps its working text unchanged and moves on to the next utterance.
pub(crate) fn match_echo(
    text: &str,
    tts_entry: &str,
    similarity: &dyn Similarity,
    config: &EchoFilterConfig,
) -> Option<EchoMatch> {
    if text.trim().is_empty() || tts_entry.trim().is_empty() {
        return None;
    }

    let norm_text = normalize(text);
    let norm_tts = normalize(tts_entry);
    let text_words: Vec<&str> = norm_text.split_whitespace().collect();
    let tts_words: Vec<&str> = norm_tts.split_whitespace().collect();
    if text_words.is_empty() || tts_words.is_empty() {
        return None;
    }

    // Full containment: recording started mid-utterance and captured a
    // fragment that lies wholly inside what was spoken.
    let plain_text = strip_diacritics(&norm_text);
    let plain_tts = strip_diacritics(&norm_tts);
    if text_words.len() >= MIN_CONTAINMENT_WORDS && plain_tts.contains(&plain_text) {
        return Some(EchoMatch {
            remainder: String::new(),
            score: 1.0,
            strategy: Strategy::Containment,
        });
    }

    // Consecutive prefix: lock-step walk from index 0, stopping at the
    // first word pair that misses the per-word threshold.
    let mut matched = 0;
    for (text_word, tts_word) in text_words.iter().zip(tts_words.iter()) {
        if scored(similarity, text_word, tts_word) > config.word_threshold {
            matched += 1;
        } else {
            break;
        }
    }
    let ratio = matched as f64 / tts_words.len() as f64;
    trace!(matched, ratio, "consecutive prefix run");
    if matched >= MIN_CONSECUTIVE_MATCHES && ratio >= config.min_coverage {
        return Some(EchoMatch {
            remainder: remove_leading_words(text, matched),
            score: ratio,
            strategy: Strategy::ConsecutivePrefix,
        });
    }

    // Sliding prefix: score transcript prefixes near the utterance's
    // word count against the whole utterance, keep the best.
    let utterance_len = tts_words.len();
    let shortest = utterance_len.saturating_sub(PREFIX_WINDOW).max(1);
    let longest = (utterance_len + PREFIX_WINDOW).min(text_words.len());
    let mut best_score = 0.0f64;
    let mut best_len = 0usize;
    for prefix_len in shortest..=longest {
        let prefix = text_words[..prefix_len].join(" ");
        let score = scored(similarity, &prefix, &norm_tts);
        trace!(prefix_len, score, "sliding prefix candidate");
        if score > best_score {
            best_score = score;
            best_len = prefix_len;
        }
    }
    if best_len > 0 && best_score >= config.match_threshold {
        return Some(EchoMatch {
            remainder: remove_leading_words(text, best_len),
            score: best_score,
            strategy: Strategy::SlidingPrefix,
        });
    }

    None
}

/// Run the injected metric over diacritic-stripped inputs so
/// transliteration drift does not depress the score.
fn scored(similarity: &dyn Similarity, a: &str, b: &str) -> f64 {
    similarity.score(&strip_diacritics(a), &strip_diacritics(b))
}
