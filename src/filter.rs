//! Self-speech echo filter: strips the assistant's own just-spoken
//! text from incoming ASR transcripts.
//!
//! # Architecture
//!
//! ```text
//! Capture → AEC → VAD → STT ──→ [EchoFilter] ──→ intent routing
//!                                    ↑
//!                TTS playback ── start_speaking / stop_speaking
//! ```
//!
//! The TTS driver records every utterance it is about to play; the
//! transcription pipeline runs each ASR result through
//! [`EchoFilter::filter_transcription`] before handing text downstream.
//! Matching is purely text-based: the acoustic echo canceller operates
//! on raw PCM elsewhere, and this filter catches what leaks past it.

use crate::config::EchoFilterConfig;
use crate::error::Result;
use crate::matcher::match_echo;
use crate::normalize::normalize;
use crate::similarity::{JaroWinkler, Similarity};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Shared mutable state. Every public operation is a single critical
/// section; nothing is held across I/O or an await point (there are
/// none).
struct FilterState {
    /// Recently spoken TTS utterances, oldest first, stored verbatim.
    history: VecDeque<String>,
    /// When speaking most recently started; `None` while silent.
    speaking_since: Option<Instant>,
}

/// Text-based self-speech echo filter.
///
/// Thread-safe: share via `Arc` and call from any thread; operations
/// serialize internally. Filtering never consumes history entries;
/// clearing the history at a user-turn boundary is the caller's
/// responsibility.
pub struct EchoFilter {
    state: Mutex<FilterState>,
    similarity: Box<dyn Similarity>,
    config: EchoFilterConfig,
}

impl EchoFilter {
    /// Create a filter with the default Jaro-Winkler similarity metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: &EchoFilterConfig) -> Result<Self> {
        Self::with_similarity(config, Box::new(JaroWinkler))
    }

    /// Create a filter with an injected similarity metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_similarity(
        config: &EchoFilterConfig,
        similarity: Box<dyn Similarity>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(FilterState {
                history: VecDeque::with_capacity(config.history_capacity),
                speaking_since: None,
            }),
            similarity,
            config: config.clone(),
        })
    }

    /// Record an utterance the TTS driver is about to play and mark the
    /// assistant as speaking.
    ///
    /// Blank text is ignored. Recording beyond the history capacity
    /// evicts the oldest utterance.
    pub fn start_speaking(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.history.push_back(text.to_owned());
        while state.history.len() > self.config.history_capacity {
            state.history.pop_front();
        }
        state.speaking_since = Some(Instant::now());
    }

    /// Mark the assistant as no longer speaking.
    pub fn stop_speaking(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.speaking_since = None;
    }

    /// Whether the assistant is currently speaking.
    ///
    /// A speaking flag older than the configured staleness bound is
    /// cleared on this read: a missed [`stop_speaking`](Self::stop_speaking)
    /// (crashed playback process, dropped task) must not leave the flag
    /// stuck. There is no background timer.
    pub fn is_speaking(&self) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match state.speaking_since {
            None => false,
            Some(started) => {
                let staleness = Duration::from_secs(u64::from(self.config.speaking_timeout_s));
                if started.elapsed() <= staleness {
                    true
                } else {
                    state.speaking_since = None;
                    false
                }
            }
        }
    }

    /// Strip any leading echo of recently spoken utterances from an ASR
    /// transcript, returning what remains of the user's own speech.
    ///
    /// The history is walked oldest to newest: several utterances may
    /// have been spoken before the transcript arrived, and each may
    /// have left its own echo at the front of the capture. Each match
    /// shortens the working text before the next entry is tried; the
    /// walk stops early once nothing is left. A blank transcript, or an
    /// empty history, returns the input unchanged.
    pub fn filter_transcription(&self, transcription: &str) -> String {
        if transcription.trim().is_empty() {
            return transcription.to_owned();
        }
        let Ok(state) = self.state.lock() else {
            return transcription.to_owned();
        };
        if state.history.is_empty() {
            return transcription.to_owned();
        }

        let mut working = transcription.to_owned();
        for (index, entry) in state.history.iter().enumerate() {
            let Some(hit) = match_echo(&working, entry, self.similarity.as_ref(), &self.config)
            else {
                continue;
            };
            debug!(
                entry = index,
                strategy = ?hit.strategy,
                score = hit.score,
                "stripped echo of recent utterance"
            );
            working = hit.remainder;
            if working.is_empty() {
                break;
            }
        }

        working.trim().to_owned()
    }

    /// Whether any recorded utterance contains one of `stop_words`.
    ///
    /// Used to tell a user's literal stop command apart from an echo of
    /// the assistant having said a word that happens to contain it.
    /// Containment is substring-based, not word-bounded: "unstoppable"
    /// in the history matches the stop word "stop". Blank candidates
    /// are skipped.
    pub fn contains_stop_word<S: AsRef<str>>(&self, stop_words: &[S]) -> bool {
        let Ok(state) = self.state.lock() else {
            return false;
        };
        state.history.iter().any(|entry| {
            let normalized = normalize(entry);
            stop_words.iter().any(|word| {
                let word = word.as_ref().trim().to_lowercase();
                !word.is_empty() && normalized.contains(&word)
            })
        })
    }

    /// Forget all recorded utterances. Called once per user-turn
    /// boundary by the transcription pipeline.
    pub fn clear_history(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.history.clear();
    }

    /// Number of utterances currently recorded.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.state.lock().map_or(0, |state| state.history.len())
    }

    /// Snapshot of the recorded utterances, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .map_or_else(|_| Vec::new(), |state| state.history.iter().cloned().collect())
    }
}
