//! Configuration for the self-speech echo filter.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// Echo filter configuration.
///
/// The defaults are calibrated for transcripts from conversational TTS
/// playback leaking into a nearby microphone. Tightening the thresholds
/// reduces the chance of eating genuine user speech at the cost of
/// letting more echo through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoFilterConfig {
    /// Maximum number of recent TTS utterances kept for echo comparison.
    ///
    /// Several utterances may be spoken before a transcript arrives, so
    /// the filter compares against all of them. Inserting beyond the
    /// capacity evicts the oldest entry.
    pub history_capacity: usize,

    /// Seconds after `start_speaking` before the speaking flag is
    /// considered stale and cleared on read.
    ///
    /// Protects against a missed `stop_speaking` (crashed playback,
    /// dropped task) leaving the flag stuck. Should comfortably exceed
    /// the longest utterance the TTS chain will play.
    pub speaking_timeout_s: u32,

    /// Per-word similarity threshold for the consecutive-prefix match.
    ///
    /// A transcript word counts as echoing the corresponding utterance
    /// word when their similarity is strictly above this value.
    ///   - 0.7: lenient (tolerates heavy ASR substitution, strips more)
    ///   - 0.8: balanced (default)
    ///   - 0.9: strict (near-identical words only)
    pub word_threshold: f64,

    /// Minimum fraction of the utterance that a consecutive word run
    /// must cover before it is stripped as echo.
    ///
    /// Prevents a short accidental word overlap at the start of genuine
    /// user speech from being classified as echo of a long utterance.
    pub min_coverage: f64,

    /// Overall similarity threshold for the sliding-prefix match.
    ///
    /// The best transcript prefix is stripped when it scores at least
    /// this value against the whole utterance.
    ///   - 0.6:  lenient
    ///   - 0.7:  balanced (default)
    ///   - 0.85: strict
    pub match_threshold: f64,
}

impl Default for EchoFilterConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            speaking_timeout_s: 60,
            word_threshold: 0.8,
            min_coverage: 0.6,
            match_threshold: 0.70,
        }
    }
}

impl EchoFilterConfig {
    /// Check that all tunables are within their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity is zero or any threshold falls
    /// outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(FilterError::Config(
                "history_capacity must be at least 1".into(),
            ));
        }
        let thresholds = [
            ("word_threshold", self.word_threshold),
            ("min_coverage", self.min_coverage),
            ("match_threshold", self.match_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(FilterError::Config(format!(
                    "{name} must be within 0.0..=1.0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EchoFilterConfig::default().validate().is_ok());
    }

    #[test]
    fn default_values() {
        let config = EchoFilterConfig::default();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.speaking_timeout_s, 60);
        assert!((config.word_threshold - 0.8).abs() < f64::EPSILON);
        assert!((config.min_coverage - 0.6).abs() < f64::EPSILON);
        assert!((config.match_threshold - 0.70).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = EchoFilterConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let config = EchoFilterConfig {
            word_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EchoFilterConfig {
            match_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_threshold_rejected() {
        let config = EchoFilterConfig {
            min_coverage: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
