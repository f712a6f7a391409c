//! echo-gate: text-based self-speech echo filtering for voice
//! assistants.
//!
//! When an assistant's synthesized speech leaks from the speaker back
//! into the microphone, the ASR transcript arrives as a mix of the
//! assistant's own recently spoken text and (possibly) new user speech.
//! This crate strips the echoed leading portion using only text
//! signals, so downstream intent routing sees genuine user input.
//!
//! # Architecture
//!
//! ```text
//! Capture → AEC → VAD → STT ──→ [EchoFilter] ──→ intent routing
//!                                    ↑
//!                TTS playback ── start_speaking / stop_speaking
//! ```
//!
//! The filter keeps a bounded history of recently spoken utterances and
//! a speaking flag with lazy staleness expiry. Echo detection runs
//! three strategies per history entry: full containment (microphone
//! opened mid-playback), fuzzy consecutive word prefix, and best
//! sliding prefix against the whole utterance. Matching tolerates ASR
//! noise through an injectable similarity metric and
//! diacritic-insensitive comparison; it is a best-effort heuristic,
//! never a hard gate.
//!
//! # Example
//!
//! ```
//! use echo_gate::{EchoFilter, EchoFilterConfig};
//!
//! let filter = EchoFilter::new(&EchoFilterConfig::default())?;
//!
//! // TTS driver, around playback:
//! filter.start_speaking("Dobrý den, jak se máte?");
//! filter.stop_speaking();
//!
//! // Transcription pipeline, per ASR result:
//! let user = filter.filter_transcription("Dobrý den jak se máte co dnes děláte");
//! assert_eq!(user, "co dnes děláte");
//! # Ok::<(), echo_gate::FilterError>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod similarity;

mod matcher;
mod normalize;

pub use config::EchoFilterConfig;
pub use error::{FilterError, Result};
pub use filter::EchoFilter;
pub use similarity::{JaroWinkler, NormalizedLevenshtein, Similarity, SimilarityFn};
