//! Error types for the echo filter.

/// Top-level error type for the echo filter.
///
/// Runtime operations are total over their input domain; the only
/// failure surfaced through this type is an invalid configuration at
/// construction time.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FilterError>;
