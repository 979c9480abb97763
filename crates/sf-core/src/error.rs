//! Core error type.
//!
//! Every failure the core can signal is a rejected input; the variants carry
//! enough context for the caller to surface or skip the offending rule.

/// Error type for core pattern and schedule construction.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },
    #[error("invalid time format (expected HH:MM): {0}")]
    InvalidTimeFormat(String),
}
