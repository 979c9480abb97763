//! SiteFence Core Library
//!
//! This crate provides the pure decision core for the SiteFence site blocker:
//! URL pattern generation and matching, and daily schedule evaluation. Both
//! units are stateless, synchronous functions with no I/O; all persistence
//! and event wiring lives in the layers above.
//!
//! # Modules
//!
//! - `pattern`: glob-style URL patterns (generation, classification, matching)
//! - `schedule`: time-of-day windows with midnight wraparound
//! - `url`: fast scheme checks for the blocking pre-filter
//! - `types`: shared rule and decision types
//! - `error`: core error type

pub mod error;
pub mod pattern;
pub mod schedule;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use error::CoreError;
pub use pattern::{classify, generate_pattern, is_match, strip_wildcard, MatchMode};
pub use schedule::{TimeOfDay, TimeWindow};
pub use types::{BlockDecision, BlockReason, BlockRule, FocusGroup};
pub use url::is_eligible_scheme;
