//! Shared type definitions for SiteFence
//!
//! These types are the stored rule data and the outcome of evaluating a
//! navigation against it. They are immutable value types as far as the core
//! is concerned; the rules layer constructs and persists them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::TimeWindow;

// =============================================================================
// Block Rules
// =============================================================================

/// A stored blocking rule.
///
/// `schedule: None` means the site is blocked permanently; otherwise it is
/// reachable inside the window and blocked outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<TimeWindow>,
}

impl BlockRule {
    pub fn permanent(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            schedule: None,
        }
    }

    pub fn scheduled(pattern: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            pattern: pattern.into(),
            schedule: Some(window),
        }
    }
}

// =============================================================================
// Focus Groups
// =============================================================================

/// A named set of URL patterns acting as an allow-list while its focus
/// session is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusGroup {
    pub id: Uuid,
    pub name: String,
    pub links: Vec<String>,
    pub is_focusing: bool,
}

impl FocusGroup {
    /// Create an inactive group with a fresh id.
    pub fn new(name: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            links,
            is_focusing: false,
        }
    }
}

// =============================================================================
// Decisions
// =============================================================================

/// Which stage of the pipeline decided to block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Matched a rule with no schedule.
    Permanent,
    /// Matched a scheduled rule outside its allowed window.
    Schedule,
    /// An active focus group allows none of its patterns for this URL.
    FocusMode,
    /// Matched an incognito-only rule inside an incognito window.
    Incognito,
}

/// Final decision for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDecision {
    Allow,
    Block(BlockReason),
}

impl BlockDecision {
    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}
