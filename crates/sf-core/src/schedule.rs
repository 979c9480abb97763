//! Daily schedule windows
//!
//! A [`TimeWindow`] is a recurring wall-clock interval during which a block
//! rule is suspended (the site is reachable). Windows may wrap past midnight:
//! end earlier than start means "free overnight, blocked during the day".

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Time of Day
// =============================================================================

/// A wall-clock time with no date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Create a validated time of day.
    pub fn new(hour: u8, minute: u8) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Parse an `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidTimeFormat(s.to_string()))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| CoreError::InvalidTimeFormat(s.to_string()))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| CoreError::InvalidTimeFormat(s.to_string()))?;
        Self::new(hour, minute)
    }

    /// Minutes since midnight, for ordering.
    #[inline]
    pub fn to_minutes(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_minutes().cmp(&other.to_minutes())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// =============================================================================
// Time Window
// =============================================================================

/// A recurring daily interval during which blocking is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// True when the window crosses midnight (end before start).
    #[inline]
    pub fn is_wraparound(&self) -> bool {
        self.end < self.start
    }

    /// Decide whether `now` falls outside the allowed window (true = block).
    ///
    /// Start is inclusive, end exclusive. Wraparound windows are valid: for
    /// 22:00-06:00 the allowed span is `now >= 22:00 OR now < 06:00`.
    pub fn should_block(&self, now: TimeOfDay) -> bool {
        let inside = if self.is_wraparound() {
            now >= self.start || now < self.end
        } else {
            now >= self.start && now < self.end
        };
        !inside
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
