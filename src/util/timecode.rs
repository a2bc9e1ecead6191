// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Conversions between millisecond offsets and `MM:SS.` time keys.
//!
//! A time key identifies a clip inside one video's label map. Minutes are
//! unbounded and zero-padded to two digits, seconds run 00-59, and the key
//! always ends in a literal period. The tenths digit exists only in the
//! display form; keys deliberately drop it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A time key string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed time key {0:?}: expected digits:digits[.digits]")]
pub struct FormatError(pub String);

/// A millisecond offset broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub minutes: u64,
    pub seconds: u64,
    pub tenths: u64,
}

/// Split a millisecond offset into minutes, seconds and tenths (truncating).
pub fn to_parts(ms: u64) -> TimeParts {
    TimeParts {
        minutes: ms / 60_000,
        seconds: (ms / 1000) % 60,
        tenths: (ms % 1000) / 100,
    }
}

/// Render the `MM:SS.` key for a millisecond offset.
pub fn to_key(ms: u64) -> String {
    let parts = to_parts(ms);
    format!("{:02}:{:02}.", parts.minutes, parts.seconds)
}

/// Render the `MM:SS.d` form shown next to the playback position.
pub fn to_display(ms: u64) -> String {
    let parts = to_parts(ms);
    format!("{:02}:{:02}.{}", parts.minutes, parts.seconds, parts.tenths)
}

/// Parse `minutes:seconds[.fraction]` back into milliseconds.
///
/// The fraction is validated but ignored, so a parsed key lands on the
/// whole second it names.
pub fn from_key(key: &str) -> Result<u64, FormatError> {
    let malformed = || FormatError(key.to_string());

    let (minutes, rest) = key.split_once(':').ok_or_else(malformed)?;
    let (seconds, fraction) = match rest.split_once('.') {
        Some((seconds, fraction)) => (seconds, fraction),
        None => (rest, ""),
    };

    if !is_digits(minutes) || !is_digits(seconds) {
        return Err(malformed());
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    let minutes: u64 = minutes.parse().map_err(|_| malformed())?;
    let seconds: u64 = seconds.parse().map_err(|_| malformed())?;

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .ok_or_else(malformed)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// The key a clip's labels are stored under.
///
/// Ordering is plain string ordering, which is chronological for keys built
/// by [`TimeKey::from_millis`] as long as minutes stay below 100.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeKey(String);

impl TimeKey {
    pub fn from_millis(ms: u64) -> Self {
        Self(to_key(ms))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_parts_truncates() {
        let parts = to_parts(61_999);
        assert_eq!(parts, TimeParts { minutes: 1, seconds: 1, tenths: 9 });

        let parts = to_parts(0);
        assert_eq!(parts, TimeParts { minutes: 0, seconds: 0, tenths: 0 });
    }

    #[test]
    fn test_minutes_are_unbounded() {
        assert_eq!(to_key(125 * 60_000 + 7_000), "125:07.");
        assert_eq!(to_display(2_350), "00:02.3");
    }

    #[test]
    fn test_key_drops_tenths() {
        assert_eq!(to_key(2_000), "00:02.");
        assert_eq!(to_key(2_900), "00:02.");
        assert_eq!(from_key("00:02.").unwrap(), 2_000);
    }

    #[test]
    fn test_from_key_accepts_optional_fraction() {
        assert_eq!(from_key("01:05").unwrap(), 65_000);
        assert_eq!(from_key("01:05.7").unwrap(), 65_000);
        assert_eq!(from_key("10:00.").unwrap(), 600_000);
    }

    #[test]
    fn test_from_key_rejects_malformed() {
        for bad in ["", "12", ":05", "01:", "a1:05", "01:0x.", "01:05.x", "-1:05", "01:05:00"] {
            assert_eq!(from_key(bad), Err(FormatError(bad.to_string())), "{bad}");
        }
    }

    #[test]
    fn test_key_roundtrip_is_stable() {
        for ms in [0, 999, 1_000, 59_999, 60_000, 3_599_900, 7_261_400] {
            let key = to_key(ms);
            assert_eq!(to_key(from_key(&key).unwrap()), key);
        }
    }

    #[test]
    fn test_time_key_ordering_is_chronological() {
        let mut keys: Vec<TimeKey> = [61_000, 9_000, 10_000, 0]
            .into_iter()
            .map(TimeKey::from_millis)
            .collect();
        keys.sort();
        let rendered: Vec<&str> = keys.iter().map(TimeKey::as_str).collect();
        assert_eq!(rendered, ["00:00.", "00:09.", "00:10.", "01:01."]);
    }
}
