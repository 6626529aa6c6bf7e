//! # Temporal Types — UTC-Only Timestamps and the Environment Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, plus the `Clock` trait through which the registry reads time.
//!
//! ## Security Invariant
//!
//! Claim-lease deadlines and subscription expirations are computed only
//! from the registry's injected `Clock` — never from caller-supplied
//! values. The clock is coarse (seconds) and mildly adversary-influenceable,
//! so all deadline comparisons are strict and all arithmetic is checked.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TemporalError;

/// Seconds in one day.
const SECS_PER_DAY: i64 = 86_400;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::from_epoch_secs()`] — from a Unix epoch timestamp.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TemporalError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or(TemporalError::OutOfRange)?;
        Ok(Self(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only timestamps with the `Z` suffix are accepted. Explicit offsets,
    /// even `+00:00`, are rejected so that rendered deadlines are always
    /// byte-identical for the same instant.
    pub fn parse(s: &str) -> Result<Self, TemporalError> {
        if !s.ends_with('Z') {
            return Err(TemporalError::InvalidTimestamp {
                input: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TemporalError::InvalidTimestamp {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// A timestamp `days` whole days after this one.
    pub fn plus_days(&self, days: u32) -> Result<Self, TemporalError> {
        let delta = Duration::seconds(i64::from(days) * SECS_PER_DAY);
        self.0
            .checked_add_signed(delta)
            .map(Self)
            .ok_or(TemporalError::OutOfRange)
    }

    /// A timestamp `months` subscription months (28 days each) after this one.
    pub fn plus_months_28(&self, months: u32) -> Result<Self, TemporalError> {
        let days = months.checked_mul(28).ok_or(TemporalError::OutOfRange)?;
        self.plus_days(days)
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock ───────────────────────────────────────────────────────────

/// Source of the current time for deadline computation.
///
/// The registry never reads the system clock directly; it reads through
/// this trait so that lease and subscription deadlines always come from
/// the execution environment and tests can drive time explicitly.
pub trait Clock: Send + Sync {
    /// The current time, UTC, seconds precision.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_utc(Utc::now())
    }
}

/// A hand-driven clock for tests and simulation.
///
/// Holds the current time as Unix epoch seconds; `advance_days` moves it
/// forward. Interior mutability so it can be shared with a registry that
/// reads through `Arc<dyn Clock>`.
#[derive(Debug)]
pub struct ManualClock {
    secs: std::sync::atomic::AtomicI64,
}

impl ManualClock {
    /// Create a manual clock at the given instant.
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: std::sync::atomic::AtomicI64::new(start.epoch_secs()),
        }
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        self.secs
            .fetch_add(days * SECS_PER_DAY, std::sync::atomic::Ordering::SeqCst);
    }

    /// Move the clock forward by seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.secs.fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let secs = self.secs.load(std::sync::atomic::Ordering::SeqCst);
        // The stored value always originates from a valid Timestamp.
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp(DateTime::UNIX_EPOCH))
    }
}
