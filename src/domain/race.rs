//! Detection races.
//!
//! A race is a group of near-simultaneous detections of the same event by
//! different sources. Each participant carries its delay relative to the
//! fastest detector of the group.
//!
//! [`build_races`] turns raw [`Detection`]s into [`RaceRecord`]s. Records may
//! also arrive already built from an upstream service, in which case the
//! aggregator in [`stats`](super::stats) re-checks their invariants.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::DomainError;
use super::id::{EventKey, SourceId};

/// Races returned by [`build_races`] when no explicit limit is configured.
pub const DEFAULT_MAX_RACES: usize = 100;

/// One source's result within a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceResult {
    source_id: SourceId,
    timestamp_ms: i64,
    diff_from_fastest_ms: i64,
}

impl RaceResult {
    /// Create a race result.
    ///
    /// The diff is stored as given; a negative value is reported when the
    /// owning race is validated.
    pub fn new(source_id: impl Into<SourceId>, timestamp_ms: i64, diff_from_fastest_ms: i64) -> Self {
        Self {
            source_id: source_id.into(),
            timestamp_ms,
            diff_from_fastest_ms,
        }
    }

    #[must_use]
    pub const fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    /// Absolute detection time in milliseconds.
    #[must_use]
    pub const fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Delay behind the fastest detector of the race.
    #[must_use]
    pub const fn diff_from_fastest_ms(&self) -> i64 {
        self.diff_from_fastest_ms
    }

    /// True exactly when this participant tied for first.
    #[must_use]
    pub const fn is_fastest(&self) -> bool {
        self.diff_from_fastest_ms == 0
    }
}

/// One detection race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceRecord {
    event_key: EventKey,
    occurrence: u64,
    participants: Vec<RaceResult>,
}

impl RaceRecord {
    /// Create a race from its participants, kept in the order given.
    pub fn new(event_key: impl Into<EventKey>, occurrence: u64, participants: Vec<RaceResult>) -> Self {
        Self {
            event_key: event_key.into(),
            occurrence,
            participants,
        }
    }

    #[must_use]
    pub const fn event_key(&self) -> &EventKey {
        &self.event_key
    }

    /// External sequence number of this detection of the event.
    #[must_use]
    pub const fn occurrence(&self) -> u64 {
        self.occurrence
    }

    #[must_use]
    pub fn participants(&self) -> &[RaceResult] {
        &self.participants
    }

    /// Every participant with a zero diff. Simultaneous detections all win.
    pub fn winners(&self) -> impl Iterator<Item = &RaceResult> {
        self.participants.iter().filter(|p| p.is_fastest())
    }

    /// First participant with a zero diff, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&RaceResult> {
        self.winners().next()
    }

    /// Largest diff across participants; 0 for an empty race.
    #[must_use]
    pub fn time_spread_ms(&self) -> i64 {
        self.participants
            .iter()
            .map(RaceResult::diff_from_fastest_ms)
            .max()
            .unwrap_or(0)
    }

    /// Timestamp of the fastest detection, used to order races by recency.
    #[must_use]
    pub fn started_at_ms(&self) -> Option<i64> {
        self.participants.iter().map(RaceResult::timestamp_ms).min()
    }

    /// Check that every diff is non-negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.participants.iter().find(|p| p.diff_from_fastest_ms < 0) {
            Some(bad) => Err(DomainError::NegativeLatency {
                event_key: self.event_key.to_string(),
                occurrence: self.occurrence,
                source_id: bad.source_id.to_string(),
                diff_ms: bad.diff_from_fastest_ms,
            }),
            None => Ok(()),
        }
    }
}

/// A single raw detection of an event by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub source_id: SourceId,
    pub event_key: EventKey,
    pub occurrence: u64,
    pub timestamp_ms: i64,
}

/// Knobs for race construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceOptions {
    /// Maximum spread between first and last detection; 0 disables the check.
    pub time_window_ms: i64,
    /// Number of races to return, most recent first.
    pub max_races: usize,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            time_window_ms: 0,
            max_races: DEFAULT_MAX_RACES,
        }
    }
}

/// Races found in a batch of detections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RaceBatch {
    /// Most recent races, capped at [`RaceOptions::max_races`].
    pub races: Vec<RaceRecord>,
    /// Number of races found before the cap was applied.
    pub total_races: usize,
}

/// Group detections into races.
///
/// Detections of the same `(event_key, occurrence)` form a candidate group.
/// Groups with a single detection, whose spread exceeds the configured
/// window, or whose spread does not fit in an `i64`, are not races. Participants are ordered fastest first (ties by
/// source id) and races most recent first.
#[must_use]
pub fn build_races(detections: &[Detection], options: &RaceOptions) -> RaceBatch {
    let mut groups: HashMap<(&EventKey, u64), Vec<&Detection>> = HashMap::new();
    for detection in detections {
        groups
            .entry((&detection.event_key, detection.occurrence))
            .or_default()
            .push(detection);
    }

    let mut races = Vec::new();
    for ((event_key, occurrence), mut group) in groups {
        if group.len() < 2 {
            continue;
        }

        group.sort_by(|a, b| {
            a.timestamp_ms
                .cmp(&b.timestamp_ms)
                .then_with(|| a.source_id.cmp(&b.source_id))
        });

        let fastest = group[0].timestamp_ms;
        let Some(spread) = group[group.len() - 1].timestamp_ms.checked_sub(fastest) else {
            trace!(%event_key, occurrence, "detection timestamps span more than i64 range");
            continue;
        };
        if options.time_window_ms > 0 && spread > options.time_window_ms {
            trace!(%event_key, occurrence, spread, "detections too far apart for a race");
            continue;
        }

        // Every diff lies in 0..=spread, so the subtraction below fits.
        let participants = group
            .iter()
            .map(|d| RaceResult::new(d.source_id.clone(), d.timestamp_ms, d.timestamp_ms - fastest))
            .collect();
        races.push(RaceRecord::new(event_key.clone(), occurrence, participants));
    }

    races.sort_by(|a, b| {
        let recency = |r: &RaceRecord| Reverse(r.started_at_ms().unwrap_or(0));
        recency(a)
            .cmp(&recency(b))
            .then_with(|| a.event_key.cmp(&b.event_key))
            .then_with(|| a.occurrence.cmp(&b.occurrence))
    });

    let total_races = races.len();
    races.truncate(options.max_races);

    RaceBatch { races, total_races }
}
