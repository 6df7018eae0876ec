//! Per-source statistics over detection races and raw detections.
//!
//! Both reductions are pure folds: every call starts from an empty tally
//! and returns a fresh map, so repeated polling never double-counts unless
//! the caller feeds the same race twice.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use super::error::DomainError;
use super::id::{EventKey, SourceId};
use super::race::{Detection, RaceRecord};

/// Race statistics for one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceStats {
    /// Races this source won, ties included.
    pub wins: u64,
    /// Races this source appeared in.
    pub total_participations: u64,
    /// Mean diff over participations where the source was behind.
    ///
    /// `None` when the source never trailed; 0 is reserved for "tied fastest".
    pub mean_positive_latency_ms: Option<f64>,
}

impl SourceStats {
    /// Share of participations that were wins, as a percentage.
    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        if self.total_participations == 0 {
            None
        } else {
            Some(self.wins as f64 / self.total_participations as f64 * 100.0)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    wins: u64,
    participations: u64,
    latency_sum_ms: i128,
    latency_count: u64,
}

/// Running tally used by [`aggregate`].
///
/// Races are accepted atomically: a race that fails validation leaves the
/// tally exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct RaceTally {
    by_source: BTreeMap<SourceId, Accumulator>,
}

impl RaceTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one race to the tally.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeLatency`] if any participant has a
    /// negative diff. Nothing is recorded in that case.
    pub fn record(&mut self, race: &RaceRecord) -> Result<(), DomainError> {
        race.validate()?;

        for participant in race.participants() {
            let entry = self
                .by_source
                .entry(participant.source_id().clone())
                .or_default();
            entry.participations += 1;

            let diff = participant.diff_from_fastest_ms();
            if diff == 0 {
                entry.wins += 1;
            } else {
                entry.latency_sum_ms += i128::from(diff);
                entry.latency_count += 1;
            }
        }
        Ok(())
    }

    /// Number of sources seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    /// Turn the tally into per-source statistics.
    #[must_use]
    pub fn finish(self) -> BTreeMap<SourceId, SourceStats> {
        self.by_source
            .into_iter()
            .map(|(source, acc)| {
                let mean = (acc.latency_count > 0)
                    .then(|| acc.latency_sum_ms as f64 / acc.latency_count as f64);
                let stats = SourceStats {
                    wins: acc.wins,
                    total_participations: acc.participations,
                    mean_positive_latency_ms: mean,
                };
                (source, stats)
            })
            .collect()
    }
}

/// Reduce a batch of races into per-source statistics.
///
/// The result does not depend on the order of `races`. Races without
/// participants contribute nothing.
///
/// # Errors
///
/// Returns the first [`DomainError::NegativeLatency`] encountered.
pub fn aggregate(races: &[RaceRecord]) -> Result<BTreeMap<SourceId, SourceStats>, DomainError> {
    let mut tally = RaceTally::new();
    for race in races {
        if let Err(err) = tally.record(race) {
            debug!(error = %err, "rejecting race batch");
            return Err(err);
        }
    }
    Ok(tally.finish())
}

/// Detection activity for one source, independent of races.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceActivity {
    pub source_id: SourceId,
    pub detections: u64,
    pub unique_events: usize,
    pub first_seen_ms: i64,
    pub last_seen_ms: i64,
}

/// Count detections and distinct events per source.
#[must_use]
pub fn source_activity(detections: &[Detection]) -> BTreeMap<SourceId, SourceActivity> {
    let mut events: BTreeMap<&SourceId, BTreeSet<&EventKey>> = BTreeMap::new();
    let mut activity: BTreeMap<SourceId, SourceActivity> = BTreeMap::new();

    for detection in detections {
        events
            .entry(&detection.source_id)
            .or_default()
            .insert(&detection.event_key);

        let entry = activity
            .entry(detection.source_id.clone())
            .or_insert_with(|| SourceActivity {
                source_id: detection.source_id.clone(),
                detections: 0,
                unique_events: 0,
                first_seen_ms: detection.timestamp_ms,
                last_seen_ms: detection.timestamp_ms,
            });
        entry.detections += 1;
        entry.first_seen_ms = entry.first_seen_ms.min(detection.timestamp_ms);
        entry.last_seen_ms = entry.last_seen_ms.max(detection.timestamp_ms);
    }

    for (source, entry) in &mut activity {
        entry.unique_events = events.get(source).map_or(0, BTreeSet::len);
    }
    activity
}

/// Activity sorted by detection count, busiest source first.
#[must_use]
pub fn ranked_activity(detections: &[Detection]) -> Vec<SourceActivity> {
    let mut ranked: Vec<_> = source_activity(detections).into_values().collect();
    ranked.sort_by(|a, b| {
        b.detections
            .cmp(&a.detections)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    ranked
}
