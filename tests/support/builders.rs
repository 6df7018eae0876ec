use rust_decimal::Decimal;

use depthrace::domain::{Detection, EventKey, PriceLevel, RaceRecord, RaceResult, SourceId};

/// Ask ladder from `(price, quantity)` pairs, in the order given.
pub fn ladder(levels: &[(Decimal, Decimal)]) -> Vec<PriceLevel> {
    levels
        .iter()
        .map(|&(price, quantity)| PriceLevel::new(price, quantity))
        .collect()
}

/// Race where diffs are derived from each participant's timestamp.
pub fn race(key: &str, occurrence: u64, participants: &[(&str, i64)]) -> RaceRecord {
    let fastest = participants.iter().map(|(_, ts)| *ts).min().unwrap_or(0);
    let results = participants
        .iter()
        .map(|&(source, ts)| RaceResult::new(source, ts, ts - fastest))
        .collect();
    RaceRecord::new(key, occurrence, results)
}

pub fn detection(source: &str, key: &str, occurrence: u64, timestamp_ms: i64) -> Detection {
    Detection {
        source_id: SourceId::from(source),
        event_key: EventKey::from(key),
        occurrence,
        timestamp_ms,
    }
}
