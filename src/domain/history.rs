//! Best-price search across a history of book snapshots.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

use super::book::PriceLevel;
use super::money::Price;

/// Ask side of a book at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    pub timestamp_ms: i64,
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    #[must_use]
    pub const fn new(timestamp_ms: i64, asks: Vec<PriceLevel>) -> Self {
        Self { timestamp_ms, asks }
    }

    /// First ask, if it carries a usable price.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks
            .first()
            .map(PriceLevel::price)
            .filter(|price| *price > Decimal::ZERO)
    }
}

/// When a target price was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetHit {
    pub price: Price,
    pub timestamp_ms: i64,
}

/// Summary of ask prices over a run of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceHistory {
    pub best_price: Option<Price>,
    pub best_timestamp_ms: Option<i64>,
    pub current_price: Option<Price>,
    pub snapshots_checked: usize,
    pub target: Option<Price>,
    /// Newest snapshot at or below `target`.
    pub target_hit: Option<TargetHit>,
}

impl PriceHistory {
    /// How far the current ask sits above the best ask seen.
    #[must_use]
    pub fn difference(&self) -> Option<Decimal> {
        Some(self.current_price? - self.best_price?)
    }

    /// True when a target was requested and reached.
    #[must_use]
    pub const fn target_found(&self) -> bool {
        self.target_hit.is_some()
    }
}

/// Scan snapshots ordered newest first.
///
/// Snapshots whose ask side is empty or whose best ask is not positive are
/// skipped. The newest usable snapshot sets the current price; the lowest
/// best ask wins, earliest in iteration order on ties. With a target, the
/// newest snapshot at or below it is reported.
#[must_use]
pub fn best_price_history(snapshots: &[BookSnapshot], target: Option<Price>) -> PriceHistory {
    let mut history = PriceHistory {
        snapshots_checked: snapshots.len(),
        target,
        ..PriceHistory::default()
    };

    for snapshot in snapshots {
        let Some(price) = snapshot.best_ask() else {
            trace!(timestamp_ms = snapshot.timestamp_ms, "skipping snapshot without asks");
            continue;
        };

        if history.current_price.is_none() {
            history.current_price = Some(price);
        }

        if history.best_price.map_or(true, |best| price < best) {
            history.best_price = Some(price);
            history.best_timestamp_ms = Some(snapshot.timestamp_ms);
        }

        if let (Some(target), None) = (target, history.target_hit) {
            if price <= target {
                history.target_hit = Some(TargetHit {
                    price,
                    timestamp_ms: snapshot.timestamp_ms,
                });
            }
        }
    }

    history
}
