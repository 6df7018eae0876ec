//! Exchange-agnostic domain logic.
//!
//! Everything in here is a pure function over immutable snapshots: no I/O,
//! no shared state, no caching.

pub mod book;
pub mod error;
pub mod execution;
pub mod history;
pub mod id;
pub mod money;
pub mod race;
pub mod stats;
pub mod unit;

pub use book::{Book, PriceLevel, Side};
pub use error::DomainError;
pub use execution::{simulate, ExecutionOutcome};
pub use history::{best_price_history, BookSnapshot, PriceHistory, TargetHit};
pub use id::{EventKey, SourceId, TokenId};
pub use money::{Price, Volume};
pub use race::{build_races, Detection, RaceBatch, RaceOptions, RaceRecord, RaceResult};
pub use stats::{aggregate, ranked_activity, source_activity, RaceTally, SourceActivity, SourceStats};
pub use unit::PriceUnit;
