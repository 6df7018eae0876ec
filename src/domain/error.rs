//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when numeric invariants are violated.
//! They are returned by `try_new` constructors, by the unit normalization step
//! and by the simulator and race aggregator themselves.
//!
//! # Examples
//!
//! Handling validation errors:
//!
//! ```
//! use depthrace::domain::error::DomainError;
//! use depthrace::domain::book::PriceLevel;
//! use rust_decimal_macros::dec;
//!
//! let result = PriceLevel::try_new(dec!(-0.10), dec!(100));
//!
//! assert!(matches!(result, Err(DomainError::NegativePrice { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
///
/// These are always surfaced to the caller. Nothing in the crate clamps or
/// coerces an invalid number into a valid one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Prices must not be negative.
    #[error("price must not be negative, got {price}")]
    NegativePrice {
        /// The invalid price that was provided.
        price: Decimal,
    },

    /// A level with a zero price was reached while spending a budget.
    #[error("price level {index} has a zero price")]
    ZeroPrice {
        /// Position of the offending level in the ladder.
        index: usize,
    },

    /// Quantities must not be negative.
    #[error("quantity must not be negative, got {quantity}")]
    NegativeQuantity {
        /// The invalid quantity that was provided.
        quantity: Decimal,
    },

    /// Budgets must not be negative.
    #[error("budget must not be negative, got {budget}")]
    NegativeBudget {
        /// The invalid budget that was provided.
        budget: Decimal,
    },

    /// A floating point input was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite {
        /// Name of the field being converted.
        field: &'static str,
        /// The raw value that was rejected.
        value: f64,
    },

    /// A value or an intermediate result does not fit in a `Decimal`.
    #[error("{field} overflows the decimal range")]
    Overflow {
        /// Name of the quantity that overflowed.
        field: &'static str,
    },

    /// A price does not fit the declared unit.
    #[error("price {price} is outside the {unit} range 0..={max}")]
    PriceOutOfRange {
        /// The raw price before normalization.
        price: Decimal,
        /// Display name of the declared unit.
        unit: &'static str,
        /// Upper bound of the declared unit.
        max: Decimal,
    },

    /// A race participant reported a negative diff from the fastest detector.
    #[error("source {source_id} has negative diff {diff_ms}ms in race {event_key}#{occurrence}")]
    NegativeLatency {
        /// Event the race was about.
        event_key: String,
        /// External occurrence counter of the race.
        occurrence: u64,
        /// Source that carried the invalid diff.
        source_id: String,
        /// The invalid diff in milliseconds.
        diff_ms: i64,
    },
}
