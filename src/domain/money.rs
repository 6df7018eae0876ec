//! Monetary types for price and volume representation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::error::DomainError;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Redemption value of one winning share.
pub const SHARE_PAYOFF: Decimal = Decimal::ONE;

/// Convert a floating point input into a `Decimal`.
///
/// NaN and infinities are rejected rather than mapped to a sentinel, so
/// corrupted upstream numbers stay visible. Finite values beyond the decimal
/// range are an overflow.
pub fn decimal_from_f64(field: &'static str, value: f64) -> Result<Decimal, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NonFinite { field, value });
    }
    Decimal::from_f64(value).ok_or(DomainError::Overflow { field })
}
