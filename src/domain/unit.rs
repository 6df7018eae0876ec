//! Price unit normalization.
//!
//! Exchanges quote binary-outcome prices either as fractional dollars
//! (`0.0..=1.0`) or as integer cents (`0..=100`). The unit is declared by
//! whoever delivers the ladder; it is never guessed from the magnitude of a
//! price.
//!
//! Every level is normalized once, on its way into the domain (see
//! [`PriceUnit::normalize_level`] and [`PriceUnit::normalize_ladder`]).
//! Downstream code works in fractional dollars with a share payoff of `1.0`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::book::PriceLevel;
use super::error::DomainError;
use super::money::{Price, SHARE_PAYOFF};

const CENTS_PER_DOLLAR: Decimal = Decimal::ONE_HUNDRED;

/// Unit a data source quotes prices in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    /// Fractional dollars, `0.0..=1.0`.
    #[default]
    Fraction,
    /// Integer-style cents, `0..=100`.
    Cents,
}

impl PriceUnit {
    /// Largest valid price in this unit.
    #[must_use]
    pub const fn max_price(self) -> Decimal {
        match self {
            Self::Fraction => SHARE_PAYOFF,
            Self::Cents => CENTS_PER_DOLLAR,
        }
    }

    /// Convert a single raw price into fractional dollars.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativePrice`] for negative prices and
    /// [`DomainError::PriceOutOfRange`] for prices above [`Self::max_price`].
    pub fn normalize(self, raw: Decimal) -> Result<Price, DomainError> {
        if raw < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price: raw });
        }
        if raw > self.max_price() {
            return Err(DomainError::PriceOutOfRange {
                price: raw,
                unit: self.name(),
                max: self.max_price(),
            });
        }

        Ok(match self {
            Self::Fraction => raw,
            Self::Cents => raw / CENTS_PER_DOLLAR,
        })
    }

    /// Convert a fractional-dollar price back into this unit, for display.
    #[must_use]
    pub fn denormalize(self, price: Price) -> Decimal {
        match self {
            Self::Fraction => price,
            Self::Cents => price * CENTS_PER_DOLLAR,
        }
    }

    /// Normalize and validate one raw `(price, quantity)` pair.
    pub fn normalize_level(
        self,
        raw_price: Decimal,
        quantity: Decimal,
    ) -> Result<PriceLevel, DomainError> {
        PriceLevel::try_new(self.normalize(raw_price)?, quantity)
    }

    /// Normalize a whole ladder, keeping its order.
    ///
    /// Fails on the first invalid level; a partially converted ladder is
    /// never returned.
    pub fn normalize_ladder<I>(self, raw: I) -> Result<Vec<PriceLevel>, DomainError>
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        raw.into_iter()
            .map(|(price, quantity)| self.normalize_level(price, quantity))
            .collect()
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Fraction => "fraction",
            Self::Cents => "cents",
        }
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
