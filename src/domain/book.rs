//! Order book types for market depth representation.
//!
//! This module provides types for representing order book state:
//!
//! - [`PriceLevel`] - A single price level with a quantity
//! - [`Side`] - Which side of the book a ladder belongs to
//! - [`Book`] - Complete order book for a single token
//!
//! # Order Book Structure
//!
//! An order book has two sides:
//! - **Bids**: Buy orders, sorted by price descending (best bid first)
//! - **Asks**: Sell orders, sorted by price ascending (best ask first)
//!
//! Books built directly from snapshot ladders keep the order they were
//! delivered in. Only [`Book::from_binary_sides`] sorts, because it derives
//! one side from the opposite outcome.
//!
//! # Examples
//!
//! ```
//! use depthrace::domain::book::{Book, PriceLevel};
//! use depthrace::domain::id::TokenId;
//! use rust_decimal_macros::dec;
//!
//! let bids = vec![PriceLevel::new(dec!(0.45), dec!(100))];
//! let asks = vec![
//!     PriceLevel::new(dec!(0.46), dec!(150)),
//!     PriceLevel::new(dec!(0.47), dec!(300)),
//! ];
//!
//! let book = Book::with_levels(TokenId::new("yes-token"), bids, asks);
//!
//! assert_eq!(book.best_ask().unwrap().price(), dec!(0.46));
//! assert_eq!(book.total_liquidity(depthrace::domain::book::Side::Asks), Some(dec!(210.00)));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::TokenId;
use super::money::{Price, Volume, SHARE_PAYOFF};

/// A single price level in an order book.
///
/// Represents aggregated orders at a specific price point. Prices are in
/// fractional dollars (one share redeems for 1.0) once they reach this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    price: Price,
    quantity: Volume,
}

impl PriceLevel {
    /// Creates a new price level without validation.
    ///
    /// Use [`PriceLevel::try_new`] for data that crosses a trust boundary.
    #[must_use]
    pub const fn new(price: Price, quantity: Volume) -> Self {
        Self { price, quantity }
    }

    /// Creates a validated price level.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativePrice`] or
    /// [`DomainError::NegativeQuantity`] for negative inputs.
    pub fn try_new(price: Price, quantity: Volume) -> Result<Self, DomainError> {
        let level = Self::new(price, quantity);
        level.validate()?;
        Ok(level)
    }

    /// Check the non-negativity invariants of this level.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.price < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price: self.price });
        }
        if self.quantity < Decimal::ZERO {
            return Err(DomainError::NegativeQuantity {
                quantity: self.quantity,
            });
        }
        Ok(())
    }

    /// Returns the price at this level.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the number of shares available at this level.
    #[must_use]
    pub const fn quantity(&self) -> Volume {
        self.quantity
    }

    /// Capital needed to take the whole level, `None` if it overflows.
    #[must_use]
    pub fn cost(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// Side of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy orders.
    Bids,
    /// Sell orders; the side a purchase consumes.
    Asks,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bids => write!(f, "bids"),
            Self::Asks => write!(f, "asks"),
        }
    }
}

/// Order book for a single tradeable token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    token_id: TokenId,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl Book {
    /// Creates a new empty order book.
    #[must_use]
    pub const fn new(token_id: TokenId) -> Self {
        Self {
            token_id,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Creates a book with initial price levels.
    ///
    /// Levels are kept in the order given.
    #[must_use]
    pub const fn with_levels(
        token_id: TokenId,
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
    ) -> Self {
        Self {
            token_id,
            bids,
            asks,
        }
    }

    /// Build the YES book of a binary market from YES bids and NO bids.
    ///
    /// Buying YES is equivalent to selling NO, so every NO bid at price `p`
    /// becomes a YES ask at `1 - p`. Bids end up sorted descending and asks
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PriceOutOfRange`] when a NO bid is above the
    /// share payoff, and propagates level validation errors.
    pub fn from_binary_sides(
        token_id: TokenId,
        yes_bids: &[PriceLevel],
        no_bids: &[PriceLevel],
    ) -> Result<Self, DomainError> {
        let mut bids = Vec::with_capacity(yes_bids.len());
        for level in yes_bids {
            level.validate()?;
            bids.push(*level);
        }

        let mut asks = Vec::with_capacity(no_bids.len());
        for level in no_bids {
            level.validate()?;
            if level.price() > SHARE_PAYOFF {
                return Err(DomainError::PriceOutOfRange {
                    price: level.price(),
                    unit: "fraction",
                    max: SHARE_PAYOFF,
                });
            }
            asks.push(PriceLevel::new(SHARE_PAYOFF - level.price(), level.quantity()));
        }

        bids.sort_by(|a, b| b.price().cmp(&a.price()));
        asks.sort_by(|a, b| a.price().cmp(&b.price()));

        Ok(Self::with_levels(token_id, bids, asks))
    }

    /// Returns the token ID for this book.
    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Returns all bid levels.
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Returns all ask levels.
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Returns the ladder for one side.
    #[must_use]
    pub fn ladder(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bids => &self.bids,
            Side::Asks => &self.asks,
        }
    }

    /// Returns the best bid (highest buy price).
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Returns the best ask (lowest sell price).
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Total value (price × quantity) available on one side.
    #[must_use]
    pub fn total_liquidity(&self, side: Side) -> Option<Decimal> {
        total_liquidity(self.ladder(side))
    }

    /// True when neither side has any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Total value (price × quantity) across a ladder, `None` if it overflows.
#[must_use]
pub fn total_liquidity(ladder: &[PriceLevel]) -> Option<Decimal> {
    ladder
        .iter()
        .try_fold(Decimal::ZERO, |total, level| total.checked_add(level.cost()?))
}
