//! Budget-constrained execution simulation.
//!
//! Projects what spending a fixed amount of capital against one side of a
//! book would produce. The ladder is walked greedily in the order it is
//! given; the caller is responsible for handing in asks cheapest-first and
//! for normalizing prices to fractional dollars (see
//! [`PriceUnit`](super::unit::PriceUnit)).
//!
//! # Examples
//!
//! ```
//! use depthrace::domain::book::PriceLevel;
//! use depthrace::domain::execution::simulate;
//! use rust_decimal_macros::dec;
//!
//! let ladder = vec![
//!     PriceLevel::new(dec!(0.50), dec!(100)),
//!     PriceLevel::new(dec!(0.60), dec!(50)),
//! ];
//!
//! let outcome = simulate(&ladder, dec!(80)).unwrap();
//!
//! assert_eq!(outcome.shares_acquired(), dec!(150));
//! assert_eq!(outcome.profit(), dec!(70));
//! assert_eq!(outcome.return_pct(), dec!(87.5));
//! assert!(!outcome.insufficient_liquidity());
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use super::book::PriceLevel;
use super::error::DomainError;
use super::money::{Volume, SHARE_PAYOFF};

/// Result of simulating a purchase against a ladder.
///
/// Every field is derived by [`simulate`]; there is no other way to build
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    requested_amount: Decimal,
    actual_spent: Decimal,
    shares_acquired: Volume,
    projected_payoff: Decimal,
    profit: Decimal,
    return_pct: Decimal,
    insufficient_liquidity: bool,
    levels_consumed: usize,
}

impl ExecutionOutcome {
    fn from_fill(
        budget: Decimal,
        remaining: Decimal,
        shares: Volume,
        levels: usize,
    ) -> Result<Self, DomainError> {
        // 0 <= remaining <= budget and payoff >= 0, so the subtractions fit.
        let actual_spent = budget - remaining;
        let projected_payoff = shares
            .checked_mul(SHARE_PAYOFF)
            .ok_or(DomainError::Overflow { field: "projected_payoff" })?;
        let profit = projected_payoff - actual_spent;
        let return_pct = if actual_spent > Decimal::ZERO {
            profit
                .checked_div(actual_spent)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(DomainError::Overflow { field: "return_pct" })?
        } else {
            Decimal::ZERO
        };

        Ok(Self {
            requested_amount: budget,
            actual_spent,
            shares_acquired: shares,
            projected_payoff,
            profit,
            return_pct,
            insufficient_liquidity: remaining > Decimal::ZERO,
            levels_consumed: levels,
        })
    }

    /// Capital the caller wanted to spend.
    #[must_use]
    pub const fn requested_amount(&self) -> Decimal {
        self.requested_amount
    }

    /// Capital actually consumed; below the request when depth ran out.
    #[must_use]
    pub const fn actual_spent(&self) -> Decimal {
        self.actual_spent
    }

    /// Shares bought.
    #[must_use]
    pub const fn shares_acquired(&self) -> Volume {
        self.shares_acquired
    }

    /// Value of the shares if the outcome resolves in their favour.
    #[must_use]
    pub const fn projected_payoff(&self) -> Decimal {
        self.projected_payoff
    }

    /// `projected_payoff - actual_spent`.
    #[must_use]
    pub const fn profit(&self) -> Decimal {
        self.profit
    }

    /// Profit as a percentage of capital spent, 0 when nothing was spent.
    #[must_use]
    pub const fn return_pct(&self) -> Decimal {
        self.return_pct
    }

    /// True when the ladder ran out before the budget did.
    #[must_use]
    pub const fn insufficient_liquidity(&self) -> bool {
        self.insufficient_liquidity
    }

    /// Number of levels touched, including a final partial fill.
    #[must_use]
    pub const fn levels_consumed(&self) -> usize {
        self.levels_consumed
    }

    /// Volume-weighted price paid per share.
    #[must_use]
    pub fn average_price(&self) -> Option<Decimal> {
        self.actual_spent.checked_div(self.shares_acquired)
    }
}

/// Simulate spending `budget` against `ladder`.
///
/// Whole levels are taken while the remaining budget covers them. The first
/// level that costs more than what is left is filled partially and the walk
/// stops there.
///
/// # Errors
///
/// - [`DomainError::NegativeBudget`] for a negative budget.
/// - [`DomainError::NegativePrice`] / [`DomainError::NegativeQuantity`] for
///   any corrupt level in the ladder.
/// - [`DomainError::ZeroPrice`] when a zero-priced level is reached while
///   budget remains.
/// - [`DomainError::Overflow`] when a level cost, the share count or the
///   return does not fit in a `Decimal`.
pub fn simulate(ladder: &[PriceLevel], budget: Decimal) -> Result<ExecutionOutcome, DomainError> {
    if budget < Decimal::ZERO {
        return Err(DomainError::NegativeBudget { budget });
    }
    for level in ladder {
        level.validate()?;
    }

    let mut remaining = budget;
    let mut shares = Decimal::ZERO;
    let mut levels = 0;

    for (index, level) in ladder.iter().enumerate() {
        if remaining.is_zero() {
            break;
        }
        if level.price().is_zero() {
            return Err(DomainError::ZeroPrice { index });
        }

        levels += 1;
        let cost = level.cost().ok_or(DomainError::Overflow { field: "level_cost" })?;
        if remaining >= cost {
            shares = add_shares(shares, level.quantity())?;
            remaining -= cost;
            trace!(index, price = %level.price(), quantity = %level.quantity(), "took full level");
        } else {
            let partial = remaining
                .checked_div(level.price())
                .ok_or(DomainError::Overflow { field: "shares_acquired" })?;
            shares = add_shares(shares, partial)?;
            debug!(index, price = %level.price(), shares = %partial, "partial fill exhausted budget");
            remaining = Decimal::ZERO;
            break;
        }
    }

    if remaining > Decimal::ZERO {
        debug!(
            budget = %budget,
            unspent = %remaining,
            levels = ladder.len(),
            "ladder exhausted before budget"
        );
    }

    ExecutionOutcome::from_fill(budget, remaining, shares, levels)
}

fn add_shares(shares: Volume, more: Volume) -> Result<Volume, DomainError> {
    shares
        .checked_add(more)
        .ok_or(DomainError::Overflow { field: "shares_acquired" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ladder() -> Vec<PriceLevel> {
        vec![
            PriceLevel::new(dec!(0.50), dec!(100)),
            PriceLevel::new(dec!(0.60), dec!(50)),
        ]
    }

    #[test]
    fn budget_matching_liquidity_fills_everything() {
        let outcome = simulate(&ladder(), dec!(80)).unwrap();

        assert_eq!(outcome.shares_acquired(), dec!(150));
        assert_eq!(outcome.actual_spent(), dec!(80));
        assert_eq!(outcome.projected_payoff(), dec!(150));
        assert_eq!(outcome.profit(), dec!(70));
        assert_eq!(outcome.return_pct(), dec!(87.5));
        assert!(!outcome.insufficient_liquidity());
        assert_eq!(outcome.levels_consumed(), 2);
    }

    #[test]
    fn budget_above_liquidity_is_flagged() {
        let outcome = simulate(&ladder(), dec!(200)).unwrap();

        assert_eq!(outcome.requested_amount(), dec!(200));
        assert_eq!(outcome.actual_spent(), dec!(80));
        assert_eq!(outcome.shares_acquired(), dec!(150));
        assert!(outcome.insufficient_liquidity());
    }

    #[test]
    fn partial_fill_stops_the_walk() {
        let ladder = vec![
            PriceLevel::new(dec!(0.50), dec!(100)),
            PriceLevel::new(dec!(0.60), dec!(50)),
            PriceLevel::new(dec!(0.10), dec!(1000)),
        ];

        let outcome = simulate(&ladder, dec!(62)).unwrap();

        // 50 on level one, then 12 / 0.60 = 20 shares; level three is never read.
        assert_eq!(outcome.shares_acquired(), dec!(120));
        assert_eq!(outcome.actual_spent(), dec!(62));
        assert_eq!(outcome.levels_consumed(), 2);
        assert!(!outcome.insufficient_liquidity());
    }

    #[test]
    fn zero_budget_is_all_zero() {
        let outcome = simulate(&ladder(), Decimal::ZERO).unwrap();

        assert_eq!(outcome.actual_spent(), Decimal::ZERO);
        assert_eq!(outcome.shares_acquired(), Decimal::ZERO);
        assert_eq!(outcome.profit(), Decimal::ZERO);
        assert_eq!(outcome.return_pct(), Decimal::ZERO);
        assert!(!outcome.insufficient_liquidity());
        assert_eq!(outcome.average_price(), None);
    }

    #[test]
    fn empty_ladder_with_budget_is_insufficient() {
        let outcome = simulate(&[], dec!(10)).unwrap();

        assert_eq!(outcome.actual_spent(), Decimal::ZERO);
        assert!(outcome.insufficient_liquidity());
    }

    #[test]
    fn empty_ladder_without_budget_is_not_insufficient() {
        let outcome = simulate(&[], Decimal::ZERO).unwrap();
        assert!(!outcome.insufficient_liquidity());
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = simulate(&ladder(), dec!(-1)).unwrap_err();
        assert_eq!(err, DomainError::NegativeBudget { budget: dec!(-1) });
    }

    #[test]
    fn zero_price_reached_with_budget_is_rejected() {
        let ladder = vec![
            PriceLevel::new(dec!(0.50), dec!(10)),
            PriceLevel::new(dec!(0), dec!(10)),
        ];

        let err = simulate(&ladder, dec!(100)).unwrap_err();
        assert_eq!(err, DomainError::ZeroPrice { index: 1 });
    }

    #[test]
    fn zero_price_past_the_stop_point_is_ignored() {
        let ladder = vec![
            PriceLevel::new(dec!(0.50), dec!(10)),
            PriceLevel::new(dec!(0), dec!(10)),
        ];

        let outcome = simulate(&ladder, dec!(5)).unwrap();
        assert_eq!(outcome.shares_acquired(), dec!(10));
    }

    #[test]
    fn corrupt_level_anywhere_is_rejected() {
        let ladder = vec![
            PriceLevel::new(dec!(0.50), dec!(10)),
            PriceLevel::new(dec!(0.70), dec!(-3)),
        ];

        let err = simulate(&ladder, dec!(1)).unwrap_err();
        assert!(matches!(err, DomainError::NegativeQuantity { .. }));
    }

    #[test]
    fn fill_at_payoff_breaks_even() {
        let ladder = vec![PriceLevel::new(dec!(1), dec!(10))];
        let outcome = simulate(&ladder, dec!(5)).unwrap();

        assert_eq!(outcome.profit(), Decimal::ZERO);
        assert_eq!(outcome.return_pct(), Decimal::ZERO);
        assert_eq!(outcome.average_price(), Some(dec!(1)));
    }

    #[test]
    fn return_overflow_is_an_error() {
        let ladder = vec![PriceLevel::new(
            Decimal::new(1, 28),
            Decimal::from_scientific("1e28").unwrap(),
        )];

        let err = simulate(&ladder, dec!(1)).unwrap_err();
        assert_eq!(err, DomainError::Overflow { field: "return_pct" });
    }

    #[test]
    fn share_count_overflow_is_an_error() {
        let size = Decimal::from_scientific("5e28").unwrap();
        let ladder = vec![PriceLevel::new(dec!(0.5), size), PriceLevel::new(dec!(0.5), size)];

        let err = simulate(&ladder, size).unwrap_err();
        assert_eq!(err, DomainError::Overflow { field: "shares_acquired" });
    }

    #[test]
    fn level_cost_overflow_is_an_error() {
        let ladder = vec![PriceLevel::new(dec!(1000), Decimal::MAX)];

        let err = simulate(&ladder, dec!(1)).unwrap_err();
        assert_eq!(err, DomainError::Overflow { field: "level_cost" });
    }

    #[test]
    fn average_price_is_volume_weighted() {
        let outcome = simulate(&ladder(), dec!(80)).unwrap();
        let avg = outcome.average_price().unwrap();
        assert_eq!(avg.round_dp(6), dec!(0.533333));
    }
}
