//! Handler for the `simulate` command.

use serde_json::json;
use tracing::info;

use super::command::SimulateArgs;
use super::output;
use crate::adapter::snapshot::parse_book;
use crate::domain::{simulate, PriceUnit, Side};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute the simulate command.
pub fn execute(args: &SimulateArgs, config: &Config) -> Result<()> {
    let unit = args.unit.map_or(config.simulator.unit, PriceUnit::from);
    let side = Side::from(args.side);

    let content = std::fs::read_to_string(&args.book)?;
    let book = parse_book(&content, unit)?;
    let ladder = book.ladder(side);
    info!(token = %book.token_id(), %side, %unit, levels = ladder.len(), "simulating");

    let outcome = simulate(ladder, args.budget)?;

    if output::is_json() {
        output::json(&json!({
            "command": "simulate",
            "token_id": book.token_id(),
            "side": side,
            "unit": unit,
            "outcome": outcome,
            "average_price": outcome.average_price(),
        }));
        return Ok(());
    }

    output::section("Execution");
    output::field("Requested", outcome.requested_amount());
    output::field("Spent", outcome.actual_spent());
    output::field("Shares", outcome.shares_acquired().round_dp(4));
    if let Some(avg) = outcome.average_price() {
        output::field("Average price", unit.denormalize(avg).round_dp(4));
    }
    output::field("Payoff", outcome.projected_payoff().round_dp(4));
    output::field("Profit", output::signed(outcome.profit().round_dp(4)));
    output::field(
        "Return",
        format!("{}%", output::signed(outcome.return_pct().round_dp(2))),
    );
    output::field("Levels", outcome.levels_consumed());

    if outcome.insufficient_liquidity() {
        output::warning(&format!(
            "only {} of {} could be spent; the {side} ran out",
            outcome.actual_spent(),
            outcome.requested_amount(),
        ));
    }
    Ok(())
}
