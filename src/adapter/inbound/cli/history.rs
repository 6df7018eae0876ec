//! Handler for the `history` command.

use serde_json::json;

use super::command::HistoryArgs;
use super::output;
use crate::adapter::snapshot::parse_history;
use crate::domain::{best_price_history, PriceUnit};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute the history command.
///
/// The target is given in the same unit as the snapshots.
pub fn execute(args: &HistoryArgs, config: &Config) -> Result<()> {
    let unit = args.unit.map_or(config.simulator.unit, PriceUnit::from);
    let content = std::fs::read_to_string(&args.file)?;
    let snapshots = parse_history(&content, unit)?;
    let target = args.target.map(|t| unit.normalize(t)).transpose()?;

    let history = best_price_history(&snapshots, target);

    if output::is_json() {
        output::json(&json!({
            "command": "history",
            "unit": unit,
            "history": history,
            "difference": history.difference(),
            "target_found": history.target_found(),
        }));
        return Ok(());
    }

    let show = |price: Option<rust_decimal::Decimal>| {
        price.map_or_else(|| output::muted("-"), |p| unit.denormalize(p).to_string())
    };

    output::section("Price history");
    output::field("Snapshots", history.snapshots_checked);
    output::field("Current ask", show(history.current_price));
    output::field("Best ask", show(history.best_price));
    if let Some(ts) = history.best_timestamp_ms {
        output::field("Best at", ts);
    }
    output::field("Difference", show(history.difference()));

    if let Some(target) = args.target {
        match history.target_hit {
            Some(hit) => output::field(
                "Target",
                format!("{target} reached at {} ({})", hit.timestamp_ms, show(Some(hit.price))),
            ),
            None => output::field("Target", format!("{target} never reached")),
        }
    }
    Ok(())
}
