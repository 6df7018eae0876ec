//! Handlers for the race commands: `races`, `build-races` and `activity`.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Value};

use super::command::{BuildRacesArgs, FileArgs};
use super::output;
use crate::adapter::snapshot::{parse_detections, parse_races};
use crate::domain::{aggregate, build_races, ranked_activity, RaceRecord, SourceId, SourceStats};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

fn read(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Per-source statistics as JSON, with the derived win rate.
pub fn stats_to_json(stats: &BTreeMap<SourceId, SourceStats>) -> Value {
    let rows: Vec<_> = stats
        .iter()
        .map(|(source, s)| {
            json!({
                "source_id": source,
                "wins": s.wins,
                "total_participations": s.total_participations,
                "mean_positive_latency_ms": s.mean_positive_latency_ms,
                "win_rate_pct": s.win_rate(),
            })
        })
        .collect();
    json!(rows)
}

fn race_to_json(race: &RaceRecord) -> Value {
    json!({
        "event_key": race.event_key(),
        "occurrence": race.occurrence(),
        "winner": race.winner().map(|w| w.source_id()),
        "time_spread_ms": race.time_spread_ms(),
        "participants": race.participants().iter().map(|p| json!({
            "source_id": p.source_id(),
            "timestamp_ms": p.timestamp_ms(),
            "diff_from_fastest_ms": p.diff_from_fastest_ms(),
            "is_fastest": p.is_fastest(),
        })).collect::<Vec<_>>(),
    })
}

fn print_stats(stats: &BTreeMap<SourceId, SourceStats>) {
    output::section("Sources");
    for (source, s) in stats {
        let latency = s
            .mean_positive_latency_ms
            .map_or_else(|| output::muted("-"), |ms| format!("+{ms:.1}ms"));
        let win_rate = s
            .win_rate()
            .map_or_else(|| output::muted("-"), |pct| format!("{pct:.1}%"));
        output::field(
            source.as_str(),
            format!(
                "{} wins / {} races  {}  behind {}",
                s.wins, s.total_participations, win_rate, latency
            ),
        );
    }
}

/// Execute the races command.
pub fn execute_races(args: &FileArgs) -> Result<()> {
    let races = parse_races(&read(&args.file)?)?;
    let stats = aggregate(&races)?;

    if output::is_json() {
        output::json(&json!({
            "command": "races",
            "races": races.len(),
            "sources": stats_to_json(&stats),
        }));
        return Ok(());
    }

    output::field("Races", races.len());
    print_stats(&stats);
    Ok(())
}

/// Execute the build-races command.
pub fn execute_build(args: &BuildRacesArgs, config: &Config) -> Result<()> {
    let detections = parse_detections(&read(&args.file)?)?;
    let options = config.races.options_with(args.window_ms, args.limit)?;

    let batch = build_races(&detections, &options);
    let stats = aggregate(&batch.races)?;

    if output::is_json() {
        output::json(&json!({
            "command": "build-races",
            "total_races": batch.total_races,
            "races": batch.races.iter().map(race_to_json).collect::<Vec<_>>(),
            "sources": stats_to_json(&stats),
        }));
        return Ok(());
    }

    output::field("Detections", detections.len());
    output::field(
        "Races",
        format!("{} (showing {})", batch.total_races, batch.races.len()),
    );
    output::section("Recent races");
    for race in &batch.races {
        let order: Vec<String> = race
            .participants()
            .iter()
            .map(|p| {
                if p.is_fastest() {
                    p.source_id().to_string()
                } else {
                    format!("{} +{}ms", p.source_id(), p.diff_from_fastest_ms())
                }
            })
            .collect();
        output::line(format!(
            "{}#{}  {}",
            race.event_key(),
            race.occurrence(),
            order.join(", ")
        ));
    }
    print_stats(&stats);
    Ok(())
}

/// Execute the activity command.
pub fn execute_activity(args: &FileArgs) -> Result<()> {
    let detections = parse_detections(&read(&args.file)?)?;
    let ranked = ranked_activity(&detections);

    if output::is_json() {
        output::json(&json!({
            "command": "activity",
            "total_entries": detections.len(),
            "sources": ranked,
        }));
        return Ok(());
    }

    output::field("Detections", detections.len());
    output::section("Sources");
    for entry in &ranked {
        output::field(
            entry.source_id.as_str(),
            format!(
                "{} detections, {} events, {}..{}",
                entry.detections, entry.unique_events, entry.first_seen_ms, entry.last_seen_ms
            ),
        );
    }
    Ok(())
}
