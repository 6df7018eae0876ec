//! Command-line interface definitions.
//!
//! Every subcommand reads a snapshot file produced by the monitoring
//! backend and prints the derived result as text or, with `--json`, as a
//! single JSON document.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::domain::{PriceUnit, Side};

/// Order-book execution simulator and detection-race statistics
#[derive(Parser, Debug)]
#[command(name = "depthrace")]
#[command(version)]
pub struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "depthrace.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the depthrace CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate spending a budget against one side of a book
    Simulate(SimulateArgs),

    /// Aggregate per-source statistics from race records
    Races(FileArgs),

    /// Build race records from raw detections
    BuildRaces(BuildRacesArgs),

    /// Per-source detection activity
    Activity(FileArgs),

    /// Best ask seen across a history of book snapshots
    History(HistoryArgs),
}

/// Unit the input file quotes prices in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// Fractional dollars, 0.0 to 1.0
    Fraction,
    /// Cents, 0 to 100
    Cents,
}

impl From<UnitArg> for PriceUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Fraction => Self::Fraction,
            UnitArg::Cents => Self::Cents,
        }
    }
}

/// Book side to consume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    #[default]
    Asks,
    Bids,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Asks => Self::Asks,
            SideArg::Bids => Self::Bids,
        }
    }
}

/// Arguments for `depthrace simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Book snapshot (JSON)
    #[arg(long)]
    pub book: PathBuf,

    /// Capital to spend
    #[arg(long)]
    pub budget: Decimal,

    /// Price unit of the book; overrides the configured unit
    #[arg(long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Side of the book to walk
    #[arg(long, value_enum, default_value_t = SideArg::Asks)]
    pub side: SideArg,
}

/// A single input file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Input file (JSON)
    #[arg(long)]
    pub file: PathBuf,
}

/// Arguments for `depthrace build-races`.
#[derive(Args, Debug)]
pub struct BuildRacesArgs {
    /// Detections file (JSON)
    #[arg(long)]
    pub file: PathBuf,

    /// Maximum spread between first and last detection (0 = no limit)
    #[arg(long)]
    pub window_ms: Option<i64>,

    /// Number of races to print, most recent first
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `depthrace history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Snapshot history file (JSON), newest first
    #[arg(long)]
    pub file: PathBuf,

    /// Report the most recent time the ask was at or below this price
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Price unit of the snapshots and target
    #[arg(long, value_enum)]
    pub unit: Option<UnitArg>,
}
