use crate::error::{RankerError, Result};
use crate::profile::ItemKind;
use crate::types::scoring::{Category, Score, WeightVector};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gripper-ranker",
    version,
    about = "Weighted multi-criteria ranking of robotic grippers and sensors"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding ranker.toml and, by default, the stores
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create missing stores with their default items
    Init(InitCommand),
    /// Show the active scoring table per kind
    Kinds(KindsCommand),
    /// Rate a new item, store it and print the ranking
    Add(AddCommand),
    /// Print the ranking of every stored item
    Rank(RankCommand),
    /// Store an item from a parameter extraction result
    Import(ImportCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Gripper,
    Sensor,
    TactileSensor,
    ProximitySensor,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Gripper => ItemKind::Gripper,
            KindArg::Sensor => ItemKind::Sensor,
            KindArg::TactileSensor => ItemKind::TactileSensor,
            KindArg::ProximitySensor => ItemKind::ProximitySensor,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct InitCommand {
    #[arg(long, value_enum, conflicts_with = "all")]
    pub kind: Option<KindArg>,
    /// Seed every kind (the default when no kind is given)
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct KindsCommand {
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
}

#[derive(Args)]
pub struct AddCommand {
    #[arg(long, value_enum)]
    pub kind: KindArg,
    #[arg(long)]
    pub name: String,
    /// Sub-parameter rating, e.g. --rating "Payload=7"
    #[arg(long = "rating", value_name = "SUB=VALUE")]
    pub ratings: Vec<String>,
    /// Direct category score, e.g. --score Cost=6
    #[arg(long = "score", value_name = "CATEGORY=VALUE")]
    pub scores: Vec<String>,
    #[command(flatten)]
    pub weights: WeightArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RankCommand {
    #[arg(long, value_enum)]
    pub kind: KindArg,
    #[command(flatten)]
    pub weights: WeightArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ImportCommand {
    #[arg(long, value_enum)]
    pub kind: KindArg,
    /// JSON object of parameter name to value, or {"error": ...}
    #[arg(long)]
    pub params: PathBuf,
    /// Item name; defaults to the params file stem
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub weights: WeightArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args, Clone, Copy, Default)]
pub struct WeightArgs {
    #[arg(long = "w-cost")]
    pub cost: Option<f64>,
    #[arg(long = "w-iso")]
    pub iso_compliance: Option<f64>,
    #[arg(long = "w-safety")]
    pub safety: Option<f64>,
    #[arg(long = "w-perf")]
    pub performance: Option<f64>,
}

impl WeightArgs {
    /// Flags win over `configured`, key by key.
    pub fn resolve(&self, configured: WeightVector) -> WeightVector {
        WeightVector::new(
            self.cost.unwrap_or(configured.cost),
            self.iso_compliance.unwrap_or(configured.iso_compliance),
            self.safety.unwrap_or(configured.safety),
            self.performance.unwrap_or(configured.performance),
        )
    }
}

pub fn parse_rating(raw: &str) -> Result<(String, Score)> {
    let (name, value) = split_assignment(raw)?;
    Ok((name.to_string(), value))
}

pub fn parse_score(raw: &str) -> Result<(Category, Score)> {
    let (name, value) = split_assignment(raw)?;
    let category = name
        .parse::<Category>()
        .map_err(|_| RankerError::InvalidRating(format!("unknown category in '{raw}'")))?;
    Ok((category, value))
}

fn split_assignment(raw: &str) -> Result<(&str, Score)> {
    let (name, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| RankerError::InvalidRating(format!("expected NAME=VALUE, got '{raw}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(RankerError::InvalidRating(format!("missing name in '{raw}'")));
    }
    let value: Score = value
        .trim()
        .parse()
        .map_err(|_| RankerError::InvalidRating(format!("'{}' is not a number", value.trim())))?;
    if !value.is_finite() {
        return Err(RankerError::InvalidRating(format!("'{raw}' is not a finite number")));
    }
    Ok((name, value))
}
