mod aggregate;
mod cli;
mod config;
mod error;
mod evaluator;
mod profile;
mod rank;
mod report;
mod store;
mod telemetry;
mod types;

use crate::error::RankerError;
use crate::evaluator::{Evaluator, ManualEntry};
use crate::profile::ItemKind;
use crate::store::RecordStore;
use crate::types::config::RankerConfig;
use crate::types::report::RankingReport;
use clap::Parser;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, RankerError> {
    let cli = cli::Cli::parse();
    let cfg = config::load_config(&cli.root)?;
    let level = telemetry::level_for_flags(cli.verbose, cli.quiet).unwrap_or(cfg.log_level());
    telemetry::init(level)?;

    let data_dir = config::data_dir(&cli.root, &cfg);
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    match cli.command {
        cli::Commands::Init(cmd) => {
            let kinds = match (cmd.kind, cmd.all) {
                (Some(kind), false) => vec![ItemKind::from(kind)],
                _ => ItemKind::ALL.to_vec(),
            };
            for kind in kinds {
                let profile = cfg.profile(kind)?;
                let store = RecordStore::open(&data_dir, &profile);
                let status = if store.seed()? { "seeded" } else { "exists" };
                println!("{status}: {}", store.path().display());
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Kinds(cmd) => {
            let kinds = match cmd.kind {
                Some(kind) => vec![ItemKind::from(kind)],
                None => ItemKind::ALL.to_vec(),
            };
            for kind in kinds {
                for line in evaluator_for(&cfg, &data_dir, kind)?.describe() {
                    println!("{line}");
                }
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Add(cmd) => {
            let evaluator = evaluator_for(&cfg, &data_dir, cmd.kind.into())?;
            let entry = ManualEntry {
                name: cmd.name,
                ratings: cmd
                    .ratings
                    .iter()
                    .map(|raw| cli::parse_rating(raw))
                    .collect::<Result<Vec<_>, _>>()?,
                direct: cmd
                    .scores
                    .iter()
                    .map(|raw| cli::parse_score(raw))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            let ranking = evaluator.add(&entry, &cmd.weights.resolve(cfg.weights()))?;
            emit(&ranking, cmd.format)
        }
        cli::Commands::Rank(cmd) => {
            let evaluator = evaluator_for(&cfg, &data_dir, cmd.kind.into())?;
            let ranking = evaluator.ranking(&cmd.weights.resolve(cfg.weights()))?;
            emit(&ranking, cmd.format)
        }
        cli::Commands::Import(cmd) => {
            let evaluator = evaluator_for(&cfg, &data_dir, cmd.kind.into())?;
            let payload = std::fs::read_to_string(&cmd.params)?;
            let parameters = aggregate::extraction::parse_payload(&payload)?;
            let name = match cmd.name {
                Some(name) => name,
                None => cmd
                    .params
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default(),
            };
            let ranking =
                evaluator.import(&name, &parameters, &cmd.weights.resolve(cfg.weights()))?;
            emit(&ranking, cmd.format)
        }
    }
}

fn evaluator_for(cfg: &RankerConfig, data_dir: &Path, kind: ItemKind) -> Result<Evaluator, RankerError> {
    let profile = cfg.profile(kind)?;
    let store = RecordStore::open(data_dir, &profile);
    Ok(Evaluator::new(profile, store, cfg.ranking.normalize_weights))
}

fn emit(ranking: &RankingReport, format: cli::ReportFormat) -> Result<i32, RankerError> {
    let output_format = match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    };
    let rendered = report::render(ranking, output_format)?;
    println!("{rendered}");

    if ranking.warnings.is_empty() {
        Ok(exit_code::SUCCESS)
    } else {
        for warning in &ranking.warnings {
            eprintln!("warning: {}", warning.body);
        }
        Ok(exit_code::WARNINGS)
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
