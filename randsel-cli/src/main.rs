//! randsel CLI: run seeded sampling trials from the command line.
//!
//! Commands:
//! - `weighted`: draw `n` distinct indices from a weight vector
//! - `bytes`: draw byte strings between two hex bounds
//!
//! Every trial gets its own generator from the seed hierarchy, so trial `k`
//! of a batch can be replayed alone with the same `--seed` and `--stream`.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

use randsel_core::bytes::{in_range, sample_between, to_hex};
use randsel_core::weighted::sample_weighted;
use randsel_core::SeedHierarchy;

use config::{parse_hex, RunConfig, WeightedSection};

#[derive(Parser)]
#[command(
    name = "randsel",
    about = "randsel: weighted and byte-range random selection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample distinct indices without replacement, proportional to weights.
    Weighted {
        /// Comma-separated non-negative weights (e.g., 1,2,0,5).
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Number of indices to draw per trial.
        #[arg(short = 'n', long)]
        n: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Sample byte strings in [start, end] (lexicographic).
    Bytes {
        /// Lower bound as hex. Empty or omitted means unbounded.
        #[arg(long)]
        start: Option<String>,

        /// Upper bound as hex.
        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master seed. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trials. Overrides the config file.
    #[arg(long)]
    trials: Option<u64>,

    /// Stream label for seed derivation. Defaults to the command name.
    #[arg(long)]
    stream: Option<String>,

    /// Print aggregate counts instead of one line per trial.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

impl RunArgs {
    /// Load the config file (if any) and apply flag overrides.
    fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(trials) = self.trials {
            cfg.trials = trials;
        }
        if let Some(stream) = &self.stream {
            cfg.stream = Some(stream.clone());
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Weighted { weights, n, run } => run_weighted(weights, n, &run),
        Commands::Bytes { start, end, run } => run_bytes(start, end, &run),
    }
}

fn run_weighted(weights: Option<Vec<f64>>, n: Option<usize>, run: &RunArgs) -> Result<()> {
    let cfg = run.resolve()?;
    let section = cfg.weighted.clone();
    let WeightedSection { weights, n } = match (weights, n, section) {
        (Some(weights), Some(n), _) => WeightedSection { weights, n },
        (weights, n, Some(section)) => WeightedSection {
            weights: weights.unwrap_or(section.weights),
            n: n.unwrap_or(section.n),
        },
        _ => bail!("--weights and -n are required (or a [weighted] config section)"),
    };

    let seeds = SeedHierarchy::new(cfg.seed);
    let stream = cfg.stream_or("weighted");
    let mut counts: BTreeMap<usize, u64> = BTreeMap::new();

    for trial in 0..cfg.trials {
        let mut rng = seeds.rng_for(stream, trial);
        let picked = sample_weighted(&weights, n, &mut rng)
            .with_context(|| format!("trial {trial} (seed {}, stream '{stream}')", cfg.seed))?;

        if run.summary {
            for &index in &picked {
                *counts.entry(index).or_default() += 1;
            }
        } else {
            println!("{}", json!({ "trial": trial, "indices": picked }));
        }
    }

    if run.summary {
        let counts: BTreeMap<String, u64> =
            counts.into_iter().map(|(i, c)| (i.to_string(), c)).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "trials": cfg.trials,
                "n": n,
                "counts": counts,
            }))?
        );
    }

    Ok(())
}

fn run_bytes(start: Option<String>, end: Option<String>, run: &RunArgs) -> Result<()> {
    let cfg = run.resolve()?;
    let section = cfg.bytes.clone().unwrap_or_default();
    let start = start.unwrap_or(section.start);
    let end = end.unwrap_or(section.end);

    let start_bytes = parse_hex(&start)?;
    let end_bytes = parse_hex(&end)?;
    if start_bytes > end_bytes {
        bail!("start {start} compares lexicographically greater than end {end}");
    }

    let seeds = SeedHierarchy::new(cfg.seed);
    let stream = cfg.stream_or("bytes");
    let mut by_length: BTreeMap<usize, u64> = BTreeMap::new();

    for trial in 0..cfg.trials {
        let mut rng = seeds.rng_for(stream, trial);
        let sampled = sample_between(&start_bytes, &end_bytes, &mut rng);
        if !in_range(&start_bytes, &end_bytes, &sampled) {
            eprintln!("trial {trial}: sample {} outside range", to_hex(&sampled));
            std::process::exit(2);
        }

        if run.summary {
            *by_length.entry(sampled.len()).or_default() += 1;
        } else {
            println!("{}", json!({ "trial": trial, "hex": to_hex(&sampled) }));
        }
    }

    if run.summary {
        let by_length: BTreeMap<String, u64> =
            by_length.into_iter().map(|(len, c)| (len.to_string(), c)).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "trials": cfg.trials,
                "start": start,
                "end": end,
                "lengths": by_length,
            }))?
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn weighted_flags_parse() {
        let cli = Cli::try_parse_from([
            "randsel", "weighted", "--weights", "1,2,0,5", "-n", "2", "--seed", "9", "--trials",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Weighted { weights, n, run } => {
                assert_eq!(weights, Some(vec![1.0, 2.0, 0.0, 5.0]));
                assert_eq!(n, Some(2));
                let cfg = run.resolve().unwrap();
                assert_eq!(cfg.seed, 9);
                assert_eq!(cfg.trials, 3);
                assert_eq!(cfg.stream_or("weighted"), "weighted");
            }
            Commands::Bytes { .. } => panic!("expected weighted"),
        }
    }

    #[test]
    fn bytes_flags_parse() {
        let cli = Cli::try_parse_from([
            "randsel", "bytes", "--start", "ff", "--end", "ff00", "--summary", "--stream", "keys",
        ])
        .unwrap();
        match cli.command {
            Commands::Bytes { start, end, run } => {
                assert_eq!(start.as_deref(), Some("ff"));
                assert_eq!(end.as_deref(), Some("ff00"));
                assert!(run.summary);
                let cfg = run.resolve().unwrap();
                assert_eq!(cfg.seed, 42);
                assert_eq!(cfg.stream_or("bytes"), "keys");
            }
            Commands::Weighted { .. } => panic!("expected bytes"),
        }
    }

    #[test]
    fn weighted_exhaustion_is_an_error() {
        let cli = Cli::try_parse_from(["randsel", "weighted", "--weights", "1,0", "-n", "2"]).unwrap();
        let Commands::Weighted { weights, n, run } = cli.command else {
            panic!("expected weighted");
        };
        let err = run_weighted(weights, n, &run).unwrap_err();
        assert!(format!("{err:#}").contains("sampling exhausted"));
    }

    #[test]
    fn inverted_bytes_range_is_rejected_before_sampling() {
        let cli = Cli::try_parse_from(["randsel", "bytes", "--start", "20", "--end", "10"]).unwrap();
        let Commands::Bytes { start, end, run } = cli.command else {
            panic!("expected bytes");
        };
        let err = run_bytes(start, end, &run).unwrap_err();
        assert!(err.to_string().contains("greater than end"));
    }
}
