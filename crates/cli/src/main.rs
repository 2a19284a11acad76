//! `greenlight` -- command-line front end for draft review and
//! qualification resolution.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                       | Default        | Description                         |
//! |--------------------------------|----------------|-------------------------------------|
//! | `GREENLIGHT_LANE`              | `feature-film` | Nuance lane for `review`            |
//! | `GREENLIGHT_DIVERSIFY`         | `false`        | Enable the template-similarity check|
//! | `GREENLIGHT_RESTRAINT`         | --             | Restraint level `0..=100`           |
//! | `GREENLIGHT_ANTI_TROPES`       | --             | Comma-separated trope ids           |
//! | `GREENLIGHT_SIMILARITY_WINDOW` | `10`           | Recent fingerprints compared        |
//! | `GREENLIGHT_PREVIOUS_HASH`     | --             | Stored resolver hash for `resolve`  |
//! | `RUST_LOG`                     | `greenlight=info,greenlight_pipeline=info` | Log filter |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenlight_core::nuance::fingerprint::NarrativeFingerprint;
use greenlight_core::nuance::Lane;
use greenlight_core::qualifications::QualificationInput;
use greenlight_core::style_deviation::StyleTarget;
use greenlight_core::text_metrics::extract;
use greenlight_pipeline::{assess_similarity, resolve_for_run, review_draft, ReviewConfig};

#[derive(Parser, Debug)]
#[command(name = "greenlight")]
#[command(about = "Narrative nuance checks and production qualification resolution")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the style fingerprint of a text file
    Extract {
        /// Draft text file
        file: PathBuf,
    },

    /// Run the nuance gate and optional style scoring on a draft
    Review {
        /// Draft text file
        file: PathBuf,

        /// Nuance lane (overrides GREENLIGHT_LANE)
        #[arg(long)]
        lane: Option<String>,

        /// Restraint level 0..=100 (overrides GREENLIGHT_RESTRAINT)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        restraint: Option<u8>,

        /// Enable the template-similarity check
        #[arg(long)]
        diversify: bool,

        /// JSON file holding a style target
        #[arg(long)]
        target: Option<PathBuf>,

        /// Similarity risk against recent output, used when no history is given
        #[arg(long, default_value_t = 0.0)]
        similarity_risk: f64,

        /// JSON file holding `{ "candidate": .., "recent": [..] }` narrative fingerprints
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Resolve production qualifications from a JSON input file
    Resolve {
        /// JSON file holding the qualification input
        file: PathBuf,

        /// Resolver hash stored with previously generated content
        #[arg(long, env = "GREENLIGHT_PREVIOUS_HASH")]
        previous_hash: Option<String>,
    },
}

/// Fingerprint history supplied to `review --history`.
#[derive(Debug, Deserialize)]
struct FingerprintHistory {
    candidate: NarrativeFingerprint,
    #[serde(default)]
    recent: Vec<NarrativeFingerprint>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenlight=info,greenlight_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Extract { file } => {
            let text = read_text(&file)?;
            print_json(&extract(&text))
        }
        Command::Review {
            file,
            lane,
            restraint,
            diversify,
            target,
            similarity_risk,
            history,
        } => {
            let mut config =
                ReviewConfig::from_env().context("Failed to load review configuration")?;
            if let Some(lane) = lane {
                config.lane = Lane::parse(&lane)?;
            }
            if restraint.is_some() {
                config.restraint = restraint;
            }
            config.diversify_enabled |= diversify;

            let text = read_text(&file)?;
            let target = target
                .as_deref()
                .map(read_json::<StyleTarget>)
                .transpose()?;
            let similarity_risk = match history {
                Some(path) => {
                    let history: FingerprintHistory = read_json(&path)?;
                    assess_similarity(&history.candidate, &history.recent, &config).risk
                }
                None => similarity_risk,
            };

            tracing::info!(
                file = %file.display(),
                lane = %config.lane,
                similarity_risk,
                "Reviewing draft",
            );
            let review = review_draft(&text, &config, target.as_ref(), similarity_risk)?;
            print_json(&review)
        }
        Command::Resolve { file, previous_hash } => {
            let input: QualificationInput = read_json(&file)?;
            let run = resolve_for_run(&input, previous_hash.as_deref());
            print_json(&run)
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
