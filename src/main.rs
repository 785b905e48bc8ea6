use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod aggregator;
mod api;
mod classifier;
mod config;
mod environment;
mod error;
mod models;
mod providers;
mod report;
mod risk;
mod snapshot;
mod social;

use crate::classifier::ClassifierMode;
use crate::config::{AppConfig, ProviderConfig, ScoringConfig};
use crate::models::{Coordinates, EnvironmentalStrategy};
use crate::risk::BlendWeights;

#[derive(Parser)]
#[command(name = "environmental-risk-monitor")]
#[command(about = "Composite environmental and social risk scoring for a location", long_about = None)]
struct Cli {
    #[command(flatten)]
    scoring: ScoringArgs,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScoringArgs {
    /// Environmental scoring strategy
    #[arg(long, value_enum, default_value_t = EnvironmentalStrategy::Threshold, global = true)]
    env_mode: EnvironmentalStrategy,
    /// Classifier output mode
    #[arg(long, value_enum, default_value_t = ClassifierMode::Binary, global = true)]
    classifier_mode: ClassifierMode,
    #[arg(long, default_value_t = 0.7, global = true)]
    env_weight: f64,
    #[arg(long, default_value_t = 0.3, global = true)]
    social_weight: f64,
    /// Posts drawn per social assessment
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(4..=5), global = true)]
    sample_size: u8,
    /// CSV file with a `text` column (and optional `location`) replacing the built-in feed
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,
    /// Seed the social sampler for reproducible scores
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Args)]
struct LocationArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

impl LocationArgs {
    fn coordinates(&self) -> anyhow::Result<Coordinates> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            anyhow::bail!("coordinates out of range: {}, {}", self.lat, self.lon);
        }
        Ok(Coordinates {
            lat: self.lat,
            lon: self.lon,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the risk API over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Assess a single location
    Assess {
        #[command(flatten)]
        location: LocationArgs,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown risk brief
    Report {
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, default_value = "risk-report.md")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let blend = BlendWeights::normalized(cli.scoring.env_weight, cli.scoring.social_weight)
        .context("invalid --env-weight/--social-weight")?;
    let config = AppConfig {
        provider: ProviderConfig::from_env().context("invalid provider configuration")?,
        scoring: ScoringConfig {
            environmental: cli.scoring.env_mode,
            classifier: cli.scoring.classifier_mode,
            blend,
            sample_size: usize::from(cli.scoring.sample_size),
            corpus: cli.scoring.corpus,
            seed: cli.scoring.seed,
        },
    };
    if config.provider.api_key.is_none() {
        info!("OPENWEATHER_API_KEY not set, weather and air quality will be synthetic");
    }
    let aggregator = Arc::new(config.build_aggregator()?);

    match cli.command {
        Commands::Serve { bind } => {
            let app = api::create_router(api::AppState {
                aggregator,
                version: env!("CARGO_PKG_VERSION").to_string(),
            });
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            info!(%bind, "risk API listening");
            axum::serve(listener, app).await.context("server error")?;
        }
        Commands::Assess { location, json } => {
            let result = aggregator.analyze(location.coordinates()?).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!(
                "{} ({:.4}, {:.4}): risk {:.1} ({})",
                result.snapshot.location_name,
                result.coordinates.lat,
                result.coordinates.lon,
                result.score,
                result.severity
            );
            println!(
                "- environmental {:.1} ({}), social {:.1} ({}), classifier {}",
                result.environmental.score,
                result.environmental.severity,
                result.social.score,
                result.social.severity,
                result.classifier.label()
            );
            println!("- factors: {}", result.contributing_factors.join(", "));
        }
        Commands::Report { location, out } => {
            let result = aggregator.analyze(location.coordinates()?).await?;
            let report = report::build_report(&result);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
