//! fare-estimator - route and place lookups behind a rate-limited, cached provider
//!
//! Command-line front end for the estimator service

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fare_estimator::config::{Config, EndpointKey};
use fare_estimator::core::locations::od_distance;
use fare_estimator::core::orchestrator::{FetchEvent, FetchStatus};
use fare_estimator::core::types::{PlaceSuggestion, RouteEstimate};
use fare_estimator::utils::{format_distance, format_duration};
use fare_estimator::{Estimator, EstimatorStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Longest the CLI waits for deferred retries to settle
const RETRY_WAIT: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(name = "fare-estimator")]
#[command(author, version, about = "Intracity trip distance, duration and traffic lookups", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file (otherwise the environment is used)
    #[arg(long, short, env = "FARE_ESTIMATOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Distance, duration and traffic between two places
    Route {
        origin: String,
        destination: String,
        #[arg(long, value_enum, default_value_t = RouteEndpoint::Directions)]
        endpoint: RouteEndpoint,
    },

    /// Place suggestions for free text
    Suggest { query: String },

    /// Quota, per-endpoint and cache state
    Status,

    /// Approximate distance between two well-known places, without the provider
    Distance { from: String, to: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RouteEndpoint {
    Directions,
    DistanceMatrix,
}

impl From<RouteEndpoint> for EndpointKey {
    fn from(endpoint: RouteEndpoint) -> Self {
        match endpoint {
            RouteEndpoint::Directions => EndpointKey::Directions,
            RouteEndpoint::DistanceMatrix => EndpointKey::DistanceMatrix,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Display with context chain
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::from_env().context("failed to load configuration from environment")?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if let Commands::Distance { from, to } = &cli.command {
        return Ok(print_distance(from, to, cli.json));
    }

    let config = load_config(cli.config.as_ref()).await?;
    let estimator = Estimator::new(config).context("failed to initialize estimator")?;
    let mut events = estimator.orchestrator().subscribe();

    let code = match cli.command {
        Commands::Route {
            origin,
            destination,
            endpoint,
        } => {
            let mut status = estimator.route(endpoint.into(), &origin, &destination).await;
            if awaits_retry(&status) {
                status = wait_for_route(&mut events, status).await;
            }
            print_route(&origin, &destination, &status, cli.json)?
        }
        Commands::Suggest { query } => {
            let mut status = estimator.suggest(&query).await;
            if awaits_retry(&status) {
                status = wait_for_suggestions(&mut events, status).await;
            }
            print_status(&status, cli.json, |suggestions| {
                for suggestion in suggestions {
                    println!("{:<28} {}", suggestion.name, suggestion.full_address);
                }
            })?
        }
        Commands::Status => {
            print_estimator_status(&estimator.status(), cli.json)?;
            ExitCode::SUCCESS
        }
        Commands::Distance { .. } => ExitCode::SUCCESS,
    };

    estimator.shutdown();
    Ok(code)
}

fn awaits_retry<T>(status: &FetchStatus<T>) -> bool {
    matches!(
        status,
        FetchStatus::RetryScheduled { .. }
            | FetchStatus::Failed {
                retry_scheduled: true,
                ..
            }
    )
}

async fn wait_for_route(
    events: &mut broadcast::Receiver<FetchEvent>,
    initial: FetchStatus<RouteEstimate>,
) -> FetchStatus<RouteEstimate> {
    if let Some(message) = initial.user_message() {
        eprintln!("{}", message);
    }

    let mut latest = initial;
    let waited = tokio::time::timeout(RETRY_WAIT, async {
        while awaits_retry(&latest) {
            match events.recv().await {
                Ok(FetchEvent::Route { status, .. }) => latest = status,
                Ok(FetchEvent::Suggestions { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
    .await;

    if waited.is_err() {
        warn!("Gave up waiting for deferred retry");
    }
    latest
}

async fn wait_for_suggestions(
    events: &mut broadcast::Receiver<FetchEvent>,
    initial: FetchStatus<Vec<PlaceSuggestion>>,
) -> FetchStatus<Vec<PlaceSuggestion>> {
    let mut latest = initial;
    let waited = tokio::time::timeout(RETRY_WAIT, async {
        while awaits_retry(&latest) {
            match events.recv().await {
                Ok(FetchEvent::Suggestions { status, .. }) => latest = status,
                Ok(FetchEvent::Route { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
    .await;

    if waited.is_err() {
        warn!("Gave up waiting for deferred retry");
    }
    latest
}

fn print_status<T, F>(status: &FetchStatus<T>, json: bool, render: F) -> Result<ExitCode>
where
    T: serde::Serialize,
    F: FnOnce(&T),
{
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else if let Some(value) = status.value() {
        render(value);
    } else if let Some(message) = status.user_message() {
        println!("{}", message);
    }

    Ok(if status.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_route(
    origin: &str,
    destination: &str,
    status: &FetchStatus<RouteEstimate>,
    json: bool,
) -> Result<ExitCode> {
    let code = print_status(status, json, |estimate| {
        println!("Distance: {}", format_distance(estimate.distance_km));
        println!(
            "Duration: {} ({} without traffic)",
            format_duration(estimate.duration_min),
            format_duration(estimate.duration_base_min)
        );
        println!("Traffic:  {}", estimate.traffic_level);
        if let Some(summary) = &estimate.summary {
            println!("Via:      {}", summary);
        }
    })?;

    if !status.is_ready() && !json {
        let km = od_distance(origin, destination);
        if km > 0.0 {
            println!("Matrix-derived distance: {}", format_distance(km));
        }
    }
    Ok(code)
}

fn print_distance(from: &str, to: &str, json: bool) -> ExitCode {
    let km = od_distance(from, to);
    if json {
        println!(
            "{}",
            serde_json::json!({ "from": from, "to": to, "distance_km": km })
        );
    } else if km > 0.0 {
        println!("{}", format_distance(km));
    } else {
        println!("No known distance between {} and {}", from, to);
    }

    if km > 0.0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_estimator_status(status: &EstimatorStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    for (label, window) in [("Daily", &status.quota.daily), ("Monthly", &status.quota.monthly)] {
        let flag = if window.critical {
            " (critical)"
        } else if window.warning {
            " (warning)"
        } else {
            ""
        };
        println!(
            "{:<8} quota: {}/{} ({:.1}%){}",
            label, window.used, window.limit, window.percent_used, flag
        );
    }

    println!();
    println!(
        "{:<16} {:>6} {:>6} {:>6} {:>6}  {}",
        "endpoint", "ready", "1m", "1h", "today", "backoff"
    );
    for endpoint in &status.endpoints {
        let backoff = if endpoint.is_backed_off && endpoint.backoff_remaining_ms > 0 {
            format!("{}ms", endpoint.backoff_remaining_ms)
        } else {
            "-".to_string()
        };
        println!(
            "{:<16} {:>6} {:>6} {:>6} {:>6}  {}",
            endpoint.key.as_str(),
            endpoint.can_make_request,
            endpoint.requests_last_minute,
            endpoint.requests_last_hour,
            endpoint.requests_today,
            backoff
        );
    }

    println!();
    println!(
        "Cache: {} routes, {} suggestions, hit ratio {}, {} evictions ({} autocomplete)",
        status.cache.cache_size,
        status.cache.autocomplete_cache_size,
        status.cache.hit_ratio_label(),
        status.cache.evictions,
        status.cache.autocomplete_evictions
    );
    Ok(())
}
