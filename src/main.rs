use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use superette_tracker::config::{DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL};
use superette_tracker::{create_http_poller, track_delivery, TrackOptions, TrackerConfig};

#[derive(Debug, Parser)]
#[command(name = "superette_tracker", version, about = "Follow a Superette delivery")]
struct Cli {
    /// Delivery identifier to track
    delivery_id: String,

    /// Root URL of the Superette API
    #[arg(long, env = "SUPERETTE_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Seconds between refreshes
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    interval_secs: u64,

    /// Print each update as a JSON line instead of the stepper
    #[arg(long)]
    json: bool,

    /// Stop once the delivery reaches the delivered stage
    #[arg(long)]
    exit_on_delivered: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::new(cli.base_url, Duration::from_secs(cli.interval_secs));
    let poller = create_http_poller(&config)?;

    let options = TrackOptions {
        json: cli.json,
        exit_on_delivered: cli.exit_on_delivered,
    };
    track_delivery(poller, &cli.delivery_id, options).await?;

    Ok(())
}
