//! Superette Delivery Tracker Library
//!
//! Tracks the progress of a Superette grocery delivery. Maps the status
//! reported by the backend onto the four delivery stages, turns the
//! estimated delivery time into a readable ETA, and polls the backend on a
//! fixed interval to keep that view current.

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod error;
pub mod eta;
pub mod poller;
pub mod provider;
pub mod report;
pub mod stage;
pub mod types;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use poller::{Clock, DeliveryPoller, PollerState, SystemClock, TrackingSnapshot};
pub use provider::{DeliveryProvider, HttpDeliveryProvider};
pub use types::{DeliveryRecord, DeliveryStatus, Driver, TrackingView};

/// Output options for [`track_delivery`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackOptions {
    pub json: bool,
    pub exit_on_delivered: bool,
}

/// Create a poller backed by the Superette REST API
pub fn create_http_poller(config: &TrackerConfig) -> Result<DeliveryPoller, TrackerError> {
    let provider = HttpDeliveryProvider::new(config)?;
    DeliveryPoller::new(Arc::new(provider), config)
}

/// Track one delivery, printing every update until Ctrl-C (or delivery,
/// when requested).
pub async fn track_delivery(
    mut poller: DeliveryPoller,
    delivery_id: &str,
    options: TrackOptions,
) -> Result<(), TrackerError> {
    let mut updates = poller.subscribe();
    poller.start(delivery_id);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();

                if options.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    report::print_tracking_report(delivery_id, &snapshot)?;
                }

                let delivered = snapshot.view.as_ref().is_some_and(TrackingView::is_delivered);
                if options.exit_on_delivered && delivered {
                    info!(delivery_id, "delivery completed");
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupted");
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}
