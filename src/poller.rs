//! Periodic delivery polling
//!
//! A [`DeliveryPoller`] tracks one delivery at a time. Activating it fetches
//! the record immediately and then on every tick of a fixed interval. Ticks
//! are counted from activation, so a slow fetch never delays the next one and
//! fetches may overlap; whichever completes last wins. Each activation is a
//! session with its own generation number, and results from a session that
//! has since been stopped or replaced are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::provider::DeliveryProvider;
use crate::{DeliveryRecord, TrackerConfig, TrackerError, TrackingView};

/// Source of the current time for ETA computation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling { delivery_id: String },
    Stopped,
}

/// What subscribers see: the last good view and, when the most recent fetch
/// failed, its error.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    pub view: Option<TrackingView>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    delivery_id: Option<String>,
}

struct Shared {
    slot: Mutex<Slot>,
    snapshot_tx: watch::Sender<TrackingSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(
        &self,
        generation: u64,
        delivery_id: &str,
        outcome: Result<DeliveryRecord, TrackerError>,
        now: DateTime<Utc>,
    ) {
        // Published while the slot is held so that a concurrent stop()
        // either precedes this check or observes the update.
        let slot = self.lock();
        if slot.generation != generation {
            debug!(delivery_id, "dropping result from a finished session");
            return;
        }

        match outcome {
            Ok(record) => {
                let view = TrackingView::from_record(record, now);
                debug!(
                    delivery_id,
                    stage = view.stage_ordinal,
                    eta = %view.eta_text,
                    "delivery updated"
                );
                self.snapshot_tx.send_replace(TrackingSnapshot {
                    view: Some(view),
                    last_error: None,
                });
            }
            Err(e) => {
                warn!(delivery_id, error = %e, "delivery fetch failed, keeping last known state");
                self.snapshot_tx
                    .send_modify(|snapshot| snapshot.last_error = Some(e.to_string()));
            }
        }
    }
}

/// Polls a [`DeliveryProvider`] for one delivery and keeps the latest view.
pub struct DeliveryPoller {
    provider: Arc<dyn DeliveryProvider>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    shared: Arc<Shared>,
    state: PollerState,
    token: Option<CancellationToken>,
}

impl DeliveryPoller {
    pub fn new(
        provider: Arc<dyn DeliveryProvider>,
        config: &TrackerConfig,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let (snapshot_tx, _) = watch::channel(TrackingSnapshot::default());
        Ok(Self {
            provider,
            clock: Arc::new(SystemClock),
            poll_interval: config.poll_interval,
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                snapshot_tx,
            }),
            state: PollerState::Idle,
            token: None,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start tracking `delivery_id`. Must be called from within a Tokio
    /// runtime. Restarting with the id already being polled does nothing;
    /// a different id replaces the running session and clears the view.
    pub fn start(&mut self, delivery_id: impl Into<String>) {
        let delivery_id = delivery_id.into();
        if let PollerState::Polling { delivery_id: current } = &self.state {
            if *current == delivery_id {
                return;
            }
            info!(from = %current, to = %delivery_id, "switching tracked delivery");
            self.cancel_session();
        }

        let generation = {
            let mut slot = self.shared.lock();
            slot.generation += 1;
            let same_delivery = slot.delivery_id.as_deref() == Some(delivery_id.as_str());
            slot.delivery_id = Some(delivery_id.clone());
            self.shared.snapshot_tx.send_if_modified(|snapshot| {
                let cleared_view = !same_delivery && snapshot.view.take().is_some();
                let cleared_error = snapshot.last_error.take().is_some();
                cleared_view || cleared_error
            });
            slot.generation
        };

        let token = CancellationToken::new();
        let session = PollSession {
            provider: Arc::clone(&self.provider),
            clock: Arc::clone(&self.clock),
            shared: Arc::clone(&self.shared),
            delivery_id: Arc::from(delivery_id.as_str()),
            generation,
            token: token.clone(),
        };
        tokio::spawn(session.run(self.poll_interval));

        info!(
            delivery_id = %delivery_id,
            interval_secs = self.poll_interval.as_secs(),
            "delivery polling started"
        );
        self.token = Some(token);
        self.state = PollerState::Polling { delivery_id };
    }

    /// Stop polling. No view update happens after this returns.
    pub fn stop(&mut self) {
        if let PollerState::Polling { delivery_id } = &self.state {
            info!(delivery_id = %delivery_id, "delivery polling stopped");
            self.cancel_session();
            self.state = PollerState::Stopped;
        }
    }

    fn cancel_session(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.shared.lock().generation += 1;
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Latest view, if any fetch has succeeded for the current delivery.
    pub fn view(&self) -> Option<TrackingView> {
        self.shared.snapshot_tx.borrow().view.clone()
    }

    /// Changes on every applied fetch, successful or not.
    pub fn subscribe(&self) -> watch::Receiver<TrackingSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Error from the most recent fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.snapshot_tx.borrow().last_error.clone()
    }
}

impl Drop for DeliveryPoller {
    fn drop(&mut self) {
        if matches!(self.state, PollerState::Polling { .. }) {
            self.cancel_session();
        }
    }
}

struct PollSession {
    provider: Arc<dyn DeliveryProvider>,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
    delivery_id: Arc<str>,
    generation: u64,
    token: CancellationToken,
}

impl PollSession {
    async fn run(self, poll_interval: Duration) {
        let mut ticker = time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let session = Arc::new(self);
        loop {
            tokio::select! {
                biased;
                _ = session.token.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::spawn(Arc::clone(&session).fetch());
                }
            }
        }
        debug!(delivery_id = %session.delivery_id, "poll loop exited");
    }

    async fn fetch(self: Arc<Self>) {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => return,
            outcome = self.provider.get_delivery_by_id(&self.delivery_id) => outcome,
        };
        self.shared
            .apply(self.generation, &self.delivery_id, outcome, self.clock.now());
    }
}
