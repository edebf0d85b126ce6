//! Timer-driven refresh scheduler for the upstream feed.
//!
//! The poller fetches the configured GeoJSON endpoint on a fixed interval
//! and publishes each normalized batch over a [`watch`] channel. Watch
//! semantics match the engine's ordering guarantee: consumers always
//! observe the most recent batch, and intermediate batches may be
//! coalesced but never delivered out of order.
//!
//! A failed refresh is never fatal: the poller records a [`FeedStatus`]
//! for the UI and keeps the last good batch in the channel until a
//! refresh succeeds again.

use std::time::Duration;

use chrono::{DateTime, Utc};
use geoview_types::Event;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::normalize::normalize_response;
use crate::raw::FeedResponse;

/// One successfully normalized feed batch.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    /// Normalized events in feed order.
    pub events: Vec<Event>,
    /// Upstream generation timestamp, when the feed reported one.
    pub generated_at: Option<DateTime<Utc>>,
    /// When this batch was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Health of the feed connection, surfaced to the UI as a non-fatal
/// status indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// No refresh has completed yet.
    Pending,
    /// The most recent refresh succeeded.
    Healthy {
        /// When the refresh completed.
        refreshed_at: DateTime<Utc>,
    },
    /// The most recent refresh failed; the last good batch (if any) is
    /// still being served.
    Failing {
        /// Human-readable failure description.
        message: String,
        /// When the last successful refresh completed, if any.
        last_good: Option<DateTime<Utc>>,
    },
}

/// Polls the feed endpoint and publishes normalized batches.
#[derive(Debug)]
pub struct FeedPoller {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    update_tx: watch::Sender<Option<FeedUpdate>>,
    status_tx: watch::Sender<FeedStatus>,
}

impl FeedPoller {
    /// Create a poller for the given endpoint and refresh interval.
    ///
    /// A zero interval is clamped to one millisecond; the interval timer
    /// aborts on a zero period.
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let (update_tx, _) = watch::channel(None);
        let (status_tx, _) = watch::channel(FeedStatus::Pending);
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            interval,
            update_tx,
            status_tx,
        }
    }

    /// Subscribe to normalized feed batches. The receiver always holds
    /// the most recent batch (`None` until the first success).
    pub fn updates(&self) -> watch::Receiver<Option<FeedUpdate>> {
        self.update_tx.subscribe()
    }

    /// Subscribe to the feed health indicator.
    pub fn status(&self) -> watch::Receiver<FeedStatus> {
        self.status_tx.subscribe()
    }

    /// Fetch and normalize the feed once.
    pub async fn fetch_once(&self) -> Result<FeedUpdate, FeedError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: FeedResponse = serde_json::from_str(&body)?;
        let (events, generated_at) = normalize_response(&response);
        Ok(FeedUpdate {
            events,
            generated_at,
            fetched_at: Utc::now(),
        })
    }

    /// Run the polling loop until the owning task is dropped.
    ///
    /// The first fetch happens immediately; subsequent fetches follow the
    /// configured interval. Missed ticks (e.g. a slow fetch) are delayed,
    /// not bursted.
    pub async fn run(self) {
        info!(url = self.url, interval = ?self.interval, "feed poller starting");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.fetch_once().await {
                Ok(update) => {
                    debug!(
                        events = update.events.len(),
                        "feed refresh succeeded"
                    );
                    self.status_tx.send_replace(FeedStatus::Healthy {
                        refreshed_at: update.fetched_at,
                    });
                    self.update_tx.send_replace(Some(update));
                }
                Err(err) => {
                    warn!(error = %err, "feed refresh failed, keeping last good batch");
                    let last_good = self
                        .update_tx
                        .borrow()
                        .as_ref()
                        .map(|update| update.fetched_at);
                    self.status_tx.send_replace(FeedStatus::Failing {
                        message: err.to_string(),
                        last_good,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_starts_pending() {
        let poller = FeedPoller::new("http://localhost:0/feed", Duration::from_secs(60));
        assert_eq!(*poller.status().borrow(), FeedStatus::Pending);
        assert!(poller.updates().borrow().is_none());
    }

    #[test]
    fn watch_channel_coalesces_to_latest() {
        let poller = FeedPoller::new("http://localhost:0/feed", Duration::from_secs(60));
        let rx = poller.updates();

        for n in 0..3_i64 {
            poller.update_tx.send_replace(Some(FeedUpdate {
                events: Vec::new(),
                generated_at: DateTime::<Utc>::from_timestamp_millis(n),
                fetched_at: Utc::now(),
            }));
        }

        // Only the latest batch is observable.
        let latest = rx.borrow().as_ref().and_then(|u| u.generated_at);
        assert_eq!(latest, DateTime::<Utc>::from_timestamp_millis(2));
    }

    #[tokio::test]
    async fn zero_interval_does_not_abort_the_poller() {
        let poller = FeedPoller::new("http://127.0.0.1:0/feed", Duration::ZERO);
        // The loop must keep running (and failing to fetch), not panic on
        // a zero interval period.
        let running = tokio::time::timeout(Duration::from_millis(20), poller.run()).await;
        assert!(running.is_err());
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_not_fatal() {
        // Port 0 is never connectable; the fetch must fail cleanly.
        let poller = FeedPoller::new("http://127.0.0.1:0/feed", Duration::from_secs(60));
        let result = poller.fetch_once().await;
        assert!(matches!(result, Err(FeedError::Http { .. })));
    }
}
