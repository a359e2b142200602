//! Background Expiration Sweeper
//!
//! Lazy expiration removes a record only when something touches it again.
//! A record that expires and is never accessed would otherwise sit in the
//! backend forever; the sweeper reclaims those by periodically running the
//! store's eager purge pass.
//!
//! The sweeper is optional. The store's expiration semantics are complete
//! without it - every read path already treats expired records as absent -
//! so running it changes when storage is reclaimed, never what callers
//! observe.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and:
//! 1. Sleeps for the current interval
//! 2. Wakes up and purges expired records across the whole store
//! 3. Adjusts the interval from the observed expiry rate
//!
//! ## Adaptive Frequency
//!
//! If a large fraction of scanned records are expired, the sweeper runs
//! more often. If almost none are, it backs off to save scans - each pass
//! costs a full-store scan, since space membership is derived and nothing
//! maintains a count of expiring records.

use crate::storage::backend::StorageBackend;
use crate::storage::store::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

/// Configuration for the expiration sweeper.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Base interval between sweeps (default: 1s)
    pub base_interval: Duration,

    /// Minimum interval between sweeps (default: 100ms)
    pub min_interval: Duration,

    /// Maximum interval between sweeps (default: 30s)
    pub max_interval: Duration,

    /// If this fraction of scanned records was expired, sweep more often
    pub speedup_threshold: f64,

    /// If this fraction of scanned records was expired, back off
    pub slowdown_threshold: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(1),
            min_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(30),
            speedup_threshold: 0.25,
            slowdown_threshold: 0.01,
        }
    }
}

/// A handle to the running expiration sweeper.
///
/// When this handle is dropped, the sweeper task stops.
#[derive(Debug)]
pub struct ExpirationSweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirationSweeper {
    /// Starts the sweeper as a background task.
    ///
    /// # Returns
    ///
    /// Returns a handle that stops the sweeper when dropped.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use spacekv::storage::{ExpirationSweeper, MemoryBackend, RecordStore, SweepConfig};
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(RecordStore::new(MemoryBackend::new()));
    /// let sweeper = ExpirationSweeper::start(store, SweepConfig::default());
    ///
    /// // Sweeper runs in the background...
    ///
    /// drop(sweeper);
    /// ```
    pub fn start<B: StorageBackend>(store: Arc<RecordStore<B>>, config: SweepConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(store, config, shutdown_rx));

        info!("Expiration sweeper started");

        Self { shutdown_tx }
    }

    /// Stops the sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        info!("Expiration sweeper stopped");
    }
}

impl Drop for ExpirationSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop<B: StorageBackend>(
    store: Arc<RecordStore<B>>,
    config: SweepConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut current_interval = config.base_interval;

    loop {
        tokio::select! {
            _ = tokio::time::sleep(current_interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiration sweeper received shutdown signal");
                    return;
                }
            }
        }

        let outcome = match store.purge_expired() {
            Ok(outcome) => outcome,
            Err(e) => {
                // Backend and decode failures are not retried here; the
                // next tick simply tries again.
                warn!(error = %e, "Sweep pass failed");
                continue;
            }
        };

        if outcome.scanned > 0 {
            let expiry_rate = outcome.purged as f64 / outcome.scanned as f64;

            if expiry_rate > config.speedup_threshold {
                current_interval = (current_interval / 2).max(config.min_interval);
                debug!(
                    purged = outcome.purged,
                    rate = %format!("{:.2}%", expiry_rate * 100.0),
                    new_interval_ms = current_interval.as_millis(),
                    "High expiry rate, speeding up sweeper"
                );
            } else if expiry_rate < config.slowdown_threshold && outcome.purged == 0 {
                current_interval = (current_interval * 2).min(config.max_interval);
                trace!(
                    new_interval_ms = current_interval.as_millis(),
                    "Low expiry rate, slowing down sweeper"
                );
            }
        }
    }
}

/// Starts the sweeper with default configuration.
///
/// This is a convenience function for simple use cases.
pub fn start_sweeper<B: StorageBackend>(store: Arc<RecordStore<B>>) -> ExpirationSweeper {
    ExpirationSweeper::start(store, SweepConfig::default())
}
