//! Background tunnel sweeper
//!
//! Runs [`TunnelLifecycleManager::sweep_expired`] on a fixed interval until a
//! shutdown signal arrives, so an unread session never stays live for more
//! than one interval past its expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::manager::TunnelLifecycleManager;

/// Totals reported when the sweeper stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub runs: u64,
    pub expired: u64,
}

/// Periodic expiry task
pub struct TunnelSweeper {
    manager: Arc<TunnelLifecycleManager>,
    every: Duration,
}

impl TunnelSweeper {
    pub fn new(manager: Arc<TunnelLifecycleManager>, every: Duration) -> Self {
        Self { manager, every }
    }

    /// Uses the manager's configured sweep interval
    pub fn from_config(manager: Arc<TunnelLifecycleManager>) -> Self {
        let every = manager.config().sweep_interval();
        Self::new(manager, every)
    }

    /// Spawns the sweep loop onto the current runtime
    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<SweepStats> {
        tokio::spawn(self.run(shutdown_rx))
    }

    /// Sweeps until the shutdown signal is received
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> SweepStats {
        let mut stats = SweepStats::default();
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_secs = self.every.as_secs_f64(), "Tunnel sweeper started");

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let expired = self.manager.sweep_expired().await;
                    stats.runs += 1;
                    stats.expired += expired as u64;
                }
                changed = shutdown_rx.changed() => {
                    // A dropped sender also means shutdown
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(runs = stats.runs, expired = stats.expired, "Tunnel sweeper shutting down");
        stats
    }
}
