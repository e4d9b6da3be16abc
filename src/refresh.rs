//! Periodic price refresh.
//!
//! [`spawn_refresh`] starts a task that fetches the price history on a fixed
//! interval (first fetch immediately) and forwards the outcome to the UI
//! loop as [`Message`]s. Token metadata is fetched on each cycle until it
//! succeeds once. Each cycle awaits its fetches before the next tick is
//! taken, so cycles never overlap. Failures are reported and retried on the
//! next tick; they never end the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::api::PriceFeed;
use crate::tui::Message;

/// Commands sent from the UI loop to the refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCommand {
    /// Run a refresh cycle without waiting for the next tick.
    Now,
}

/// Owns the refresh task. Dropping the handle stops it.
pub struct RefreshHandle {
    task: JoinHandle<()>,
    commands: mpsc::UnboundedSender<RefreshCommand>,
}

impl RefreshHandle {
    /// Requests an immediate refresh cycle.
    pub fn refresh_now(&self) {
        let _ = self.commands.send(RefreshCommand::Now);
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the refresh loop on the current Tokio runtime.
pub fn spawn_refresh<F: PriceFeed>(
    feed: Arc<F>,
    interval: Duration,
    tx: mpsc::UnboundedSender<Message>,
) -> RefreshHandle {
    let (commands, cmd_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(feed, interval, tx, cmd_rx));
    RefreshHandle { task, commands }
}

async fn run<F: PriceFeed>(
    feed: Arc<F>,
    interval: Duration,
    tx: mpsc::UnboundedSender<Message>,
    mut cmd_rx: mpsc::UnboundedReceiver<RefreshCommand>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut token_loaded = false;

    info!(interval_ms = interval.as_millis() as u64, "Refresh loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            command = cmd_rx.recv() => {
                if command.is_none() {
                    break;
                }
            }
        }

        if !token_loaded {
            match feed.fetch_token().await {
                Ok(token) => {
                    token_loaded = true;
                    if tx.send(Message::TokenLoaded(token)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Token metadata fetch failed");
                    if tx.send(Message::RefreshFailed(e.to_string())).is_err() {
                        break;
                    }
                }
            }
        }

        let message = match feed.fetch_prices().await {
            Ok(records) => Message::PricesLoaded(records),
            Err(e) => {
                warn!(error = %e, "Price history fetch failed");
                Message::RefreshFailed(e.to_string())
            }
        };
        if tx.send(message).is_err() {
            break;
        }
    }

    info!("Refresh loop stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{PriceRecord, TokenInfo};
    use crate::{Result, TokenChartError};

    /// Fails the first `failures` price fetches, then succeeds.
    struct FlakyFeed {
        failures: usize,
        price_calls: AtomicUsize,
        token_calls: AtomicUsize,
    }

    impl FlakyFeed {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                price_calls: AtomicUsize::new(0),
                token_calls: AtomicUsize::new(0),
            }
        }
    }

    impl PriceFeed for FlakyFeed {
        async fn fetch_token(&self) -> Result<TokenInfo> {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            Ok(TokenInfo {
                total_supply: dec!(1000),
            })
        }

        async fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
            let call = self.price_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(TokenChartError::Io("connection refused".into()));
            }
            Ok(vec![PriceRecord {
                price: 1_000_000_000_000_000_000,
                created_at: Utc::now(),
            }])
        }
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for refresh message")
            .expect("refresh channel closed")
    }

    #[tokio::test]
    async fn keeps_refreshing_after_a_failure() {
        let feed = Arc::new(FlakyFeed::new(1));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_refresh(feed.clone(), Duration::from_millis(10), tx);

        assert!(matches!(next(&mut rx).await, Message::TokenLoaded(_)));
        assert!(matches!(next(&mut rx).await, Message::RefreshFailed(_)));
        assert!(matches!(next(&mut rx).await, Message::PricesLoaded(records) if records.len() == 1));
        assert!(matches!(next(&mut rx).await, Message::PricesLoaded(_)));

        assert_eq!(feed.token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn manual_refresh_runs_an_extra_cycle() {
        let feed = Arc::new(FlakyFeed::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_refresh(feed.clone(), Duration::from_secs(3600), tx);

        assert!(matches!(next(&mut rx).await, Message::TokenLoaded(_)));
        assert!(matches!(next(&mut rx).await, Message::PricesLoaded(_)));

        handle.refresh_now();
        assert!(matches!(next(&mut rx).await, Message::PricesLoaded(_)));
        assert_eq!(feed.price_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_loop() {
        let feed = Arc::new(FlakyFeed::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_refresh(feed, Duration::from_millis(10), tx);

        assert!(matches!(next(&mut rx).await, Message::TokenLoaded(_)));
        drop(handle);

        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok(), "refresh task kept running after drop");
    }

    #[tokio::test]
    async fn loop_ends_once_the_receiver_is_gone() {
        let feed = Arc::new(FlakyFeed::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_refresh(feed, Duration::from_millis(10), tx);

        assert!(matches!(next(&mut rx).await, Message::TokenLoaded(_)));
        assert!(!handle.is_finished());

        drop(rx);
        let stopped = tokio::time::timeout(Duration::from_secs(5), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(stopped.is_ok(), "refresh task kept running without a receiver");
    }
}
