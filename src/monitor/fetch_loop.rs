// src/monitor/fetch_loop.rs
use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info};
use crate::storage::memory::SnapshotStore;
use crate::telemetry::TelemetrySource;
use crate::utils::with_jitter;
use super::smoothing::{Smoothed, ZeroSmoother, GRACE_PERIOD};

pub struct FetchLoop {
    source: Arc<dyn TelemetrySource>,
    store: Arc<SnapshotStore>,
    smoother: ZeroSmoother,
    interval: Duration,
    jitter: Duration,
    grace: Duration,
}

impl FetchLoop {
    pub fn new(source: Arc<dyn TelemetrySource>, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            smoother: ZeroSmoother::new(),
            interval,
            jitter: Duration::ZERO,
            grace: GRACE_PERIOD,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// One fetch, smoothed and published. A fetch that panics is logged and dropped.
    pub async fn tick(&mut self) {
        let source = self.source.clone();
        let reading = match tokio::spawn(async move { source.fetch().await }).await {
            Ok(reading) => reading,
            Err(e) => {
                error!("Error while fetching server status: {}", e);
                return;
            }
        };

        match self.smoother.apply(reading) {
            Smoothed::Publish(snapshot) => {
                debug!("Publishing {:?}", snapshot);
                self.store.publish(snapshot);
            }
            Smoothed::Defer(snapshot) => {
                info!(
                    "Player count dropped to 0, holding {} for {:?}",
                    snapshot.player_count, self.grace
                );
                tokio::time::sleep(self.grace).await;
                self.store.publish(snapshot);
            }
        }
    }

    pub async fn run(mut self) {
        info!("Fetch loop started, interval {:?}", self.interval);
        loop {
            self.tick().await;
            tokio::time::sleep(with_jitter(self.interval, self.jitter)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use crate::models::snapshot::Snapshot;

    /// Hands out scripted readings; `None` entries panic.
    struct Scripted {
        readings: Mutex<VecDeque<Option<Snapshot>>>,
    }

    impl Scripted {
        fn new(readings: Vec<Option<Snapshot>>) -> Arc<Self> {
            Arc::new(Self {
                readings: Mutex::new(readings.into()),
            })
        }
    }

    #[async_trait]
    impl TelemetrySource for Scripted {
        async fn fetch(&self) -> Snapshot {
            match self.readings.lock().pop_front() {
                Some(Some(snapshot)) => snapshot,
                Some(None) => panic!("telemetry exploded"),
                None => Snapshot::offline(),
            }
        }
    }

    fn reading(players: u32) -> Option<Snapshot> {
        Some(Snapshot::online(players, 50, 0, "Lancang Dam".into()))
    }

    #[tokio::test(start_paused = true)]
    async fn drop_to_zero_waits_out_grace_period() {
        let store = Arc::new(SnapshotStore::new());
        let source = Scripted::new(vec![reading(5), reading(5), reading(0), reading(0)]);
        let mut fetch_loop = FetchLoop::new(source, store.clone(), Duration::from_secs(20));

        fetch_loop.tick().await;
        fetch_loop.tick().await;
        assert_eq!(store.read().unwrap().player_count, 5);

        let start = tokio::time::Instant::now();
        fetch_loop.tick().await;
        assert!(start.elapsed() >= GRACE_PERIOD);
        assert_eq!(store.read().unwrap().player_count, 5);

        let start = tokio::time::Instant::now();
        fetch_loop.tick().await;
        assert!(start.elapsed() < GRACE_PERIOD);
        assert_eq!(store.read().unwrap().player_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_after_outage_is_still_guarded() {
        let store = Arc::new(SnapshotStore::new());
        let source = Scripted::new(vec![reading(5), Some(Snapshot::offline()), reading(0)]);
        let mut fetch_loop = FetchLoop::new(source, store.clone(), Duration::from_secs(20));

        fetch_loop.tick().await;
        fetch_loop.tick().await;
        assert!(store.read().unwrap().is_offline);

        let start = tokio::time::Instant::now();
        fetch_loop.tick().await;
        assert!(start.elapsed() >= GRACE_PERIOD);
        assert_eq!(store.read().unwrap().player_count, 5);
    }

    #[tokio::test]
    async fn panicking_fetch_keeps_previous_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let source = Scripted::new(vec![reading(12), None, reading(14)]);
        let mut fetch_loop = FetchLoop::new(source, store.clone(), Duration::from_secs(20));

        fetch_loop.tick().await;
        fetch_loop.tick().await;
        assert_eq!(store.read().unwrap().player_count, 12);
        fetch_loop.tick().await;
        assert_eq!(store.read().unwrap().player_count, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn run_keeps_polling_after_failures() {
        let store = Arc::new(SnapshotStore::new());
        let source = Scripted::new(vec![None, None, reading(7)]);
        let fetch_loop = FetchLoop::new(source, store.clone(), Duration::from_secs(20));
        let handle = tokio::spawn(fetch_loop.run());

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(store.read().unwrap().player_count, 7);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(store.read().unwrap().is_offline);
        handle.abort();
    }
}
