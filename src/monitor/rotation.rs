// src/monitor/rotation.rs
use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info};
use crate::models::snapshot::{DisplayMode, Occupancy};
use crate::presence::PresenceSink;
use crate::storage::memory::SnapshotStore;

/// Wait between store checks until the first snapshot arrives.
pub const NOT_READY_WAIT: Duration = Duration::from_secs(10);

pub struct PresenceRotator {
    store: Arc<SnapshotStore>,
    sink: Arc<dyn PresenceSink>,
    check_map: bool,
    rotation_interval: Duration,
    fetch_interval: Duration,
    mode: DisplayMode,
    last_announced: Option<String>,
}

impl PresenceRotator {
    pub fn new(
        store: Arc<SnapshotStore>,
        sink: Arc<dyn PresenceSink>,
        check_map: bool,
        rotation_interval: Duration,
        fetch_interval: Duration,
    ) -> Self {
        Self {
            store,
            sink,
            check_map,
            rotation_interval,
            fetch_interval,
            mode: DisplayMode::Players,
            last_announced: None,
        }
    }

    /// Shows the current mode's text and advances the mode. Returns how long to wait
    /// before the next step.
    pub async fn step(&mut self) -> Duration {
        let Some(snapshot) = self.store.read() else {
            debug!("No server status yet, waiting {:?}", NOT_READY_WAIT);
            return NOT_READY_WAIT;
        };

        let text = snapshot.text_for(self.mode);
        self.announce(text, snapshot.occupancy, self.mode).await;

        if !self.check_map {
            return self.fetch_interval;
        }
        self.mode = match self.mode {
            DisplayMode::Players => DisplayMode::Map,
            DisplayMode::Map => DisplayMode::Players,
        };
        self.rotation_interval
    }

    async fn announce(&mut self, text: String, occupancy: Occupancy, mode: DisplayMode) {
        if self.last_announced.as_deref() == Some(text.as_str()) {
            debug!("Presence unchanged: {:?}", text);
            return;
        }

        match self.sink.set_presence(&text, occupancy, mode).await {
            Ok(()) => {
                debug!("Presence set via {}: {:?}", self.sink.name(), text);
                self.last_announced = Some(text);
            }
            // not remembered, so the next step retries the same text
            Err(e) => error!("Failed to set presence {:?} via {}: {}", text, self.sink.name(), e),
        }
    }

    pub async fn run(mut self) {
        info!(
            "Presence rotation started (map rotation {}, interval {:?})",
            if self.check_map { "on" } else { "off" },
            self.rotation_interval
        );
        loop {
            let wait = self.step().await;
            tokio::time::sleep(wait).await;
        }
    }
}
