// src/monitor/smoothing.rs
use std::time::Duration;
use crate::models::snapshot::Snapshot;

/// How long a sudden drop to zero players is held back before the stale count goes out.
pub const GRACE_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Smoothed {
    /// Publish right away.
    Publish(Snapshot),
    /// Wait out the grace period, then publish this snapshot carrying the previous count.
    Defer(Snapshot),
}

/// One-shot zero suppression. A zero reading is replaced by the previous count only
/// when the raw reading right before it was nonzero; a second zero in a row goes
/// out as zero. Offline readings are never held back and leave the last successful
/// count in place, so a zero right after an outage is still guarded.
#[derive(Debug, Default)]
pub struct ZeroSmoother {
    previous: Option<u32>,
}

impl ZeroSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, reading: Snapshot) -> Smoothed {
        if reading.is_offline {
            return Smoothed::Publish(reading);
        }

        match self.previous.replace(reading.player_count) {
            Some(previous) if previous > 0 && reading.player_count == 0 => {
                Smoothed::Defer(reading.with_player_count(previous))
            }
            _ => Smoothed::Publish(reading),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(players: u32) -> Snapshot {
        Snapshot::online(players, 64, 0, "Zavod 311".into())
    }

    fn published_counts(smoother: &mut ZeroSmoother, counts: &[u32]) -> Vec<(u32, bool)> {
        counts
            .iter()
            .map(|&c| match smoother.apply(reading(c)) {
                Smoothed::Publish(s) => (s.player_count, false),
                Smoothed::Defer(s) => (s.player_count, true),
            })
            .collect()
    }

    #[test]
    fn first_zero_after_nonzero_is_deferred() {
        let mut smoother = ZeroSmoother::new();
        assert_eq!(
            published_counts(&mut smoother, &[5, 5, 0, 0]),
            vec![(5, false), (5, false), (5, true), (0, false)]
        );
    }

    #[test]
    fn zero_from_the_start_is_published() {
        let mut smoother = ZeroSmoother::new();
        assert_eq!(
            published_counts(&mut smoother, &[0, 0, 3]),
            vec![(0, false), (0, false), (3, false)]
        );
    }

    #[test]
    fn every_transition_into_zero_is_guarded() {
        let mut smoother = ZeroSmoother::new();
        assert_eq!(
            published_counts(&mut smoother, &[8, 0, 8, 0, 0]),
            vec![(8, false), (8, true), (8, false), (8, true), (0, false)]
        );
    }

    #[test]
    fn deferred_snapshot_is_reclassified() {
        let mut smoother = ZeroSmoother::new();
        smoother.apply(reading(60));
        match smoother.apply(reading(0)) {
            Smoothed::Defer(s) => {
                assert_eq!(s.player_count, 60);
                assert_eq!(s.occupancy, crate::models::snapshot::Occupancy::High);
            }
            other => panic!("expected a deferred snapshot, got {:?}", other),
        }
    }

    #[test]
    fn zero_after_outage_uses_last_successful_count() {
        let mut smoother = ZeroSmoother::new();
        smoother.apply(reading(5));
        assert_eq!(smoother.apply(Snapshot::offline()), Smoothed::Publish(Snapshot::offline()));
        assert_eq!(smoother.apply(reading(0)), Smoothed::Defer(reading(5)));
        assert_eq!(smoother.apply(reading(0)), Smoothed::Publish(reading(0)));
    }

    #[test]
    fn outage_after_empty_server_publishes_zero() {
        let mut smoother = ZeroSmoother::new();
        smoother.apply(reading(0));
        smoother.apply(Snapshot::offline());
        assert_eq!(smoother.apply(reading(0)), Smoothed::Publish(reading(0)));
    }
}
