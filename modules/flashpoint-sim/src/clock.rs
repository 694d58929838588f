use serde::{Deserialize, Serialize};
use tracing::debug;

use flashpoint_common::{AftermathMarker, Track, TrackStatus};

/// Advances per-track progress on a fixed cadence and manages the
/// short-lived aftermath markers. The clock is the sole mutator of the
/// track and marker collections — the driving loop owns both and calls
/// `tick` from a single task.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Progress added to every in-flight track per tick, in percent.
    pub step: f32,
    /// Lifetime of an aftermath marker.
    pub marker_ttl_ms: i64,
}

impl SimulationClock {
    pub fn new(step: f32, marker_ttl_ms: i64) -> Self {
        Self {
            step,
            marker_ttl_ms,
        }
    }

    /// One animation tick: advance progress, flip freshly-completed tracks
    /// to impacted (emitting exactly one marker each), prune expired
    /// markers. Impacted tracks are terminal — subsequent ticks leave them
    /// untouched and never re-emit.
    pub fn tick(&self, tracks: &mut [Track], markers: &mut Vec<AftermathMarker>, now_ms: i64) {
        for track in tracks.iter_mut() {
            if track.status != TrackStatus::InFlight {
                continue;
            }
            track.progress = (track.progress + self.step).min(100.0);
            if track.progress >= 100.0 {
                track.status = TrackStatus::Impacted;
                if track.impact_time_ms.is_none() {
                    track.impact_time_ms = Some(now_ms);
                }
                debug!(track = %track.id, target = %track.destination.name, "Track impacted");
                markers.push(AftermathMarker {
                    id: format!("aft-{}", track.id),
                    location: track.destination.point,
                    created_at_ms: now_ms,
                    ttl_ms: self.marker_ttl_ms,
                });
            }
        }

        markers.retain(|m| m.is_live(now_ms));
    }
}

/// One published frame of the simulation, consumed by SSE subscribers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSnapshot {
    pub tick: u64,
    pub tracks: Vec<Track>,
    pub markers: Vec<AftermathMarker>,
    pub updated_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashpoint_common::{Site, TrackKind};

    fn track(id: &str, progress: f32) -> Track {
        let origin = Site::new("Tehran missile base", 35.6892, 51.3890);
        let destination = Site::new("Tel Aviv", 32.0853, 34.7818);
        Track {
            id: id.to_string(),
            kind: TrackKind::Strike,
            origin,
            destination,
            path: Vec::new(),
            launch_time_ms: 0,
            impact_time_ms: Some(1_200_000),
            status: TrackStatus::InFlight,
            progress,
        }
    }

    #[test]
    fn progress_is_monotone_until_impact() {
        let clock = SimulationClock::new(7.0, 60_000);
        let mut tracks = vec![track("trk-0", 0.0)];
        let mut markers = Vec::new();

        let mut last = 0.0;
        for tick_no in 0..20 {
            clock.tick(&mut tracks, &mut markers, tick_no * 1_000);
            assert!(tracks[0].progress >= last);
            last = tracks[0].progress;
        }
        assert_eq!(tracks[0].status, TrackStatus::Impacted);
        assert_eq!(tracks[0].progress, 100.0);
    }

    #[test]
    fn exactly_one_marker_per_impact() {
        let clock = SimulationClock::new(2.0, 3_600_000);
        let mut tracks = vec![track("trk-0", 99.0)];
        let mut markers = Vec::new();

        clock.tick(&mut tracks, &mut markers, 1_000);
        assert_eq!(tracks[0].status, TrackStatus::Impacted);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "aft-trk-0");
        assert_eq!(markers[0].location, tracks[0].destination.point);

        // Idempotent: later ticks must not re-emit
        clock.tick(&mut tracks, &mut markers, 2_000);
        clock.tick(&mut tracks, &mut markers, 3_000);
        assert_eq!(markers.len(), 1);
        assert_eq!(tracks[0].progress, 100.0);
    }

    #[test]
    fn markers_are_pruned_after_ttl() {
        let clock = SimulationClock::new(2.0, 5_000);
        let mut tracks = vec![track("trk-0", 99.5)];
        let mut markers = Vec::new();

        clock.tick(&mut tracks, &mut markers, 10_000);
        assert_eq!(markers.len(), 1);

        clock.tick(&mut tracks, &mut markers, 14_999);
        assert_eq!(markers.len(), 1);

        clock.tick(&mut tracks, &mut markers, 15_000);
        assert!(markers.is_empty());
    }

    #[test]
    fn live_marker_set_matches_ttl_window() {
        let clock = SimulationClock::new(50.0, 4_000);
        let mut tracks = vec![track("trk-0", 99.0), track("trk-1", 10.0)];
        let mut markers = Vec::new();

        clock.tick(&mut tracks, &mut markers, 0); // trk-0 impacts at t=0
        clock.tick(&mut tracks, &mut markers, 1_000); // trk-1 impacts at t=1s
        clock.tick(&mut tracks, &mut markers, 2_000);

        assert_eq!(markers.len(), 2);
        for m in &markers {
            assert!(2_000 - m.created_at_ms < m.ttl_ms);
        }

        clock.tick(&mut tracks, &mut markers, 4_000); // trk-0 marker expires
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "aft-trk-1");
    }
}
