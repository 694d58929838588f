use rand::Rng;

use flashpoint_common::{
    FlashpointError, GeoPoint, Severity, Site, TimelineEvent, TimelineKind, Track, TrackKind,
    TrackStatus,
};

use crate::arc::arc;

/// Probability that a synthesized track targets the primary catalog.
/// The remainder goes to the secondary (coalition-base) catalog.
const PRIMARY_TARGET_P: f64 = 0.7;

/// Launch look-back stagger: track `i` launches roughly `i` hours ago,
/// plus up to one hour of jitter.
const STAGGER_MS: i64 = 3_600_000;
const JITTER_MS: i64 = 3_600_000;

/// Flight duration bounds: 10 to 20 minutes.
const MIN_FLIGHT_MS: i64 = 600_000;
const MAX_EXTRA_FLIGHT_MS: i64 = 600_000;

/// Interception entries: one every 30 minutes back from now.
const INTERCEPTION_COUNT: usize = 3;
const INTERCEPTION_SPACING_MS: i64 = 1_800_000;

/// Retaliation entries: spaced 45 minutes apart.
const RETALIATION_COUNT: usize = 2;
const RETALIATION_SPACING_MS: i64 = 2_700_000;

/// Named site catalogs the synthesizer draws from.
#[derive(Debug, Clone)]
pub struct SiteCatalog {
    pub launch_sites: Vec<Site>,
    pub primary_targets: Vec<Site>,
    pub secondary_targets: Vec<Site>,
}

/// The default simulation theater, mirroring the declared scenario:
/// launch sites in Iran, primary targets in Israel, secondary targets at
/// coalition air bases in the wider region.
pub fn default_catalog() -> SiteCatalog {
    SiteCatalog {
        launch_sites: vec![
            Site::new("Tehran missile base", 35.6892, 51.3890),
            Site::new("Isfahan missile facility", 32.6546, 51.6680),
            Site::new("Shiraz missile site", 29.5918, 52.5837),
            Site::new("Bushehr missile base", 28.9200, 50.8200),
            Site::new("Mashhad missile site", 36.2972, 59.6067),
        ],
        primary_targets: vec![
            Site::new("Tel Aviv", 32.0853, 34.7818),
            Site::new("Jerusalem", 31.7683, 35.2137),
            Site::new("Haifa", 32.7940, 34.9896),
            Site::new("Ben Gurion Airport", 32.0114, 34.8867),
            Site::new("Dimona nuclear facility", 31.0044, 34.8961),
            Site::new("Nevatim Air Base", 31.2767, 34.6236),
        ],
        secondary_targets: vec![
            Site::new("Al Dhafra Air Base (UAE)", 24.4331, 54.6511),
            Site::new("Al Udeid Air Base (Qatar)", 25.2731, 51.5086),
            Site::new("Kandahar Airfield (Afghanistan)", 31.5102, 65.7379),
        ],
    }
}

fn pick<'a, R: Rng>(rng: &mut R, sites: &'a [Site]) -> &'a Site {
    &sites[rng.random_range(0..sites.len())]
}

/// Generate `count` randomized strike tracks plus the auxiliary timeline
/// (launch entries, interceptions, retaliatory strikes), all internally
/// consistent with `now_ms`: impact time strictly exceeds launch time and
/// status reflects whether the flight window has elapsed.
///
/// Randomness is local to this call — the caller supplies the generator,
/// so tests can seed it.
pub fn synthesize<R: Rng>(
    catalog: &SiteCatalog,
    count: usize,
    arc_points: usize,
    now_ms: i64,
    rng: &mut R,
) -> Result<(Vec<Track>, Vec<TimelineEvent>), FlashpointError> {
    if catalog.launch_sites.is_empty()
        || catalog.primary_targets.is_empty()
        || catalog.secondary_targets.is_empty()
    {
        return Err(FlashpointError::Synthesis(
            "site catalog has an empty section".to_string(),
        ));
    }

    let mut tracks = Vec::with_capacity(count);
    let mut events = Vec::new();

    for i in 0..count {
        let launch_site = pick(rng, &catalog.launch_sites).clone();
        let primary = rng.random_bool(PRIMARY_TARGET_P);
        let target = if primary {
            pick(rng, &catalog.primary_targets).clone()
        } else {
            pick(rng, &catalog.secondary_targets).clone()
        };

        let launch_time_ms =
            now_ms - (i as i64) * STAGGER_MS - rng.random_range(0..JITTER_MS);
        let flight_ms = MIN_FLIGHT_MS + rng.random_range(0..=MAX_EXTRA_FLIGHT_MS);
        let impact_time_ms = launch_time_ms + flight_ms;

        let status = if now_ms > impact_time_ms {
            TrackStatus::Impacted
        } else {
            TrackStatus::InFlight
        };
        let progress = match status {
            TrackStatus::Impacted => 100.0,
            TrackStatus::InFlight => {
                let elapsed = (now_ms - launch_time_ms).max(0) as f32;
                (elapsed / flight_ms as f32 * 100.0).clamp(0.0, 100.0)
            }
        };

        let path = arc(launch_site.point, target.point, arc_points);

        events.push(TimelineEvent {
            id: format!("evt-{i}"),
            kind: if primary {
                TimelineKind::Missile
            } else {
                TimelineKind::Rocket
            },
            title: format!("{} launched a strike toward {}", launch_site.name, target.name),
            location: target.point,
            time_ms: launch_time_ms,
            severity: if primary {
                Severity::Critical
            } else {
                Severity::High
            },
        });

        tracks.push(Track {
            id: format!("trk-{i}"),
            kind: if primary {
                TrackKind::Strike
            } else {
                TrackKind::Rocket
            },
            origin: launch_site,
            destination: target,
            path,
            launch_time_ms,
            impact_time_ms: Some(impact_time_ms),
            status,
            progress,
        });
    }

    for i in 0..INTERCEPTION_COUNT {
        events.push(TimelineEvent {
            id: format!("int-{i}"),
            kind: TimelineKind::Interception,
            title: "Air defense interception reported".to_string(),
            location: GeoPoint {
                lat: 32.0 + rng.random::<f64>() * 2.0,
                lon: 34.5 + rng.random::<f64>() * 2.0,
            },
            time_ms: now_ms - (i as i64) * INTERCEPTION_SPACING_MS,
            severity: Severity::Success,
        });
    }

    for i in 0..RETALIATION_COUNT {
        events.push(TimelineEvent {
            id: format!("ret-{i}"),
            kind: TimelineKind::Retaliation,
            title: "Retaliatory strike reported".to_string(),
            location: GeoPoint {
                lat: 29.0 + rng.random::<f64>() * 7.0,
                lon: 48.0 + rng.random::<f64>() * 10.0,
            },
            time_ms: now_ms - (i as i64) * RETALIATION_SPACING_MS - rng.random_range(0..JITTER_MS),
            severity: Severity::High,
        });
    }

    events.sort_by(|a, b| b.time_ms.cmp(&a.time_ms));

    Ok((tracks, events))
}

/// Reset a batch to a fresh launch at `now_ms`, preserving each track's
/// flight window. The animation loop uses this so a new batch starts in
/// flight instead of hours in the past, where the staggered look-back
/// launch times would leave most tracks already impacted at birth.
pub fn relaunch(tracks: &mut [Track], now_ms: i64) {
    for track in tracks.iter_mut() {
        let flight_ms = track
            .impact_time_ms
            .map_or(MIN_FLIGHT_MS, |impact| impact - track.launch_time_ms);
        track.launch_time_ms = now_ms;
        track.impact_time_ms = Some(now_ms + flight_ms);
        track.status = TrackStatus::InFlight;
        track.progress = 0.0;
    }
}
