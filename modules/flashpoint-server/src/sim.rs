use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tracing::{error, info};

use flashpoint_common::{Config, TrackStatus};
use flashpoint_sim::{default_catalog, relaunch, synthesize, SimSnapshot, SimulationClock};

/// Spawn the single-owner simulation loop. The task owns the track and
/// marker collections outright; everyone else observes through the watch
/// channel, so no locking is needed around the mutation.
pub fn spawn_simulation(config: &Config) -> watch::Receiver<SimSnapshot> {
    let (tx, rx) = watch::channel(SimSnapshot::default());

    let clock = SimulationClock::new(config.progress_step, config.marker_ttl_ms);
    let tick_interval = config.tick_interval;
    let arc_points = config.arc_points;
    let batch_size = config.batch_size;

    tokio::spawn(async move {
        let catalog = default_catalog();
        // ThreadRng is !Send; this task holds the generator across awaits
        let mut rng = StdRng::from_os_rng();
        let now_ms = Utc::now().timestamp_millis();
        let (mut tracks, _) = match synthesize(&catalog, batch_size, arc_points, now_ms, &mut rng)
        {
            Ok(batch) => batch,
            Err(e) => {
                error!(error = %e, "Initial synthesis failed, simulation loop not started");
                return;
            }
        };
        relaunch(&mut tracks, now_ms);
        let mut markers = Vec::new();
        let mut interval = tokio::time::interval(tick_interval);
        let mut tick = 0u64;

        info!(batch = tracks.len(), "Simulation loop started");

        loop {
            interval.tick().await;
            let now_ms = Utc::now().timestamp_millis();
            clock.tick(&mut tracks, &mut markers, now_ms);

            // Once the whole batch has impacted and every marker has aged
            // out, a fresh batch supersedes it. Relaunching anchors the new
            // batch at now, otherwise its staggered look-back launch times
            // would leave it mostly impacted at birth and the supersede
            // condition would fire again on the very next tick.
            if markers.is_empty()
                && tracks.iter().all(|t| t.status == TrackStatus::Impacted)
            {
                match synthesize(&catalog, batch_size, arc_points, now_ms, &mut rng) {
                    Ok((mut next, _)) => {
                        relaunch(&mut next, now_ms);
                        info!(batch = next.len(), "Superseding impacted batch");
                        tracks = next;
                    }
                    Err(e) => error!(error = %e, "Batch synthesis failed, keeping old batch"),
                }
            }

            tick += 1;
            let _ = tx.send(SimSnapshot {
                tick,
                tracks: tracks.clone(),
                markers: markers.clone(),
                updated_ms: now_ms,
            });
        }
    });

    rx
}
