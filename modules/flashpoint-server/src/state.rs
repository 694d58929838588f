use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use flashpoint_feed::{PendingGuard, SourceAdapter, Translator};
use flashpoint_sim::SimSnapshot;

pub struct AppState {
    pub adapters: Vec<Arc<dyn SourceAdapter>>,
    pub feed_cap: usize,
    pub fetch_timeout: Duration,
    pub arc_points: usize,
    pub batch_size: usize,
    pub translator: Arc<dyn Translator>,
    pub pending: PendingGuard,
    /// Read side of the simulation loop's published frames.
    pub sim: watch::Receiver<SimSnapshot>,
}
