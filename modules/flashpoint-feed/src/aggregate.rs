use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use flashpoint_common::Event;

use crate::dedup::dedupe;
use crate::normalize::normalize;
use crate::sources::SourceAdapter;

/// Fan out to all adapters concurrently, merge in adapter order, dedupe,
/// sort descending by timestamp and truncate to `cap`.
///
/// Adapter failures are independent: a slow or failing origin contributes
/// zero records for this cycle and never blocks its siblings beyond its
/// own timeout budget. There is no retry here — the caller re-invokes on
/// its own refresh cadence.
pub async fn aggregate(
    adapters: &[Arc<dyn SourceAdapter>],
    cap: usize,
    timeout: Duration,
) -> Vec<Event> {
    let started = Utc::now();

    let fetches = adapters.iter().map(|adapter| {
        let adapter = adapter.clone();
        async move {
            let result = adapter.fetch(timeout).await;
            (adapter, result)
        }
    });
    let results = join_all(fetches).await;

    // Single-writer merge, in adapter order, after all fetches resolved
    let mut events = Vec::new();
    for (adapter, result) in results {
        match result {
            Ok(records) => {
                for record in records {
                    if let Some(ev) =
                        normalize(record, adapter.origin(), adapter.keywords(), started)
                    {
                        events.push(ev);
                    }
                }
            }
            Err(e) => {
                warn!(origin = %e.origin, error = %e, "Adapter failed, contributing zero records");
            }
        }
    }

    let merged = events.len();
    let mut events = dedupe(events);
    // Stable sort: equal timestamps keep source fetch order
    events.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    events.truncate(cap);

    info!(
        merged,
        kept = events.len(),
        adapters = adapters.len(),
        "Aggregation cycle complete"
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flashpoint_common::{FetchError, Origin};

    use crate::sources::RawRecord;

    struct StubAdapter {
        origin: Origin,
        records: Vec<RawRecord>,
        delay: Duration,
    }

    impl StubAdapter {
        fn new(origin: Origin, records: Vec<RawRecord>) -> Self {
            Self {
                origin,
                records,
                delay: Duration::ZERO,
            }
        }

        fn slow(origin: Origin, records: Vec<RawRecord>, delay: Duration) -> Self {
            Self {
                origin,
                records,
                delay,
            }
        }
    }

    #[async_trait]
    impl SourceAdapter for StubAdapter {
        fn origin(&self) -> Origin {
            self.origin
        }

        fn keywords(&self) -> &[String] {
            &[]
        }

        async fn fetch(&self, timeout: Duration) -> Result<Vec<RawRecord>, FetchError> {
            match tokio::time::timeout(timeout, tokio::time::sleep(self.delay)).await {
                Ok(_) => Ok(self.records.clone()),
                Err(_) => Err(FetchError::timeout(self.origin)),
            }
        }
    }

    fn record(title: &str, url: &str, published: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            url: url.to_string(),
            description: None,
            published: published.map(str::to_string),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn merges_dedupes_sorts_and_caps() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StubAdapter::new(
                Origin::Reuters,
                vec![
                    record("Iran confirms missile strike on air base in the south", "https://r.example/1", Some("Sun, 23 Aug 2026 09:00:00 GMT")),
                    record("Oil jumps four percent", "https://r.example/2", Some("Sun, 23 Aug 2026 11:00:00 GMT")),
                ],
            )),
            Arc::new(StubAdapter::new(
                Origin::Bbc,
                vec![
                    // Same story, same 50-char prefix — must lose to Reuters
                    record("Iran confirms missile strike on air base in the south of the country", "https://b.example/1", Some("Sun, 23 Aug 2026 10:00:00 GMT")),
                    record("Ceasefire talks resume", "https://b.example/2", Some("Sun, 23 Aug 2026 08:00:00 GMT")),
                ],
            )),
        ];

        let events = aggregate(&adapters, 30, Duration::from_secs(5)).await;

        assert_eq!(events.len(), 3);
        // Sorted descending by timestamp
        assert_eq!(events[0].url, "https://r.example/2");
        assert_eq!(events[1].url, "https://r.example/1");
        assert_eq!(events[2].url, "https://b.example/2");
        // First-fetched source owns the duplicated story
        assert_eq!(events[1].source, Origin::Reuters);

        let capped = aggregate(&adapters, 2, Duration::from_secs(5)).await;
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_adapter_contributes_nothing_and_adds_no_delay() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StubAdapter::slow(
                Origin::Gdelt,
                vec![record("never arrives", "https://g.example/1", None)],
                Duration::from_secs(3600),
            )),
            Arc::new(StubAdapter::new(
                Origin::Bbc,
                vec![record("Healthy source still reports", "https://b.example/1", None)],
            )),
        ];

        let before = tokio::time::Instant::now();
        let events = aggregate(&adapters, 30, Duration::from_secs(2)).await;
        let elapsed = before.elapsed();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, Origin::Bbc);
        // The batch completes once the slow adapter hits its own budget,
        // not after its full 1h sleep
        assert!(elapsed <= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn all_adapters_failing_yields_empty_feed() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(StubAdapter::slow(
            Origin::Reuters,
            vec![],
            Duration::from_secs(3600),
        ))];
        let events = aggregate(&adapters, 30, Duration::from_millis(100)).await;
        assert!(events.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn equal_timestamps_keep_fetch_order() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StubAdapter::new(
                Origin::Reuters,
                vec![record("First story", "https://r.example/1", Some("Sun, 23 Aug 2026 10:00:00 GMT"))],
            )),
            Arc::new(StubAdapter::new(
                Origin::Bbc,
                vec![record("Second story", "https://b.example/1", Some("Sun, 23 Aug 2026 10:00:00 GMT"))],
            )),
        ];
        let events = aggregate(&adapters, 30, Duration::from_secs(5)).await;
        assert_eq!(events[0].source, Origin::Reuters);
        assert_eq!(events[1].source, Origin::Bbc);
    }
}
