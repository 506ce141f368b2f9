use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::models::TleRecord;

#[derive(Debug, Default)]
struct Slot {
    records: Arc<Vec<TleRecord>>,
    fetched_at: Option<Instant>,
}

/// Single-slot TLE cache invalidated purely by age.
///
/// An empty record list is never considered fresh, so a fetch that found
/// nothing is retried on the next request.
#[derive(Debug)]
pub struct TleCache {
    ttl: Duration,
    slot: RwLock<Slot>,
}

impl TleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(Slot::default()),
        }
    }

    /// Cached records if non-empty and younger than the TTL at `now`
    pub async fn fresh(&self, now: Instant) -> Option<Arc<Vec<TleRecord>>> {
        let slot = self.slot.read().await;
        let fetched_at = slot.fetched_at?;

        let age = now.saturating_duration_since(fetched_at);
        if slot.records.is_empty() || age >= self.ttl {
            return None;
        }

        Some(Arc::clone(&slot.records))
    }

    pub async fn store(&self, records: Vec<TleRecord>, now: Instant) -> Arc<Vec<TleRecord>> {
        let records = Arc::new(records);
        let mut slot = self.slot.write().await;
        slot.records = Arc::clone(&records);
        slot.fetched_at = Some(now);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satellites::models::SatelliteCategory;

    fn record() -> TleRecord {
        TleRecord {
            name: "ISS (ZARYA)".to_string(),
            line1: "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992".to_string(),
            line2: "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008".to_string(),
            category: SatelliteCategory::SpaceStation,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_is_stale() {
        let cache = TleCache::new(Duration::from_secs(3600));
        assert!(cache.fresh(Instant::now()).await.is_none());
    }

    #[tokio::test]
    async fn test_fresh_within_ttl() {
        let cache = TleCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        cache.store(vec![record()], start).await;

        let hit = cache.fresh(start + Duration::from_secs(3599)).await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "ISS (ZARYA)");
    }

    #[tokio::test]
    async fn test_stale_at_ttl() {
        let cache = TleCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        cache.store(vec![record()], start).await;

        assert!(cache.fresh(start + Duration::from_secs(3600)).await.is_none());
        assert!(cache.fresh(start + Duration::from_secs(7200)).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_result_is_not_fresh() {
        let cache = TleCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        cache.store(Vec::new(), start).await;

        assert!(cache.fresh(start).await.is_none());
    }
}
