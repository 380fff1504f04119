//! Tests for the retention horizon and the paginated expiry sweep.

use std::sync::Mutex;

use chrono::{Duration, TimeZone, Utc};
use rubrica_core::error::SignError;
use rubrica_core::retention::{
    ArtifactMeta, ArtifactStore, SWEEP_BATCH_LIMIT, SweepPage, expires_at, is_expired,
    sweep_expired,
};

fn at_hour(hour: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
}

// ============================================================================
// Horizon math
// ============================================================================

#[test]
fn test_expiry_is_24_hours_out() {
    assert_eq!(expires_at(at_hour(0)), at_hour(24));
}

#[test]
fn test_is_expired_boundary() {
    let now = at_hour(48);
    assert!(is_expired(at_hour(0), now)); // 48h old
    assert!(is_expired(at_hour(23), now)); // 25h old
    assert!(!is_expired(at_hour(24), now)); // exactly 24h old: kept
    assert!(!is_expired(at_hour(40), now)); // 8h old
}

// ============================================================================
// Sweep
// ============================================================================

/// Paginated fake store; optionally fails deletes for keys with a marker.
struct FakeStore {
    artifacts: Vec<ArtifactMeta>,
    deleted: Mutex<Vec<String>>,
    fail_marker: Option<&'static str>,
    lists_served: Mutex<usize>,
}

impl FakeStore {
    fn new(artifacts: Vec<ArtifactMeta>) -> Self {
        Self {
            artifacts,
            deleted: Mutex::new(Vec::new()),
            fail_marker: None,
            lists_served: Mutex::new(0),
        }
    }
}

impl ArtifactStore for FakeStore {
    fn list(&self, cursor: Option<&str>, limit: usize) -> rubrica_core::Result<SweepPage> {
        *self.lists_served.lock().unwrap() += 1;
        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (start + limit).min(self.artifacts.len());
        Ok(SweepPage {
            artifacts: self.artifacts[start..end].to_vec(),
            cursor: (end < self.artifacts.len()).then(|| end.to_string()),
        })
    }

    fn delete(&self, keys: &[String]) -> rubrica_core::Result<()> {
        if let Some(marker) = self.fail_marker {
            if keys.iter().any(|key| key.contains(marker)) {
                return Err(SignError::InvalidPayload("delete refused".into()));
            }
        }
        self.deleted.lock().unwrap().extend(keys.iter().cloned());
        Ok(())
    }
}

fn artifact(key: &str, uploaded_hour: i64) -> ArtifactMeta {
    ArtifactMeta {
        key: key.to_string(),
        uploaded_at: at_hour(uploaded_hour),
    }
}

#[test]
fn test_sweep_deletes_only_stale_artifacts() {
    let store = FakeStore::new(vec![
        artifact("stale_a", 0),
        artifact("fresh_a", 40),
        artifact("stale_b", 10),
        artifact("fresh_b", 47),
    ]);

    let report = sweep_expired(&store, at_hour(48)).unwrap();
    assert_eq!(report.checked, 4);
    assert_eq!(report.deleted, 2);
    assert!(report.errors.is_empty());

    let deleted = store.deleted.lock().unwrap().clone();
    assert_eq!(deleted, vec!["stale_a".to_string(), "stale_b".to_string()]);
}

#[test]
fn test_sweep_paginates_through_the_whole_store() {
    // 250 artifacts, all stale: 3 listing pages at the batch limit
    let artifacts = (0..250)
        .map(|i| artifact(&format!("draft_{i:03}"), 0))
        .collect();
    let store = FakeStore::new(artifacts);

    let report = sweep_expired(&store, at_hour(48)).unwrap();
    assert_eq!(report.checked, 250);
    assert_eq!(report.deleted, 250);
    assert_eq!(*store.lists_served.lock().unwrap(), 250 / SWEEP_BATCH_LIMIT + 1);
}

#[test]
fn test_sweep_records_failed_batches_and_continues() {
    // first page's batch fails, later pages still get deleted
    let mut artifacts: Vec<ArtifactMeta> = (0..SWEEP_BATCH_LIMIT)
        .map(|i| artifact(&format!("poison_{i:03}"), 0))
        .collect();
    artifacts.extend((0..50).map(|i| artifact(&format!("plain_{i:03}"), 0)));
    let mut store = FakeStore::new(artifacts);
    store.fail_marker = Some("poison");

    let report = sweep_expired(&store, at_hour(48)).unwrap();
    assert_eq!(report.checked, SWEEP_BATCH_LIMIT + 50);
    assert_eq!(report.deleted, 50);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_sweep_of_empty_store() {
    let store = FakeStore::new(Vec::new());
    let report = sweep_expired(&store, at_hour(48)).unwrap();
    assert_eq!(report.checked, 0);
    assert_eq!(report.deleted, 0);
}
