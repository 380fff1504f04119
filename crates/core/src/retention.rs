//! Artifact retention - the 24-hour expiry horizon and the sweep over an
//! external artifact store.
//!
//! The core never deletes anything on its own schedule (no per-file
//! timers); it produces timestamps and a sweep routine that an external
//! cron-style caller runs against whatever store holds the drafts.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::Result;

/// How long generated artifacts (uploads and outputs) are retained.
pub fn artifact_ttl() -> Duration {
    Duration::hours(24)
}

/// Store listing page size for the sweep.
pub const SWEEP_BATCH_LIMIT: usize = 100;

/// Expiry timestamp for an artifact created at `created_at`.
pub fn expires_at(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + artifact_ttl()
}

/// Whether an artifact uploaded at `uploaded_at` is past the retention
/// horizon at `now`.
pub fn is_expired(uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    uploaded_at < now - artifact_ttl()
}

/// One stored artifact, as reported by the store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMeta {
    /// Store-specific key (blob URL, file path, object key).
    pub key: String,
    pub uploaded_at: DateTime<Utc>,
}

/// One page of a store listing.
#[derive(Debug, Clone, Default)]
pub struct SweepPage {
    pub artifacts: Vec<ArtifactMeta>,
    /// Opaque continuation token; `None` means the listing is complete.
    pub cursor: Option<String>,
}

/// The storage collaborator's listing and bulk-delete surface.
pub trait ArtifactStore {
    fn list(&self, cursor: Option<&str>, limit: usize) -> Result<SweepPage>;
    fn delete(&self, keys: &[String]) -> Result<()>;
}

/// Outcome of one sweep run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Artifacts seen across all listing pages.
    pub checked: usize,
    /// Artifacts deleted.
    pub deleted: usize,
    /// Messages from delete batches that failed.
    pub errors: Vec<String>,
}

/// Delete every expired artifact in the store.
///
/// Paginates the listing and bulk-deletes each page's stale entries. A
/// failed delete batch is recorded and the sweep continues; only a
/// failed listing aborts the run.
pub fn sweep_expired(store: &dyn ArtifactStore, now: DateTime<Utc>) -> Result<SweepReport> {
    let mut report = SweepReport::default();
    let mut cursor: Option<String> = None;

    loop {
        let page = store.list(cursor.as_deref(), SWEEP_BATCH_LIMIT)?;
        report.checked += page.artifacts.len();

        let stale: Vec<String> = page
            .artifacts
            .into_iter()
            .filter(|artifact| is_expired(artifact.uploaded_at, now))
            .map(|artifact| artifact.key)
            .collect();

        if !stale.is_empty() {
            match store.delete(&stale) {
                Ok(()) => report.deleted += stale.len(),
                Err(err) => {
                    warn!(batch = stale.len(), %err, "sweep delete batch failed");
                    report.errors.push(err.to_string());
                }
            }
        }

        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(
        checked = report.checked,
        deleted = report.deleted,
        errors = report.errors.len(),
        "retention sweep finished"
    );
    Ok(report)
}
