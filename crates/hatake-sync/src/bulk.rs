//! Bulk operation coordinator.
//!
//! Fans a batch of entry mutations out through the synchronizer with
//! bounded parallelism. Bulk operations are never all-or-nothing: each
//! entry syncs independently and one failure never blocks the rest.
//! Repeated entry ids are deduplicated before dispatch, keeping only
//! the latest-versioned mutation per id.

use crate::raw::RawCollectionEntry;
use crate::synchronizer::{SyncOutcome, Synchronizer};
use futures_util::stream::{self, StreamExt};
use hatake_core::EntryId;
use hatake_telemetry::metrics;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Outcome of one batch item, in batch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkItem {
    /// Position in the submitted batch.
    pub index: usize,
    /// Parsed entry id, when the payload carried one.
    pub entry_id: Option<EntryId>,
    pub outcome: SyncOutcome,
}

/// Aggregate counts for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub applied: usize,
    pub skipped_stale: usize,
    pub rejected: usize,
}

/// Per-item outcomes plus the aggregate summary. Never a single
/// pass/fail verdict for the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkReport {
    pub items: Vec<BulkItem>,
    pub summary: BulkSummary,
}

impl BulkReport {
    pub fn outcome_for(&self, entry_id: EntryId) -> Option<&SyncOutcome> {
        self.items
            .iter()
            .find(|item| item.entry_id == Some(entry_id))
            .map(|item| &item.outcome)
    }
}

/// Sequences a batch of entry mutations through the synchronizer.
pub struct BulkCoordinator {
    synchronizer: Arc<Synchronizer>,
    parallelism: usize,
}

impl BulkCoordinator {
    pub fn new(synchronizer: Arc<Synchronizer>, parallelism: usize) -> Self {
        Self {
            synchronizer,
            parallelism: parallelism.max(1),
        }
    }

    /// Sync every entry in the batch, waiting for all outcomes.
    pub async fn sync_many(&self, batch: Vec<RawCollectionEntry>) -> BulkReport {
        // Latest version wins within the batch; superseded duplicates
        // are reported as stale without being dispatched.
        let mut winner_by_id: HashMap<EntryId, (usize, u64)> = HashMap::new();
        let mut parsed_ids: Vec<Option<EntryId>> = Vec::with_capacity(batch.len());
        for (index, raw) in batch.iter().enumerate() {
            let id = raw.id.as_deref().and_then(|s| s.parse::<EntryId>().ok());
            parsed_ids.push(id);
            if let Some(id) = id {
                let version = raw.updated_at_ms.unwrap_or(0);
                match winner_by_id.get(&id) {
                    Some(&(_, best)) if best >= version => {}
                    _ => {
                        winner_by_id.insert(id, (index, version));
                    }
                }
            }
        }

        let mut superseded = Vec::new();
        let mut dispatch = Vec::new();
        for (index, raw) in batch.into_iter().enumerate() {
            match parsed_ids[index] {
                Some(id) if winner_by_id[&id].0 != index => {
                    superseded.push(BulkItem {
                        index,
                        entry_id: Some(id),
                        outcome: SyncOutcome::SkippedStale,
                    });
                }
                entry_id => dispatch.push((index, entry_id, raw)),
            }
        }

        metrics::BULK_BATCH_SIZE.observe(dispatch.len() as f64);

        let synced = stream::iter(dispatch)
            .map(|(index, entry_id, raw)| {
                let synchronizer = Arc::clone(&self.synchronizer);
                async move {
                    let outcome = synchronizer.sync(raw).await;
                    BulkItem {
                        index,
                        entry_id,
                        outcome,
                    }
                }
            })
            .buffer_unordered(self.parallelism)
            .collect::<Vec<_>>()
            .await;

        let mut items = superseded;
        items.extend(synced);
        items.sort_by_key(|item| item.index);

        let mut summary = BulkSummary::default();
        for item in &items {
            match item.outcome {
                SyncOutcome::Applied => summary.applied += 1,
                SyncOutcome::SkippedStale => summary.skipped_stale += 1,
                SyncOutcome::Rejected(_) => summary.rejected += 1,
            }
        }

        info!(
            total = items.len(),
            applied = summary.applied,
            skipped_stale = summary.skipped_stale,
            rejected = summary.rejected,
            "bulk sync finished"
        );

        BulkReport { items, summary }
    }
}
