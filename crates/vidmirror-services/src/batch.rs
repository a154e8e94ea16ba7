//! Batch driver
//!
//! Runs a list of ids through the orchestrator sequentially, capturing each
//! failure instead of aborting the run, and produces a summary suitable for
//! both the final log line and `--save-results` JSON output.

use serde::Serialize;
use tracing::{error, info};

use vidmirror_core::models::PlaylistRecord;

use crate::orchestrator::{MirrorOptions, MirrorOrchestrator, MirrorOutcome};

/// Terminal status of one batch item.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Downloaded,
    Skipped,
    Failed { reason: String },
}

/// One id's result inside a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub id: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// Aggregate counts plus per-item results for a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<ItemResult>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Sequential batch runner over a [`MirrorOrchestrator`].
pub struct BatchDriver {
    orchestrator: MirrorOrchestrator,
}

impl BatchDriver {
    pub fn new(orchestrator: MirrorOrchestrator) -> Self {
        BatchDriver { orchestrator }
    }

    /// Mirror each id in order. One item's failure never stops the rest.
    pub async fn run(&self, ids: &[String], options: &MirrorOptions) -> BatchSummary {
        let mut results = Vec::with_capacity(ids.len());
        let mut downloaded = 0;
        let mut skipped = 0;
        let mut failed = 0;

        for (index, id) in ids.iter().enumerate() {
            info!(id = %id, position = index + 1, total = ids.len(), "Processing video");
            let status = match self.orchestrator.mirror(id, options).await {
                Ok(MirrorOutcome::Downloaded(_)) => {
                    downloaded += 1;
                    ItemStatus::Downloaded
                }
                Ok(MirrorOutcome::Skipped(_)) => {
                    skipped += 1;
                    ItemStatus::Skipped
                }
                Err(err) => {
                    failed += 1;
                    error!(id = %id, error = %err, "Mirror failed");
                    ItemStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            results.push(ItemResult {
                id: id.clone(),
                status,
            });
        }

        let summary = BatchSummary {
            downloaded,
            skipped,
            failed,
            results,
        };
        info!(
            total = summary.total(),
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "Batch complete"
        );
        summary
    }

    /// Mirror the videos of a previously fetched listing, oldest entry first,
    /// optionally capped at `max` items.
    pub async fn run_playlist(
        &self,
        record: &PlaylistRecord,
        options: &MirrorOptions,
        max: Option<usize>,
    ) -> BatchSummary {
        let mut ids: Vec<String> = record.videos.iter().map(|v| v.id.clone()).collect();
        if let Some(max) = max {
            ids.truncate(max);
        }
        self.run(&ids, options).await
    }
}
