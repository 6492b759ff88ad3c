//! Batch orchestration
//!
//! [`BatchRunner`] drives a run over the job ledger: reclaim stranded jobs,
//! snapshot the pending queue, then export each object in order, recording
//! every outcome. One failed object never stops the batch; a ledger failure
//! does, because losing the record of what happened is worse than stopping.

use crate::core::export::exporter::ObjectExporter;
use crate::core::export::summary::RunSummary;
use crate::domain::{ExportError, ObjectId, Result};
use crate::ledger::Ledger;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::watch;

/// Runs export jobs from the ledger
pub struct BatchRunner {
    ledger: Ledger,
    exporter: ObjectExporter,
    reclaim_after_minutes: Option<u64>,
}

impl BatchRunner {
    pub fn new(
        ledger: Ledger,
        exporter: ObjectExporter,
        reclaim_after_minutes: Option<u64>,
    ) -> Self {
        Self {
            ledger,
            exporter,
            reclaim_after_minutes,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run a batch over the pending queue
    ///
    /// The queue is snapshotted once at the start; rows that turn pending
    /// during the run wait for the next one. Each job is marked `processing`
    /// before its export and `complete` or `error` after, so a crash leaves
    /// at most one row in flight. The shutdown channel is checked between
    /// jobs; the job in progress always finishes.
    ///
    /// # Errors
    ///
    /// Per-object export failures are recorded in the ledger and counted in
    /// the summary, not returned. Only ledger failures abort the run.
    pub async fn run_batch(
        &self,
        limit: Option<u32>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<RunSummary> {
        let started = Instant::now();

        if let Some(threshold) = self.reclaim_after_minutes {
            let reclaimed = self.ledger.reclaim_stale(threshold).await?;
            if reclaimed > 0 {
                tracing::info!(
                    reclaimed,
                    threshold_minutes = threshold,
                    "Reclaimed stale processing jobs"
                );
            }
        }

        let ids = self.ledger.pending_ids(limit).await?;
        tracing::info!(jobs = ids.len(), "Starting batch run");

        let mut summary = RunSummary::new();
        let mut remaining = ids.len() as u64;
        for id in &ids {
            if *shutdown.borrow() {
                tracing::info!(remaining, "Shutdown requested, stopping batch");
                summary.skipped = remaining;
                break;
            }
            remaining -= 1;

            self.ledger.mark_processing(id).await?;
            match self.export_one(id).await {
                Ok(directory) => {
                    self.ledger.mark_complete(id, &directory).await?;
                    summary.record_success(id);
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!(id = %id, error = %message, "Export failed");
                    self.ledger.mark_error(id, &message).await?;
                    summary.record_failure(id, message);
                }
            }
        }

        summary.duration = started.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    /// Walk the pending queue without writing anything
    ///
    /// Fetches each object and reports where it would be written and how
    /// many datastreams it has. Neither the filesystem nor the ledger is
    /// touched, so a dry run is repeatable.
    pub async fn dry_run(
        &self,
        limit: Option<u32>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let ids = self.ledger.pending_ids(limit).await?;
        tracing::info!(jobs = ids.len(), "Starting dry run");

        let mut summary = RunSummary::new();
        let mut remaining = ids.len() as u64;
        for id in &ids {
            if *shutdown.borrow() {
                tracing::info!(remaining, "Shutdown requested, stopping dry run");
                summary.skipped = remaining;
                break;
            }
            remaining -= 1;

            match self.plan_one(id).await {
                Ok(plan) => {
                    tracing::info!(
                        id = %id,
                        directory = %plan.directory.display(),
                        datastreams = plan.datastream_count,
                        "Would export"
                    );
                    summary.record_success(id);
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(id = %id, error = %message, "Would fail");
                    summary.record_failure(id, message);
                }
            }
        }

        summary.duration = started.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    /// Export one identifier through the ledger lifecycle, regardless of its
    /// current status
    ///
    /// Used by the single-object command to retry errored jobs. The outcome
    /// is recorded in the ledger and also returned, so the caller can set an
    /// exit code.
    pub async fn process_single(&self, id: &str) -> Result<PathBuf> {
        self.ledger.mark_processing(id).await?;
        match self.export_one(id).await {
            Ok(directory) => {
                self.ledger.mark_complete(id, &directory).await?;
                Ok(directory)
            }
            Err(e) => {
                self.ledger.mark_error(id, &e.to_string()).await?;
                Err(e)
            }
        }
    }

    async fn export_one(&self, id: &str) -> Result<PathBuf> {
        let object_id = ObjectId::new(id).map_err(ExportError::InvalidIdentifier)?;
        self.exporter.export_object(&object_id).await
    }

    async fn plan_one(&self, id: &str) -> Result<crate::core::export::exporter::ExportPlan> {
        let object_id = ObjectId::new(id).map_err(ExportError::InvalidIdentifier)?;
        self.exporter.plan_export(&object_id).await
    }
}
