//! Batch run accounting

use std::time::Duration;

/// Counters for one batch run, logged when the run finishes
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Jobs taken from the ledger this run
    pub processed: u64,
    /// Jobs exported successfully
    pub succeeded: u64,
    /// Jobs that failed and were recorded as errors
    pub failed: u64,
    /// Jobs skipped because shutdown was requested
    pub skipped: u64,
    /// Identifiers that failed, with the recorded error message
    pub errors: Vec<(String, String)>,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, id: &str) {
        self.processed += 1;
        self.succeeded += 1;
        tracing::debug!(id = %id, "Job complete");
    }

    pub fn record_failure(&mut self, id: &str, message: String) {
        self.processed += 1;
        self.failed += 1;
        self.errors.push((id.to_string(), message));
    }

    /// True when every processed job succeeded
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Emit the end-of-run summary at info level, with one warning per
    /// failed identifier
    pub fn log_summary(&self) {
        tracing::info!(
            processed = self.processed,
            succeeded = self.succeeded,
            failed = self.failed,
            skipped = self.skipped,
            duration_secs = self.duration.as_secs_f64(),
            "Batch run finished"
        );
        for (id, message) in &self.errors {
            tracing::warn!(id = %id, error = %message, "Job failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_outcomes() {
        let mut summary = RunSummary::new();
        summary.record_success("demo:1");
        summary.record_success("demo:2");
        summary.record_failure("demo:3", "object not found: demo:3".to_string());

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_clean());
        assert_eq!(summary.errors[0].0, "demo:3");
    }

    #[test]
    fn test_empty_run_is_clean() {
        assert!(RunSummary::new().is_clean());
    }
}
