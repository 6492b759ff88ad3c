//! Durable job ledger
//!
//! A SQLite-backed table of export jobs, one row per object identifier. The
//! ledger is the unit of restartability: a batch run claims pending rows,
//! marks them `processing`, and records each outcome, so an interrupted run
//! picks up exactly where it stopped.

use crate::config::LedgerConfig;
use crate::domain::{LedgerError, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Lifecycle state of one export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Complete,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `objects` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub processing_start: Option<DateTime<Utc>>,
    pub processing_end: Option<DateTime<Utc>>,
    pub directory_path: Option<String>,
    pub error: Option<String>,
}

/// Per-status row counts for the status report
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub processing: i64,
    pub complete: i64,
    pub error: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.processing + self.complete + self.error
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS objects (
    id               TEXT UNIQUE NOT NULL,
    status           TEXT NOT NULL DEFAULT 'pending',
    processing_start TEXT,
    processing_end   TEXT,
    directory_path   TEXT,
    metadata         TEXT,
    error            TEXT
);
CREATE INDEX IF NOT EXISTS idx_objects_status ON objects (status);
"#;

/// Interval between progress log lines while seeding
const SEED_LOG_INTERVAL: u64 = 1000;

/// Handle to the job ledger database
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Open or create the ledger described by the configuration
    ///
    /// When the database file already exists this only connects; the seed
    /// listing, if configured, is ignored so re-running the tool never
    /// re-seeds or duplicates rows. When the file is absent the schema is
    /// created and the seed listing (if any) is loaded.
    pub async fn initialize(config: &LedgerConfig) -> Result<Self> {
        let existed = config.db_path.exists();
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() && !existed {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::ConnectionFailed(format!(
                        "Cannot create ledger directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let ledger = Self::connect(&config.db_path, true).await?;

        if existed {
            tracing::info!(path = %config.db_path.display(), "Using existing job ledger");
            if config.seed_listing.is_some() {
                tracing::debug!("Ledger already exists, ignoring seed listing");
            }
            return Ok(ledger);
        }

        sqlx::raw_sql(SCHEMA)
            .execute(&ledger.pool)
            .await
            .map_err(|e| LedgerError::MigrationFailed(e.to_string()))?;
        tracing::info!(path = %config.db_path.display(), "Created job ledger");

        if let Some(listing) = &config.seed_listing {
            let seeded = ledger.seed_from_listing(listing).await?;
            tracing::info!(count = seeded, listing = %listing.display(), "Seeded job ledger");
        }

        Ok(ledger)
    }

    /// Connect to an existing ledger; fails when the file is absent
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LedgerError::ConnectionFailed(format!(
                "Ledger database not found: {}",
                path.display()
            ))
            .into());
        }
        Self::connect(path, false).await
    }

    async fn connect(path: &Path, create: bool) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| LedgerError::ConnectionFailed(e.to_string()))?
            .create_if_missing(create)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| LedgerError::ConnectionFailed(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Insert one identifier as a pending job
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateId`] when the identifier is already
    /// present.
    pub async fn insert_pending(&self, id: &str) -> Result<()> {
        sqlx::query("INSERT INTO objects (id, status) VALUES (?, ?)")
            .bind(id)
            .bind(JobStatus::Pending)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, id))?;
        Ok(())
    }

    /// Load identifiers from a listing file, one per line
    ///
    /// Blank lines and surrounding whitespace are ignored. Insertion order
    /// follows file order, which fixes the order later batch runs process
    /// jobs in. Progress is logged every thousand rows.
    pub async fn seed_from_listing(&self, listing: &Path) -> Result<u64> {
        let contents = std::fs::read_to_string(listing).map_err(|e| {
            LedgerError::QueryFailed(format!(
                "Cannot read seed listing {}: {}",
                listing.display(),
                e
            ))
        })?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;

        let mut count: u64 = 0;
        for line in contents.lines() {
            let id = line.trim();
            if id.is_empty() {
                continue;
            }
            sqlx::query("INSERT INTO objects (id, status) VALUES (?, ?)")
                .bind(id)
                .bind(JobStatus::Pending)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, id))?;
            count += 1;
            if count % SEED_LOG_INTERVAL == 0 {
                tracing::info!(count, "Seeding job ledger");
            }
        }

        tx.commit()
            .await
            .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(count)
    }

    /// Identifiers of pending jobs, in insertion order
    pub async fn pending_ids(&self, limit: Option<u32>) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = match limit {
            Some(n) => {
                sqlx::query_as("SELECT id FROM objects WHERE status = ? ORDER BY rowid LIMIT ?")
                    .bind(JobStatus::Pending)
                    .bind(i64::from(n))
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as("SELECT id FROM objects WHERE status = ? ORDER BY rowid")
                    .bind(JobStatus::Pending)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Mark a job as in flight, stamping the processing start time
    pub async fn mark_processing(&self, id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE objects SET status = ?, processing_start = ?, processing_end = NULL, \
             error = NULL WHERE id = ?",
        )
        .bind(JobStatus::Processing)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    /// Record a successful export with its output directory
    pub async fn mark_complete(&self, id: &str, directory: &Path) -> Result<()> {
        sqlx::query(
            "UPDATE objects SET status = ?, processing_end = ?, directory_path = ? WHERE id = ?",
        )
        .bind(JobStatus::Complete)
        .bind(Utc::now())
        .bind(directory.to_string_lossy().into_owned())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    /// Record a failed export with its error message
    pub async fn mark_error(&self, id: &str, message: &str) -> Result<()> {
        sqlx::query("UPDATE objects SET status = ?, processing_end = ?, error = ? WHERE id = ?")
            .bind(JobStatus::Error)
            .bind(Utc::now())
            .bind(message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    /// Reset `processing` rows whose start time is older than the threshold
    /// back to `pending`, reclaiming jobs stranded by a crashed run. Returns
    /// the number of rows reclaimed.
    pub async fn reclaim_stale(&self, older_than_minutes: u64) -> Result<u64> {
        let cutoff = Utc::now() - Duration::minutes(older_than_minutes as i64);
        let result = sqlx::query(
            "UPDATE objects SET status = ?, processing_start = NULL \
             WHERE status = ? AND processing_start < ?",
        )
        .bind(JobStatus::Pending)
        .bind(JobStatus::Processing)
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Count `processing` rows whose start time is older than the threshold,
    /// without resetting them
    pub async fn stale_processing_count(&self, older_than_minutes: u64) -> Result<i64> {
        let cutoff = Utc::now() - Duration::minutes(older_than_minutes as i64);
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM objects WHERE status = ? AND processing_start < ?",
        )
        .bind(JobStatus::Processing)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(count)
    }

    /// Look up one job row
    pub async fn job(&self, id: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT id, status, processing_start, processing_end, directory_path, error \
             FROM objects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;
        Ok(job)
    }

    /// Row counts per status
    pub async fn status_counts(&self) -> Result<StatusCounts> {
        let rows: Vec<(JobStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM objects GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| LedgerError::QueryFailed(e.to_string()))?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                JobStatus::Pending => counts.pending = count,
                JobStatus::Processing => counts.processing = count,
                JobStatus::Complete => counts.complete = count,
                JobStatus::Error => counts.error = count,
            }
        }
        Ok(counts)
    }
}

fn map_insert_error(e: sqlx::Error, id: &str) -> LedgerError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => LedgerError::DuplicateId(id.to_string()),
        _ => LedgerError::QueryFailed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ledger_config(dir: &TempDir, seed: Option<PathBuf>) -> LedgerConfig {
        LedgerConfig {
            db_path: dir.path().join("ledger.db"),
            seed_listing: seed,
            reclaim_after_minutes: None,
        }
    }

    fn write_listing(dir: &TempDir, lines: &str) -> PathBuf {
        let path = dir.path().join("ids.txt");
        std::fs::write(&path, lines).unwrap();
        path
    }

    #[tokio::test]
    async fn test_initialize_seeds_in_file_order() {
        let dir = TempDir::new().unwrap();
        let listing = write_listing(&dir, "demo:3\ndemo:1\n\n  demo:2  \n");
        let ledger = Ledger::initialize(&ledger_config(&dir, Some(listing)))
            .await
            .unwrap();

        let ids = ledger.pending_ids(None).await.unwrap();
        assert_eq!(ids, vec!["demo:3", "demo:1", "demo:2"]);
    }

    #[tokio::test]
    async fn test_reinitialize_does_not_reseed() {
        let dir = TempDir::new().unwrap();
        let listing = write_listing(&dir, "demo:1\ndemo:2\n");
        let config = ledger_config(&dir, Some(listing));

        let ledger = Ledger::initialize(&config).await.unwrap();
        ledger.mark_processing("demo:1").await.unwrap();
        drop(ledger);

        let reopened = Ledger::initialize(&config).await.unwrap();
        let counts = reopened.status_counts().await.unwrap();
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.processing, 1);
        assert_eq!(counts.pending, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::initialize(&ledger_config(&dir, None)).await.unwrap();

        ledger.insert_pending("demo:1").await.unwrap();
        let err = ledger.insert_pending("demo:1").await.unwrap_err();
        assert!(err.to_string().contains("demo:1"));
    }

    #[tokio::test]
    async fn test_pending_limit() {
        let dir = TempDir::new().unwrap();
        let listing = write_listing(&dir, "demo:1\ndemo:2\ndemo:3\ndemo:4\ndemo:5\n");
        let ledger = Ledger::initialize(&ledger_config(&dir, Some(listing)))
            .await
            .unwrap();

        let ids = ledger.pending_ids(Some(2)).await.unwrap();
        assert_eq!(ids, vec!["demo:1", "demo:2"]);
    }

    #[tokio::test]
    async fn test_lifecycle_markers() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::initialize(&ledger_config(&dir, None)).await.unwrap();
        ledger.insert_pending("demo:1").await.unwrap();

        ledger.mark_processing("demo:1").await.unwrap();
        let job = ledger.job("demo:1").await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.processing_start.is_some());
        assert!(job.processing_end.is_none());

        ledger
            .mark_complete("demo:1", Path::new("/exports/demo/12/1234"))
            .await
            .unwrap();
        let job = ledger.job("demo:1").await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Complete);
        assert_eq!(job.directory_path.as_deref(), Some("/exports/demo/12/1234"));
        assert!(job.processing_end.is_some());
    }

    #[tokio::test]
    async fn test_mark_error_records_message() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::initialize(&ledger_config(&dir, None)).await.unwrap();
        ledger.insert_pending("demo:1").await.unwrap();

        ledger.mark_processing("demo:1").await.unwrap();
        ledger.mark_error("demo:1", "object not found").await.unwrap();

        let job = ledger.job("demo:1").await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.error.as_deref(), Some("object not found"));

        // An errored job is not handed out again
        assert!(ledger.pending_ids(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reclaim_stale_resets_old_processing_rows() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::initialize(&ledger_config(&dir, None)).await.unwrap();
        ledger.insert_pending("demo:stale").await.unwrap();
        ledger.insert_pending("demo:fresh").await.unwrap();

        ledger.mark_processing("demo:stale").await.unwrap();
        ledger.mark_processing("demo:fresh").await.unwrap();

        // Backdate the stale row well past any threshold
        let old = Utc::now() - Duration::hours(6);
        sqlx::query("UPDATE objects SET processing_start = ? WHERE id = ?")
            .bind(old)
            .bind("demo:stale")
            .execute(&ledger.pool)
            .await
            .unwrap();

        let reclaimed = ledger.reclaim_stale(60).await.unwrap();
        assert_eq!(reclaimed, 1);
        assert_eq!(ledger.pending_ids(None).await.unwrap(), vec!["demo:stale"]);

        let fresh = ledger.job("demo:fresh").await.unwrap().unwrap();
        assert_eq!(fresh.status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn test_open_missing_database_fails() {
        let dir = TempDir::new().unwrap();
        let result = Ledger::open(&dir.path().join("absent.db")).await;
        assert!(result.is_err());
    }
}
