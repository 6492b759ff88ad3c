//! Export pipeline: per-datastream writing, per-object export, and batch
//! orchestration over the job ledger.

pub mod exporter;
pub mod runner;
pub mod summary;
pub mod writer;

pub use exporter::{ExportPlan, ObjectExporter};
pub use runner::BatchRunner;
pub use summary::RunSummary;
pub use writer::{DatastreamWriter, WrittenDatastream};
