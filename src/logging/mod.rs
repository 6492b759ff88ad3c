//! Logging and observability
//!
//! Structured logging with configurable levels, console output, and an
//! optional rotating JSON file layer.

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
