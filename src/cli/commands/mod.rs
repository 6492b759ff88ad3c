//! CLI command implementations

pub mod init;
pub mod run;
pub mod single;
pub mod status;

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: one or more jobs failed
pub const EXIT_JOB_FAILURES: i32 = 1;
/// Exit code: configuration error
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code: repository connection error
pub const EXIT_CONNECTION_ERROR: i32 = 4;
/// Exit code: fatal error
pub const EXIT_FATAL: i32 = 5;
