//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Console output filtered by level (`RUST_LOG` overrides)
//! - Optional JSON file output with rotation
//! - Macros that give redaction events a consistent shape
//!
//! # Example
//!
//! ```no_run
//! use radact::logging::init_logging;
//! use radact::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a redaction run
///
/// # Example
///
/// ```no_run
/// use radact::log_redaction_start;
///
/// let run_id = "6f1c0f0e-0000-4000-8000-000000000000";
/// log_redaction_start!(run_id, "pattern", 12_000usize, 4usize);
/// ```
#[macro_export]
macro_rules! log_redaction_start {
    ($run_id:expr, $strategy:expr, $text_len:expr, $chunks:expr) => {
        tracing::info!(
            run_id = %$run_id,
            strategy = %$strategy,
            text_len = $text_len,
            chunks = $chunks,
            "Starting redaction"
        );
    };
}

/// Log the completion of a redaction run
///
/// # Example
///
/// ```no_run
/// use radact::log_redaction_complete;
/// use std::time::Duration;
///
/// let run_id = "6f1c0f0e-0000-4000-8000-000000000000";
/// log_redaction_complete!(run_id, 7usize, 0usize, Duration::from_millis(42));
/// ```
#[macro_export]
macro_rules! log_redaction_complete {
    ($run_id:expr, $entities:expr, $chunks_failed:expr, $duration:expr) => {
        tracing::info!(
            run_id = %$run_id,
            entities = $entities,
            chunks_failed = $chunks_failed,
            duration_ms = $duration.as_millis() as u64,
            "Redaction completed"
        );
    };
}

/// Log a chunk whose detection failed and contributed no entities
///
/// # Example
///
/// ```no_run
/// use radact::log_chunk_failure;
///
/// log_chunk_failure!(3usize, 9000usize, "Request timeout: 60s");
/// ```
#[macro_export]
macro_rules! log_chunk_failure {
    ($chunk_index:expr, $start_offset:expr, $error:expr) => {
        tracing::warn!(
            chunk_index = $chunk_index,
            start_offset = $start_offset,
            error = %$error,
            "Chunk detection failed, continuing with zero entities"
        );
    };
}
