/*!
 * Error Types
 * Centralized error handling with thiserror
 *
 * Buffer timeouts are expected outcomes in a contended simulation, not
 * conditions that abort a run. Configuration errors are the only fatal
 * class and are raised before any scheduler loop starts.
 */

use thiserror::Error;

/// Buffer operation result
pub type BufferResult<T> = Result<T, BufferError>;

/// Shared-buffer errors
///
/// Both variants are transient: a timed-out operation is abandoned and the
/// calling workload continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("buffer full: produce timed out after {timeout_ms} ms")]
    Full { timeout_ms: u64 },

    #[error("buffer empty: consume timed out after {timeout_ms} ms")]
    Empty { timeout_ms: u64 },
}

/// Configuration errors, raised at startup before the run loop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("processor slot count must be at least 1")]
    NoProcessors,

    #[error("total memory must be greater than 0")]
    NoMemory,

    #[error("buffer capacity must be at least 1")]
    NoBufferCapacity,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
