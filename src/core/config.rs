/*!
 * Run Configuration
 * Externally supplied constants for a simulation run
 *
 * Validation happens once, before any scheduler loop starts. A malformed
 * configuration is the only fatal condition in the crate.
 */

use super::errors::ConfigError;
use super::types::Size;
use std::time::Duration;

/// Default processor slot count
pub const DEFAULT_PROCESSORS: usize = 2;
/// Default memory pool in MB
pub const DEFAULT_MEMORY: Size = 4096;
/// Default shared-buffer capacity
pub const DEFAULT_BUFFER_CAPACITY: usize = 5;
/// Default event history depth kept by the collector
pub const DEFAULT_EVENT_HISTORY: usize = 4096;

/// Simulation run configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of processor slots the resource manager admits against
    pub processors: usize,
    /// Total memory pool in MB
    pub total_memory: Size,
    /// Shared-buffer capacity in items
    pub buffer_capacity: usize,
    /// Simulated duration of one execution quantum
    pub quantum: Duration,
    /// Delay between admission retries
    pub retry_backoff: Duration,
    /// How long a buffer produce/consume blocks before reporting failure
    pub buffer_timeout: Duration,
    /// Collector history depth
    pub event_history: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            processors: DEFAULT_PROCESSORS,
            total_memory: DEFAULT_MEMORY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            quantum: Duration::from_millis(500),
            retry_backoff: Duration::from_millis(500),
            buffer_timeout: Duration::from_secs(1),
            event_history: DEFAULT_EVENT_HISTORY,
        }
    }
}

impl SimConfig {
    /// Validate the configuration, failing fast on unusable values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processors == 0 {
            return Err(ConfigError::NoProcessors);
        }
        if self.total_memory == 0 {
            return Err(ConfigError::NoMemory);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::NoBufferCapacity);
        }
        Ok(())
    }

    /// Build a configuration from `SCHEDSIM_*` environment variables,
    /// falling back to defaults for unset keys
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = read_env("SCHEDSIM_PROCESSORS")? {
            config.processors = v as usize;
        }
        if let Some(v) = read_env("SCHEDSIM_MEMORY_MB")? {
            config.total_memory = v;
        }
        if let Some(v) = read_env("SCHEDSIM_BUFFER_CAPACITY")? {
            config.buffer_capacity = v as usize;
        }
        if let Some(v) = read_env("SCHEDSIM_QUANTUM_MS")? {
            config.quantum = Duration::from_millis(v);
        }
        if let Some(v) = read_env("SCHEDSIM_RETRY_BACKOFF_MS")? {
            config.retry_backoff = Duration::from_millis(v);
        }
        if let Some(v) = read_env("SCHEDSIM_BUFFER_TIMEOUT_MS")? {
            config.buffer_timeout = Duration::from_millis(v);
        }
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.into(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
