/*!
 * Schedulers
 * Two disciplines over the same admission and workload machinery:
 * first-come-first-served (non-preemptive) and preemptive priority with
 * time-slicing
 */

mod entry;
mod fcfs;
mod priority;
mod stats;

pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use stats::{AtomicSchedulerStats, SchedulerStats};

use crate::core::errors::ConfigError;
use crate::core::types::Size;
use crate::process::types::Process;
use crate::resources::ResourceManager;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

/// Scheduling discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Strict arrival order, each process runs to completion
    Fcfs,
    /// Preemptive priority with quantum slicing
    Priority,
}

impl Policy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Policy::Fcfs => "fcfs",
            Policy::Priority => "priority",
        }
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Policy::Fcfs),
            "priority" | "prio" => Ok(Policy::Priority),
            other => Err(ConfigError::InvalidValue {
                key: "policy".into(),
                value: other.into(),
            }),
        }
    }
}

/// Common scheduler surface used by the driver
pub trait Scheduler: Send + Sync {
    /// Queue a process with its memory requirement
    fn submit(&self, process: Process, memory: Size);

    /// Drain the queue; returns when every submitted process has completed
    fn run(&self);

    fn stats(&self) -> SchedulerStats;
}

/// Poll admission until granted, sleeping `backoff` between attempts
///
/// Denials are reported by the resource manager itself; retry is a caller
/// responsibility and this helper supplies that loop.
pub(crate) fn admit_with_retry(
    resources: &ResourceManager,
    process: &mut Process,
    requested: Size,
    backoff: Duration,
) {
    while !resources.admit(process, requested) {
        if !backoff.is_zero() {
            thread::sleep(backoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("fcfs".parse::<Policy>().unwrap(), Policy::Fcfs);
        assert_eq!("PRIORITY".parse::<Policy>().unwrap(), Policy::Priority);
        assert!("lottery".parse::<Policy>().is_err());
    }

    #[test]
    fn test_policy_as_str() {
        assert_eq!(Policy::Fcfs.as_str(), "fcfs");
        assert_eq!(Policy::Priority.as_str(), "priority");
    }
}
