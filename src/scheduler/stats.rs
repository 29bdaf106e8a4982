/*!
 * Scheduler Statistics
 * Lock-free counters for hot scheduling paths
 */

use super::Policy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler statistics
///
/// All counters use relaxed ordering; a snapshot's values are individually
/// accurate but not guaranteed mutually consistent under concurrent updates.
pub struct AtomicSchedulerStats {
    policy: Policy,
    submitted: AtomicU64,
    completed: AtomicU64,
    preemptions: AtomicU64,
    requeues: AtomicU64,
    quanta_executed: AtomicU64,
}

impl AtomicSchedulerStats {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            preemptions: AtomicU64::new(0),
            requeues: AtomicU64::new(0),
            quanta_executed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn inc_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_requeues(&self) {
        self.requeues.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_quanta(&self) {
        self.quanta_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            policy: self.policy,
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            requeues: self.requeues.load(Ordering::Relaxed),
            quanta_executed: self.quanta_executed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time scheduler counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub policy: Policy,
    pub submitted: u64,
    pub completed: u64,
    pub preemptions: u64,
    pub requeues: u64,
    pub quanta_executed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_increments() {
        let stats = AtomicSchedulerStats::new(Policy::Priority);
        stats.inc_submitted();
        stats.inc_submitted();
        stats.inc_completed();
        stats.inc_quanta();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.policy, Policy::Priority);
        assert_eq!(snapshot.submitted, 2);
        assert_eq!(snapshot.completed, 1);
        assert_eq!(snapshot.preemptions, 0);
        assert_eq!(snapshot.quanta_executed, 1);
    }
}
