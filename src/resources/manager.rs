/*!
 * Resource Manager
 * Processor-slot and memory admission for the simulation
 *
 * The admission check and its bookkeeping form a single mutual-exclusion
 * domain: both run under one mutex so concurrent schedulers cannot
 * over-admit. Active grants are keyed by a monotonically increasing grant
 * id rather than the pid, since process identifiers come from an external
 * generator and are not guaranteed unique.
 */

use crate::core::types::Size;
use crate::monitoring::{Category, Collector, Event, Payload, Severity};
use crate::process::types::{Process, ResourceGrant};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct PoolState {
    active: HashMap<u64, Size>,
    available: Size,
}

/// Tracks processor slots and the memory pool; admits and releases processes
pub struct ResourceManager {
    slots: usize,
    total_memory: Size,
    state: Mutex<PoolState>,
    next_grant: AtomicU64,
    admitted: AtomicU64,
    denied: AtomicU64,
    released: AtomicU64,
    ignored_releases: AtomicU64,
    collector: Arc<Collector>,
}

/// Point-in-time resource counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceStats {
    pub slots: usize,
    pub total_memory: Size,
    pub available_memory: Size,
    pub active_processes: usize,
    pub admitted: u64,
    pub denied: u64,
    pub released: u64,
    pub ignored_releases: u64,
}

impl ResourceManager {
    pub fn new(slots: usize, total_memory: Size, collector: Arc<Collector>) -> Self {
        Self {
            slots,
            total_memory,
            state: Mutex::new(PoolState {
                active: HashMap::new(),
                available: total_memory,
            }),
            next_grant: AtomicU64::new(1),
            admitted: AtomicU64::new(0),
            denied: AtomicU64::new(0),
            released: AtomicU64::new(0),
            ignored_releases: AtomicU64::new(0),
            collector,
        }
    }

    /// Try to admit a process against the slot and memory bounds
    ///
    /// On success the grant is recorded and attached to the process. On
    /// failure nothing changes; the denial is reported and the caller is
    /// responsible for retry and backoff.
    pub fn admit(&self, process: &mut Process, requested: Size) -> bool {
        let mut state = self.state.lock();

        if state.active.len() >= self.slots || requested > state.available {
            let available = state.available;
            drop(state);
            self.denied.fetch_add(1, Ordering::Relaxed);
            self.collector.emit(
                Event::new(
                    Severity::Warn,
                    Category::Resource,
                    Payload::AdmissionDenied {
                        requested,
                        available,
                    },
                )
                .with_pid(process.pid),
            );
            return false;
        }

        let grant = ResourceGrant {
            id: self.next_grant.fetch_add(1, Ordering::Relaxed),
            memory: requested,
        };
        state.active.insert(grant.id, requested);
        state.available -= requested;
        let available = state.available;
        drop(state);

        process.attach_grant(grant);
        self.admitted.fetch_add(1, Ordering::Relaxed);
        self.collector.emit(
            Event::new(
                Severity::Info,
                Category::Resource,
                Payload::AdmissionGranted {
                    requested,
                    available,
                },
            )
            .with_pid(process.pid),
        );
        true
    }

    /// Release a process's grant back to the pool
    ///
    /// Releasing a process that holds no active grant is a reported no-op,
    /// never a failure.
    pub fn release(&self, process: &mut Process, requested: Size) {
        let grant = process.grants().first().copied();

        let freed = {
            let mut state = self.state.lock();
            match grant {
                Some(grant) if state.active.remove(&grant.id).is_some() => {
                    debug_assert_eq!(grant.memory, requested);
                    state.available += grant.memory;
                    Some((grant.memory, state.available))
                }
                _ => None,
            }
        };

        match freed {
            Some((freed, available)) => {
                process.clear_grants();
                self.released.fetch_add(1, Ordering::Relaxed);
                self.collector.emit(
                    Event::new(
                        Severity::Info,
                        Category::Resource,
                        Payload::ResourcesReleased { freed, available },
                    )
                    .with_pid(process.pid),
                );
            }
            None => {
                self.ignored_releases.fetch_add(1, Ordering::Relaxed);
                self.collector.emit(
                    Event::new(Severity::Warn, Category::Resource, Payload::ReleaseIgnored)
                        .with_pid(process.pid),
                );
            }
        }
    }

    pub fn available_memory(&self) -> Size {
        self.state.lock().available
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn stats(&self) -> ResourceStats {
        let state = self.state.lock();
        ResourceStats {
            slots: self.slots,
            total_memory: self.total_memory,
            available_memory: state.available,
            active_processes: state.active.len(),
            admitted: self.admitted.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            ignored_releases: self.ignored_releases.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(slots: usize, memory: Size) -> ResourceManager {
        ResourceManager::new(slots, memory, Arc::new(Collector::new()))
    }

    #[test]
    fn test_admit_within_bounds() {
        let manager = manager(2, 1024);
        let mut process = Process::new(1, 5, 3);

        assert!(manager.admit(&mut process, 512));
        assert!(process.is_admitted());
        assert_eq!(manager.available_memory(), 512);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_admit_denied_without_side_effects() {
        let manager = manager(1, 256);
        let mut process = Process::new(1, 5, 3);

        assert!(!manager.admit(&mut process, 512));
        assert!(!process.is_admitted());
        assert_eq!(manager.available_memory(), 256);
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_release_restores_pool() {
        let manager = manager(2, 1024);
        let mut process = Process::new(1, 5, 3);

        manager.admit(&mut process, 512);
        manager.release(&mut process, 512);

        assert!(!process.is_admitted());
        assert_eq!(manager.available_memory(), 1024);
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_release_of_inactive_is_noop() {
        let manager = manager(2, 1024);
        let mut process = Process::new(1, 5, 3);

        manager.release(&mut process, 512);

        assert_eq!(manager.available_memory(), 1024);
        assert_eq!(manager.stats().ignored_releases, 1);
    }

    #[test]
    fn test_duplicate_pids_do_not_collide() {
        let manager = manager(2, 1024);
        let mut first = Process::new(7, 5, 3);
        let mut second = Process::new(7, 5, 3);

        assert!(manager.admit(&mut first, 256));
        assert!(manager.admit(&mut second, 256));
        assert_eq!(manager.active_count(), 2);

        manager.release(&mut first, 256);
        assert_eq!(manager.active_count(), 1);
        assert!(second.is_admitted());
    }
}
