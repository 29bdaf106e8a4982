/*!
 * Event Collector
 * Central sink for simulation events
 *
 * Every event is forwarded to the `log` facade at a level derived from its
 * severity and appended to a bounded in-memory history that tests and the
 * end-of-run summary can query. History overflow drops the oldest events
 * and counts the drops.
 */

use super::events::{Event, Severity};
use crate::core::config::DEFAULT_EVENT_HISTORY;
use crate::core::types::Pid;
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Event collector shared by every component in a run
pub struct Collector {
    started: Instant,
    capacity: usize,
    history: RwLock<VecDeque<Event>>,
    dropped: AtomicU64,
    per_pid: DashMap<Pid, u64, RandomState>,
}

impl Collector {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_HISTORY)
    }

    /// Create a collector with a custom history depth
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            started: Instant::now(),
            capacity: capacity.max(1),
            history: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            dropped: AtomicU64::new(0),
            per_pid: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Record an event: stamp, forward to the log facade, append to history
    pub fn emit(&self, mut event: Event) {
        event.timestamp_ns = self.started.elapsed().as_nanos() as u64;

        let level = match event.severity {
            Severity::Trace => log::Level::Trace,
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        };
        match event.pid {
            Some(pid) => log::log!(
                target: "schedsim::event",
                level,
                "[{:?}] pid={} {:?}",
                event.category,
                pid,
                event.payload
            ),
            None => log::log!(
                target: "schedsim::event",
                level,
                "[{:?}] {:?}",
                event.category,
                event.payload
            ),
        }

        if let Some(pid) = event.pid {
            *self.per_pid.entry(pid).or_insert(0) += 1;
        }

        let mut history = self.history.write();
        if history.len() == self.capacity {
            history.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        history.push_back(event);
    }

    /// Snapshot of the full retained history, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.history.read().iter().cloned().collect()
    }

    /// Retained events concerning a single process
    pub fn events_for(&self, pid: Pid) -> Vec<Event> {
        self.history
            .read()
            .iter()
            .filter(|e| e.pid == Some(pid))
            .cloned()
            .collect()
    }

    /// Count retained events matching a predicate
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Event) -> bool,
    {
        self.history.read().iter().filter(|e| predicate(e)).count()
    }

    /// Total events ever emitted for a process (survives history overflow)
    pub fn event_count_for(&self, pid: Pid) -> u64 {
        self.per_pid.get(&pid).map(|c| *c).unwrap_or(0)
    }

    /// Events dropped from history due to overflow
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
