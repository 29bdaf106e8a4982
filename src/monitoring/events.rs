/*!
 * Event System
 * Strongly-typed observability events for every reportable simulation outcome
 */

use crate::core::types::{Item, Pid, Priority, Quanta, Size};
use crate::process::types::Role;
use serde::{Deserialize, Serialize};

/// Event severity for filtering and log forwarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

/// Event category for organization and querying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Process,
    Scheduler,
    Resource,
    Buffer,
}

/// Unified event type - all simulation outcomes flow through this
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Nanoseconds since the collector was created; stamped on emit
    pub timestamp_ns: u64,
    pub severity: Severity,
    pub category: Category,
    /// Process the event concerns, if any
    pub pid: Option<Pid>,
    pub payload: Payload,
}

impl Event {
    pub fn new(severity: Severity, category: Category, payload: Payload) -> Self {
        Self {
            timestamp_ns: 0,
            severity,
            category,
            pid: None,
            payload,
        }
    }

    pub fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }
}

/// Event payload - one variant per reportable outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    // Scheduler events
    ProcessSubmitted {
        priority: Priority,
        quota: Quanta,
    },
    RoleAssigned {
        role: Role,
    },
    QuantumExecuted {
        remaining: Quanta,
    },
    ProcessPreempted {
        by_priority: Priority,
    },
    ProcessRequeued {
        remaining: Quanta,
    },
    ProcessCompleted,

    // Resource events
    AdmissionGranted {
        requested: Size,
        available: Size,
    },
    AdmissionDenied {
        requested: Size,
        available: Size,
    },
    ResourcesReleased {
        freed: Size,
        available: Size,
    },
    ReleaseIgnored,

    // Buffer events
    ItemProduced {
        item: Item,
        occupancy: usize,
    },
    ProduceTimeout {
        timeout_ms: u64,
    },
    ItemConsumed {
        item: Item,
        occupancy: usize,
    },
    ConsumeTimeout {
        timeout_ms: u64,
    },
}
