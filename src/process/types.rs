/*!
 * Process Types
 * The schedulable unit of work and its lifecycle
 */

use crate::core::types::{Pid, Priority, Quanta, Size};
use serde::{Deserialize, Serialize};

/// Process state
///
/// Transitions: `Queued -> Running -> {Queued | Completed}`. A suspended
/// process goes back to `Queued` and re-enters competition like a fresh
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in a scheduler queue
    Queued,
    /// Admitted and executing
    Running,
    /// Quota exhausted; the process is dropped after this
    Completed,
}

/// Execution role assigned once per admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Issues one buffer produce per quantum
    Producer,
    /// Issues one buffer consume per quantum
    Consumer,
    /// No buffer interaction; consumes simulated time only
    Compute,
}

/// Resource grant attached to an admitted process
///
/// The grant id, not the pid, keys the resource manager's active table:
/// identifiers come from an external generator and are not guaranteed unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceGrant {
    pub id: u64,
    pub memory: Size,
}

/// A schedulable unit of work
///
/// The scheduler that currently holds a process owns it exclusively; only
/// that scheduler decrements its quota. The grant list is populated and
/// cleared only by the resource manager.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub priority: Priority,
    remaining: Quanta,
    resources: Vec<ResourceGrant>,
    state: ProcessState,
}

impl Process {
    pub fn new(pid: Pid, priority: Priority, quota: Quanta) -> Self {
        Self {
            pid,
            priority,
            remaining: quota,
            resources: Vec::new(),
            state: ProcessState::Queued,
        }
    }

    /// Remaining execution quota in quantum units
    pub fn remaining(&self) -> Quanta {
        self.remaining
    }

    /// Consume one quantum of the remaining quota
    pub fn consume_quantum(&mut self) -> Quanta {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// A process is admitted iff it holds at least one grant
    pub fn is_admitted(&self) -> bool {
        !self.resources.is_empty()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    pub fn grants(&self) -> &[ResourceGrant] {
        &self.resources
    }

    pub(crate) fn attach_grant(&mut self, grant: ResourceGrant) {
        self.resources.push(grant);
    }

    pub(crate) fn clear_grants(&mut self) {
        self.resources.clear();
    }
}
