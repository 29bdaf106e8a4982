/*!
 * Workload Execution
 * Role selection strategy and the per-quantum unit of work
 *
 * Role and item choice are injected so tests can run deterministic
 * workloads. One call to `run_slice` is exactly one quantum of work and is
 * identical under both scheduling disciplines; the disciplines differ only
 * in whether slices run to completion uninterrupted or are preemptible.
 */

use super::types::{Process, Role};
use crate::core::types::{Item, Pid};
use crate::ipc::SharedBuffer;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Injected strategy for role and item selection
pub trait WorkloadSelector: Send + Sync {
    /// Choose the execution role for one admission
    fn select_role(&self, pid: Pid) -> Role;

    /// Produce the next item a producer slice will enqueue
    fn next_item(&self, pid: Pid) -> Item;
}

/// Production selector: uniform random roles, items in [1, 100]
pub struct RandomSelector {
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded variant for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadSelector for RandomSelector {
    fn select_role(&self, _pid: Pid) -> Role {
        match self.rng.lock().gen_range(0..3u8) {
            0 => Role::Producer,
            1 => Role::Consumer,
            _ => Role::Compute,
        }
    }

    fn next_item(&self, _pid: Pid) -> Item {
        self.rng.lock().gen_range(1..=100)
    }
}

/// Deterministic selector: one fixed role, items counting up from 1
pub struct FixedSelector {
    role: Role,
    next: AtomicU64,
}

impl FixedSelector {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            next: AtomicU64::new(1),
        }
    }
}

impl WorkloadSelector for FixedSelector {
    fn select_role(&self, _pid: Pid) -> Role {
        self.role
    }

    fn next_item(&self, _pid: Pid) -> Item {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Execute one quantum of the assigned role
///
/// Buffer timeouts are expected outcomes: the buffer reports them and the
/// slice completes regardless.
pub fn run_slice(
    process: &Process,
    role: Role,
    buffer: &SharedBuffer,
    selector: &dyn WorkloadSelector,
    quantum: Duration,
) {
    match role {
        Role::Producer => {
            let item = selector.next_item(process.pid);
            let _ = buffer.produce(item, process.pid);
        }
        Role::Consumer => {
            let _ = buffer.consume(process.pid);
        }
        Role::Compute => {}
    }

    if !quantum.is_zero() {
        thread::sleep(quantum);
    }
}
