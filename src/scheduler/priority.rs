/*!
 * Priority Scheduler
 * Preemptive priority dispatch with quantum slicing
 *
 * The heap head is re-checked after every executed quantum; a waiting entry
 * with strictly greater priority suspends the running process immediately.
 * Suspended work is re-pushed with its unchanged priority, remaining quota,
 * and a fresh sequence number, so it competes exactly like a new submission.
 */

use super::entry::Entry;
use super::stats::{AtomicSchedulerStats, SchedulerStats};
use super::{admit_with_retry, Policy, Scheduler};
use crate::core::config::SimConfig;
use crate::core::types::{Priority, Size};
use crate::ipc::SharedBuffer;
use crate::monitoring::{Category, Collector, Event, Payload, Severity};
use crate::process::types::{Process, ProcessState};
use crate::process::workload::{run_slice, WorkloadSelector};
use crate::resources::ResourceManager;
use log::info;
use parking_lot::Mutex;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Preemptive priority scheduler
pub struct PriorityScheduler {
    heap: Mutex<BinaryHeap<Entry>>,
    seq: AtomicU64,
    resources: Arc<ResourceManager>,
    buffer: Arc<SharedBuffer>,
    selector: Arc<dyn WorkloadSelector>,
    quantum: Duration,
    retry_backoff: Duration,
    stats: AtomicSchedulerStats,
    collector: Arc<Collector>,
}

impl PriorityScheduler {
    pub fn new(
        config: &SimConfig,
        resources: Arc<ResourceManager>,
        buffer: Arc<SharedBuffer>,
        selector: Arc<dyn WorkloadSelector>,
        collector: Arc<Collector>,
    ) -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            seq: AtomicU64::new(1),
            resources,
            buffer,
            selector,
            quantum: config.quantum,
            retry_backoff: config.retry_backoff,
            stats: AtomicSchedulerStats::new(Policy::Priority),
            collector,
        }
    }

    /// Processes still waiting in the heap
    pub fn queued(&self) -> usize {
        self.heap.lock().len()
    }

    fn push_entry(&self, process: Process, memory: Size) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.heap.lock().push(Entry {
            process,
            memory,
            seq,
        });
    }

    /// Priority of the highest waiting entry, if any
    fn waiting_priority(&self) -> Option<Priority> {
        self.heap.lock().peek().map(|e| e.process.priority)
    }

    fn dispatch(&self, mut process: Process, memory: Size) {
        admit_with_retry(&self.resources, &mut process, memory, self.retry_backoff);
        process.set_state(ProcessState::Running);

        let role = self.selector.select_role(process.pid);
        self.collector.emit(
            Event::new(Severity::Info, Category::Scheduler, Payload::RoleAssigned { role })
                .with_pid(process.pid),
        );

        let mut preempted_by = None;
        while process.remaining() > 0 {
            run_slice(&process, role, &self.buffer, &*self.selector, self.quantum);
            let remaining = process.consume_quantum();
            self.stats.inc_quanta();
            self.collector.emit(
                Event::new(
                    Severity::Debug,
                    Category::Scheduler,
                    Payload::QuantumExecuted { remaining },
                )
                .with_pid(process.pid),
            );

            if remaining == 0 {
                break;
            }

            // Preemption check after every quantum, not at coarser boundaries
            if let Some(waiting) = self.waiting_priority() {
                if waiting > process.priority {
                    preempted_by = Some(waiting);
                    break;
                }
            }
        }

        // Released unconditionally, on suspension and exhaustion alike
        self.resources.release(&mut process, memory);

        if let Some(by_priority) = preempted_by {
            self.stats.inc_preemptions();
            self.collector.emit(
                Event::new(
                    Severity::Info,
                    Category::Scheduler,
                    Payload::ProcessPreempted { by_priority },
                )
                .with_pid(process.pid),
            );
        }

        if process.remaining() > 0 {
            process.set_state(ProcessState::Queued);
            self.stats.inc_requeues();
            self.collector.emit(
                Event::new(
                    Severity::Info,
                    Category::Scheduler,
                    Payload::ProcessRequeued {
                        remaining: process.remaining(),
                    },
                )
                .with_pid(process.pid),
            );
            self.push_entry(process, memory);
        } else {
            process.set_state(ProcessState::Completed);
            self.stats.inc_completed();
            self.collector.emit(
                Event::new(Severity::Info, Category::Scheduler, Payload::ProcessCompleted)
                    .with_pid(process.pid),
            );
        }
    }
}

impl Scheduler for PriorityScheduler {
    fn submit(&self, process: Process, memory: Size) {
        self.collector.emit(
            Event::new(
                Severity::Info,
                Category::Scheduler,
                Payload::ProcessSubmitted {
                    priority: process.priority,
                    quota: process.remaining(),
                },
            )
            .with_pid(process.pid),
        );
        self.stats.inc_submitted();
        self.push_entry(process, memory);
    }

    fn run(&self) {
        loop {
            let entry = self.heap.lock().pop();
            let Some(Entry {
                process, memory, ..
            }) = entry
            else {
                break;
            };
            self.dispatch(process, memory);
        }
        info!("priority heap drained");
    }

    fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }
}
