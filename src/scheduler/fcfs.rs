/*!
 * FCFS Scheduler
 * Non-preemptive first-come-first-served dispatch
 *
 * Strictly sequential: the head of the queue blocks on admission until the
 * resource manager grants it, runs its entire quota uninterrupted, and only
 * then does the next entry get a turn.
 */

use super::stats::{AtomicSchedulerStats, SchedulerStats};
use super::{admit_with_retry, Policy, Scheduler};
use crate::core::config::SimConfig;
use crate::core::types::Size;
use crate::ipc::SharedBuffer;
use crate::monitoring::{Category, Collector, Event, Payload, Severity};
use crate::process::types::{Process, ProcessState};
use crate::process::workload::{run_slice, WorkloadSelector};
use crate::resources::ResourceManager;
use log::info;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

struct Submission {
    process: Process,
    memory: Size,
}

/// First-come-first-served scheduler
pub struct FcfsScheduler {
    queue: Mutex<VecDeque<Submission>>,
    resources: Arc<ResourceManager>,
    buffer: Arc<SharedBuffer>,
    selector: Arc<dyn WorkloadSelector>,
    quantum: Duration,
    retry_backoff: Duration,
    stats: AtomicSchedulerStats,
    collector: Arc<Collector>,
}

impl FcfsScheduler {
    pub fn new(
        config: &SimConfig,
        resources: Arc<ResourceManager>,
        buffer: Arc<SharedBuffer>,
        selector: Arc<dyn WorkloadSelector>,
        collector: Arc<Collector>,
    ) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            resources,
            buffer,
            selector,
            quantum: config.quantum,
            retry_backoff: config.retry_backoff,
            stats: AtomicSchedulerStats::new(Policy::Fcfs),
            collector,
        }
    }

    /// Processes still waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    fn dispatch(&self, mut process: Process, memory: Size) {
        admit_with_retry(&self.resources, &mut process, memory, self.retry_backoff);
        process.set_state(ProcessState::Running);

        let role = self.selector.select_role(process.pid);
        self.collector.emit(
            Event::new(Severity::Info, Category::Scheduler, Payload::RoleAssigned { role })
                .with_pid(process.pid),
        );

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
        }

        self.resources.release(&mut process, memory);
        process.set_state(ProcessState::Completed);
        self.stats.inc_completed();
        self.collector.emit(
            Event::new(Severity::Info, Category::Scheduler, Payload::ProcessCompleted)
                .with_pid(process.pid),
        );
    }
}

impl Scheduler for FcfsScheduler {
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
        self.queue.lock().push_back(Submission { process, memory });
    }

    fn run(&self) {
        loop {
            let submission = self.queue.lock().pop_front();
            let Some(Submission { process, memory }) = submission else {
                break;
            };
            self.dispatch(process, memory);
        }
        info!("fcfs queue drained");
    }

    fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }
}
