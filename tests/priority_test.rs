/*!
 * Priority Scheduler Tests
 * Heap dispatch order, preemption, requeueing, and quota conservation
 */

use pretty_assertions::assert_eq;
use schedsim::{
    Collector, FixedSelector, Payload, PriorityScheduler, Process, ResourceManager, Role,
    Scheduler, SharedBuffer, SimConfig,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn config_with_quantum(quantum: Duration) -> SimConfig {
    SimConfig {
        processors: 2,
        total_memory: 4096,
        buffer_capacity: 8,
        quantum,
        retry_backoff: Duration::from_millis(1),
        buffer_timeout: Duration::from_millis(10),
        ..Default::default()
    }
}

fn scheduler_with_collector(config: &SimConfig) -> (Arc<PriorityScheduler>, Arc<Collector>) {
    let collector = Arc::new(Collector::new());
    let resources = Arc::new(ResourceManager::new(
        config.processors,
        config.total_memory,
        collector.clone(),
    ));
    let buffer = Arc::new(SharedBuffer::new(
        config.buffer_capacity,
        config.buffer_timeout,
        collector.clone(),
    ));
    let scheduler = Arc::new(PriorityScheduler::new(
        config,
        resources,
        buffer,
        Arc::new(FixedSelector::new(Role::Compute)),
        collector.clone(),
    ));
    (scheduler, collector)
}

fn completion_order(collector: &Collector) -> Vec<u32> {
    collector
        .events()
        .iter()
        .filter(|e| matches!(e.payload, Payload::ProcessCompleted))
        .filter_map(|e| e.pid)
        .collect()
}

#[test]
fn test_dispatch_in_priority_order() {
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(Duration::ZERO));

    scheduler.submit(Process::new(1, 3, 3), 256);
    scheduler.submit(Process::new(2, 8, 3), 256);
    scheduler.submit(Process::new(3, 5, 3), 256);
    scheduler.run();

    assert_eq!(completion_order(&collector), vec![2, 3, 1]);
}

#[test]
fn test_equal_priorities_complete_in_submission_order() {
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(Duration::ZERO));

    scheduler.submit(Process::new(10, 5, 3), 256);
    scheduler.submit(Process::new(20, 5, 3), 256);
    scheduler.submit(Process::new(30, 5, 3), 256);
    scheduler.run();

    assert_eq!(completion_order(&collector), vec![10, 20, 30]);
}

#[test]
fn test_higher_priority_arrival_preempts_running_process() {
    // Reference scenario: P1 (priority 1, quota 4) is mid-execution when
    // P2 (priority 5, quota 2) arrives; P1 is suspended after its current
    // quantum, P2 runs to completion, P1 resumes and finishes
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(
        Duration::from_millis(25),
    ));

    scheduler.submit(Process::new(1, 1, 4), 256);

    let runner = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || scheduler.run())
    };

    // Let P1 get through its first quantum, then submit the urgent arrival
    thread::sleep(Duration::from_millis(35));
    scheduler.submit(Process::new(2, 5, 2), 256);
    runner.join().unwrap();

    // P2 completes before P1
    assert_eq!(completion_order(&collector), vec![2, 1]);

    // P1 was preempted by priority 5 with quota still remaining
    let preemptions: Vec<_> = collector
        .events_for(1)
        .into_iter()
        .filter_map(|e| match e.payload {
            Payload::ProcessPreempted { by_priority } => Some(by_priority),
            _ => None,
        })
        .collect();
    assert_eq!(preemptions, vec![5]);

    let requeued: Vec<u32> = collector
        .events_for(1)
        .into_iter()
        .filter_map(|e| match e.payload {
            Payload::ProcessRequeued { remaining } => Some(remaining),
            _ => None,
        })
        .collect();
    assert_eq!(requeued.len(), 1);
    assert!(requeued[0] > 0 && requeued[0] < 4);

    let stats = scheduler.stats();
    assert_eq!(stats.completed, 2);
    assert!(stats.preemptions >= 1);
    assert!(stats.requeues >= 1);
}

#[test]
fn test_quota_conserved_across_suspension() {
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(
        Duration::from_millis(25),
    ));

    scheduler.submit(Process::new(1, 1, 4), 256);
    let runner = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || scheduler.run())
    };
    thread::sleep(Duration::from_millis(35));
    scheduler.submit(Process::new(2, 5, 2), 256);
    runner.join().unwrap();

    // Total quanta executed across all run segments equals the initial quota
    for (pid, quota) in [(1, 4), (2, 2)] {
        let executed = collector.count_where(|e| {
            matches!(e.payload, Payload::QuantumExecuted { .. }) && e.pid == Some(pid)
        });
        assert_eq!(executed, quota, "pid {pid} executed wrong quanta count");
    }
}

#[test]
fn test_no_preemption_by_equal_priority() {
    // Strictly-greater is the preemption condition; an equal-priority
    // arrival waits for the running process to finish
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(
        Duration::from_millis(25),
    ));

    scheduler.submit(Process::new(1, 5, 3), 256);
    let runner = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || scheduler.run())
    };
    thread::sleep(Duration::from_millis(35));
    scheduler.submit(Process::new(2, 5, 2), 256);
    runner.join().unwrap();

    assert_eq!(completion_order(&collector), vec![1, 2]);
    assert_eq!(scheduler.stats().preemptions, 0);
}

#[test]
fn test_heap_drains_to_empty() {
    let (scheduler, _) = scheduler_with_collector(&config_with_quantum(Duration::ZERO));

    for pid in 1..=6 {
        scheduler.submit(Process::new(pid, (pid % 3) as u8 + 1, 3), 256);
    }
    scheduler.run();

    assert_eq!(scheduler.queued(), 0);
    assert_eq!(scheduler.stats().completed, 6);
}

#[test]
fn test_resumed_process_keeps_priority() {
    let (scheduler, collector) = scheduler_with_collector(&config_with_quantum(
        Duration::from_millis(25),
    ));

    scheduler.submit(Process::new(1, 2, 4), 256);
    let runner = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || scheduler.run())
    };
    thread::sleep(Duration::from_millis(35));
    // Two arrivals: one above P1, one below. After the high one finishes,
    // resumed P1 must still outrank the low one.
    scheduler.submit(Process::new(2, 6, 2), 256);
    scheduler.submit(Process::new(3, 1, 2), 256);
    runner.join().unwrap();

    assert_eq!(completion_order(&collector), vec![2, 1, 3]);
}
