/*!
 * schedsim - Main Entry Point
 *
 * Driver glue around the simulation core:
 * - configuration from SCHEDSIM_* environment variables
 * - random batch generation (pids, priorities, quotas, memory requirements)
 * - policy selection from the command line
 */

use log::info;
use rand::Rng;
use schedsim::{
    Collector, FcfsScheduler, Policy, PriorityScheduler, Process, RandomSelector, ResourceManager,
    Scheduler, SharedBuffer, SimConfig,
};
use std::error::Error;
use std::sync::Arc;

/// Batch size of the reference run
const PROCESS_COUNT: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let policy = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<Policy>()?,
        None => Policy::Fcfs,
    };

    let config = SimConfig::from_env()?;
    config.validate()?;
    info!(
        "starting simulation: policy={}, processors={}, memory={} MB, buffer capacity={}",
        policy.as_str(),
        config.processors,
        config.total_memory,
        config.buffer_capacity
    );

    let collector = Arc::new(Collector::with_capacity(config.event_history));
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
    let selector = Arc::new(RandomSelector::new());

    let scheduler: Box<dyn Scheduler> = match policy {
        Policy::Fcfs => Box::new(FcfsScheduler::new(
            &config,
            resources.clone(),
            buffer.clone(),
            selector,
            collector.clone(),
        )),
        Policy::Priority => Box::new(PriorityScheduler::new(
            &config,
            resources.clone(),
            buffer.clone(),
            selector,
            collector.clone(),
        )),
    };

    let mut rng = rand::thread_rng();
    for _ in 0..PROCESS_COUNT {
        let process = Process::new(
            rng.gen_range(1..=1000),
            rng.gen_range(1..=10),
            rng.gen_range(3..=6),
        );
        let memory = rng.gen_range(256..=1024);
        scheduler.submit(process, memory);
    }

    scheduler.run();

    info!(
        "scheduler stats: {}",
        serde_json::to_string(&scheduler.stats())?
    );
    info!(
        "resource stats: {}",
        serde_json::to_string(&resources.stats())?
    );
    info!(
        "buffer: {} item(s) left unconsumed, {} event(s) dropped from history",
        buffer.len(),
        collector.dropped()
    );
    info!("simulation complete");
    Ok(())
}
