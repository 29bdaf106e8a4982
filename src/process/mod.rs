/*!
 * Process Module
 * Schedulable units and their workload execution
 */

pub mod types;
pub mod workload;

pub use types::{Process, ProcessState, ResourceGrant, Role};
pub use workload::{run_slice, FixedSelector, RandomSelector, WorkloadSelector};
