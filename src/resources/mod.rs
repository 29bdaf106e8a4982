/*!
 * Resource Management
 * Admission and release of processes against finite processor slots and memory
 */

mod manager;

pub use manager::{ResourceManager, ResourceStats};
