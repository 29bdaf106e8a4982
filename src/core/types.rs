/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (higher is more urgent)
pub type Priority = u8;

/// Remaining execution quota, counted in quantum units
pub type Quanta = u32;

/// Size type for memory quantities (MB in the default configuration)
pub type Size = u64;

/// Payload carried through the shared buffer
pub type Item = u64;
