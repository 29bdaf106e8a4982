/*!
 * Monitoring
 * Structured event reporting for the simulation
 */

mod collector;
mod events;

pub use collector::Collector;
pub use events::{Category, Event, Payload, Severity};
