/*!
 * Shared Buffer
 * Fixed-capacity FIFO with blocking-with-timeout produce/consume
 *
 * Two complementary counters track production slots and consumable items;
 * `queue.len() + free_slots == capacity` and `available_items == queue.len()`
 * hold whenever the mutex is unheld. Waits use a condvar deadline, so there
 * is no busy-polling and no lost wakeup under concurrent producers and
 * consumers. A timed-out operation is abandoned and reported; the buffer
 * never retries on the caller's behalf.
 */

use crate::core::errors::{BufferError, BufferResult};
use crate::core::types::{Item, Pid};
use crate::monitoring::{Category, Collector, Event, Payload, Severity};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct BufferState {
    queue: VecDeque<Item>,
    free_slots: usize,
    available_items: usize,
}

/// Capacity-bounded producer/consumer buffer
pub struct SharedBuffer {
    state: Mutex<BufferState>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    timeout: Duration,
    collector: Arc<Collector>,
}

impl SharedBuffer {
    pub fn new(capacity: usize, timeout: Duration, collector: Arc<Collector>) -> Self {
        Self {
            state: Mutex::new(BufferState {
                queue: VecDeque::with_capacity(capacity),
                free_slots: capacity,
                available_items: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            timeout,
            collector,
        }
    }

    /// Enqueue an item, blocking up to the configured timeout for a free slot
    ///
    /// A timeout is a dropped write, not an error that aborts the caller.
    pub fn produce(&self, item: Item, pid: Pid) -> BufferResult<()> {
        let deadline = Instant::now() + self.timeout;
        let mut state = self.state.lock();

        while state.free_slots == 0 {
            if self.not_full.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        if state.free_slots == 0 {
            drop(state);
            let timeout_ms = self.timeout.as_millis() as u64;
            self.collector.emit(
                Event::new(
                    Severity::Warn,
                    Category::Buffer,
                    Payload::ProduceTimeout { timeout_ms },
                )
                .with_pid(pid),
            );
            return Err(BufferError::Full { timeout_ms });
        }

        state.free_slots -= 1;
        state.queue.push_back(item);
        state.available_items += 1;
        debug_assert_eq!(state.queue.len() + state.free_slots, self.capacity);
        let occupancy = state.queue.len();
        drop(state);

        self.not_empty.notify_one();
        self.collector.emit(
            Event::new(
                Severity::Info,
                Category::Buffer,
                Payload::ItemProduced { item, occupancy },
            )
            .with_pid(pid),
        );
        Ok(())
    }

    /// Dequeue the oldest item, blocking up to the configured timeout
    pub fn consume(&self, pid: Pid) -> BufferResult<Item> {
        let deadline = Instant::now() + self.timeout;
        let mut state = self.state.lock();

        while state.available_items == 0 {
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        if state.available_items == 0 {
            drop(state);
            let timeout_ms = self.timeout.as_millis() as u64;
            self.collector.emit(
                Event::new(
                    Severity::Warn,
                    Category::Buffer,
                    Payload::ConsumeTimeout { timeout_ms },
                )
                .with_pid(pid),
            );
            return Err(BufferError::Empty { timeout_ms });
        }

        state.available_items -= 1;
        // available_items mirrors queue.len(), so the pop cannot fail here
        let item = state
            .queue
            .pop_front()
            .expect("consume permit without queued item");
        state.free_slots += 1;
        debug_assert_eq!(state.queue.len() + state.free_slots, self.capacity);
        let occupancy = state.queue.len();
        drop(state);

        self.not_full.notify_one();
        self.collector.emit(
            Event::new(
                Severity::Info,
                Category::Buffer,
                Payload::ItemConsumed { item, occupancy },
            )
            .with_pid(pid),
        );
        Ok(item)
    }

    /// Items currently queued
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(capacity: usize) -> SharedBuffer {
        SharedBuffer::new(
            capacity,
            Duration::from_millis(10),
            Arc::new(Collector::new()),
        )
    }

    #[test]
    fn test_produce_then_consume() {
        let buf = buffer(2);
        buf.produce(7, 1).unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.consume(2).unwrap(), 7);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let buf = buffer(3);
        buf.produce(1, 1).unwrap();
        buf.produce(2, 1).unwrap();
        buf.produce(3, 1).unwrap();

        assert_eq!(buf.consume(2).unwrap(), 1);
        assert_eq!(buf.consume(2).unwrap(), 2);
        assert_eq!(buf.consume(2).unwrap(), 3);
    }

    #[test]
    fn test_produce_times_out_when_full() {
        let buf = buffer(1);
        buf.produce(7, 1).unwrap();

        let err = buf.produce(9, 1).unwrap_err();
        assert!(matches!(err, BufferError::Full { .. }));

        // The dropped write must not corrupt the queue
        assert_eq!(buf.consume(2).unwrap(), 7);
    }

    #[test]
    fn test_consume_times_out_when_empty() {
        let buf = buffer(1);
        let err = buf.consume(1).unwrap_err();
        assert!(matches!(err, BufferError::Empty { .. }));
    }
}
