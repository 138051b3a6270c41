//! Array-backed min-priority queue of search states.
//!
//! The queue stores `(state, priority)` entries in a binary min-heap laid out
//! in a single buffer (children of `i` live at `2i + 1` and `2i + 2`). Storage
//! grows lazily through the capacity sequence 0, 1, 3, 7, 15, ... and never
//! shrinks.
//!
//! Ownership follows copy-on-insert / move-on-extract: [`StateQueue::push`]
//! clones the caller's state, [`StateQueue::pop`] hands the stored copy back to
//! the caller, and any states still resident when the queue is dropped are
//! released with it.

use std::collections::TryReserveError;
use std::fmt;
use std::io;
use std::mem;

use thiserror::Error;

use crate::config::QueueConfig;
use crate::{log_changes, log_debug};

/// Errors raised while sizing or growing queue storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Size hint must be positive")]
    InvalidSizeHint,
    #[error("Queue capacity overflow: {requested} entries exceed the addressable size")]
    CapacityOverflow { requested: usize },
    #[error("Failed to allocate storage for {capacity} entries")]
    AllocationFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

/// A resident `(state, priority)` pair.
#[derive(Debug)]
struct Entry<S> {
    state: S,
    priority: i32,
}

/// Min-priority queue owning a private copy of every resident state.
///
/// Lower priorities are extracted first. Ties are unordered.
#[derive(Debug)]
pub struct StateQueue<S> {
    /// Live entries in heap order; `entries.len()` is the resident count.
    entries: Vec<Entry<S>>,
    /// Logical capacity, always of the form 2^k - 1.
    capacity: usize,
    verbosity: u8,
}

/// Round a size hint up to the next power of two, minus one.
fn initial_capacity(size_hint: usize) -> Result<usize, QueueError> {
    if size_hint == 0 {
        return Err(QueueError::InvalidSizeHint);
    }
    size_hint
        .checked_next_power_of_two()
        .map(|p| p - 1)
        .ok_or(QueueError::CapacityOverflow {
            requested: size_hint,
        })
}

impl<S> StateQueue<S> {
    /// Create an empty queue sized for `size_hint` states.
    ///
    /// A hint of 1 yields capacity 0, so the first insertion grows once.
    pub fn with_size_hint(size_hint: usize) -> Result<Self, QueueError> {
        Self::with_config(&QueueConfig {
            size_hint,
            ..QueueConfig::default()
        })
    }

    /// Create an empty queue from a configuration.
    pub fn with_config(config: &QueueConfig) -> Result<Self, QueueError> {
        let capacity = initial_capacity(config.size_hint)?;
        let mut entries = Vec::new();
        reserve_slots(&mut entries, capacity)?;
        Ok(Self {
            entries,
            capacity,
            verbosity: config.verbosity,
        })
    }

    /// Number of resident states.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allocated slot count. Only ever grows.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Priority of the state that the next `pop` would return.
    pub fn peek_priority(&self) -> Option<i32> {
        self.entries.first().map(|e| e.priority)
    }

    /// Resident priorities in internal array order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|e| e.priority)
    }

    /// Insert a state the caller already owns, without copying it.
    ///
    /// On error the queue is left untouched and `state` is dropped.
    pub fn push_owned(&mut self, state: S, priority: i32) -> Result<(), QueueError> {
        if self.is_full() {
            self.extend()?;
        }
        self.entries.push(Entry { state, priority });
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }

    /// Remove the lowest-priority state, transferring it to the caller.
    ///
    /// Returns `None` on an empty queue; count and capacity are unchanged.
    pub fn pop(&mut self) -> Option<S> {
        self.pop_with_priority().map(|(state, _)| state)
    }

    /// Like [`pop`](Self::pop), but also returns the priority it was stored under.
    pub fn pop_with_priority(&mut self) -> Option<(S, i32)> {
        if self.entries.is_empty() {
            return None;
        }
        // Moves the last live entry into the root slot.
        let root = self.entries.swap_remove(0);
        self.sift_down(0);
        Some((root.state, root.priority))
    }

    /// Release every resident state and the storage.
    ///
    /// Returns the number of states released. Dropping the queue does the same.
    pub fn finalize(self) -> usize {
        let released = self.entries.len();
        log_debug!(
            self.verbosity,
            "finalize: releasing {} resident states (capacity={})",
            released,
            self.capacity
        );
        released
    }

    /// Write count, capacity and the priorities, one heap level per line.
    pub fn write_dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "count={}, capacity={}", self.len(), self.capacity)?;
        let mut row_end = 1;
        for (i, priority) in self.priorities().enumerate() {
            if i == row_end {
                writeln!(out)?;
                row_end = (row_end << 1) + 1;
            } else if i > 0 {
                write!(out, " ")?;
            }
            write!(out, "{}", priority)?;
        }
        writeln!(out)
    }

    pub fn dump_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dump(&mut out);
        out
    }

    /// Write the dump to an I/O sink, one `dump:`-prefixed line per row.
    pub fn dump_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.dump_string().lines() {
            writeln!(out, "dump: {}", line)?;
        }
        Ok(())
    }

    /// Write the dump to stderr. Explicit dumps ignore the verbosity level.
    pub fn dump(&self) {
        let _ = self.dump_to(&mut io::stderr().lock());
    }

    /// Grow storage to `2 * capacity + 1` slots.
    fn extend(&mut self) -> Result<(), QueueError> {
        let new_capacity = self
            .capacity
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .ok_or(QueueError::CapacityOverflow {
                requested: self.capacity,
            })?;
        reserve_slots(&mut self.entries, new_capacity)?;
        log_changes!(
            self.verbosity,
            "queue grew: capacity {} -> {}",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].priority >= self.entries[parent].priority {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            // Ties between the children go left.
            let child = if right < len && self.entries[right].priority < self.entries[left].priority
            {
                right
            } else {
                left
            };
            if self.entries[i].priority <= self.entries[child].priority {
                break;
            }
            self.entries.swap(i, child);
            i = child;
        }
    }
}

impl<S: Clone> StateQueue<S> {
    /// Insert a private copy of `state` with the given priority.
    pub fn push(&mut self, state: &S, priority: i32) -> Result<(), QueueError> {
        if self.is_full() {
            self.extend()?;
        }
        self.push_owned(state.clone(), priority)
    }
}

/// Make room for `capacity` entries in total, refusing sizes past `isize::MAX` bytes.
fn reserve_slots<S>(entries: &mut Vec<Entry<S>>, capacity: usize) -> Result<(), QueueError> {
    let fits = capacity
        .checked_mul(mem::size_of::<Entry<S>>())
        .is_some_and(|bytes| bytes <= isize::MAX as usize);
    if !fits {
        return Err(QueueError::CapacityOverflow {
            requested: capacity,
        });
    }
    entries
        .try_reserve_exact(capacity - entries.len())
        .map_err(|source| QueueError::AllocationFailed { capacity, source })
}
