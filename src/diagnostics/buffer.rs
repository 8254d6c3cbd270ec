// SPDX-License-Identifier: MPL-2.0
//! Circular buffer implementation for diagnostic event storage.
//!
//! This module provides a memory-bounded ring buffer that automatically
//! evicts the oldest entries when capacity is reached.

use std::collections::VecDeque;

/// Buffer capacity bounds.
pub mod buffer_capacity_bounds {
    pub const MIN: usize = 16;
    pub const MAX: usize = 10_000;
    pub const DEFAULT: usize = 500;
}

/// Number of events kept in memory, clamped to [`buffer_capacity_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

/// A generic circular buffer with fixed capacity.
///
/// When the buffer is full, pushing a new element evicts the oldest one.
/// Elements are stored in chronological order (oldest first).
///
/// # Example
///
/// ```
/// use goru_frame::diagnostics::{BufferCapacity, CircularBuffer};
///
/// let mut buffer: CircularBuffer<i32> = CircularBuffer::new(BufferCapacity::default());
///
/// buffer.push(1);
/// buffer.push(2);
///
/// let items: Vec<_> = buffer.iter().copied().collect();
/// assert_eq!(items, vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Creates a buffer with an unchecked capacity (at least 1).
    #[must_use]
    pub fn with_raw_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes an element to the buffer, evicting the oldest if at capacity.
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_clamps_to_valid_range() {
        assert_eq!(BufferCapacity::new(0).value(), buffer_capacity_bounds::MIN);
        assert_eq!(
            BufferCapacity::new(1_000_000).value(),
            buffer_capacity_bounds::MAX
        );
        assert_eq!(BufferCapacity::new(300).value(), 300);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buffer: CircularBuffer<i32> = CircularBuffer::with_raw_capacity(3);
        for i in 1..=5 {
            buffer.push(i);
        }
        let items: Vec<_> = buffer.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buffer: CircularBuffer<i32> = CircularBuffer::with_raw_capacity(5);
        buffer.push(1);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn zero_raw_capacity_still_holds_one() {
        let mut buffer: CircularBuffer<&str> = CircularBuffer::with_raw_capacity(0);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }
}
