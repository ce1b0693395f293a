//! Looping input sequences.
//!
//! Camera feeds at the boundary are either a still image (the same frame
//! forever) or a recorded clip that rewinds when it runs out. Both reduce to
//! a finite sequence that restarts at its first element on exhaustion.

/// A finite, non-empty sequence read one element per tick, wrapping back to
/// the start after the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopingFeed<T> {
    items: Vec<T>,
    cursor: usize,
    laps: u64,
}

impl<T> LoopingFeed<T> {
    /// Returns `None` for an empty sequence, which could never yield a value.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            cursor: 0,
            laps: 0,
        })
    }

    /// Return the current element and move to the next, rewinding to the
    /// first element after the last.
    pub fn advance(&mut self) -> &T {
        let index = self.cursor;
        self.cursor += 1;
        if self.cursor == self.items.len() {
            self.cursor = 0;
            self.laps += 1;
        }
        &self.items[index]
    }

    /// The element the next [`LoopingFeed::advance`] will return.
    pub fn peek(&self) -> &T {
        &self.items[self.cursor]
    }

    /// Rewind to the first element and reset the lap counter.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.laps = 0;
    }

    /// Index of the next element to be returned.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Completed passes over the whole sequence.
    pub fn laps(&self) -> u64 {
        self.laps
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
