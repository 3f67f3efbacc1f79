//! Output contracts from observers and schedulers.
//!
//! Presentation layers read the state on every render; events only signal
//! that a re-render is worthwhile.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Emitted once per observer lifetime, when the latch closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityEvent {
    BecameVisible,
}

/// Changes to a scheduler's visible index set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RevealEvent {
    /// The set was emptied (list changed or became empty).
    Cleared,
    /// Indices `start..end` became visible.
    Revealed { start: usize, end: usize },
}

impl RevealEvent {
    /// Indices revealed by this event, empty for `Cleared`.
    pub fn revealed(&self) -> Range<usize> {
        match self {
            RevealEvent::Cleared => 0..0,
            RevealEvent::Revealed { start, end } => *start..*end,
        }
    }
}

/// Revealed indices of a list. Always the prefix `[0, len)`, so only the
/// length is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleIndexSet {
    len: usize,
}

impl VisibleIndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full set `[0, len)`.
    pub fn all(len: usize) -> Self {
        Self { len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.len
    }

    pub fn iter(&self) -> Range<usize> {
        0..self.len
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Grow the prefix up to `len`, returning the newly added range.
    pub(crate) fn extend_to(&mut self, len: usize) -> Range<usize> {
        let start = self.len;
        self.len = self.len.max(len);
        start..self.len
    }
}
