//! Priority keys and open-queue entries.

use std::cmp::Ordering;

use crate::core::Cell;

/// Two-part D* Lite priority, compared lexicographically.
///
/// `k1 = min(g, rhs) + h(start, cell) + k_m`, `k2 = min(g, rhs)`.
#[derive(Clone, Copy, Debug)]
pub struct Key {
    pub k1: f64,
    pub k2: f64,
}

impl Key {
    #[inline]
    pub fn new(k1: f64, k2: f64) -> Self {
        Self { k1, k2 }
    }

    /// Key of a cell that has not been discovered
    pub const INFINITE: Key = Key {
        k1: f64::INFINITY,
        k2: f64::INFINITY,
    };
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k1
            .total_cmp(&other.k1)
            .then_with(|| self.k2.total_cmp(&other.k2))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entry in the open queue.
///
/// The key is a snapshot taken at push time and may be stale by the time
/// the entry is popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct QueueEntry {
    pub key: Key,
    pub cell: Cell,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower key = higher priority)
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
