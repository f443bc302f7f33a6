//! Shared upper bound for pruning a date lookup

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// An upper bound on the numbers still worth fetching
///
/// Shared by every task of one scan. The bound only ever shrinks: lowering
/// is a `fetch_min`, so concurrent writers settle on the smallest value and
/// a reader can at worst observe a stale, larger bound. A stale bound costs
/// an extra fetch but never hides a number that is still below the cutoff.
#[derive(Debug, Clone)]
pub struct PruneHint {
    bound: Arc<AtomicU32>,
}

impl PruneHint {
    /// Creates a hint that initially allows every number up to `upper`
    pub fn new(upper: u32) -> Self {
        Self {
            bound: Arc::new(AtomicU32::new(upper)),
        }
    }

    /// Current bound
    pub fn get(&self) -> u32 {
        self.bound.load(Ordering::Acquire)
    }

    /// Lowers the bound to `bound` unless it is already lower
    ///
    /// Returns the bound in effect before the call.
    pub fn lower_to(&self, bound: u32) -> u32 {
        self.bound.fetch_min(bound, Ordering::AcqRel)
    }

    /// Returns true when `number` lies beyond the bound
    pub fn should_skip(&self, number: u32) -> bool {
        number > self.get()
    }
}
