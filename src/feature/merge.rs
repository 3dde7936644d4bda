//! Strategies for combining per-item fit results into one fitted state.

use std::collections::BTreeSet;

/// Combines two partial fit results. Must be associative: the executor
/// folds shards independently before folding the shard results.
pub trait MergeStrategy<P> {
    fn merge(&self, left: P, right: P) -> P;
}

/// Pairwise set union.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetUnion;

/// Keeps the right-hand (later in input order) partial.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLast;

/// Values that can be unioned element-wise.
pub trait Unionable {
    fn union_with(self, other: Self) -> Self;
}

impl<T: Ord> Unionable for BTreeSet<T> {
    fn union_with(mut self, mut other: Self) -> Self {
        if self.len() < other.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.append(&mut other);
        self
    }
}

/// Position-wise union; the shorter side is padded with empty sets.
impl<T: Ord> Unionable for Vec<BTreeSet<T>> {
    fn union_with(self, other: Self) -> Self {
        let (mut long, short) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (slot, set) in long.iter_mut().zip(short) {
            let merged = std::mem::take(slot).union_with(set);
            *slot = merged;
        }
        long
    }
}

impl<A: Unionable, B: Unionable> Unionable for (A, B) {
    fn union_with(self, other: Self) -> Self {
        (self.0.union_with(other.0), self.1.union_with(other.1))
    }
}

impl<P: Unionable> MergeStrategy<P> for SetUnion {
    fn merge(&self, left: P, right: P) -> P {
        left.union_with(right)
    }
}

impl<P> MergeStrategy<P> for KeepLast {
    fn merge(&self, _left: P, right: P) -> P {
        right
    }
}
