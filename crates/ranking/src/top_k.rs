use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Number of items kept when the caller asks for zero or a negative count.
pub const DEFAULT_TOP_COUNT: usize = 5;

/// Map a user supplied count to a usable capacity: non-positive values fall
/// back to [`DEFAULT_TOP_COUNT`].
pub fn normalize_count(requested: i64) -> usize {
    usize::try_from(requested)
        .ok()
        .filter(|&count| count > 0)
        .unwrap_or(DEFAULT_TOP_COUNT)
}

/// Items that can compete for a place in a [`TopK`].
pub trait Ranked {
    type Key: Ord + Copy;

    /// Larger keys rank higher
    fn rank_key(&self) -> Self::Key;
}

/// What [`TopK::offer`] did with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Kept, the set was not full yet
    Inserted,
    /// Kept, the previous minimum was evicted
    Replaced,
    /// Smaller than everything held
    Discarded,
}

struct Slot<T: Ranked> {
    key: T::Key,
    seq: u64,
    item: T,
}

impl<T: Ranked> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<T: Ranked> Eq for Slot<T> {}

impl<T: Ranked> PartialOrd for Slot<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ranked> Ord for Slot<T> {
    // Among equal keys the oldest slot is the smallest, so it is evicted first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Bounded set holding the `capacity` highest ranked items offered so far.
///
/// Backed by a min-heap, so the item to evict is always at the top and both
/// admission and eviction cost O(log capacity). Storage grows with the items
/// actually held, never with the requested capacity.
pub struct TopK<T: Ranked> {
    capacity: usize,
    heap: BinaryHeap<Reverse<Slot<T>>>,
    next_seq: u64,
    discarded: usize,
}

impl<T: Ranked> TopK<T> {
    /// A capacity of zero means [`DEFAULT_TOP_COUNT`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_TOP_COUNT
        } else {
            capacity
        };
        Self {
            capacity,
            heap: BinaryHeap::new(),
            next_seq: 0,
            discarded: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Items rejected or evicted so far
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Offer one item. An item whose key equals the held minimum replaces it.
    pub fn offer(&mut self, item: T) -> Offer {
        let key = item.rank_key();
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(Slot { key, seq, item }));
            return Offer::Inserted;
        }

        match self.heap.peek_mut() {
            Some(mut min) if key >= min.0.key => {
                *min = Reverse(Slot { key, seq, item });
                self.discarded += 1;
                Offer::Replaced
            }
            _ => {
                self.discarded += 1;
                Offer::Discarded
            }
        }
    }

    /// Consume the set, highest key first. Equal keys keep offer order.
    pub fn drain(self) -> Vec<T> {
        let mut slots: Vec<Slot<T>> = self.heap.into_iter().map(|Reverse(slot)| slot).collect();
        slots.sort_by(|a, b| b.key.cmp(&a.key).then_with(|| a.seq.cmp(&b.seq)));
        log::debug!(
            "top-k drained {} item(s), {} discarded",
            slots.len(),
            self.discarded
        );
        slots.into_iter().map(|slot| slot.item).collect()
    }
}
