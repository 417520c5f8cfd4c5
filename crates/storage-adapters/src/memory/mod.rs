//! In-memory stores.
//!
//! Records are kept whole and cloned on the way in and out, so callers never
//! share a mutable collection with the store.

mod comments;
mod notifications;
mod users;

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

pub use comments::InMemoryCommentRepository;
pub use notifications::InMemoryNotificationRepository;
pub use users::InMemoryUserRepository;

struct Slot<T> {
    /// Assigned on first insert; replacing a record keeps its position.
    seq: u64,
    value: T,
}

/// A concurrent map that remembers insertion order.
struct SequencedMap<T> {
    slots: DashMap<String, Slot<T>>,
    next_seq: AtomicU64,
}

impl<T: Clone> SequencedMap<T> {
    fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    fn upsert(&self, key: String, value: T) {
        let mut slot = self.slots.entry(key).or_insert_with(|| Slot {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            value: value.clone(),
        });
        slot.value = value;
    }

    fn get(&self, key: &str) -> Option<T> {
        self.slots.get(key).map(|slot| slot.value.clone())
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn remove(&self, key: &str) {
        self.slots.remove(key);
    }

    /// Matching values with their insertion sequence, oldest first.
    fn collect_where(&self, mut keep: impl FnMut(&T) -> bool) -> Vec<(u64, T)> {
        let mut rows: Vec<(u64, T)> = self
            .slots
            .iter()
            .filter(|slot| keep(&slot.value))
            .map(|slot| (slot.seq, slot.value.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows
    }

    fn values_where(&self, keep: impl FnMut(&T) -> bool) -> Vec<T> {
        self.collect_where(keep)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }
}
