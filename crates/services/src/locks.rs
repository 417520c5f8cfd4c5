use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slots = DashMap<String, Arc<Mutex<()>>>;

/// Serializes read-modify-write cycles per entity key.
///
/// Stores only offer whole-record writes, so two concurrent mutations of the
/// same record would otherwise lose one update. Holding the guard across
/// load → mutate → save keeps them ordered within this process.
///
/// A key's slot lives only while someone holds or waits for it.
#[derive(Default)]
pub(crate) struct KeyedLocks {
    slots: Arc<Slots>,
}

/// Held lock on one key. Releasing the last claim on a key frees its slot.
pub(crate) struct KeyGuard {
    slots: Arc<Slots>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub(crate) async fn acquire(&self, key: &str) -> KeyGuard {
        // the clone is taken under the shard lock, so a slot with waiters is
        // never seen as unclaimed
        let lock = self.slots.entry(key.to_owned()).or_default().clone();
        let guard = lock.lock_owned().await;
        KeyGuard {
            slots: self.slots.clone(),
            key: key.to_owned(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // the mutex guard holds its own Arc; release it before counting
        self.guard.take();
        self.slots
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
