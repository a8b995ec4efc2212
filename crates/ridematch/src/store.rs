//! Append-only collection of completed rides.

use crate::ride::Ride;
use parking_lot::RwLock;

/// Completed rides in the order their matches finished.
///
/// Appends take a short write lock; readers clone a consistent snapshot. The
/// store never removes entries, so its length only grows.
#[derive(Debug, Default)]
pub struct RideStore {
    rides: RwLock<Vec<Ride>>,
}

impl RideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, ride: Ride) {
        self.rides.write().push(ride);
    }

    /// Clones every ride stored so far.
    pub fn snapshot(&self) -> Vec<Ride> {
        self.rides.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rides.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RideId, RideKind};
    use std::{sync::Arc, thread::scope};

    fn ride(id: u64) -> Ride {
        Ride::new(RideId::new(id), "Start", "End", 5.0, RideKind::Standard)
    }

    #[test]
    fn snapshot_preserves_append_order() {
        let store = RideStore::new();
        assert!(store.is_empty());
        store.append(ride(2));
        store.append(ride(0));
        store.append(ride(1));

        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id().to_raw()).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let store = RideStore::new();
        store.append(ride(0));
        let before = store.snapshot();
        store.append(ride(1));
        assert_eq!(before.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn concurrent_appends_are_all_kept_and_length_never_shrinks() {
        const WRITERS: u64 = 4;
        const PER_WRITER: u64 = 250;

        let store = Arc::new(RideStore::new());
        scope(|s| {
            for w in 0..WRITERS {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    for i in 0..PER_WRITER {
                        store.append(ride(w * PER_WRITER + i));
                    }
                });
            }

            let store = Arc::clone(&store);
            s.spawn(move || {
                let mut last = 0;
                while last < (WRITERS * PER_WRITER) as usize {
                    let now = store.snapshot().len();
                    assert!(now >= last, "store shrank from {last} to {now}");
                    last = now;
                }
            });
        });

        let mut ids: Vec<_> = store.snapshot().iter().map(|r| r.id().to_raw()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..WRITERS * PER_WRITER).collect::<Vec<_>>());
    }
}
