//! In-process document store.
//!
//! Each [`Collection`] is a concurrent map keyed by document id. Writes to a
//! single document are atomic (they run under the shard lock); listing
//! returns documents in insertion order.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

use crate::records::{Booking, Employee, InventoryItem, Issue, Supplier};

#[derive(Debug, Clone)]
struct Slot<T> {
    seq: u64,
    doc: T,
}

/// A thread-safe collection of documents of one kind.
#[derive(Debug)]
pub struct Collection<T> {
    docs: DashMap<Uuid, Slot<T>>,
    next_seq: AtomicU64,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn insert(&self, id: Uuid, doc: T) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.docs.insert(id, Slot { seq, doc });
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.docs.get(id).map(|slot| slot.doc.clone())
    }

    /// Every document, oldest first.
    pub fn list(&self) -> Vec<T> {
        let mut slots: Vec<_> = self.docs.iter().map(|r| r.value().clone()).collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.doc).collect()
    }

    /// Mutate one document in place and return the new version.
    pub fn update<F>(&self, id: &Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut slot = self.docs.get_mut(id)?;
        f(&mut slot.doc);
        Some(slot.doc.clone())
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.docs.remove(id).map(|(_, slot)| slot.doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All collections served by the API.
#[derive(Debug, Default)]
pub struct Store {
    pub bookings: Collection<Booking>,
    pub inventory: Collection<InventoryItem>,
    pub employees: Collection<Employee>,
    pub suppliers: Collection<Supplier>,
    pub issues: Collection<Issue>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
