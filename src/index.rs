//! The coupled index-plus-recency-list structure backing
//! [`LruCache`](crate::LruCache).
//!
//! Entries live in a slab arena of slots threaded with an intrusive
//! doubly-linked list running from the most-recently-used slot (`head`) to
//! the least-recently-used slot (`tail`), while a raw hash table maps each
//! key to the pointer of its slot. The two structures are always mutated
//! together; the tail slot is always the next eviction victim.

use std::hash::{BuildHasher, Hash};

use hashbrown::HashTable;
use slab::Slab;

use crate::RandomState;

/// Handle to a slot in the arena. `usize::MAX` is the null sentinel, which
/// keeps the handle a single word and `Option`-free in the hot link fields.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct Ptr(usize);

impl std::fmt::Debug for Ptr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "Ptr(null)")
        } else {
            write!(f, "Ptr({})", self.0)
        }
    }
}

impl Default for Ptr {
    fn default() -> Self {
        Ptr::null()
    }
}

impl Ptr {
    pub(crate) fn null() -> Self {
        Ptr(usize::MAX)
    }

    pub(crate) fn is_null(self) -> bool {
        self == Ptr::null()
    }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert_ne!(index, usize::MAX, "slot index would collide with the null sentinel");
        Ptr(index)
    }

    pub(crate) fn index(self) -> usize {
        debug_assert!(!self.is_null(), "attempted to dereference a null Ptr");
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    // Stored so removal by pointer never has to re-hash the key.
    hash: u64,
    // Toward the most-recently-used end; null for the head.
    newer: Ptr,
    // Toward the least-recently-used end; null for the tail.
    older: Ptr,
}

/// Hash index and recency list over one arena of slots.
///
/// Invariant: the table holds exactly one pointer per occupied slot, and the
/// `newer`/`older` links thread every occupied slot into a single chain from
/// `head` to `tail`.
#[derive(Clone)]
pub(crate) struct RecencyIndex<K, V> {
    table: HashTable<Ptr>,
    slots: Slab<Node<K, V>>,
    head: Ptr,
    tail: Ptr,
    hasher: RandomState,
}

impl<K, V> RecencyIndex<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert_ne!(capacity, usize::MAX, "capacity would collide with the null sentinel");
        RecencyIndex {
            table: HashTable::with_capacity(capacity),
            slots: Slab::with_capacity(capacity),
            head: Ptr::null(),
            tail: Ptr::null(),
            hasher: RandomState::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.slots.clear();
        self.head = Ptr::null();
        self.tail = Ptr::null();
    }

    pub(crate) fn value(&self, ptr: Ptr) -> &V {
        &self.slots[ptr.index()].value
    }

    pub(crate) fn value_mut(&mut self, ptr: Ptr) -> &mut V {
        &mut self.slots[ptr.index()].value
    }

    pub(crate) fn peek_tail(&self) -> Option<(&K, &V)> {
        if self.tail.is_null() {
            return None;
        }
        let node = &self.slots[self.tail.index()];
        Some((&node.key, &node.value))
    }

    /// Moves the slot to the most-recently-used position. No-op if it is
    /// already the head.
    pub(crate) fn promote(&mut self, ptr: Ptr) {
        if self.head == ptr {
            return;
        }
        self.unlink(ptr);
        self.attach_head(ptr);
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            ptr: self.tail,
        }
    }

    pub(crate) fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            slots: self.slots,
            ptr: self.tail,
        }
    }

    /// Detaches the slot from the chain, patching its neighbors and the
    /// `head`/`tail` ends. The slot's own links are left stale; callers
    /// either relink or free it.
    fn unlink(&mut self, ptr: Ptr) {
        let node = &self.slots[ptr.index()];
        let (newer, older) = (node.newer, node.older);

        if newer.is_null() {
            self.head = older;
        } else {
            self.slots[newer.index()].older = older;
        }

        if older.is_null() {
            self.tail = newer;
        } else {
            self.slots[older.index()].newer = newer;
        }
    }

    /// Links a detached slot in as the new head.
    fn attach_head(&mut self, ptr: Ptr) {
        let old_head = self.head;
        {
            let node = &mut self.slots[ptr.index()];
            node.newer = Ptr::null();
            node.older = old_head;
        }
        if old_head.is_null() {
            self.tail = ptr;
        } else {
            self.slots[old_head.index()].newer = ptr;
        }
        self.head = ptr;
    }
}

impl<K: Hash + Eq, V> RecencyIndex<K, V> {
    pub(crate) fn find(&self, key: &K) -> Option<Ptr> {
        let hash = self.hasher.hash_one(key);
        self.table
            .find(hash, |ptr| self.slots[ptr.index()].key == *key)
            .copied()
    }

    /// Inserts a key known to be absent, as the most-recently-used entry.
    pub(crate) fn insert_mru(&mut self, key: K, value: V) -> Ptr {
        let hash = self.hasher.hash_one(&key);
        let ptr = Ptr::from_index(self.slots.insert(Node {
            key,
            value,
            hash,
            newer: Ptr::null(),
            older: Ptr::null(),
        }));
        self.table
            .insert_unique(hash, ptr, |ptr| self.slots[ptr.index()].hash);
        self.attach_head(ptr);
        ptr
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hasher.hash_one(key);
        match self
            .table
            .find_entry(hash, |ptr| self.slots[ptr.index()].key == *key)
        {
            Ok(occupied) => {
                let (ptr, _) = occupied.remove();
                self.unlink(ptr);
                let node = self.slots.remove(ptr.index());
                Some((node.key, node.value))
            }
            Err(_) => None,
        }
    }

    /// Removes and returns the least-recently-used entry.
    pub(crate) fn pop_tail(&mut self) -> Option<(K, V)> {
        let ptr = self.tail;
        if ptr.is_null() {
            return None;
        }
        let hash = self.slots[ptr.index()].hash;
        match self.table.find_entry(hash, |p| *p == ptr) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => unreachable!("live slot missing from the key index"),
        }
        self.unlink(ptr);
        let node = self.slots.remove(ptr.index());
        Some((node.key, node.value))
    }
}

/// Iterator over cache entries in eviction order, least- to
/// most-recently used.
///
/// Created by [`LruCache::iter`](crate::LruCache::iter).
pub struct Iter<'a, K, V> {
    slots: &'a Slab<Node<K, V>>,
    ptr: Ptr,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.ptr.is_null() {
            return None;
        }
        let node = &self.slots[self.ptr.index()];
        self.ptr = node.newer;
        Some((&node.key, &node.value))
    }
}

/// Owning iterator over cache entries in eviction order, least- to
/// most-recently used.
///
/// Created by [`LruCache`](crate::LruCache)'s [`IntoIterator`] impl.
pub struct IntoIter<K, V> {
    slots: Slab<Node<K, V>>,
    ptr: Ptr,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.ptr.is_null() {
            return None;
        }
        let node = self.slots.remove(self.ptr.index());
        self.ptr = node.newer;
        Some((node.key, node.value))
    }
}
