//! In-memory storage implementation

use super::entry::Entry;
use serde::Serialize;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

/// Type alias for our hash map with SipHasher
type StoreMap<V> = HashMap<String, Entry<V>, BuildHasherDefault<SipHasher13>>;

/// In-memory key-value store
///
/// Single-threaded by construction: the store worker owns the only instance
/// and applies requests to it one at a time.
pub struct MemoryStore<V> {
    /// The main storage map
    store: StoreMap<V>,

    /// Number of Set operations applied
    sets: u64,

    /// Number of Remove operations that deleted a key
    removes: u64,

    /// Number of Get operations that found the key
    hits: u64,

    /// Number of Get operations that did not find the key
    misses: u64,
}

impl<V: Clone> MemoryStore<V> {
    /// Create a new memory store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new memory store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            store: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
            sets: 0,
            removes: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Set a key-value pair, overwriting any previous value
    ///
    /// Returns true if the key was not present before.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> bool {
        let key = key.into();
        self.sets += 1;

        match self.store.get_mut(&key) {
            Some(entry) => {
                entry.replace(value);
                false
            }
            None => {
                let entry = Entry::new(key.clone(), value);
                self.store.insert(key, entry);
                true
            }
        }
    }

    /// Get a copy of the value stored under key
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.store.get(key) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Delete a key, returns true if the key existed
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.store.remove(key).is_some();
        if existed {
            self.removes += 1;
        }
        existed
    }

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Get the number of keys
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get statistics about the store
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.store.len(),
            sets: self.sets,
            removes: self.removes,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<V: Clone> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the memory store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub keys: usize,
    pub sets: u64,
    pub removes: u64,
    pub hits: u64,
    pub misses: u64,
}
