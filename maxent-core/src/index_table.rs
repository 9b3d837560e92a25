//! # Index Hash Table
//!
//! Maps every entry of a duplicate-free key array back to its index
//! in that array.
//!
//! ## How It Works
//!
//! 1. Capacity is `ceil(len / load_factor) + 1`, so at least one slot stays empty
//! 2. A key starts at `hash(key) % capacity` and probes linearly (wrapping)
//! 3. Insertion stops at the first empty slot; lookup stops at the key or an empty slot
//!
//! The spare empty slot guarantees every probe sequence terminates.
//! The table is never mutated after construction, so lookups can run
//! concurrently from any number of threads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use crate::error::{MaxentError, MaxentResult};

/// Open addressing table from key to original array index
#[derive(Clone, Debug)]
pub struct IndexHashTable<K, S = BuildHasherDefault<DefaultHasher>> {
    /// `None` marks an empty slot
    keys: Vec<Option<K>>,

    /// Original array index of the key in the same slot
    values: Vec<usize>,

    /// Number of live entries
    size: usize,

    hasher: S,
}

impl<K: Hash + Eq + Clone> IndexHashTable<K> {
    /// Index `mapping` with a deterministic hasher
    ///
    /// Fails if `load_factor` is outside (0, 1] or `mapping` has duplicates.
    pub fn new(mapping: &[K], load_factor: f64) -> MaxentResult<Self> {
        Self::with_hasher(mapping, load_factor, BuildHasherDefault::default())
    }
}

impl<K: Hash + Eq + Clone, S: BuildHasher> IndexHashTable<K, S> {
    pub fn with_hasher(mapping: &[K], load_factor: f64, hasher: S) -> MaxentResult<Self> {
        if !(load_factor > 0.0 && load_factor <= 1.0) {
            return Err(MaxentError::config(format!(
                "load factor must be greater than zero and less or equal to 1, got {}",
                load_factor
            )));
        }

        let capacity = (mapping.len() as f64 / load_factor).ceil() as usize + 1;
        let mut table = Self {
            keys: vec![None; capacity],
            values: vec![0; capacity],
            size: mapping.len(),
            hasher,
        };

        for (i, key) in mapping.iter().enumerate() {
            let slot = table
                .insert_slot(key)
                .ok_or(MaxentError::DuplicateKey { index: i })?;
            table.keys[slot] = Some(key.clone());
            table.values[slot] = i;
        }

        Ok(table)
    }

    /// Original index of `key`, or `None` if it was not in the mapping
    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut i = self.start_slot(key);
        loop {
            match &self.keys[i] {
                None => return None,
                Some(k) if k.borrow() == key => return Some(self.values[i]),
                Some(_) => i = (i + 1) % self.keys.len(),
            }
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Number of keys in the table
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots, live or empty
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Rebuild the original key array, ordered by index
    pub fn to_vec(&self) -> Vec<K> {
        let mut ordered: Vec<Option<K>> = vec![None; self.size];
        for (slot, key) in self.keys.iter().enumerate() {
            if let Some(k) = key {
                ordered[self.values[slot]] = Some(k.clone());
            }
        }
        ordered.into_iter().flatten().collect()
    }

    /// First empty slot on the probe path of `key`, or `None` if `key` is already present
    fn insert_slot(&self, key: &K) -> Option<usize> {
        let mut i = self.start_slot(key);
        loop {
            match &self.keys[i] {
                None => return Some(i),
                Some(k) if k == key => return None,
                Some(_) => i = (i + 1) % self.keys.len(),
            }
        }
    }

    fn start_slot<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hasher.hash_one(key) % self.keys.len() as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup() {
        let table = IndexHashTable::new(&strings(&["x", "y", "z"]), 0.7).unwrap();
        assert_eq!(table.get("y"), Some(1));
        assert_eq!(table.get("x"), Some(0));
        assert_eq!(table.get("z"), Some(2));
        assert_eq!(table.get("q"), None);
        assert_eq!(table.len(), 3);
        assert!(table.capacity() > table.len());
    }

    #[test]
    fn test_round_trip() {
        let keys: Vec<String> = (0..500).map(|i| format!("pred={}", i)).collect();
        let table = IndexHashTable::new(&keys, 0.7).unwrap();

        for (i, k) in keys.iter().enumerate() {
            assert_eq!(table.get(k.as_str()), Some(i));
        }
        assert_eq!(table.to_vec(), keys);
    }

    #[test]
    fn test_full_load_factor() {
        // load factor 1.0 still leaves one empty slot
        let keys = strings(&["a", "b", "c", "d"]);
        let table = IndexHashTable::new(&keys, 1.0).unwrap();
        assert_eq!(table.capacity(), 5);
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.to_vec(), keys);
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = IndexHashTable::new(&strings(&["a", "b", "a"]), 0.7).unwrap_err();
        assert!(matches!(err, MaxentError::DuplicateKey { index: 2 }));
    }

    #[test]
    fn test_rejects_bad_load_factor() {
        let keys = strings(&["a"]);
        assert!(IndexHashTable::new(&keys, 0.0).is_err());
        assert!(IndexHashTable::new(&keys, -0.5).is_err());
        assert!(IndexHashTable::new(&keys, 1.01).is_err());
        assert!(IndexHashTable::new(&keys, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_table() {
        let table: IndexHashTable<String> = IndexHashTable::new(&[], 0.7).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get("a"), None);
        assert!(table.to_vec().is_empty());
    }
}
