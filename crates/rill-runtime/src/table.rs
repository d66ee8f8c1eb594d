//! Open-addressed string-keyed table
//!
//! Backs both variable scopes and the function registry. Uses the DJB2 hash
//! with linear probing over a power-of-two slot array. Entries are never
//! deleted, which is what makes the early-exit on an empty slot during lookup
//! sound: a missing entry can never hide behind a gap.

/// Slot count for a fresh table
const INITIAL_CAPACITY: usize = 2;

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Linear-probing hash table keyed by strings
#[derive(Debug, Clone)]
pub struct ProbeTable<V> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
}

impl<V> ProbeTable<V> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: (0..INITIAL_CAPACITY).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count (always a power of two)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert or overwrite a value (last write wins)
    pub fn insert(&mut self, key: &str, value: V) {
        match self.probe(key) {
            Some(idx) => {
                if self.slots[idx].is_none() {
                    self.len += 1;
                }
                self.slots[idx] = Some(Entry {
                    key: key.to_string(),
                    value,
                });
            }
            None => {
                // Full cyclic probe found neither an empty slot nor the key
                self.grow();
                self.insert(key, value);
            }
        }
    }

    /// Look up a value by key
    pub fn lookup(&self, key: &str) -> Option<&V> {
        let idx = self.probe(key)?;
        match &self.slots[idx] {
            Some(entry) if entry.key == key => Some(&entry.value),
            _ => None,
        }
    }

    /// Look up a value by key, mutably
    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.probe(key)?;
        match &mut self.slots[idx] {
            Some(entry) if entry.key == key => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Probe for the slot holding `key`, or the first empty slot in the probe
    /// sequence. Returns None only when the table is full of other keys.
    fn probe(&self, key: &str) -> Option<usize> {
        let cap = self.slots.len();
        let start = (djb2(key) as usize) & (cap - 1);

        for i in 0..cap {
            let idx = (start + i) & (cap - 1);
            match &self.slots[idx] {
                None => return Some(idx),
                Some(entry) if entry.key == key => return Some(idx),
                Some(_) => {}
            }
        }

        None
    }

    /// Double the slot count and rehash every entry
    fn grow(&mut self) {
        let doubled = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, (0..doubled).map(|_| None).collect());

        for entry in old.into_iter().flatten() {
            // Keys are distinct, so a plain probe always finds an empty slot
            let idx = self
                .probe(&entry.key)
                .expect("doubled table has room for every entry");
            self.slots[idx] = Some(entry);
        }
    }
}

impl<V> Default for ProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// DJB2 string hash: h = 5381, then h = h * 33 + byte, all wrapping
pub fn djb2(key: &str) -> u64 {
    key.bytes()
        .fold(5381u64, |h, b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_table_capacity() {
        let table: ProbeTable<u64> = ProbeTable::new();
        assert_eq!(table.capacity(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = ProbeTable::new();
        table.insert("x", 1u64);
        table.insert("y", 2);
        assert_eq!(table.lookup("x"), Some(&1));
        assert_eq!(table.lookup("y"), Some(&2));
        assert_eq!(table.lookup("z"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = ProbeTable::new();
        table.insert("x", 1u64);
        table.insert("x", 2);
        assert_eq!(table.lookup("x"), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_growth_doubles_capacity() {
        let mut table = ProbeTable::new();
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            table.insert(key, i);
        }
        assert_eq!(table.len(), 3);
        assert!(table.capacity() >= 4);
        assert!(table.capacity().is_power_of_two());
    }

    #[test]
    fn test_entries_survive_growth() {
        let mut table = ProbeTable::new();
        let keys: Vec<String> = (0..100).map(|i| format!("key{}", i)).collect();
        for (i, key) in keys.iter().enumerate() {
            table.insert(key, i);
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.lookup(key), Some(&i), "lost {}", key);
        }
    }

    #[test]
    fn test_lookup_mut() {
        let mut table = ProbeTable::new();
        table.insert("x", 1u64);
        *table.lookup_mut("x").unwrap() = 9;
        assert_eq!(table.lookup("x"), Some(&9));
        assert_eq!(table.lookup_mut("missing"), None);
    }

    #[test]
    fn test_djb2_known_values() {
        // h("") is the seed; h("a") = 5381 * 33 + 97
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("a"), 5381 * 33 + 97);
    }

    proptest! {
        #[test]
        fn prop_matches_hashmap(ops in prop::collection::vec(("[a-z]{1,4}", 0u64..1000), 0..200)) {
            let mut table = ProbeTable::new();
            let mut model = HashMap::new();

            for (key, value) in &ops {
                table.insert(key, *value);
                model.insert(key.clone(), *value);
            }

            prop_assert_eq!(table.len(), model.len());
            for (key, value) in &model {
                prop_assert_eq!(table.lookup(key), Some(value));
            }
        }

        #[test]
        fn prop_capacity_stays_power_of_two(keys in prop::collection::vec("[a-z]{1,6}", 0..64)) {
            let mut table = ProbeTable::new();
            for key in &keys {
                table.insert(key, ());
                prop_assert!(table.capacity().is_power_of_two());
            }
        }
    }
}
