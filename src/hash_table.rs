//! HashTable: open addressing over a prime-sized slot array with tombstones.

use crate::config::{ConfigError, TableConfig};
use crate::hashing::ProbeSequence;
use crate::prime::next_prime;
use core::mem;
use log::{debug, trace};

#[derive(Clone, Debug)]
struct Entry {
    key: String,
    value: String,
}

#[derive(Clone, Debug)]
enum Slot {
    Empty,
    Tombstone,
    Occupied(Entry),
}

/// Outcome of walking a key's probe sequence for insertion.
enum Probe {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Grow,
    Shrink,
}

#[derive(Clone, Debug)]
pub struct HashTable {
    config: TableConfig,
    slots: Box<[Slot]>,
    size_index: u32,
    count: usize,
    tombstones: usize,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

fn bucket_count(config: &TableConfig, size_index: u32) -> usize {
    next_prime(config.base_size << size_index)
}

fn empty_slots(len: usize) -> Box<[Slot]> {
    (0..len).map(|_| Slot::Empty).collect()
}

impl HashTable {
    pub fn new() -> Self {
        Self::sized(TableConfig::default(), 0)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::sized(config, 0))
    }

    fn sized(config: TableConfig, size_index: u32) -> Self {
        Self {
            slots: empty_slots(bucket_count(&config, size_index)),
            config,
            size_index,
            count: 0,
            tombstones: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of buckets; always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Resize generation; 0 is the floor the table never shrinks below.
    pub fn size_index(&self) -> u32 {
        self.size_index
    }

    /// Deleted slots still holding their place in probe sequences.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// `len() * 100 / capacity()` in integer arithmetic.
    pub fn load_percent(&self) -> usize {
        self.count * 100 / self.capacity()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn probe(&self, key: &str) -> ProbeSequence {
        ProbeSequence::new(
            key,
            self.capacity(),
            self.config.hash_prime_a,
            self.config.hash_prime_b,
        )
    }

    /// Index of the live slot holding `key`. Tombstones are stepped over;
    /// the first `Empty` ends the search.
    fn find_index(&self, key: &str) -> Option<usize> {
        for idx in self.probe(key) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(e) if e.key == key => return Some(idx),
                Slot::Occupied(_) => {}
            }
        }
        None
    }

    /// Walks the probe sequence until `key` or an `Empty` slot is found,
    /// remembering the first tombstone so it can be reused.
    fn locate(&self, key: &str) -> Probe {
        let mut first_tombstone = None;
        for idx in self.probe(key) {
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(idx)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(idx);
                }
                Slot::Occupied(e) if e.key == key => return Probe::Found(idx),
                Slot::Occupied(_) => {}
            }
        }
        match first_tombstone {
            Some(idx) => Probe::Vacant(idx),
            None => Probe::Exhausted,
        }
    }

    pub fn search(&self, key: &str) -> Option<&str> {
        let idx = self.find_index(key)?;
        match &self.slots[idx] {
            Slot::Occupied(e) => Some(e.value.as_str()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Insert `key -> value`, returning the value it replaced.
    ///
    /// Grows first whenever one more entry would push the load above the
    /// configured bound, so the bound holds again when this returns.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let entry = Entry {
            key: key.into(),
            value: value.into(),
        };

        while (self.count + 1) * 100 / self.capacity() > self.config.grow_percent {
            self.resize(Direction::Grow);
        }
        if (self.count + self.tombstones + 1) * 100 / self.capacity() > self.config.grow_percent {
            self.purge_tombstones();
        }

        loop {
            match self.locate(&entry.key) {
                Probe::Found(idx) => {
                    return match mem::replace(&mut self.slots[idx], Slot::Occupied(entry)) {
                        Slot::Occupied(old) => Some(old.value),
                        _ => None,
                    };
                }
                Probe::Vacant(idx) => {
                    if let Slot::Tombstone = self.slots[idx] {
                        self.tombstones -= 1;
                    }
                    self.slots[idx] = Slot::Occupied(entry);
                    self.count += 1;
                    return None;
                }
                // Unreachable while the load bound holds; growing restores it.
                Probe::Exhausted => self.resize(Direction::Grow),
            }
        }
    }

    /// Remove `key`, returning its value. Absent keys leave the count untouched.
    ///
    /// The shrink check runs first and looks at the count before removal.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        if self.load_percent() < self.config.shrink_percent {
            self.resize(Direction::Shrink);
        }

        let idx = self.find_index(key)?;
        match mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Occupied(old) => {
                self.count -= 1;
                self.tombstones += 1;
                Some(old.value)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    /// Consume the table, releasing every entry and the slot array.
    pub fn destroy(self) {}

    fn resize(&mut self, direction: Direction) {
        let new_index = match direction {
            Direction::Grow => self.size_index + 1,
            Direction::Shrink => match self.size_index.checked_sub(1) {
                Some(idx) => idx,
                None => return,
            },
        };
        if direction == Direction::Shrink {
            let new_size = bucket_count(&self.config, new_index);
            if self.count * 100 / new_size > self.config.grow_percent {
                trace!(
                    "skipping shrink to {} buckets: {} entries would exceed the load bound",
                    new_size,
                    self.count
                );
                return;
            }
        }
        self.rebuild(new_index);
    }

    fn purge_tombstones(&mut self) {
        trace!(
            "purging {} tombstones from {} buckets",
            self.tombstones,
            self.capacity()
        );
        self.rebuild(self.size_index);
    }

    /// Move every live entry into a fresh slot array for `size_index`.
    fn rebuild(&mut self, size_index: u32) {
        let old_index = self.size_index;
        let new_size = bucket_count(&self.config, size_index);
        let old = mem::replace(&mut self.slots, empty_slots(new_size));
        let old_size = old.len();
        self.size_index = size_index;
        self.tombstones = 0;

        let mut moved = 0usize;
        for slot in old.into_vec() {
            if let Slot::Occupied(entry) = slot {
                self.place(entry);
                moved += 1;
            }
        }
        debug_assert_eq!(moved, self.count);
        debug!(
            "resized hash table: size index {} -> {}, buckets {} -> {}, {} entries moved",
            old_index, size_index, old_size, new_size, moved
        );
    }

    /// Put an entry known to be absent into the first `Empty` slot of its
    /// probe sequence. Only valid on a tombstone-free array with spare room.
    fn place(&mut self, entry: Entry) {
        let vacant = self
            .probe(&entry.key)
            .find(|&idx| matches!(self.slots[idx], Slot::Empty));
        debug_assert!(vacant.is_some(), "rebuilt table has no room");
        if let Some(idx) = vacant {
            self.slots[idx] = Slot::Occupied(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::is_prime;
    use crate::test_support::init_logger;

    fn first_probe(t: &HashTable, key: &str) -> usize {
        t.probe(key).next().unwrap()
    }

    /// Two distinct keys sharing their first probe index in `t`.
    fn colliding_pair(t: &HashTable) -> (String, String) {
        let k1 = "k1".to_string();
        let target = first_probe(t, &k1);
        let k2 = (0..)
            .map(|n| format!("c{}", n))
            .find(|k| first_probe(t, k) == target)
            .unwrap();
        (k1, k2)
    }

    fn slot_index_of(t: &HashTable, key: &str) -> usize {
        t.find_index(key).expect("key present")
    }

    /// Invariant: A fresh table is empty with 53 buckets at size index 0.
    #[test]
    fn new_table_shape() {
        let t = HashTable::new();
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.size_index(), 0);
        assert_eq!(t.tombstones(), 0);
        assert!(t.slots.iter().all(|s| matches!(s, Slot::Empty)));
    }

    /// Invariant: The documented cat/dog walkthrough behaves as described.
    #[test]
    fn cat_dog_example() {
        init_logger();
        let mut t = HashTable::new();
        t.insert("cat", "meow");
        t.insert("dog", "woof");
        assert_eq!(t.search("cat"), Some("meow"));
        assert_eq!(t.delete("cat"), Some("meow".to_string()));
        assert_eq!(t.search("cat"), None);
        assert_eq!(t.search("dog"), Some("woof"));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: Overwriting replaces the value in place and keeps the count.
    #[test]
    fn overwrite_keeps_count() {
        let mut t = HashTable::new();
        assert_eq!(t.insert("k", "v1"), None);
        let idx = slot_index_of(&t, "k");
        assert_eq!(t.insert("k", "v2"), Some("v1".to_string()));
        assert_eq!(t.len(), 1);
        assert_eq!(t.search("k"), Some("v2"));
        assert_eq!(slot_index_of(&t, "k"), idx);
    }

    /// Invariant: Empty strings are ordinary keys and values.
    #[test]
    fn empty_string_key_and_value() {
        let mut t = HashTable::new();
        t.insert("", "");
        t.insert("x", "");
        assert_eq!(t.search(""), Some(""));
        assert_eq!(t.search("x"), Some(""));
        assert_eq!(t.delete(""), Some(String::new()));
        assert!(!t.contains_key(""));
    }

    /// Invariant: Search steps over a tombstone left by a colliding key.
    #[test]
    fn search_continues_past_tombstone() {
        let mut t = HashTable::new();
        let (k1, k2) = colliding_pair(&t);
        t.insert(k1.as_str(), "one");
        t.insert(k2.as_str(), "two");
        assert_eq!(slot_index_of(&t, &k1), first_probe(&t, &k2));

        t.delete(&k1);
        assert_eq!(t.tombstones(), 1);
        assert!(matches!(t.slots[first_probe(&t, &k2)], Slot::Tombstone));
        assert_eq!(t.search(&k2), Some("two"));
        assert_eq!(t.search(&k1), None);
    }

    /// Invariant: An insert whose probe meets a tombstone reuses that slot.
    #[test]
    fn insert_reuses_tombstone() {
        let mut t = HashTable::new();
        let (k1, k2) = colliding_pair(&t);
        t.insert(k1.as_str(), "one");
        let old_slot = slot_index_of(&t, &k1);
        t.delete(&k1);

        t.insert(k2.as_str(), "two");
        assert_eq!(slot_index_of(&t, &k2), old_slot);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.search(&k2), Some("two"));
    }

    /// Invariant: Re-inserting a key that sits behind a tombstone updates the
    /// existing entry instead of creating a second copy.
    #[test]
    fn reinsert_behind_tombstone_does_not_duplicate() {
        let mut t = HashTable::new();
        let (k1, k2) = colliding_pair(&t);
        t.insert(k1.as_str(), "one");
        t.insert(k2.as_str(), "two");
        t.delete(&k1);

        assert_eq!(t.insert(k2.as_str(), "three"), Some("two".to_string()));
        assert_eq!(t.len(), 1);
        assert_eq!(t.search(&k2), Some("three"));

        t.delete(&k2);
        assert_eq!(t.search(&k2), None);
        assert!(t.is_empty());
    }

    /// Invariant: Deleting an absent key leaves the count unchanged.
    #[test]
    fn delete_absent_key_keeps_count() {
        let mut t = HashTable::new();
        t.insert("a", "1");
        t.insert("b", "2");
        assert_eq!(t.delete("missing"), None);
        assert_eq!(t.delete("missing"), None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.delete("a"), Some("1".to_string()));
        assert_eq!(t.delete("a"), None);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: The 38th insert into 53 buckets is the first to grow,
    /// since (37 + 1) * 100 / 53 = 71 > 70.
    #[test]
    fn grow_threshold_uses_integer_percent() {
        let mut t = HashTable::new();
        for i in 0..37 {
            t.insert(format!("key{}", i), "v");
        }
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.load_percent(), 69);
        t.insert("key37", "v");
        assert_eq!(t.capacity(), 101);
        assert_eq!(t.size_index(), 1);
        assert_eq!(t.len(), 38);
    }

    /// Invariant: Growing through several generations keeps every entry, and
    /// every bucket count observed is prime with the load at most 70%.
    #[test]
    fn grow_preserves_contents() {
        init_logger();
        let mut t = HashTable::new();
        for i in 0..2_000 {
            t.insert(format!("key{}", i), format!("value{}", i));
            assert!(is_prime(t.capacity()));
            assert!(t.load_percent() <= 70);
        }
        assert!(t.size_index() >= 2);
        for i in 0..2_000 {
            assert_eq!(t.search(&format!("key{}", i)), Some(format!("value{}", i).as_str()));
        }
    }

    /// Invariant: Shrinking is decided on the pre-delete count. At 101 buckets
    /// a delete starting from 11 entries (10%) does not shrink; one starting
    /// from 10 entries (9%) does.
    #[test]
    fn shrink_uses_pre_delete_count() {
        let mut t = HashTable::new();
        for i in 0..38 {
            t.insert(format!("key{}", i), "v");
        }
        assert_eq!(t.capacity(), 101);

        for i in 0..28 {
            t.delete(&format!("key{}", i));
        }
        assert_eq!(t.len(), 10);
        assert_eq!(t.capacity(), 101);

        t.delete("key28");
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.size_index(), 0);
        assert_eq!(t.len(), 9);
        // The rebuild cleared old tombstones; only key28's remains.
        assert_eq!(t.tombstones(), 1);
        for i in 29..38 {
            assert_eq!(t.search(&format!("key{}", i)), Some("v"));
        }
    }

    /// Invariant: At size index 0 deleting down to zero never changes the size.
    #[test]
    fn shrink_floor_holds() {
        let mut t = HashTable::new();
        for i in 0..30 {
            t.insert(format!("key{}", i), "v");
        }
        for i in 0..30 {
            t.delete(&format!("key{}", i));
            assert_eq!(t.capacity(), 53);
            assert_eq!(t.size_index(), 0);
        }
        assert!(t.is_empty());
        t.delete("key0");
        assert_eq!(t.capacity(), 53);
    }

    /// Invariant: Churn through distinct keys cannot fill the array with
    /// tombstones; live plus deleted slots stay within the load bound and
    /// misses still terminate.
    #[test]
    fn tombstones_are_purged_under_churn() {
        init_logger();
        let mut t = HashTable::new();
        for i in 0..500 {
            let k = format!("churn{}", i);
            t.insert(k.as_str(), "v");
            t.delete(&k);
            assert!((t.len() + t.tombstones()) * 100 / t.capacity() <= 70);
        }
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.search("never-inserted"), None);
        assert!(t.slots.iter().any(|s| matches!(s, Slot::Empty)));
    }

    /// Invariant: A custom configuration drives the bucket count.
    #[test]
    fn custom_config_sizes_table() {
        let cfg = TableConfig::new().with_base_size(10).with_load_bounds(20, 50);
        let mut t = HashTable::with_config(cfg).unwrap();
        assert_eq!(t.capacity(), 11);
        for i in 0..5 {
            t.insert(format!("k{}", i), "v");
        }
        // (4 + 1) * 100 / 11 = 45 <= 50, then (5 + 1) * 100 / 11 = 54 > 50.
        assert_eq!(t.capacity(), 11);
        t.insert("k5", "v");
        assert_eq!(t.capacity(), 23);
        assert_eq!(t.config().grow_percent, 50);
    }

    /// Invariant: Invalid configurations are rejected before allocation.
    #[test]
    fn invalid_config_rejected() {
        let cfg = TableConfig::new().with_hash_primes(151, 151);
        assert_eq!(
            HashTable::with_config(cfg).unwrap_err(),
            ConfigError::DuplicatePrimes(151)
        );
    }

    /// Invariant: Clones are independent tables.
    #[test]
    fn clone_is_independent() {
        let mut a = HashTable::new();
        a.insert("k", "v");
        let mut b = a.clone();
        b.insert("k", "w");
        b.delete("k");
        assert_eq!(a.search("k"), Some("v"));
        assert_eq!(b.search("k"), None);
        a.destroy();
    }
}
