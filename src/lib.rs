//! string-hashtable: an open-addressing hash table from `String` keys to
//! `String` values, resolving collisions with double hashing over a
//! prime number of buckets.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable associative container whose probing,
//!   resizing and hashing can each be checked on their own.
//! - Layers:
//!   - `prime`: `next_prime(n)`, the smallest prime `>= n`. Bucket counts
//!     are always prime so every probe step is coprime with the table size.
//!   - `hashing`: two polynomial string hashes with distinct prime
//!     multipliers (151 and 163 by default). The first picks the home
//!     bucket, the second the step between probes.
//!   - `HashTable`: a boxed slice of slots, each `Empty`, `Tombstone`, or
//!     `Occupied(Entry)`, plus a resize generation (`size_index`) and the
//!     live entry count.
//!
//! Slot states
//! - Search stops at `Empty` and steps over `Tombstone`; a key may live
//!   further along its probe sequence than a deleted neighbour.
//! - Insert reuses the first tombstone it meets, but only after confirming
//!   the key is not stored further along, so keys stay unique.
//!
//! Sizing
//! - Size index `k` has `next_prime(50 << k)` buckets: 53, 101, 211, 401, ...
//! - Insert grows first whenever `(len + 1) * 100 / capacity > 70`.
//! - Delete shrinks first whenever `len * 100 / capacity < 10`, measured
//!   before the removal; size index 0 never shrinks.
//! - Resizing moves live entries into a fresh slot array and drops every
//!   tombstone. Inserts also rebuild in place when live plus deleted slots
//!   would exceed the grow bound, so an `Empty` slot is always reachable.
//!
//! Constraints
//! - Single-threaded and synchronous. `HashTable` is plain owned data and
//!   is `Send + Sync`; share it behind a `Mutex` if several threads need to
//!   mutate it.
//! - No iteration API and no ordering between entries.
//! - Operations never fail: absence is `None`, allocation failure aborts.
//!   Only `HashTable::with_config` returns an error, for a malformed
//!   `TableConfig`.

pub mod config;
pub mod hash_table;
mod hash_table_proptest;
pub mod hashing;
pub mod prime;
#[cfg(test)]
mod test_support;

// Public surface
pub use config::{ConfigError, TableConfig};
pub use hash_table::HashTable;
