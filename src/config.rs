//! Tunable constants for `HashTable` and their validation.

use crate::prime::is_prime;
use core::fmt;

/// Bucket count seed at size index 0; the table never has fewer buckets
/// than `next_prime(DEFAULT_BASE_SIZE)`.
pub const DEFAULT_BASE_SIZE: usize = 50;
/// Multiplier of the primary string hash.
pub const DEFAULT_HASH_PRIME_A: u64 = 151;
/// Multiplier of the secondary string hash (probe step).
pub const DEFAULT_HASH_PRIME_B: u64 = 163;
/// Grow when an insert would push the load above this percentage.
pub const DEFAULT_GROW_PERCENT: usize = 70;
/// Shrink when a delete starts with the load below this percentage.
pub const DEFAULT_SHRINK_PERCENT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub base_size: usize,
    pub hash_prime_a: u64,
    pub hash_prime_b: u64,
    pub grow_percent: usize,
    pub shrink_percent: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `base_size` below 2 has no prime floor to round up from.
    BaseSizeTooSmall(usize),
    /// A hash multiplier is not prime.
    NotPrime(u64),
    /// Both hash multipliers are the same value.
    DuplicatePrimes(u64),
    /// Requires `shrink_percent < grow_percent < 100`.
    InvalidLoadBounds { shrink: usize, grow: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BaseSizeTooSmall(n) => write!(f, "base size {} is below 2", n),
            ConfigError::NotPrime(p) => write!(f, "hash multiplier {} is not prime", p),
            ConfigError::DuplicatePrimes(p) => {
                write!(f, "hash multipliers must differ (both are {})", p)
            }
            ConfigError::InvalidLoadBounds { shrink, grow } => write!(
                f,
                "load bounds must satisfy shrink < grow < 100 (got shrink={}, grow={})",
                shrink, grow
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            hash_prime_a: DEFAULT_HASH_PRIME_A,
            hash_prime_b: DEFAULT_HASH_PRIME_B,
            grow_percent: DEFAULT_GROW_PERCENT,
            shrink_percent: DEFAULT_SHRINK_PERCENT,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_size(mut self, base_size: usize) -> Self {
        self.base_size = base_size;
        self
    }

    pub fn with_hash_primes(mut self, a: u64, b: u64) -> Self {
        self.hash_prime_a = a;
        self.hash_prime_b = b;
        self
    }

    pub fn with_load_bounds(mut self, shrink_percent: usize, grow_percent: usize) -> Self {
        self.shrink_percent = shrink_percent;
        self.grow_percent = grow_percent;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_size < 2 {
            return Err(ConfigError::BaseSizeTooSmall(self.base_size));
        }
        for p in [self.hash_prime_a, self.hash_prime_b] {
            if usize::try_from(p).map_or(true, |p| !is_prime(p)) {
                return Err(ConfigError::NotPrime(p));
            }
        }
        if self.hash_prime_a == self.hash_prime_b {
            return Err(ConfigError::DuplicatePrimes(self.hash_prime_a));
        }
        if self.shrink_percent >= self.grow_percent || self.grow_percent >= 100 {
            return Err(ConfigError::InvalidLoadBounds {
                shrink: self.shrink_percent,
                grow: self.grow_percent,
            });
        }
        Ok(())
    }
}
