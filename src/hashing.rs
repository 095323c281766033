//! String hashing and the double-hashing probe sequence.
//!
//! `generic_hash(s, a, m)` evaluates `sum(a^(len-1-i) * code(s[i])) mod m`
//! with Horner's rule, reducing after every character so the accumulator
//! never exceeds `m`. `code` is the Unicode scalar value of each `char`.
//!
//! A probe for attempt `i` lands on `(hash_a + i * step) mod m` where
//! `step = 1 + hash_b mod (m - 1)`. For `hash_b < m - 1` this is the plain
//! `hash_b + 1`; the one value that would make the step a multiple of `m`
//! is folded back to `1`. With `m` prime every step in `[1, m)` is coprime
//! with `m`, so `m` attempts visit every bucket exactly once.

/// Polynomial string hash with multiplier `a`, reduced modulo `m`.
pub fn generic_hash(s: &str, a: u64, m: usize) -> usize {
    debug_assert!(m > 0, "hash modulus must be non-zero");
    let m = m as u128;
    let a = a as u128;
    let hash = s
        .chars()
        .fold(0u128, |acc, c| (acc * a + u32::from(c) as u128) % m);
    hash as usize
}

/// Step between consecutive probes for a secondary hash `hash_b` over `m` buckets.
#[inline]
pub fn probe_step(hash_b: usize, m: usize) -> usize {
    if m < 2 {
        return 1;
    }
    1 + hash_b % (m - 1)
}

/// Bucket index of probe number `attempt` for `s` over `m` buckets.
pub fn double_hash(s: &str, m: usize, attempt: usize, a: u64, b: u64) -> usize {
    let hash_a = generic_hash(s, a, m);
    let step = probe_step(generic_hash(s, b, m), m);
    ((hash_a as u128 + attempt as u128 * step as u128) % m as u128) as usize
}

/// Iterator over the bucket indices probed for one key.
///
/// Yields `double_hash(s, m, 0, ..)`, `double_hash(s, m, 1, ..)`, ... and
/// stops after `m` indices; the key is hashed once up front.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    index: usize,
    step: usize,
    buckets: usize,
    remaining: usize,
}

impl ProbeSequence {
    pub fn new(s: &str, buckets: usize, a: u64, b: u64) -> Self {
        Self {
            index: generic_hash(s, a, buckets),
            step: probe_step(generic_hash(s, b, buckets), buckets),
            buckets,
            remaining: buckets,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index;
        // index and step are both below `buckets`, so the sum cannot overflow.
        self.index = (self.index + self.step) % self.buckets;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
