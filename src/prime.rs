//! Prime search used to size the bucket array.

/// Returns true if `n` has no divisor in `[2, sqrt(n)]`.
///
/// `0` and `1` are reported as not prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= n`.
///
/// Precondition: `n >= 2`. Smaller inputs are a caller error; they are
/// caught in debug builds and answer `2` otherwise.
pub fn next_prime(n: usize) -> usize {
    debug_assert!(n >= 2, "next_prime called with n < 2");
    let mut next = n.max(2);
    while !is_prime(next) {
        next += 1;
    }
    next
}
