//! Number-theoretic helpers for product analysis.
//!
//! Andrews' product algorithm and the eta-quotient recovery both run on
//! Möbius inversion over the divisor lattice, so divisor enumeration and
//! mu live here next to the pentagonal numbers used by the partition
//! recurrence.

/// Returns the sorted positive divisors of `n`.
///
/// # Panics
///
/// Panics if `n < 1`.
#[must_use]
pub fn divisors(n: i64) -> Vec<i64> {
    assert!(n >= 1, "divisors requires n >= 1");
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    large.reverse();
    small.extend(large);
    small
}

/// The Möbius function mu(n).
///
/// Trial-division factorization; 0 on any squared prime factor, otherwise
/// (-1)^k for k distinct prime factors.
///
/// # Panics
///
/// Panics if `n < 1`.
#[must_use]
pub fn moebius(n: i64) -> i64 {
    assert!(n >= 1, "moebius requires n >= 1");
    if n == 1 {
        return 1;
    }
    let mut m = n;
    let mut prime_count = 0;
    let mut p = 2;
    while p * p <= m {
        if m % p == 0 {
            m /= p;
            if m % p == 0 {
                return 0;
            }
            prime_count += 1;
        }
        p += 1;
    }
    if m > 1 {
        prime_count += 1;
    }
    if prime_count % 2 == 0 {
        1
    } else {
        -1
    }
}

/// The generalized pentagonal number g(k) = k(3k-1)/2 for k in Z.
#[must_use]
pub fn pentagonal(k: i64) -> i64 {
    k * (3 * k - 1) / 2
}

/// Integer gcd on i64 values.
#[must_use]
pub fn gcd_i64(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
