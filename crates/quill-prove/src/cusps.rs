//! Cusps of the congruence subgroups Gamma_0(N) and Gamma_1(N).
//!
//! A cusp is an equivalence class of points in P^1(Q) under the subgroup
//! action. Two fractions d1/c and d2/c with the same denominator are
//! Gamma_0(N)-equivalent exactly when d1 = d2 mod gcd(c, N/c), which gives
//! the enumeration below.

use std::fmt;

use quill_num::arith::{divisors, gcd_i64};

/// A cusp a/c in lowest terms. Infinity is carried as 1/0.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cusp {
    /// Numerator of the cusp fraction.
    pub numer: i64,
    /// Denominator of the cusp fraction, 0 for infinity.
    pub denom: i64,
}

impl Cusp {
    /// The cusp at infinity.
    #[must_use]
    pub fn infinity() -> Self {
        Cusp { numer: 1, denom: 0 }
    }

    /// Builds a/c reduced to lowest terms with a nonnegative denominator.
    /// Any fraction with c = 0 normalizes to infinity.
    #[must_use]
    pub fn new(a: i64, c: i64) -> Self {
        if c == 0 {
            return Self::infinity();
        }
        let (mut a, mut c) = if c < 0 { (-a, -c) } else { (a, c) };
        let g = gcd_i64(a, c);
        if g > 0 {
            a /= g;
            c /= g;
        }
        Cusp { numer: a, denom: c }
    }

    /// Whether this is the cusp at infinity.
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.denom == 0
    }
}

impl fmt::Display for Cusp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinity() {
            write!(f, "inf")
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Euler's totient phi(n); 0 for n <= 0.
#[must_use]
pub fn euler_phi(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut result = n;
    let mut m = n;
    let mut p = 2i64;
    while p * p <= m {
        if m % p == 0 {
            while m % p == 0 {
                m /= p;
            }
            result -= result / p;
        }
        p += 1;
    }
    if m > 1 {
        result -= result / m;
    }
    result
}

/// Number of cusps of Gamma_0(N): sum over d | N of phi(gcd(d, N/d)).
///
/// # Panics
///
/// Panics if `n < 1`.
#[must_use]
pub fn num_cusps_gamma0(n: i64) -> i64 {
    divisors(n)
        .into_iter()
        .map(|d| euler_phi(gcd_i64(d, n / d)))
        .sum()
}

/// Enumerates inequivalent cusps of Gamma_0(N).
///
/// Infinity stands for the denominator-N class; for every other divisor c of
/// N one representative d/c is kept per residue of d modulo gcd(c, N/c).
///
/// # Panics
///
/// Panics if `n < 1`.
#[must_use]
pub fn cuspmake(n: i64) -> Vec<Cusp> {
    assert!(n >= 1, "level must be >= 1, got {n}");

    let mut cusps = vec![Cusp::infinity()];
    if n == 1 {
        return cusps;
    }

    for c in divisors(n) {
        if c >= n {
            continue;
        }
        let gc = gcd_i64(c, n / c);
        let mut seen: Vec<i64> = Vec::new();
        for d in 0..c {
            if gcd_i64(d, c) != 1 {
                continue;
            }
            let r = d % gc;
            if !seen.contains(&r) {
                seen.push(r);
                cusps.push(Cusp::new(d, c));
            }
        }
    }

    debug_assert_eq!(cusps.len() as i64, num_cusps_gamma0(n));
    cusps
}

/// Enumerates inequivalent cusps of Gamma_1(N).
///
/// Equivalence groups d/c by the residue of d modulo gcd(c, N). For N <= 2
/// the matrix -I lies in Gamma_1(N), so +/- residues fold together; for
/// N >= 3 they stay distinct.
///
/// # Panics
///
/// Panics if `n < 1`.
#[must_use]
pub fn cuspmake1(n: i64) -> Vec<Cusp> {
    assert!(n >= 1, "level must be >= 1, got {n}");

    let mut cusps = vec![Cusp::infinity()];
    if n == 1 {
        return cusps;
    }

    for c in divisors(n) {
        if c >= n {
            continue;
        }
        let gc = gcd_i64(c, n);
        let mut seen: Vec<i64> = Vec::new();
        for d in 0..c {
            if gcd_i64(d, c) != 1 {
                continue;
            }
            let r = d % gc;
            if n <= 2 {
                let r_neg = if r == 0 { 0 } else { gc - r };
                if !seen.contains(&r) && !seen.contains(&r_neg) {
                    seen.push(r);
                    cusps.push(Cusp::new(d, c));
                }
            } else if !seen.contains(&r) {
                seen.push(r);
                cusps.push(Cusp::new(d, c));
            }
        }
    }

    cusps
}
