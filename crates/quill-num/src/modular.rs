//! Modular arithmetic over a runtime prime.
//!
//! The relation-discovery engines reduce coefficient matrices mod a prime `p`
//! chosen at call time, so the modulus here is a value, not a const parameter.
//! All intermediates widen to i128 to avoid overflow.

/// Safe modular multiplication with i128 intermediates.
#[must_use]
pub fn mod_mul(a: i64, b: i64, modulus: i64) -> i64 {
    ((a as i128 * b as i128) % modulus as i128) as i64
}

/// Modular exponentiation by square-and-multiply.
///
/// # Panics
///
/// Panics if `modulus` is not positive.
#[must_use]
pub fn mod_pow(mut base: i64, mut exp: i64, modulus: i64) -> i64 {
    assert!(modulus > 0, "modulus must be positive");
    if modulus == 1 {
        return 0;
    }
    let mut result: i64 = 1;
    base = ((base % modulus) + modulus) % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, modulus);
        }
        exp >>= 1;
        base = mod_mul(base, base, modulus);
    }
    result
}

/// Modular inverse via Fermat's little theorem: a^{p-2} mod p.
///
/// Requires `p` prime. Returns `None` when a = 0 (mod p).
#[must_use]
pub fn mod_inv(a: i64, p: i64) -> Option<i64> {
    let a = ((a % p) + p) % p;
    if a == 0 {
        return None;
    }
    Some(mod_pow(a, p - 2, p))
}

/// Normalizes a value into the canonical residue range [0, p).
#[must_use]
pub fn mod_norm(a: i64, p: i64) -> i64 {
    ((a % p) + p) % p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(2, 10, 1000), 24);
        assert_eq!(mod_pow(3, 0, 7), 1);
        assert_eq!(mod_pow(-2, 2, 7), 4);
    }

    #[test]
    fn test_mod_inv() {
        let p = 10_007;
        for a in [1, 2, 3, 5000, p - 1] {
            let inv = mod_inv(a, p).unwrap();
            assert_eq!(mod_mul(a, inv, p), 1);
        }
        assert_eq!(mod_inv(0, p), None);
        assert_eq!(mod_inv(p, p), None);
    }

    #[test]
    fn test_mod_norm() {
        assert_eq!(mod_norm(-1, 5), 4);
        assert_eq!(mod_norm(7, 5), 2);
    }
}
