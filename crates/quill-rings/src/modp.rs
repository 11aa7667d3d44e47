//! Prime-field elements with a runtime modulus.
//!
//! The relation-discovery prime is chosen per call, so the modulus travels
//! with the element. Mixing moduli is a programmer error and panics.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use quill_num::modular::{mod_inv, mod_mul, mod_norm};

use crate::traits::{Field, Ring};

/// An element of Z/pZ for a runtime prime p.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModP {
    value: i64,
    prime: i64,
}

impl ModP {
    /// Creates an element of Z/pZ, normalizing into [0, p).
    ///
    /// # Panics
    ///
    /// Panics if `prime < 2`.
    #[must_use]
    pub fn new(value: i64, prime: i64) -> Self {
        assert!(prime >= 2, "modulus must be at least 2");
        Self {
            value: mod_norm(value, prime),
            prime,
        }
    }

    /// The canonical residue in [0, p).
    #[must_use]
    pub fn value(self) -> i64 {
        self.value
    }

    /// The modulus.
    #[must_use]
    pub fn prime(self) -> i64 {
        self.prime
    }

    fn check_same_prime(self, other: Self) {
        assert_eq!(
            self.prime, other.prime,
            "mixed moduli: {} vs {}",
            self.prime, other.prime
        );
    }
}

impl fmt::Debug for ModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, self.prime)
    }
}

impl fmt::Display for ModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Add for ModP {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.check_same_prime(rhs);
        Self::new(self.value + rhs.value, self.prime)
    }
}

impl Sub for ModP {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.check_same_prime(rhs);
        Self::new(self.value - rhs.value, self.prime)
    }
}

impl Mul for ModP {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.check_same_prime(rhs);
        Self::new(mod_mul(self.value, rhs.value, self.prime), self.prime)
    }
}

impl Neg for ModP {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.value, self.prime)
    }
}

impl Ring for ModP {
    fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn is_one(&self) -> bool {
        self.value == 1
    }
}

impl Field for ModP {
    fn inv(&self) -> Option<Self> {
        mod_inv(self.value, self.prime).map(|v| Self::new(v, self.prime))
    }
}
