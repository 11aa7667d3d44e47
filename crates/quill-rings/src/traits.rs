//! Algebraic structure traits.
//!
//! Coefficient domains for the linear algebra layer. Only the operations the
//! elimination code actually uses are required.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Zero};

use quill_num::Rational;

/// A ring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone
    + Eq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;
}

/// A field is a commutative ring in which every nonzero element is invertible.
pub trait Field: Ring {
    /// The multiplicative inverse.
    ///
    /// Returns `None` for zero.
    fn inv(&self) -> Option<Self>;

    /// Field division self / other.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        let inv = other.inv().expect("division by zero in field");
        self.clone() * inv
    }
}

impl Ring for Rational {
    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn is_one(&self) -> bool {
        One::is_one(self)
    }
}

impl Field for Rational {
    fn inv(&self) -> Option<Self> {
        if Zero::is_zero(self) {
            None
        } else {
            Some(self.recip())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_field() {
        let a = Rational::from_i64(3, 4);
        let inv = Field::inv(&a).unwrap();
        assert_eq!(inv, Rational::from_i64(4, 3));
        assert!(Field::inv(&Rational::from_i64(0, 1)).is_none());

        let b = Rational::from_i64(1, 2);
        assert_eq!(a.field_div(&b), Rational::from_i64(3, 2));
    }
}
