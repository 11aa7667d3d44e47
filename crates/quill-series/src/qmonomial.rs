//! Canonical rational q-powers.
//!
//! The value `c * q^k` with `c` an exact rational and `k` an integer is the
//! common currency for generator parameters, hypergeometric parameters, and
//! closed-form prefactors.

use std::fmt;

use num_traits::{One, Zero};
use quill_num::{Integer, Rational};

/// A canonical rational q-power: `coeff * q^power`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QMonomial {
    /// The rational coefficient.
    pub coeff: Rational,
    /// The integer power of q.
    pub power: i64,
}

impl QMonomial {
    /// Creates `coeff * q^power`.
    #[must_use]
    pub fn new(coeff: Rational, power: i64) -> Self {
        Self { coeff, power }
    }

    /// The monomial `q`.
    #[must_use]
    pub fn q() -> Self {
        Self::new(Rational::from(1), 1)
    }

    /// The monomial `q^k`.
    #[must_use]
    pub fn q_power(k: i64) -> Self {
        Self::new(Rational::from(1), k)
    }

    /// A constant monomial `c * q^0`.
    #[must_use]
    pub fn constant(c: Rational) -> Self {
        Self::new(c, 0)
    }

    /// The numerator of the coefficient.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        self.coeff.numerator()
    }

    /// The denominator of the coefficient.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        self.coeff.denominator()
    }

    /// Returns true if this is exactly 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.coeff.is_one() && self.power == 0
    }

    /// Returns true if the coefficient is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// Multiplies two monomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.coeff * &other.coeff, self.power + other.power)
    }

    /// Raises the monomial to a signed integer power.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient is zero and `exp` is negative.
    #[must_use]
    pub fn pow(&self, exp: i64) -> Self {
        Self::new(self.coeff.pow_i64(exp), self.power * exp)
    }

    /// The reciprocal monomial.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        Self::new(self.coeff.recip(), -self.power)
    }

    /// Evaluates the monomial at a concrete rational q.
    ///
    /// # Panics
    ///
    /// Panics if `q_val` is zero and the power is negative.
    #[must_use]
    pub fn eval(&self, q_val: &Rational) -> Rational {
        &self.coeff * &q_val.pow_i64(self.power)
    }
}

impl fmt::Display for QMonomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.power {
            0 => write!(f, "{}", self.coeff),
            1 if self.coeff.is_one() => write!(f, "q"),
            1 => write!(f, "{}*q", self.coeff),
            p if self.coeff.is_one() => write!(f, "q^{p}"),
            p => write!(f, "{}*q^{p}", self.coeff),
        }
    }
}

/// The order of a q-Pochhammer symbol (a; q)_n.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PochhammerOrder {
    /// (a; q)_n for a (possibly negative) integer n.
    Finite(i64),
    /// (a; q)_inf.
    Infinite,
}
