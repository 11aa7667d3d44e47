//! Truncated formal power series.
//!
//! A `Series` is known modulo `q^truncation`: coefficients at exponents below
//! the truncation are exact, anything at or above it is unknown. Exponents may
//! be negative (Laurent tails arise from reciprocal monomial parameters).
//!
//! Invariants:
//! - every stored key is `< truncation`
//! - no zero coefficient is ever stored

use std::collections::BTreeMap;
use std::fmt;

use num_traits::{One, Zero};
use quill_expr::SymbolId;
use quill_num::Rational;

use crate::error::{Error, Result};

/// A truncated formal power series with exact rational coefficients.
#[derive(Clone, PartialEq, Eq)]
pub struct Series {
    coefficients: BTreeMap<i64, Rational>,
    variable: SymbolId,
    truncation: i64,
}

impl Series {
    /// The zero series known to O(q^truncation).
    ///
    /// # Panics
    ///
    /// Panics if `truncation < 1`.
    #[must_use]
    pub fn zero(variable: SymbolId, truncation: i64) -> Self {
        assert!(truncation >= 1, "truncation must be at least 1");
        Self {
            coefficients: BTreeMap::new(),
            variable,
            truncation,
        }
    }

    /// The constant series 1.
    #[must_use]
    pub fn one(variable: SymbolId, truncation: i64) -> Self {
        Self::monomial(variable, Rational::from(1), 0, truncation)
    }

    /// The single-term series `coeff * q^power`.
    ///
    /// A power at or above the truncation yields the zero series.
    #[must_use]
    pub fn monomial(variable: SymbolId, coeff: Rational, power: i64, truncation: i64) -> Self {
        let mut s = Self::zero(variable, truncation);
        if power < truncation && !coeff.is_zero() {
            s.coefficients.insert(power, coeff);
        }
        s
    }

    /// The constant series with the given value.
    #[must_use]
    pub fn constant(variable: SymbolId, value: Rational, truncation: i64) -> Self {
        Self::monomial(variable, value, 0, truncation)
    }

    /// The series variable.
    #[must_use]
    pub fn variable(&self) -> SymbolId {
        self.variable
    }

    /// The truncation order: coefficients are exact strictly below this.
    #[must_use]
    pub fn truncation(&self) -> i64 {
        self.truncation
    }

    /// The coefficient of q^n.
    ///
    /// # Panics
    ///
    /// Panics if `n >= truncation`; use [`Series::checked_coeff`] at API
    /// boundaries.
    #[must_use]
    pub fn coeff(&self, n: i64) -> Rational {
        assert!(
            n < self.truncation,
            "coefficient {n} requested at or above truncation {}",
            self.truncation
        );
        self.coefficients.get(&n).cloned().unwrap_or_else(Rational::zero)
    }

    /// The coefficient of q^n, or `PrecisionExhausted` beyond the truncation.
    pub fn checked_coeff(&self, n: i64) -> Result<Rational> {
        if n >= self.truncation {
            return Err(Error::PrecisionExhausted(format!(
                "coefficient {n} requested but series is only known to O(q^{})",
                self.truncation
            )));
        }
        Ok(self.coefficients.get(&n).cloned().unwrap_or_else(Rational::zero))
    }

    /// Sets the coefficient of q^n, removing the entry when zero.
    ///
    /// # Panics
    ///
    /// Panics if `n >= truncation`.
    pub fn set_coeff(&mut self, n: i64, value: Rational) {
        assert!(
            n < self.truncation,
            "coefficient {n} set at or above truncation {}",
            self.truncation
        );
        if value.is_zero() {
            self.coefficients.remove(&n);
        } else {
            self.coefficients.insert(n, value);
        }
    }

    /// Adds `value` into the coefficient of q^n; out-of-range exponents are
    /// silently dropped (they are beyond the known precision).
    pub fn add_coeff(&mut self, n: i64, value: &Rational) {
        if n >= self.truncation || value.is_zero() {
            return;
        }
        let updated = match self.coefficients.get(&n) {
            Some(existing) => existing + value,
            None => value.clone(),
        };
        if updated.is_zero() {
            self.coefficients.remove(&n);
        } else {
            self.coefficients.insert(n, updated);
        }
    }

    /// Returns true if every known coefficient is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Returns true if the series is exactly 1 up to its truncation.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.coefficients.len() == 1
            && self.coefficients.get(&0).is_some_and(One::is_one)
    }

    /// The lowest exponent with a nonzero coefficient.
    #[must_use]
    pub fn min_order(&self) -> Option<i64> {
        self.coefficients.keys().next().copied()
    }

    /// The highest exponent with a nonzero coefficient.
    #[must_use]
    pub fn max_order(&self) -> Option<i64> {
        self.coefficients.keys().next_back().copied()
    }

    /// The number of nonzero coefficients.
    #[must_use]
    pub fn num_nonzero(&self) -> usize {
        self.coefficients.len()
    }

    /// Iterates over (exponent, coefficient) pairs in exponent order.
    pub fn iter(&self) -> impl Iterator<Item = (&i64, &Rational)> {
        self.coefficients.iter()
    }

    /// Lowers the truncation order, discarding coefficients beyond it.
    ///
    /// # Panics
    ///
    /// Panics if `truncation < 1` or above the current truncation (precision
    /// cannot be invented).
    #[must_use]
    pub fn truncated(&self, truncation: i64) -> Self {
        assert!(truncation >= 1, "truncation must be at least 1");
        assert!(
            truncation <= self.truncation,
            "cannot raise truncation from {} to {truncation}",
            self.truncation
        );
        let mut s = Self::zero(self.variable, truncation);
        for (&k, v) in self.coefficients.range(..truncation) {
            s.coefficients.insert(k, v.clone());
        }
        s
    }

    /// Evaluates the series at a concrete rational value of q.
    ///
    /// Only the known coefficients contribute; this is a truncated value, not
    /// an analytic one.
    #[must_use]
    pub fn eval(&self, q_val: &Rational) -> Rational {
        let mut acc = Rational::zero();
        for (&k, v) in &self.coefficients {
            acc = acc + v * &q_val.pow_i64(k);
        }
        acc
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Series[O(q^{})] {{", self.truncation)?;
        for (i, (k, v)) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "O(q^{})", self.truncation);
        }
        let mut first = true;
        for (&k, v) in &self.coefficients {
            let (sign, mag) = if v.is_negative() {
                ("-", -v)
            } else {
                ("+", v.clone())
            };
            if first {
                if sign == "-" {
                    write!(f, "-")?;
                }
                first = false;
            } else {
                write!(f, " {sign} ")?;
            }
            match (k, mag.is_one()) {
                (0, _) => write!(f, "{mag}")?,
                (1, true) => write!(f, "q")?,
                (1, false) => write!(f, "{mag}*q")?,
                (_, true) => write!(f, "q^{k}")?,
                (_, false) => write!(f, "{mag}*q^{k}")?,
            }
        }
        write!(f, " + O(q^{})", self.truncation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var() -> SymbolId {
        0
    }

    #[test]
    fn test_zero_and_one() {
        let z = Series::zero(var(), 10);
        assert!(z.is_zero());
        assert_eq!(z.coeff(5), Rational::zero());

        let one = Series::one(var(), 10);
        assert!(one.is_one());
        assert_eq!(one.coeff(0), Rational::from(1));
    }

    #[test]
    fn test_set_coeff_removes_zero() {
        let mut s = Series::zero(var(), 10);
        s.set_coeff(3, Rational::from(5));
        assert_eq!(s.num_nonzero(), 1);
        s.set_coeff(3, Rational::zero());
        assert!(s.is_zero());
    }

    #[test]
    fn test_monomial_beyond_truncation_is_zero() {
        let s = Series::monomial(var(), Rational::from(1), 12, 10);
        assert!(s.is_zero());
    }

    #[test]
    fn test_checked_coeff() {
        let s = Series::one(var(), 5);
        assert_eq!(s.checked_coeff(4).unwrap(), Rational::zero());
        assert!(matches!(
            s.checked_coeff(5),
            Err(Error::PrecisionExhausted(_))
        ));
    }

    #[test]
    #[should_panic(expected = "at or above truncation")]
    fn test_coeff_beyond_truncation_panics() {
        let s = Series::one(var(), 5);
        let _ = s.coeff(5);
    }

    #[test]
    fn test_orders() {
        let mut s = Series::zero(var(), 20);
        s.set_coeff(2, Rational::from(1));
        s.set_coeff(7, Rational::from(-3));
        assert_eq!(s.min_order(), Some(2));
        assert_eq!(s.max_order(), Some(7));
    }

    #[test]
    fn test_truncated() {
        let mut s = Series::zero(var(), 20);
        s.set_coeff(2, Rational::from(1));
        s.set_coeff(15, Rational::from(4));
        let t = s.truncated(10);
        assert_eq!(t.truncation(), 10);
        assert_eq!(t.num_nonzero(), 1);
        assert_eq!(t.coeff(2), Rational::from(1));
    }

    #[test]
    fn test_display() {
        let mut s = Series::zero(var(), 8);
        s.set_coeff(0, Rational::from(1));
        s.set_coeff(1, Rational::from(-2));
        s.set_coeff(4, Rational::from(1));
        assert_eq!(s.to_string(), "1 - 2*q + q^4 + O(q^8)");
    }

    #[test]
    fn test_eval() {
        let mut s = Series::zero(var(), 5);
        s.set_coeff(0, Rational::from(1));
        s.set_coeff(2, Rational::from(3));
        assert_eq!(s.eval(&Rational::from_i64(1, 2)), Rational::from_i64(7, 4));
    }
}
