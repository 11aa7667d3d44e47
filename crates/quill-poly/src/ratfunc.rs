//! Rational functions as reduced polynomial quotients.

use num_traits::Zero;
use quill_num::Rational;

use crate::dense::{poly_gcd, Poly};

/// A rational function `numer / denom` kept reduced: the two parts share no
/// common factor and the denominator is monic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RationalFunc {
    numer: Poly,
    denom: Poly,
}

impl RationalFunc {
    /// Creates `numer / denom`, reducing by the gcd and normalizing the
    /// denominator to be monic.
    ///
    /// # Panics
    ///
    /// Panics when `denom` is the zero polynomial.
    #[must_use]
    pub fn new(numer: Poly, denom: Poly) -> Self {
        assert!(!denom.is_zero(), "rational function with zero denominator");
        if numer.is_zero() {
            return Self {
                numer: Poly::zero(),
                denom: Poly::one(),
            };
        }
        let g = poly_gcd(&numer, &denom);
        let mut numer = numer.exact_div(&g).unwrap_or(numer);
        let mut denom = denom.exact_div(&g).unwrap_or(denom);
        let lead = denom.leading_coeff();
        let lead_inv = lead.recip();
        numer = numer.scale(&lead_inv);
        denom = denom.scale(&lead_inv);
        Self { numer, denom }
    }

    /// A polynomial viewed as a rational function.
    #[must_use]
    pub fn from_poly(p: Poly) -> Self {
        Self::new(p, Poly::one())
    }

    /// The zero function.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_poly(Poly::zero())
    }

    /// The reduced numerator.
    #[must_use]
    pub fn numer(&self) -> &Poly {
        &self.numer
    }

    /// The reduced (monic) denominator.
    #[must_use]
    pub fn denom(&self) -> &Poly {
        &self.denom
    }

    /// True for the zero function.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    /// Evaluates at a point; `None` at a pole of the reduced form.
    #[must_use]
    pub fn eval(&self, x: &Rational) -> Option<Rational> {
        let d = self.denom.eval(x);
        if d.is_zero() {
            return None;
        }
        Some(&self.numer.eval(x) / &d)
    }

    /// The product of two rational functions, reduced.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.numer.mul(&other.numer),
            self.denom.mul(&other.denom),
        )
    }

    /// The sum of two rational functions, reduced.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let numer = self
            .numer
            .mul(&other.denom)
            .add(&other.numer.mul(&self.denom));
        Self::new(numer, self.denom.mul(&other.denom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coeffs: &[i64]) -> Poly {
        Poly::from_i64_coeffs(coeffs)
    }

    #[test]
    fn test_reduction() {
        // (x^2 - 1) / (2x - 2) reduces to (x + 1) / 2.
        let r = RationalFunc::new(p(&[-1, 0, 1]), p(&[-2, 2]));
        assert_eq!(r.denom(), &Poly::one());
        assert_eq!(
            r.numer(),
            &p(&[1, 1]).scale(&Rational::from_i64(1, 2))
        );
    }

    #[test]
    fn test_eval_and_pole() {
        let r = RationalFunc::new(p(&[1]), p(&[-1, 1])); // 1 / (x - 1)
        assert_eq!(r.eval(&Rational::from(3)), Some(Rational::from_i64(1, 2)));
        assert!(r.eval(&Rational::from(1)).is_none());
        // The removable singularity of (x-1)/(x-1) evaluates fine.
        let s = RationalFunc::new(p(&[-1, 1]), p(&[-1, 1]));
        assert_eq!(s.eval(&Rational::from(1)), Some(Rational::from(1)));
    }

    #[test]
    fn test_algebra() {
        let a = RationalFunc::new(p(&[1]), p(&[0, 1])); // 1/x
        let b = RationalFunc::from_poly(p(&[0, 1])); // x
        assert_eq!(a.mul(&b), RationalFunc::from_poly(Poly::one()));
        // 1/x + x = (1 + x^2)/x.
        let sum = a.add(&b);
        assert_eq!(sum.numer(), &p(&[1, 0, 1]));
        assert_eq!(sum.denom(), &p(&[0, 1]));
        assert!(RationalFunc::zero().is_zero());
    }
}
