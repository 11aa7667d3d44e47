//! Dense univariate polynomials over exact rationals.

use num_traits::{One, Zero};
use quill_num::Rational;

/// A dense univariate polynomial with [`Rational`] coefficients.
///
/// Coefficients are stored in ascending degree order with no trailing zeros;
/// the zero polynomial stores nothing and has degree `None`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from coefficients in ascending degree order.
    #[must_use]
    pub fn new(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(Rational::one())
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(c: Rational) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `x`.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![Rational::zero(), Rational::one()])
    }

    /// The monomial `c * x^n`.
    #[must_use]
    pub fn monomial(c: Rational, n: usize) -> Self {
        let mut coeffs = vec![Rational::zero(); n + 1];
        coeffs[n] = c;
        Self::new(coeffs)
    }

    /// The linear polynomial `a0 + a1 * x`.
    #[must_use]
    pub fn linear(a0: Rational, a1: Rational) -> Self {
        Self::new(vec![a0, a1])
    }

    /// A polynomial from small integer coefficients, ascending degree.
    #[must_use]
    pub fn from_i64_coeffs(coeffs: &[i64]) -> Self {
        Self::new(coeffs.iter().map(|&c| Rational::from(c)).collect())
    }

    /// The degree, or `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<i64> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() as i64 - 1)
        }
    }

    /// True for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// True when the degree is at most zero.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    /// The leading coefficient; zero for the zero polynomial.
    #[must_use]
    pub fn leading_coeff(&self) -> Rational {
        self.coeffs.last().cloned().unwrap_or_else(Rational::zero)
    }

    /// The coefficient of `x^i`; zero outside the stored range.
    #[must_use]
    pub fn coeff(&self, i: i64) -> Rational {
        usize::try_from(i)
            .ok()
            .and_then(|k| self.coeffs.get(k))
            .cloned()
            .unwrap_or_else(Rational::zero)
    }

    /// Evaluates at a point by Horner's method.
    #[must_use]
    pub fn eval(&self, x: &Rational) -> Rational {
        let mut result = Rational::zero();
        for c in self.coeffs.iter().rev() {
            result = &(&result * x) + c;
        }
        result
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..n)
            .map(|k| &self.coeff(k as i64) + &other.coeff(k as i64))
            .collect();
        Self::new(coeffs)
    }

    /// Subtracts `other` from `self`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..n)
            .map(|k| &self.coeff(k as i64) - &other.coeff(k as i64))
            .collect();
        Self::new(coeffs)
    }

    /// Negates every coefficient.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::new(self.coeffs.iter().map(|c| -c).collect())
    }

    /// Multiplies two polynomials (schoolbook).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![Rational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = &coeffs[i + j] + &(a * b);
            }
        }
        Self::new(coeffs)
    }

    /// Multiplies every coefficient by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|a| a * c).collect())
    }

    /// Divides by the leading coefficient; the zero polynomial is unchanged.
    #[must_use]
    pub fn make_monic(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        self.scale(&self.leading_coeff().recip())
    }

    /// Euclidean division: `self = q * divisor + r` with
    /// `deg r < deg divisor`. `None` when the divisor is zero.
    #[must_use]
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let d = divisor.degree()?;
        let mut rem = self.clone();
        let mut quot = Self::zero();
        let lead_inv = divisor.leading_coeff().recip();
        while let Some(r) = rem.degree() {
            if r < d {
                break;
            }
            let c = &rem.leading_coeff() * &lead_inv;
            let shift = usize::try_from(r - d).ok()?;
            let term = Self::monomial(c, shift);
            rem = rem.sub(&term.mul(divisor));
            quot = quot.add(&term);
        }
        Some((quot, rem))
    }

    /// Exact quotient: `Some(self / divisor)` when the remainder vanishes.
    #[must_use]
    pub fn exact_div(&self, divisor: &Self) -> Option<Self> {
        let (quot, rem) = self.div_rem(divisor)?;
        rem.is_zero().then_some(quot)
    }

    /// Substitutes `x -> q * x`: the coefficient of `x^k` picks up `q^k`.
    #[must_use]
    pub fn q_shift(&self, q: &Rational) -> Self {
        self.q_shift_n(q, 1)
    }

    /// Substitutes `x -> q^n * x` for a (possibly negative) integer n.
    ///
    /// # Panics
    ///
    /// Panics when `q` is zero and `n` is negative.
    #[must_use]
    pub fn q_shift_n(&self, q: &Rational, n: i64) -> Self {
        let step = q.pow_i64(n);
        let mut factor = Rational::one();
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let out = c * &factor;
                factor = &factor * &step;
                out
            })
            .collect();
        Self::new(coeffs)
    }
}

/// The monic greatest common divisor via the Euclidean algorithm.
///
/// `poly_gcd(0, 0)` is the zero polynomial.
#[must_use]
pub fn poly_gcd(a: &Poly, b: &Poly) -> Poly {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        // Divisor is nonzero, so div_rem cannot fail.
        let rem = a.div_rem(&b).map(|(_, r)| r).unwrap_or_else(Poly::zero);
        a = b;
        b = rem;
    }
    a.make_monic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coeffs: &[i64]) -> Poly {
        Poly::from_i64_coeffs(coeffs)
    }

    #[test]
    fn test_construction_normalizes() {
        assert_eq!(p(&[1, 2, 0, 0]), p(&[1, 2]));
        assert!(p(&[0, 0]).is_zero());
        assert_eq!(p(&[0]).degree(), None);
        assert_eq!(p(&[5]).degree(), Some(0));
        assert_eq!(Poly::x().degree(), Some(1));
    }

    #[test]
    fn test_arithmetic() {
        let a = p(&[1, 1]); // 1 + x
        let b = p(&[-1, 1]); // -1 + x
        assert_eq!(a.mul(&b), p(&[-1, 0, 1]));
        assert_eq!(a.add(&b), p(&[0, 2]));
        assert_eq!(a.sub(&a), Poly::zero());
        assert_eq!(a.neg(), p(&[-1, -1]));
        assert_eq!(a.eval(&Rational::from(3)), Rational::from(4));
    }

    #[test]
    fn test_div_rem() {
        // x^2 + 3x + 2 = (x + 1)(x + 2)
        let f = p(&[2, 3, 1]);
        let g = p(&[1, 1]);
        let (q, r) = f.div_rem(&g).unwrap();
        assert_eq!(q, p(&[2, 1]));
        assert!(r.is_zero());

        let (q, r) = p(&[1, 0, 1]).div_rem(&g).unwrap();
        assert_eq!(q, p(&[-1, 1]));
        assert_eq!(r, p(&[2]));

        assert!(f.div_rem(&Poly::zero()).is_none());
        assert_eq!(f.exact_div(&g).unwrap(), p(&[2, 1]));
        assert!(p(&[1, 0, 1]).exact_div(&g).is_none());
    }

    #[test]
    fn test_gcd() {
        // gcd((x-1)(x-2), (x-1)(x-3)) = x - 1, monic.
        let a = p(&[-1, 1]).mul(&p(&[-2, 1]));
        let b = p(&[-1, 1]).mul(&p(&[-3, 1]));
        assert_eq!(poly_gcd(&a, &b), p(&[-1, 1]));
        assert_eq!(poly_gcd(&a, &Poly::one()), Poly::one());
        assert!(poly_gcd(&Poly::zero(), &Poly::zero()).is_zero());
        // gcd with zero is the monic normalization of the other argument.
        assert_eq!(poly_gcd(&a.scale(&Rational::from(7)), &Poly::zero()), a);
    }

    #[test]
    fn test_q_shift() {
        // (1 + x + x^2) with x -> 2x gives 1 + 2x + 4x^2.
        let f = p(&[1, 1, 1]);
        let two = Rational::from(2);
        assert_eq!(f.q_shift(&two), p(&[1, 2, 4]));
        // x -> 2^{-1} x then x -> 2x round-trips.
        assert_eq!(f.q_shift_n(&two, -1).q_shift(&two), f);
    }

    #[test]
    fn test_make_monic() {
        let f = p(&[2, 4]);
        let monic = f.make_monic();
        assert_eq!(monic.leading_coeff(), Rational::from(1));
        assert_eq!(monic.coeff(0), Rational::from_i64(1, 2));
    }
}
