//! Exact factoring of q-polynomials into (1 - q^i) parts.

use std::collections::BTreeMap;

use num_traits::{One, Zero};
use quill_expr::{ExprHandle, Session};
use quill_num::Rational;
use quill_series::{Error, Result, Series};
use smallvec::{smallvec, SmallVec};

/// A factorization `scalar * prod (1 - q^i)^{m_i}` of a q-polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QFactorization {
    /// Maps i to the multiplicity of `(1 - q^i)`.
    pub factors: BTreeMap<i64, i64>,
    /// The constant term of the input.
    pub scalar: Rational,
    /// True when the divisions reduced the polynomial all the way to 1.
    pub is_exact: bool,
}

impl QFactorization {
    /// Renders `scalar * prod (1 - q^i)^{m_i}` as an expression.
    pub fn to_expr(&self, session: &mut Session) -> ExprHandle {
        let one = session.integer(1);
        let q = session.q();
        let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        if !self.scalar.is_one() {
            let num = self.scalar.numerator().to_i64().unwrap_or(0);
            let den = self.scalar.denominator().to_i64().unwrap_or(1);
            parts.push(session.rational(num, den));
        }
        for (&i, &m) in &self.factors {
            let qi = session.int_pow(q, i);
            let neg_qi = session.neg(qi);
            let base = session.add(smallvec![one, neg_qi]);
            parts.push(session.int_pow(base, m));
        }
        if parts.is_empty() {
            return one;
        }
        session.mul(parts)
    }
}

/// Factors a q-polynomial into `scalar * prod (1 - q^i)^{m_i}`.
///
/// Trial divisions run from the largest candidate exponent downward; taking
/// `(1 - q)` out first would steal the cyclotomic content of larger factors
/// (e.g. `(1 - q^2) = (1 - q)(1 + q)`).
///
/// A polynomial with no constant term cannot be a product of `(1 - q^i)`
/// factors; the result is then empty and inexact.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn qfactor(f: &Series) -> Result<QFactorization> {
    if f.is_zero() {
        return Err(Error::MalformedParameter(
            "cannot factor the zero polynomial".into(),
        ));
    }
    let scalar = f.coeff(0);
    if scalar.is_zero() {
        return Ok(QFactorization {
            factors: BTreeMap::new(),
            scalar: Rational::one(),
            is_exact: false,
        });
    }

    let inv = scalar.recip();
    let mut current: BTreeMap<i64, Rational> =
        f.iter().map(|(&k, v)| (k, v * &inv)).collect();
    let mut factors = BTreeMap::new();

    let degree = |p: &BTreeMap<i64, Rational>| p.keys().next_back().copied().unwrap_or(0);

    let mut i = degree(&current);
    while i >= 1 {
        match divide_by_one_minus_qi(&current, i) {
            Some(quotient) => {
                *factors.entry(i).or_insert(0) += 1;
                current = quotient;
                let d = degree(&current);
                if d < i {
                    i = d;
                }
            }
            None => i -= 1,
        }
    }

    let is_exact = current.len() == 1 && current.get(&0).is_some_and(One::is_one);

    Ok(QFactorization {
        factors,
        scalar,
        is_exact,
    })
}

/// Exact polynomial division by `(1 - q^i)` via low-to-high carrying: for the
/// lowest remaining term `c q^k`, the quotient gains `c q^k` and the carry
/// `c q^{k+i}` folds back into the remainder. A carry landing beyond
/// `deg - i` means the division fails.
fn divide_by_one_minus_qi(
    p: &BTreeMap<i64, Rational>,
    i: i64,
) -> Option<BTreeMap<i64, Rational>> {
    let &deg = p.keys().next_back()?;
    if deg < i {
        return None;
    }
    let max_quotient_deg = deg - i;

    let mut remainder = p.clone();
    let mut quotient = BTreeMap::new();

    while let Some((&k, c)) = remainder.first_key_value() {
        let c = c.clone();
        if k > max_quotient_deg {
            return None;
        }
        quotient.insert(k, c.clone());
        remainder.remove(&k);

        let carry_key = k + i;
        let entry = remainder.entry(carry_key).or_insert_with(Rational::zero);
        *entry = &*entry + &c;
        if entry.is_zero() {
            remainder.remove(&carry_key);
        }
    }

    Some(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::arithmetic;
    use quill_series::gen::qbin;

    const TRUNC: i64 = 40;

    fn one_minus_q_pow(i: i64) -> Series {
        let mut s = Series::one(0, TRUNC);
        s.set_coeff(i, Rational::from(-1));
        s
    }

    #[test]
    fn test_qfactor_simple_product() {
        // 5 * (1-q)(1-q^2)^2 (1-q^5)
        let p = arithmetic::scalar_mul(
            &Rational::from(5),
            &arithmetic::mul(
                &arithmetic::mul(&one_minus_q_pow(1), &one_minus_q_pow(5)),
                &arithmetic::mul(&one_minus_q_pow(2), &one_minus_q_pow(2)),
            ),
        );
        let f = qfactor(&p).unwrap();
        assert!(f.is_exact);
        assert_eq!(f.scalar, Rational::from(5));
        assert_eq!(f.factors, BTreeMap::from([(1, 1), (2, 2), (5, 1)]));
    }

    #[test]
    fn test_qfactor_largest_first() {
        // (1-q^2) alone must come out as (1-q^2), not (1-q)(1+q).
        let f = qfactor(&one_minus_q_pow(2)).unwrap();
        assert!(f.is_exact);
        assert_eq!(f.factors, BTreeMap::from([(2, 1)]));
    }

    #[test]
    fn test_qfactor_gaussian_binomial_is_inexact() {
        // [4, 2]_q = (1+q^2)(1+q+q^2) has cyclotomic factors that are not of
        // the (1-q^i) shape.
        let mut session = Session::new();
        let b = qbin(&mut session, 4, 2, TRUNC).unwrap();
        let f = qfactor(&b).unwrap();
        assert!(!f.is_exact);
    }

    #[test]
    fn test_qfactor_no_constant_term() {
        let mut s = Series::zero(0, TRUNC);
        s.set_coeff(3, Rational::from(2));
        let f = qfactor(&s).unwrap();
        assert!(!f.is_exact);
        assert!(f.factors.is_empty());
    }

    #[test]
    fn test_qfactor_zero_rejected() {
        assert!(matches!(
            qfactor(&Series::zero(0, TRUNC)),
            Err(Error::MalformedParameter(_))
        ));
    }

    #[test]
    fn test_qfactor_constant() {
        let c = Series::constant(0, Rational::from_i64(7, 2), TRUNC);
        let f = qfactor(&c).unwrap();
        assert!(f.is_exact);
        assert_eq!(f.scalar, Rational::from_i64(7, 2));
        assert!(f.factors.is_empty());
    }

    #[test]
    fn test_to_expr() {
        let f = qfactor(&one_minus_q_pow(2)).unwrap();
        let mut session = Session::new();
        let expr = f.to_expr(&mut session);
        assert_eq!(session.render(expr), "1 + -q^2");
    }
}
