//! Andrews' algorithm: recover infinite-product exponents from a series.
//!
//! For `f = 1 + b_1 q + b_2 q^2 + ...` the logarithmic derivative identity
//! `q f'/f = sum c_n q^n` with `c_n = sum_{d|n} d a_d` turns product recovery
//! into two passes:
//!
//! 1. `c_n = n b_n - sum_{j=1}^{n-1} c_j b_{n-j}`
//! 2. Moebius inversion: `n a_n = sum_{d|n} mu(n/d) c_d`
//!
//! giving `f = prod_{n>=1} (1 - q^n)^{-a_n}` up to the truncation.

use std::collections::BTreeMap;

use num_traits::Zero;
use quill_expr::{ExprHandle, Session};
use quill_num::arith::{divisors, moebius};
use quill_num::Rational;
use quill_series::{Error, Result, Series};
use smallvec::{smallvec, SmallVec};

/// Exponents `a_n` with `f = prod (1 - q^n)^{-a_n}`, as recovered from a
/// finite coefficient window.
///
/// Positive `a_n` puts `(1 - q^n)` in the denominator. Only nonzero exponents
/// are stored; they are exact rationals, and a noninteger entry means the
/// series is not an integral product at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductForm {
    /// Maps n to `a_n`.
    pub exponents: BTreeMap<i64, Rational>,
    /// Number of coefficients consumed; exponents above this are unknown.
    pub terms_used: i64,
}

impl ProductForm {
    /// The exponents as integers, or `None` if any entry is not an i64
    /// integer.
    #[must_use]
    pub fn integer_exponents(&self) -> Option<BTreeMap<i64, i64>> {
        let mut out = BTreeMap::new();
        for (&n, a) in &self.exponents {
            let v = a.to_integer()?.to_i64()?;
            if v != 0 {
                out.insert(n, v);
            }
        }
        Some(out)
    }

    /// Renders the product as an expression `prod (1 - q^n)^{-a_n}`, or
    /// `None` if an exponent is not an i64 integer.
    pub fn to_expr(&self, session: &mut Session) -> Option<ExprHandle> {
        let ints = self.integer_exponents()?;
        if ints.is_empty() {
            return Some(session.integer(1));
        }
        let one = session.integer(1);
        let q = session.q();
        let mut factors: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for (&n, &a) in &ints {
            let qn = session.int_pow(q, n);
            let neg_qn = session.neg(qn);
            let base = session.add(smallvec![one, neg_qn]);
            factors.push(session.int_pow(base, -a));
        }
        Some(session.mul(factors))
    }
}

/// Runs Andrews' algorithm on `f`, recovering exponents up to
/// `min(max_n, truncation - 1)`.
///
/// The series is normalized first: a leading `c q^k` is stripped so the
/// algorithm runs on a series with constant term 1. The stripped scalar and
/// shift are not part of the result.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn prodmake(f: &Series, max_n: i64) -> Result<ProductForm> {
    let Some(min_order) = f.min_order() else {
        return Err(Error::MalformedParameter(
            "cannot analyze the zero series".into(),
        ));
    };

    let effective_max = max_n.min(f.truncation() - 1 - min_order);
    if effective_max < 1 {
        return Ok(ProductForm {
            exponents: BTreeMap::new(),
            terms_used: 0,
        });
    }

    log::debug!("prodmake over {effective_max} coefficients");

    // Normalized coefficients: b(n) = f[min_order + n] / f[min_order].
    let inv_b0 = f.coeff(min_order).recip();
    let b = |n: i64| -> Rational {
        if min_order + n >= f.truncation() {
            Rational::zero()
        } else {
            &f.coeff(min_order + n) * &inv_b0
        }
    };

    // Pass 1: c_n = n b_n - sum_{j<n} c_j b_{n-j}
    let mut c: BTreeMap<i64, Rational> = BTreeMap::new();
    for n in 1..=effective_max {
        let mut val = Rational::from(n) * b(n);
        for (&j, cj) in c.range(1..n) {
            let bn = b(n - j);
            if !bn.is_zero() {
                val = val - cj * &bn;
            }
        }
        if !val.is_zero() {
            c.insert(n, val);
        }
    }

    // Pass 2: n a_n = sum_{d|n} mu(n/d) c_d
    let mut exponents = BTreeMap::new();
    for n in 1..=effective_max {
        let mut sum = Rational::zero();
        for d in divisors(n) {
            if let Some(cd) = c.get(&d) {
                let mu = moebius(n / d);
                if mu != 0 {
                    sum = sum + &(Rational::from(mu) * cd);
                }
            }
        }
        if !sum.is_zero() {
            exponents.insert(n, sum / Rational::from(n));
        }
    }

    Ok(ProductForm {
        exponents,
        terms_used: effective_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::gen::{distinct_parts_gf, etaq, partition_gf};

    const TRUNC: i64 = 40;

    #[test]
    fn test_prodmake_partition_gf() {
        // 1/(q; q)_inf = prod (1-q^n)^{-1}: a_n = 1 for all n.
        let mut session = Session::new();
        let gf = partition_gf(&mut session, TRUNC);
        let form = prodmake(&gf, TRUNC).unwrap();
        assert_eq!(form.terms_used, TRUNC - 1);
        for n in 1..TRUNC {
            assert_eq!(
                form.exponents.get(&n),
                Some(&Rational::from(1)),
                "a_{n}"
            );
        }
    }

    #[test]
    fn test_prodmake_euler_product() {
        // (q; q)_inf: a_n = -1 for all n.
        let mut session = Session::new();
        let euler = etaq(&mut session, 1, 1, TRUNC).unwrap();
        let form = prodmake(&euler, TRUNC).unwrap();
        for n in 1..TRUNC {
            assert_eq!(form.exponents.get(&n), Some(&Rational::from(-1)));
        }
    }

    #[test]
    fn test_prodmake_distinct_parts() {
        // prod (1+q^n) = prod (1-q^n)^{-[n odd]}.
        let mut session = Session::new();
        let gf = distinct_parts_gf(&mut session, TRUNC);
        let form = prodmake(&gf, TRUNC).unwrap();
        for n in 1..TRUNC {
            let expected = if n % 2 == 1 {
                Some(Rational::from(1))
            } else {
                None
            };
            assert_eq!(form.exponents.get(&n).cloned(), expected, "a_{n}");
        }
    }

    #[test]
    fn test_prodmake_zero_series() {
        let z = Series::zero(0, TRUNC);
        assert!(matches!(
            prodmake(&z, TRUNC),
            Err(Error::MalformedParameter(_))
        ));
    }

    #[test]
    fn test_prodmake_normalizes_leading_term() {
        // 3 q^2 / (q; q)_inf should analyze the same as 1/(q; q)_inf.
        let mut session = Session::new();
        let gf = partition_gf(&mut session, TRUNC);
        let scaled = quill_series::arithmetic::scalar_mul(&Rational::from(3), &gf);
        let shifted = quill_series::arithmetic::shift(&scaled, 2).truncated(TRUNC);
        let form = prodmake(&shifted, TRUNC).unwrap();
        for n in 1..form.terms_used {
            assert_eq!(form.exponents.get(&n), Some(&Rational::from(1)));
        }
    }

    #[test]
    fn test_to_expr() {
        let mut session = Session::new();
        let euler = etaq(&mut session, 1, 1, 5).unwrap();
        let form = prodmake(&euler, 4).unwrap();
        let expr = form.to_expr(&mut session).unwrap();
        let rendered = session.render(expr);
        assert!(rendered.contains("1 + -q"), "got {rendered}");
    }
}
