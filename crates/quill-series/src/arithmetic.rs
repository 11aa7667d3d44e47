//! Series arithmetic.
//!
//! Free functions in the style of a kernel module: all take references and
//! return fresh series. Truncation orders combine by `min`; precision is
//! never invented.
//!
//! # Panics
//!
//! All binary operations panic if the operands have different variables.
//! Mixing variables is a programmer error, not a data error.

use num_traits::{One, Zero};
use quill_num::Rational;

use crate::error::{Error, Result};
use crate::series::Series;

fn check_same_variable(a: &Series, b: &Series) {
    assert_eq!(
        a.variable(),
        b.variable(),
        "series arithmetic across different variables"
    );
}

/// Adds two series.
#[must_use]
pub fn add(a: &Series, b: &Series) -> Series {
    check_same_variable(a, b);
    let trunc = a.truncation().min(b.truncation());
    let mut out = Series::zero(a.variable(), trunc);
    for (&k, v) in a.iter() {
        out.add_coeff(k, v);
    }
    for (&k, v) in b.iter() {
        out.add_coeff(k, v);
    }
    out
}

/// Subtracts b from a.
#[must_use]
pub fn sub(a: &Series, b: &Series) -> Series {
    add(a, &neg(b))
}

/// Negates a series.
#[must_use]
pub fn neg(a: &Series) -> Series {
    let mut out = Series::zero(a.variable(), a.truncation());
    for (&k, v) in a.iter() {
        out.set_coeff(k, -v);
    }
    out
}

/// Multiplies a series by a scalar.
#[must_use]
pub fn scalar_mul(c: &Rational, a: &Series) -> Series {
    let mut out = Series::zero(a.variable(), a.truncation());
    if c.is_zero() {
        return out;
    }
    for (&k, v) in a.iter() {
        out.set_coeff(k, c * v);
    }
    out
}

/// Multiplies two series.
#[must_use]
pub fn mul(a: &Series, b: &Series) -> Series {
    check_same_variable(a, b);
    let trunc = a.truncation().min(b.truncation());
    let mut out = Series::zero(a.variable(), trunc);
    for (&ka, va) in a.iter() {
        for (&kb, vb) in b.iter() {
            let k = ka + kb;
            if k < trunc {
                out.add_coeff(k, &(va * vb));
            }
        }
    }
    out
}

/// Multiplies by q^k, shifting every exponent.
///
/// The truncation shifts along with the coefficients: knowing f mod q^T means
/// knowing q^k*f mod q^{T+k}.
#[must_use]
pub fn shift(a: &Series, k: i64) -> Series {
    let mut out = Series::zero(a.variable(), a.truncation() + k);
    for (&n, v) in a.iter() {
        out.set_coeff(n + k, v.clone());
    }
    out
}

/// Substitutes q -> q^m for m >= 1.
pub fn inflate(a: &Series, m: i64) -> Result<Series> {
    if m < 1 {
        return Err(Error::MalformedParameter(format!(
            "inflation step must be >= 1, got {m}"
        )));
    }
    let mut out = Series::zero(a.variable(), a.truncation() * m);
    for (&n, v) in a.iter() {
        out.set_coeff(n * m, v.clone());
    }
    Ok(out)
}

/// Inverts a series with a nonzero constant term.
///
/// Uses the convolution recurrence c_0 = 1/a_0,
/// c_n = -(1/a_0) * sum_{k=1..n} a_k c_{n-k}.
///
/// # Errors
///
/// `DivisionByZero` unless the lowest nonzero coefficient sits at exponent 0.
pub fn invert(a: &Series) -> Result<Series> {
    if a.min_order() != Some(0) {
        return Err(Error::DivisionByZero(format!(
            "cannot invert a series with no constant term (lowest order {:?})",
            a.min_order()
        )));
    }
    let trunc = a.truncation();
    let a0 = a.coeff(0);
    let inv_a0 = a0.recip();

    let mut out = Series::zero(a.variable(), trunc);
    out.set_coeff(0, inv_a0.clone());

    for n in 1..trunc {
        // sum_{k=1..n} a_k c_{n-k}, walking only stored keys of a
        let mut acc = Rational::zero();
        for (&k, av) in a.iter() {
            if k < 1 {
                continue;
            }
            if k > n {
                break;
            }
            let c = out.coeff(n - k);
            if !c.is_zero() {
                acc = acc + av * &c;
            }
        }
        if !acc.is_zero() {
            out.set_coeff(n, -(&inv_a0 * &acc));
        }
    }
    Ok(out)
}

/// Divides a by b.
///
/// # Errors
///
/// `DivisionByZero` if b has no constant term.
pub fn div(a: &Series, b: &Series) -> Result<Series> {
    let b_inv = invert(b)?;
    Ok(mul(a, &b_inv))
}

/// Raises a series to a signed integer power by repeated squaring.
///
/// # Errors
///
/// `DivisionByZero` for negative exponents when the series has no constant
/// term.
pub fn pow(a: &Series, n: i64) -> Result<Series> {
    if n == 0 {
        return Ok(Series::one(a.variable(), a.truncation()));
    }

    let (mut base, exp) = if n < 0 {
        (invert(a)?, n.unsigned_abs())
    } else {
        (a.clone(), n.unsigned_abs())
    };

    let mut result = Series::one(base.variable(), base.truncation());
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = mul(&result, &base);
        }
        e >>= 1;
        if e > 0 {
            base = mul(&base, &base);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_expr::SymbolId;

    fn var() -> SymbolId {
        0
    }

    const TRUNC: i64 = 16;

    fn one_minus_q() -> Series {
        let mut s = Series::one(var(), TRUNC);
        s.set_coeff(1, Rational::from(-1));
        s
    }

    #[test]
    fn test_add_sub() {
        let a = one_minus_q();
        let diff = sub(&a, &a);
        assert!(diff.is_zero());

        let sum = add(&a, &a);
        assert_eq!(sum.coeff(0), Rational::from(2));
        assert_eq!(sum.coeff(1), Rational::from(-2));
    }

    #[test]
    fn test_mul_truncation_is_min() {
        let a = Series::one(var(), 10);
        let b = Series::one(var(), 7);
        assert_eq!(mul(&a, &b).truncation(), 7);
    }

    #[test]
    fn test_invert_geometric() {
        // 1/(1-q) = 1 + q + q^2 + ...
        let inv = invert(&one_minus_q()).unwrap();
        for n in 0..TRUNC {
            assert_eq!(inv.coeff(n), Rational::from(1));
        }

        // Round trip
        let prod = mul(&one_minus_q(), &inv);
        assert!(prod.is_one());
    }

    #[test]
    fn test_invert_no_constant_term() {
        let s = Series::monomial(var(), Rational::from(1), 1, TRUNC);
        assert!(matches!(invert(&s), Err(Error::DivisionByZero(_))));
        assert!(matches!(
            invert(&Series::zero(var(), TRUNC)),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_pow() {
        // (1-q)^2 = 1 - 2q + q^2
        let sq = pow(&one_minus_q(), 2).unwrap();
        assert_eq!(sq.coeff(0), Rational::from(1));
        assert_eq!(sq.coeff(1), Rational::from(-2));
        assert_eq!(sq.coeff(2), Rational::from(1));
        assert_eq!(sq.coeff(3), Rational::from(0));

        // (1-q)^-1 matches invert
        let inv = pow(&one_minus_q(), -1).unwrap();
        assert_eq!(inv, invert(&one_minus_q()).unwrap());

        // f^0 = 1
        assert!(pow(&one_minus_q(), 0).unwrap().is_one());
    }

    #[test]
    fn test_shift_and_inflate() {
        let s = one_minus_q();
        let shifted = shift(&s, 3);
        assert_eq!(shifted.truncation(), TRUNC + 3);
        assert_eq!(shifted.coeff(3), Rational::from(1));
        assert_eq!(shifted.coeff(4), Rational::from(-1));

        let inflated = inflate(&s, 2).unwrap();
        assert_eq!(inflated.truncation(), 2 * TRUNC);
        assert_eq!(inflated.coeff(0), Rational::from(1));
        assert_eq!(inflated.coeff(2), Rational::from(-1));
        assert_eq!(inflated.coeff(1), Rational::from(0));

        assert!(matches!(
            inflate(&s, 0),
            Err(Error::MalformedParameter(_))
        ));
    }

    #[test]
    fn test_scalar_mul() {
        let s = scalar_mul(&Rational::from_i64(1, 2), &one_minus_q());
        assert_eq!(s.coeff(0), Rational::from_i64(1, 2));
        assert_eq!(s.coeff(1), Rational::from_i64(-1, 2));
        assert!(scalar_mul(&Rational::zero(), &one_minus_q()).is_zero());
    }
}
