//! q-Pochhammer symbols as truncated series.

use num_traits::{One, Zero};
use quill_expr::Session;

use crate::arithmetic;
use crate::error::{Error, Result};
use crate::qmonomial::{PochhammerOrder, QMonomial};
use crate::series::Series;

use super::step_product;

/// Computes the q-Pochhammer symbol (a; q)_n as a truncated series.
///
/// - `Finite(n)` with n >= 0: `prod_{k=0}^{n-1} (1 - a*q^k)`.
/// - `Finite(n)` with n < 0: `(a; q)_{-m} = 1 / (a*q^{-m}; q)_m` for m = -n.
/// - `Infinite`: the product runs until the factor exponent reaches the
///   truncation order.
///
/// A factor that degenerates to `(1 - 1)` makes the result the zero series.
/// Factors whose exponent is negative contribute nothing (they have no series
/// expansion; the convention matches the rest of the generator catalog).
///
/// # Errors
///
/// `DivisionByZero` when a negative order requires inverting a product whose
/// constant term vanishes.
pub fn aqprod(
    session: &mut Session,
    a: &QMonomial,
    order: PochhammerOrder,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();

    // (0; q)_n = 1 for every order.
    if a.coeff.is_zero() {
        return Ok(Series::one(variable, truncation));
    }

    match order {
        PochhammerOrder::Finite(n) if n == 0 => Ok(Series::one(variable, truncation)),
        PochhammerOrder::Finite(n) if n > 0 => {
            let mut result = Series::one(variable, truncation);
            for k in 0..n {
                let exp = a.power + k;
                if exp < 0 || exp >= truncation {
                    continue;
                }
                if exp == 0 && a.coeff.is_one() {
                    return Ok(Series::zero(variable, truncation));
                }
                let mut factor = Series::one(variable, truncation);
                factor.add_coeff(exp, &-a.coeff.clone());
                result = arithmetic::mul(&result, &factor);
            }
            Ok(result)
        }
        PochhammerOrder::Finite(n) => {
            // (a; q)_{-m} = 1 / (a*q^{-m}; q)_m
            let m = -n;
            let shifted = QMonomial::new(a.coeff.clone(), a.power - m);
            let denom = aqprod(session, &shifted, PochhammerOrder::Finite(m), truncation)?;
            if denom.is_zero() {
                return Err(Error::DivisionByZero(format!(
                    "({a}; q)_{n} has a vanishing factor"
                )));
            }
            arithmetic::invert(&denom).map_err(|_| {
                Error::DivisionByZero(format!(
                    "({a}; q)_{n} requires inverting a series with no constant term"
                ))
            })
        }
        PochhammerOrder::Infinite => {
            Ok(step_product(&a.coeff, a.power, 1, variable, truncation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_num::Rational;

    const TRUNC: i64 = 20;

    #[test]
    fn test_finite_q_pochhammer() {
        let mut session = Session::new();
        // (q; q)_3 = (1-q)(1-q^2)(1-q^3)
        let s = aqprod(&mut session, &QMonomial::q(), PochhammerOrder::Finite(3), TRUNC).unwrap();
        assert_eq!(s.coeff(0), Rational::from(1));
        assert_eq!(s.coeff(1), Rational::from(-1));
        assert_eq!(s.coeff(2), Rational::from(-1));
        assert_eq!(s.coeff(3), Rational::from(0));
        assert_eq!(s.coeff(6), Rational::from(1));
    }

    #[test]
    fn test_order_zero_is_one() {
        let mut session = Session::new();
        let s = aqprod(&mut session, &QMonomial::q(), PochhammerOrder::Finite(0), TRUNC).unwrap();
        assert!(s.is_one());
    }

    #[test]
    fn test_infinite_euler_product() {
        let mut session = Session::new();
        // (q; q)_inf: pentagonal number theorem coefficients
        let s = aqprod(&mut session, &QMonomial::q(), PochhammerOrder::Infinite, TRUNC).unwrap();
        assert_eq!(s.coeff(0), Rational::from(1));
        assert_eq!(s.coeff(1), Rational::from(-1));
        assert_eq!(s.coeff(2), Rational::from(-1));
        assert_eq!(s.coeff(5), Rational::from(1));
        assert_eq!(s.coeff(7), Rational::from(1));
        assert_eq!(s.coeff(12), Rational::from(-1));
        assert_eq!(s.coeff(3), Rational::from(0));
        assert_eq!(s.coeff(4), Rational::from(0));
    }

    #[test]
    fn test_vanishing_factor_gives_zero() {
        let mut session = Session::new();
        // (1; q)_2 contains the factor (1 - 1)
        let one = QMonomial::constant(Rational::from(1));
        let s = aqprod(&mut session, &one, PochhammerOrder::Finite(2), TRUNC).unwrap();
        assert!(s.is_zero());
    }

    #[test]
    fn test_negative_order_inverse() {
        let mut session = Session::new();
        // (q^3; q)_{-2} = 1/(q; q)_2 = 1/((1-q)(1-q^2))
        let a = QMonomial::q_power(3);
        let s = aqprod(&mut session, &a, PochhammerOrder::Finite(-2), TRUNC).unwrap();

        let direct = aqprod(&mut session, &QMonomial::q(), PochhammerOrder::Finite(2), TRUNC).unwrap();
        let product = arithmetic::mul(&s, &direct);
        assert!(product.is_one());
    }

    #[test]
    fn test_negative_order_pole() {
        let mut session = Session::new();
        // (q; q)_{-1} = 1/(1; q)_1 = 1/0
        let res = aqprod(&mut session, &QMonomial::q(), PochhammerOrder::Finite(-1), TRUNC);
        assert!(matches!(res, Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn test_zero_parameter() {
        let mut session = Session::new();
        let zero = QMonomial::constant(Rational::from(0));
        let s = aqprod(&mut session, &zero, PochhammerOrder::Infinite, TRUNC).unwrap();
        assert!(s.is_one());
    }
}
