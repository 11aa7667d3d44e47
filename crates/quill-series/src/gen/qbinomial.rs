//! Gaussian binomial coefficients.

use quill_expr::Session;

use crate::arithmetic;
use crate::error::{Error, Result};
use crate::qmonomial::{PochhammerOrder, QMonomial};
use crate::series::Series;

/// The Gaussian binomial coefficient
/// `[n, k]_q = (q; q)_n / ((q; q)_k (q; q)_{n-k})`,
/// a polynomial in q of degree `k(n-k)`.
///
/// `k < 0` or `k > n` gives the zero series.
///
/// # Errors
///
/// `MalformedParameter` if `n < 0`.
pub fn qbin(session: &mut Session, n: i64, k: i64, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if n < 0 {
        return Err(Error::MalformedParameter(format!(
            "Gaussian binomial requires n >= 0, got {n}"
        )));
    }
    if k < 0 || k > n {
        return Ok(Series::zero(variable, truncation));
    }
    let numer = aqprod_q(session, n, truncation)?;
    let dk = aqprod_q(session, k, truncation)?;
    let dnk = aqprod_q(session, n - k, truncation)?;
    arithmetic::div(&numer, &arithmetic::mul(&dk, &dnk))
}

fn aqprod_q(session: &mut Session, order: i64, truncation: i64) -> Result<Series> {
    super::aqprod(
        session,
        &QMonomial::q(),
        PochhammerOrder::Finite(order),
        truncation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_num::Rational;

    const TRUNC: i64 = 20;

    #[test]
    fn test_qbin_4_2() {
        // [4, 2]_q = 1 + q + 2q^2 + q^3 + q^4
        let mut session = Session::new();
        let b = qbin(&mut session, 4, 2, TRUNC).unwrap();
        let expected = [1, 1, 2, 1, 1];
        for (e, &c) in expected.iter().enumerate() {
            assert_eq!(b.coeff(e as i64), Rational::from(c));
        }
        assert_eq!(b.max_order(), Some(4));
    }

    #[test]
    fn test_qbin_edges() {
        let mut session = Session::new();
        assert!(qbin(&mut session, 5, 0, TRUNC).unwrap().is_one());
        assert!(qbin(&mut session, 5, 5, TRUNC).unwrap().is_one());
        assert!(qbin(&mut session, 5, 6, TRUNC).unwrap().is_zero());
        assert!(qbin(&mut session, 5, -1, TRUNC).unwrap().is_zero());
        assert!(qbin(&mut session, -1, 0, TRUNC).is_err());
    }

    #[test]
    fn test_pascal_recurrence() {
        // [n, k] = [n-1, k-1] + q^k [n-1, k]
        let mut session = Session::new();
        for n in 1..=6i64 {
            for k in 1..n {
                let lhs = qbin(&mut session, n, k, TRUNC).unwrap();
                let a = qbin(&mut session, n - 1, k - 1, TRUNC).unwrap();
                let b = qbin(&mut session, n - 1, k, TRUNC).unwrap();
                let rhs = arithmetic::add(
                    &a,
                    &arithmetic::shift(&b, k).truncated(TRUNC),
                );
                assert_eq!(lhs, rhs, "n = {n}, k = {k}");
            }
        }
    }
}
