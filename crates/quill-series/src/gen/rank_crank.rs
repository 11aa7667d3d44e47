//! Rank and crank generating functions at a concrete rational value of z.

use num_traits::Zero;
use quill_expr::Session;
use quill_num::Rational;

use crate::arithmetic;
use crate::error::{Error, Result};
use crate::qmonomial::{PochhammerOrder, QMonomial};
use crate::series::Series;

use super::{aqprod, euler_product, step_product};

/// The crank generating function
/// `(q; q)_inf / [ (z*q; q)_inf ((1/z)*q; q)_inf ]` at a rational `z`.
///
/// At `z = 1` this collapses to the partition generating function.
///
/// # Errors
///
/// `MalformedParameter` if `z` is zero.
pub fn crank_gf(session: &mut Session, z: &Rational, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if z.is_zero() {
        return Err(Error::MalformedParameter(
            "crank parameter z must be nonzero".into(),
        ));
    }
    let numer = euler_product(variable, truncation);
    let d1 = step_product(z, 1, 1, variable, truncation);
    let d2 = step_product(&z.recip(), 1, 1, variable, truncation);
    arithmetic::div(&numer, &arithmetic::mul(&d1, &d2))
}

/// The rank generating function
/// `1 + sum_{n>=1} q^{n^2} / [ (z*q; q)_n ((1/z)*q; q)_n ]` at a rational `z`,
/// summed while `n^2` stays below the truncation.
///
/// At `z = 1` this collapses to the partition generating function.
///
/// # Errors
///
/// `MalformedParameter` if `z` is zero.
pub fn rank_gf(session: &mut Session, z: &Rational, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if z.is_zero() {
        return Err(Error::MalformedParameter(
            "rank parameter z must be nonzero".into(),
        ));
    }
    let z_inv = z.recip();
    let mut result = Series::one(variable, truncation);
    let mut n = 1i64;
    while n * n < truncation {
        let d1 = aqprod(
            session,
            &QMonomial::new(z.clone(), 1),
            PochhammerOrder::Finite(n),
            truncation,
        )?;
        let d2 = aqprod(
            session,
            &QMonomial::new(z_inv.clone(), 1),
            PochhammerOrder::Finite(n),
            truncation,
        )?;
        let inv = arithmetic::invert(&arithmetic::mul(&d1, &d2))?;
        let term = arithmetic::shift(&inv, n * n);
        result = arithmetic::add(&result, &term);
        n += 1;
    }
    Ok(result)
}
