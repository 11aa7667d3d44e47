//! Named infinite products: eta-type products, Jacobi-style triple, quintuple
//! and Winquist products.

use num_traits::Zero;
use quill_expr::Session;

use crate::arithmetic;
use crate::error::{Error, Result};
use crate::qmonomial::QMonomial;
use crate::series::Series;

use super::{euler_product, step_product};

/// The eta-like product `(q^b; q^t)_inf = prod_{n>=0} (1 - q^{b + t*n})`.
///
/// A nonpositive base `b` reaches a `(1 - q^0)` factor, so the product is the
/// zero series.
///
/// # Errors
///
/// `MalformedParameter` if `t <= 0`.
pub fn etaq(session: &mut Session, b: i64, t: i64, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if t <= 0 {
        return Err(Error::MalformedParameter(format!(
            "etaq step must be positive, got {t}"
        )));
    }
    if b <= 0 {
        return Ok(Series::zero(variable, truncation));
    }
    Ok(step_product(&quill_num::Rational::from(1), b, t, variable, truncation))
}

/// The Jacobi-style product
/// `JAC(a, b) = (q^a; q^b)_inf (q^{b-a}; q^b)_inf (q^b; q^b)_inf`.
///
/// # Errors
///
/// `MalformedParameter` unless `0 < a < b`.
pub fn jacprod(session: &mut Session, a: i64, b: i64, truncation: i64) -> Result<Series> {
    if a <= 0 || a >= b {
        return Err(Error::MalformedParameter(format!(
            "jacprod requires 0 < a < b, got a = {a}, b = {b}"
        )));
    }
    let f1 = etaq(session, a, b, truncation)?;
    let f2 = etaq(session, b - a, b, truncation)?;
    let f3 = etaq(session, b, b, truncation)?;
    Ok(arithmetic::mul(&arithmetic::mul(&f1, &f2), &f3))
}

/// The Jacobi triple product
/// `(z; q)_inf (q/z; q)_inf (q; q)_inf` for a q-monomial `z = c*q^m`.
///
/// # Errors
///
/// `MalformedParameter` if the coefficient of `z` is zero.
pub fn tripleprod(session: &mut Session, z: &QMonomial, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if z.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "tripleprod argument must have a nonzero coefficient".into(),
        ));
    }
    let c = &z.coeff;
    let m = z.power;
    let c_inv = c.recip();

    let mut result = euler_product(variable, truncation);
    result = arithmetic::mul(&result, &step_product(c, m, 1, variable, truncation));
    result = arithmetic::mul(
        &result,
        &step_product(&c_inv, 1 - m, 1, variable, truncation),
    );
    Ok(result)
}

/// The quintuple product for `z = c*q^m`:
///
/// `(q; q)_inf (z*q; q)_inf (q/z; q)_inf (z^2*q; q^2)_inf (q/z^2; q^2)_inf`.
///
/// # Errors
///
/// `MalformedParameter` if the coefficient of `z` is zero.
pub fn quinprod(session: &mut Session, z: &QMonomial, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if z.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "quinprod argument must have a nonzero coefficient".into(),
        ));
    }
    let c = &z.coeff;
    let m = z.power;
    let c_inv = c.recip();
    let c_sq = c * c;
    let c_inv_sq = &c_inv * &c_inv;

    let mut result = euler_product(variable, truncation);
    result = arithmetic::mul(&result, &step_product(c, m + 1, 1, variable, truncation));
    result = arithmetic::mul(&result, &step_product(&c_inv, -m, 1, variable, truncation));
    result = arithmetic::mul(
        &result,
        &step_product(&c_sq, 2 * m + 1, 2, variable, truncation),
    );
    result = arithmetic::mul(
        &result,
        &step_product(&c_inv_sq, 1 - 2 * m, 2, variable, truncation),
    );
    Ok(result)
}

/// The Winquist product for `a = ac*q^ap`, `b = bc*q^bp`:
///
/// `(a; q)_inf (q/a; q)_inf (b; q)_inf (q/b; q)_inf (ab; q)_inf
///  (q^2/ab; q)_inf (a/b; q)_inf (bq/a; q)_inf (q; q)_inf^2`.
///
/// # Errors
///
/// `MalformedParameter` if either coefficient is zero.
pub fn winquist(
    session: &mut Session,
    a: &QMonomial,
    b: &QMonomial,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    if a.coeff.is_zero() || b.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "winquist arguments must have nonzero coefficients".into(),
        ));
    }
    let (ac, ap) = (&a.coeff, a.power);
    let (bc, bp) = (&b.coeff, b.power);
    let ac_inv = ac.recip();
    let bc_inv = bc.recip();

    let factors: [(quill_num::Rational, i64); 8] = [
        (ac.clone(), ap),
        (ac_inv.clone(), 1 - ap),
        (bc.clone(), bp),
        (bc_inv.clone(), 1 - bp),
        (ac * bc, ap + bp),
        (&ac_inv * &bc_inv, 2 - ap - bp),
        (ac * &bc_inv, ap - bp),
        (bc * &ac_inv, 1 - ap + bp),
    ];

    let euler = euler_product(variable, truncation);
    let mut result = arithmetic::mul(&euler, &euler);
    for (coeff, base) in &factors {
        result = arithmetic::mul(
            &result,
            &step_product(coeff, *base, 1, variable, truncation),
        );
    }
    Ok(result)
}
