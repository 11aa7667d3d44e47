//! Heine's transformations of a `2_phi_1`.
//!
//! Each transform rewrites the series as an infinite-product prefactor times
//! another `2_phi_1` with different parameters. Chaining them walks a series
//! toward a shape the summation catalog recognizes, or toward a smaller
//! argument where direct evaluation converges faster.
//!
//! The prefactor products are computed as truncated series, so a transform
//! only fires when every product argument carries a positive q-power. A
//! parameter set outside that region reports `MalformedParameter` instead of
//! silently returning a wrong prefactor.

use num_traits::Zero;
use quill_expr::Session;
use quill_series::qmonomial::QMonomial;
use quill_series::{arithmetic, Error, Result, Series};

use crate::series::{eval_phi, HypergeometricSeries};
use crate::summation::infinite_product;

/// A rewritten series: `original = prefactor * transformed`.
#[derive(Clone, Debug)]
pub struct TransformationResult {
    /// Infinite-product prefactor, truncated.
    pub prefactor: Series,
    /// The rewritten series.
    pub transformed: HypergeometricSeries,
}

fn require_2phi1(series: &HypergeometricSeries) -> Result<(QMonomial, QMonomial, QMonomial)> {
    if series.r() != 2 || series.s() != 1 {
        return Err(Error::MalformedParameter(
            "Heine transformations apply to 2_phi_1 series only".into(),
        ));
    }
    Ok((
        series.upper[0].clone(),
        series.upper[1].clone(),
        series.lower[0].clone(),
    ))
}

/// A quotient of infinite q-Pochhammer products,
/// `prod (n_i;q)_inf / prod (d_j;q)_inf`.
///
/// # Errors
///
/// `MalformedParameter` when any argument has a non-positive q-power, or a
/// zero coefficient that would make the product trivial in a way the caller
/// did not ask for. `DivisionByZero` when a denominator product vanishes.
fn product_quotient(
    session: &mut Session,
    numer: &[QMonomial],
    denom: &[QMonomial],
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    for arg in numer.iter().chain(denom.iter()) {
        if arg.power < 1 {
            return Err(Error::MalformedParameter(format!(
                "product argument {arg} needs a positive q-power"
            )));
        }
    }
    let mut num = Series::one(variable, truncation);
    for arg in numer {
        num = arithmetic::mul(
            &num,
            &infinite_product(variable, &arg.coeff, arg.power, 1, truncation),
        );
    }
    let mut den = Series::one(variable, truncation);
    for arg in denom {
        den = arithmetic::mul(
            &den,
            &infinite_product(variable, &arg.coeff, arg.power, 1, truncation),
        );
    }
    Ok(arithmetic::mul(&num, &arithmetic::invert(&den)?))
}

/// Heine's first transformation:
///
/// ```text
/// 2_phi_1(a, b; c; q, z)
///   = (b;q)_inf (az;q)_inf / [(c;q)_inf (z;q)_inf]
///     * 2_phi_1(c/b, z; az; q, b)
/// ```
///
/// # Errors
///
/// `MalformedParameter` when the series is not a `2_phi_1` or a prefactor
/// argument has a non-positive q-power.
pub fn heine1(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<TransformationResult> {
    let (a, b, c) = require_2phi1(series)?;
    let z = series.argument.clone();
    if b.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "Heine's first transformation needs b nonzero".into(),
        ));
    }
    let az = a.mul(&z);
    let prefactor = product_quotient(
        session,
        &[b.clone(), az.clone()],
        &[c.clone(), z.clone()],
        truncation,
    )?;
    Ok(TransformationResult {
        prefactor,
        transformed: HypergeometricSeries::new(vec![c.mul(&b.recip()), z], vec![az], b),
    })
}

/// Heine's second transformation:
///
/// ```text
/// 2_phi_1(a, b; c; q, z)
///   = (c/b;q)_inf (bz;q)_inf / [(c;q)_inf (z;q)_inf]
///     * 2_phi_1(abz/c, b; bz; q, c/b)
/// ```
///
/// # Errors
///
/// `MalformedParameter` when the series is not a `2_phi_1` or a prefactor
/// argument has a non-positive q-power.
pub fn heine2(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<TransformationResult> {
    let (a, b, c) = require_2phi1(series)?;
    let z = series.argument.clone();
    if b.coeff.is_zero() || c.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "Heine's second transformation needs b and c nonzero".into(),
        ));
    }
    let cb = c.mul(&b.recip());
    let bz = b.mul(&z);
    let abz_c = a.mul(&bz).mul(&c.recip());
    let prefactor = product_quotient(
        session,
        &[cb.clone(), bz.clone()],
        &[c, z],
        truncation,
    )?;
    Ok(TransformationResult {
        prefactor,
        transformed: HypergeometricSeries::new(vec![abz_c, b], vec![bz], cb),
    })
}

/// Heine's third transformation, the q-analogue of Euler's:
///
/// ```text
/// 2_phi_1(a, b; c; q, z)
///   = (abz/c;q)_inf / (z;q)_inf
///     * 2_phi_1(c/a, c/b; c; q, abz/c)
/// ```
///
/// # Errors
///
/// `MalformedParameter` when the series is not a `2_phi_1` or a prefactor
/// argument has a non-positive q-power.
pub fn heine3(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<TransformationResult> {
    let (a, b, c) = require_2phi1(series)?;
    let z = series.argument.clone();
    if a.coeff.is_zero() || b.coeff.is_zero() || c.coeff.is_zero() {
        return Err(Error::MalformedParameter(
            "Euler's transformation needs a, b and c nonzero".into(),
        ));
    }
    let abz_c = a.mul(&b).mul(&z).mul(&c.recip());
    let prefactor = product_quotient(session, &[abz_c.clone()], &[z], truncation)?;
    Ok(TransformationResult {
        prefactor,
        transformed: HypergeometricSeries::new(
            vec![c.mul(&a.recip()), c.mul(&b.recip())],
            vec![c],
            abz_c,
        ),
    })
}

/// Checks `eval(original) == prefactor * eval(transformed)` in the truncated
/// model. Only conclusive when both sides evaluate exactly, which holds for
/// nonterminating series whose parameters all carry nonnegative q-powers.
///
/// # Errors
///
/// Propagates evaluation failures from either side.
pub fn verify_transformation(
    session: &mut Session,
    original: &HypergeometricSeries,
    result: &TransformationResult,
    truncation: i64,
) -> Result<bool> {
    let lhs = eval_phi(session, original, truncation)?;
    let rhs = arithmetic::mul(
        &result.prefactor,
        &eval_phi(session, &result.transformed, truncation)?,
    );
    Ok(lhs == rhs)
}
