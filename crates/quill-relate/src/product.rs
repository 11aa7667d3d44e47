//! Monomial-product search: which power products of a series list collapse
//! to a single term.

use rayon::prelude::*;

use quill_num::Rational;
use quill_series::{Error, Result, Series};

use crate::evidence::Evidence;
use crate::matrix::monomial_series;

/// Cap on the number of exponent vectors a single search may enumerate.
const MAX_GRID: u64 = 1_000_000;

/// A discovered identity `prod series[i]^{exponents[i]} = scalar * q^power`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductIdentity {
    /// One exponent per input series, at least one nonzero.
    pub exponents: Vec<i64>,
    /// The power of q on the right-hand side.
    pub power: i64,
    /// The leading scalar on the right-hand side.
    pub scalar: Rational,
    /// How the identity was checked.
    pub evidence: Evidence,
}

/// Searches exponent vectors in `[-max_coeff, max_coeff]` per series for a
/// product equal to a single term `c * q^p` with `|p| <= max_exp`. Returns
/// the first match in lexicographic grid order, or `Ok(None)`.
///
/// Exponent vectors whose product is undefined (a negative power of a series
/// with no constant term) are skipped, not reported.
///
/// # Errors
///
/// `MalformedParameter` for an empty series list, `max_coeff < 1`, or a
/// negative `max_exp`; `ResourceBound` when the grid exceeds the internal
/// enumeration cap.
pub fn findprod(
    series: &[&Series],
    max_coeff: i64,
    max_exp: i64,
) -> Result<Option<ProductIdentity>> {
    if series.is_empty() {
        return Err(Error::MalformedParameter(
            "findprod needs at least one series".into(),
        ));
    }
    if max_coeff < 1 {
        return Err(Error::MalformedParameter(format!(
            "max_coeff must be at least 1, got {max_coeff}"
        )));
    }
    if max_exp < 0 {
        return Err(Error::MalformedParameter(format!(
            "max_exp must be nonnegative, got {max_exp}"
        )));
    }

    let width = 2 * max_coeff as u64 + 1;
    let mut total: u64 = 1;
    for _ in 0..series.len() {
        total = total.checked_mul(width).filter(|&t| t <= MAX_GRID).ok_or_else(|| {
            Error::ResourceBound(format!(
                "findprod grid {width}^{} exceeds {MAX_GRID} vectors",
                series.len()
            ))
        })?;
    }
    log::debug!("findprod: scanning {total} exponent vectors");

    let terms_checked = series
        .iter()
        .map(|s| usize::try_from(s.truncation()).unwrap_or(0))
        .min()
        .unwrap_or(0);

    let found = (0..total)
        .into_par_iter()
        .find_map_first(|index| {
            let exponents = decode_exponents(index, width, max_coeff, series.len());
            if exponents.iter().all(|&e| e == 0) {
                return None;
            }
            let product = monomial_series(series, &exponents).ok()?;
            single_term(&product, max_exp).map(|(power, scalar)| ProductIdentity {
                exponents,
                power,
                scalar,
                evidence: Evidence::Numeric { terms_checked },
            })
        });
    Ok(found)
}

fn decode_exponents(index: u64, width: u64, max_coeff: i64, k: usize) -> Vec<i64> {
    let mut exponents = vec![0i64; k];
    let mut rest = index;
    for slot in exponents.iter_mut().rev() {
        *slot = (rest % width) as i64 - max_coeff;
        rest /= width;
    }
    exponents
}

/// The (power, coefficient) of a series that is a single term within bounds.
fn single_term(s: &Series, max_exp: i64) -> Option<(i64, Rational)> {
    let low = s.min_order()?;
    if s.max_order() != Some(low) || low.abs() > max_exp {
        return None;
    }
    Some((low, s.coeff(low)))
}
