//! Series utilities: arithmetic-progression sifting and degree probes.

use crate::error::{Error, Result};
use crate::series::Series;

/// Extracts the arithmetic progression `j mod m`: given
/// `f = sum c_n q^n`, returns `sum c_{m*n + j} q^n`.
///
/// The truncation of the result is `(trunc - j - 1)/m + 1`, the largest
/// exponent range the input actually determines.
///
/// # Errors
///
/// - `MalformedParameter` unless `m >= 1` and `0 <= j < m`.
/// - `PrecisionExhausted` if the input is not even known to order `j + 1`.
pub fn sift(series: &Series, m: i64, j: i64) -> Result<Series> {
    if m < 1 || j < 0 || j >= m {
        return Err(Error::MalformedParameter(format!(
            "sift requires m >= 1 and 0 <= j < m, got m = {m}, j = {j}"
        )));
    }
    let trunc = series.truncation();
    if j >= trunc {
        return Err(Error::PrecisionExhausted(format!(
            "sift residue {j} needs precision beyond O(q^{trunc})"
        )));
    }
    let new_trunc = (trunc - j - 1) / m + 1;
    let mut out = Series::zero(series.variable(), new_trunc);
    for (&k, v) in series.iter() {
        if (k - j).rem_euclid(m) == 0 {
            out.set_coeff((k - j).div_euclid(m), v.clone());
        }
    }
    Ok(out)
}

/// The highest exponent carrying a nonzero coefficient, or `None` for the
/// zero series. Meaningful when the series is a polynomial that fits below
/// the truncation.
#[must_use]
pub fn qdegree(series: &Series) -> Option<i64> {
    series.max_order()
}

/// The lowest exponent carrying a nonzero coefficient, or `None` for the
/// zero series.
#[must_use]
pub fn lqdegree(series: &Series) -> Option<i64> {
    series.min_order()
}
