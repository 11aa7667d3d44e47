//! Shared machinery: coefficient matrices, monomial enumeration, and the
//! rational-to-modular reduction.

use num_traits::{One, Zero};
use quill_linalg::DenseMatrix;
use quill_num::{Integer, Rational};
use quill_rings::ModP;
use quill_series::{arithmetic, Error, Result, Series};

/// The exponent window shared by a candidate set: rows run from the smallest
/// min-order (clamped at 0) up to the smallest truncation.
pub(crate) fn row_window(candidates: &[&Series]) -> (i64, i64) {
    let start = candidates
        .iter()
        .filter_map(|s| s.min_order())
        .min()
        .unwrap_or(0)
        .min(0);
    let end = candidates
        .iter()
        .map(|s| s.truncation())
        .min()
        .unwrap_or(start);
    (start, end)
}

/// Decides the row count: `candidates + topshift`, capped by what the
/// truncations can supply. Returns `None` when no rows are available.
pub(crate) fn row_count(
    num_candidates: usize,
    topshift: i64,
    start: i64,
    end: i64,
) -> Option<usize> {
    let available = usize::try_from(end - start).ok()?;
    let desired = num_candidates + usize::try_from(topshift).ok()?;
    let rows = desired.min(available);
    (rows > 0).then_some(rows)
}

/// Stacks candidate coefficients into a rows x candidates matrix; entry
/// (i, j) is the coefficient of `q^{start + i}` in candidate j.
pub(crate) fn rational_matrix(
    candidates: &[&Series],
    start: i64,
    rows: usize,
) -> DenseMatrix<Rational> {
    let data: Vec<Vec<Rational>> = (0..rows)
        .map(|i| {
            let exp = start + i as i64;
            candidates.iter().map(|s| s.coeff(exp)).collect()
        })
        .collect();
    DenseMatrix::from_rows(data)
}

/// Reduces a rational mod p.
///
/// # Errors
///
/// `DivisionByZero` when the denominator vanishes mod p; callers recover by
/// switching primes via [`with_prime_retry`].
pub(crate) fn rational_mod_p(r: &Rational, p: i64) -> Result<ModP> {
    let p_int = Integer::new(p);
    if r.denominator().divisible_by(&p_int) {
        return Err(Error::DivisionByZero(format!(
            "coefficient denominator divisible by {p}"
        )));
    }
    let num = reduce_i64(&r.numerator(), p);
    let den = reduce_i64(&r.denominator(), p);
    let den_inv = quill_num::mod_inv(den, p).ok_or_else(|| {
        Error::DivisionByZero(format!("no inverse for {den} mod {p}"))
    })?;
    Ok(ModP::new(num, p) * ModP::new(den_inv, p))
}

/// How many replacement primes a modular search tries when the requested one
/// divides a clearing denominator.
const PRIME_RETRIES: usize = 4;

pub(crate) fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// The smallest prime strictly greater than `n`.
pub(crate) fn next_prime(n: i64) -> i64 {
    let mut candidate = n.max(1) + 1;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Runs a modular computation at `p`, switching to the next prime (a bounded
/// number of times) whenever the prime divides a clearing denominator. The
/// result's `ModP` elements carry the prime actually used. Any other error
/// surfaces immediately.
pub(crate) fn with_prime_retry<T>(
    p: i64,
    mut compute: impl FnMut(i64) -> Result<T>,
) -> Result<T> {
    let mut prime = p;
    let mut last = None;
    for attempt in 0..=PRIME_RETRIES {
        match compute(prime) {
            Err(Error::DivisionByZero(msg)) => {
                log::debug!("prime {prime} degenerate ({msg}), retry {attempt}");
                last = Some(Error::DivisionByZero(msg));
                prime = next_prime(prime);
            }
            other => return other,
        }
    }
    Err(last.unwrap_or_else(|| {
        Error::DivisionByZero(format!("no usable prime near {p}"))
    }))
}

fn reduce_i64(n: &Integer, p: i64) -> i64 {
    (n.clone() % Integer::new(p)).to_i64().unwrap_or(0)
}

/// Like [`rational_matrix`], with entries reduced mod p.
pub(crate) fn modular_matrix(
    candidates: &[&Series],
    start: i64,
    rows: usize,
    p: i64,
) -> Result<DenseMatrix<ModP>> {
    let mut data = Vec::with_capacity(rows);
    for i in 0..rows {
        let exp = start + i as i64;
        let mut row = Vec::with_capacity(candidates.len());
        for s in candidates {
            row.push(rational_mod_p(&s.coeff(exp), p)?);
        }
        data.push(row);
    }
    Ok(DenseMatrix::from_rows(data))
}

pub(crate) fn rational_null_space(m: &DenseMatrix<Rational>) -> Vec<Vec<Rational>> {
    m.null_space(&Rational::zero(), &Rational::one())
}

pub(crate) fn modular_null_space(m: &DenseMatrix<ModP>, p: i64) -> Vec<Vec<ModP>> {
    m.null_space(&ModP::new(0, p), &ModP::new(1, p))
}

/// All k-tuples of nonnegative integers summing to `degree`, lexicographic.
pub(crate) fn monomials_of_degree(k: usize, degree: i64) -> Vec<Vec<i64>> {
    let mut result = Vec::new();
    if k == 0 || degree < 0 {
        return result;
    }
    let mut current = vec![0i64; k];
    fill_monomials(k, degree, 0, &mut current, &mut result);
    result
}

fn fill_monomials(
    k: usize,
    remaining: i64,
    pos: usize,
    current: &mut Vec<i64>,
    result: &mut Vec<Vec<i64>>,
) {
    if pos == k - 1 {
        current[pos] = remaining;
        result.push(current.clone());
        return;
    }
    for val in 0..=remaining {
        current[pos] = val;
        fill_monomials(k, remaining - val, pos + 1, current, result);
    }
}

/// All k-tuples of total degree 0 through `degree` inclusive.
pub(crate) fn monomials_up_to_degree(k: usize, degree: i64) -> Vec<Vec<i64>> {
    let mut result = Vec::new();
    for d in 0..=degree {
        result.extend(monomials_of_degree(k, d));
    }
    result
}

/// The product `prod series[i]^{exponents[i]}`.
///
/// # Errors
///
/// `DivisionByZero` when a negative exponent hits a series with no constant
/// term.
pub(crate) fn monomial_series(series: &[&Series], exponents: &[i64]) -> Result<Series> {
    debug_assert_eq!(series.len(), exponents.len());
    let trunc = series.iter().map(|s| s.truncation()).min().unwrap_or(1);
    let variable = series.first().map_or(0, |s| s.variable());
    let mut result = Series::one(variable, trunc);
    for (s, &e) in series.iter().zip(exponents) {
        if e == 0 {
            continue;
        }
        result = arithmetic::mul(&result, &arithmetic::pow(s, e)?);
    }
    Ok(result)
}
