//! q-Zeilberger creative telescoping for definite summation.
//!
//! For a term F(n, k) that is q-hypergeometric in both indices, creative
//! telescoping finds recurrence coefficients c_0, ..., c_d with
//!
//! ```text
//! c_0 F(n,k) + c_1 F(n+1,k) + ... + c_d F(n+d,k) = G(n,k+1) - G(n,k)
//! ```
//!
//! for a companion G. Summing over k kills the right side, so the definite sum
//! S(n) = sum_k F(n,k) satisfies c_0 S(n) + ... + c_d S(n+d) = 0. The
//! companion is reported as a WZ certificate R with G(n,k) = R(q^k) F(n,k),
//! which anyone can re-check term by term without rerunning the solver.
//!
//! Everything runs at a concrete rational q. The solver treats the values
//! G(n,k) and the c_j as one joint linear system over the nonzero range of
//! the terminating sum, then reconstructs R from the solved G values by
//! Lagrange interpolation against the Gosper normal form of the term ratio.

use num_traits::{One, Zero};
use quill_num::Rational;
use quill_poly::{Poly, RationalFunc};
use quill_series::qmonomial::QMonomial;

use crate::gosper::{
    extract_term_ratio, gosper_normal_form, solve_linear_system, GosperNormalForm,
};
use crate::series::HypergeometricSeries;

/// A recurrence found by creative telescoping, with its proof certificate.
#[derive(Clone, Debug)]
pub struct ZeilbergerResult {
    /// The recurrence order d.
    pub order: usize,
    /// Coefficients c_0, ..., c_d of c_0 S(n) + ... + c_d S(n+d) = 0,
    /// normalized so c_d = 1.
    pub coefficients: Vec<Rational>,
    /// The WZ certificate R as a rational function of x = q^k.
    pub certificate: RationalFunc,
}

/// Outcome of the q-Zeilberger algorithm.
#[derive(Clone, Debug)]
pub enum QZeilbergerResult {
    /// A recurrence was found.
    Recurrence(ZeilbergerResult),
    /// No recurrence up to the requested order.
    NoRecurrence,
}

/// Builds the series for F(n+j, k) from the series at n.
///
/// Each listed upper parameter q^{-n} becomes q^{-(n+j)}; when the argument
/// depends on n, its q-power moves up by j.
pub(crate) fn build_shifted_series(
    series: &HypergeometricSeries,
    j: i64,
    n_param_indices: &[usize],
    n_is_in_argument: bool,
) -> HypergeometricSeries {
    let mut shifted = series.clone();

    for &idx in n_param_indices {
        if idx < shifted.upper.len() {
            shifted.upper[idx] = QMonomial::new(
                shifted.upper[idx].coeff.clone(),
                shifted.upper[idx].power - j,
            );
        }
    }

    if n_is_in_argument {
        shifted.argument = QMonomial::new(
            shifted.argument.coeff.clone(),
            shifted.argument.power + j,
        );
    }

    shifted
}

/// Guesses which parts of a series depend on n (heuristic).
///
/// An upper parameter counts when it evaluates to q^{-n} at the given n; the
/// argument counts when it has a nonzero q-power. Standard forms like the
/// q-Vandermonde are covered; for anything else, pass explicit indices to
/// [`q_zeilberger`].
#[must_use]
pub fn detect_n_params(
    series: &HypergeometricSeries,
    n_val: i64,
    q_val: &Rational,
) -> (Vec<usize>, bool) {
    let q_neg_n = q_val.pow_i64(-n_val);
    let n_param_indices = series
        .upper
        .iter()
        .enumerate()
        .filter(|(_, param)| param.eval(q_val) == q_neg_n)
        .map(|(idx, _)| idx)
        .collect();

    let z_at_n = series.argument.eval(q_val);
    let z_at_n1 = QMonomial::new(
        series.argument.coeff.clone(),
        series.argument.power + 1,
    )
    .eval(q_val);
    let n_is_in_argument = z_at_n != z_at_n1 && series.argument.power != 0;

    (n_param_indices, n_is_in_argument)
}

/// F(n, k) for k = 0, ..., max_k by term-ratio accumulation. A pole in the
/// ratio zeroes everything past it.
fn term_values(ratio: &RationalFunc, q_val: &Rational, max_k: usize) -> Vec<Rational> {
    let mut values = Vec::with_capacity(max_k + 1);
    values.push(Rational::one());
    let mut term = Rational::one();
    let mut qk = Rational::one();
    for _ in 0..max_k {
        match ratio.eval(&qk) {
            Some(r) => term = &term * &r,
            None => term = Rational::zero(),
        }
        values.push(term.clone());
        qk = &qk * q_val;
    }
    values
}

/// One creative-telescoping attempt at a fixed order d.
fn try_creative_telescoping(
    series: &HypergeometricSeries,
    q_val: &Rational,
    d: usize,
    n_param_indices: &[usize],
    n_is_in_argument: bool,
) -> Option<(Vec<Rational>, RationalFunc)> {
    let r_0 = extract_term_ratio(series, q_val);
    let gnf = gosper_normal_form(r_0.numer(), r_0.denom(), q_val);

    let max_search = 50usize;
    let mut f_values = Vec::with_capacity(d + 1);
    f_values.push(term_values(&r_0, q_val, max_search));
    for j in 1..=(d as i64) {
        let shifted = build_shifted_series(series, j, n_param_indices, n_is_in_argument);
        let r_j = extract_term_ratio(&shifted, q_val);
        f_values.push(term_values(&r_j, q_val, max_search));
    }

    let (coefficients, g_values) = solve_telescoping_system(&f_values, d)?;
    let certificate = certificate_from_g(&g_values, &f_values[0], q_val, &gnf);
    Some((coefficients, certificate))
}

/// Solves G(n,k+1) - G(n,k) = sum_j c_j F(n+j,k) with c_d = 1 and the
/// telescoping boundaries G(n,0) = G(n,max_k+1) = 0.
///
/// Unknowns are [g_1, ..., g_{max_k}, c_0, ..., c_{d-1}], one equation per
/// k in 0..=max_k, where max_k is the last index with any nonzero term.
fn solve_telescoping_system(
    f_values: &[Vec<Rational>],
    d: usize,
) -> Option<(Vec<Rational>, Vec<Rational>)> {
    let max_k = f_values
        .iter()
        .flat_map(|fj| {
            fj.iter()
                .enumerate()
                .filter(|(_, v)| !v.is_zero())
                .map(|(k, _)| k)
        })
        .max()
        .unwrap_or(0);
    if max_k == 0 {
        return None;
    }

    let n_g = max_k;
    let n_unknowns = n_g + d;

    let mut matrix = Vec::with_capacity(max_k + 1);
    let mut rhs = Vec::with_capacity(max_k + 1);
    for k in 0..=max_k {
        let mut row = vec![Rational::zero(); n_unknowns];
        // Column k holds g_{k+1} (absent for k = max_k where it is pinned
        // to zero); column k-1 holds -g_k.
        if k + 1 <= n_g {
            row[k] = Rational::one();
        }
        if (1..=n_g).contains(&k) {
            row[k - 1] = &row[k - 1] - &Rational::one();
        }
        for (j, fj) in f_values.iter().enumerate().take(d) {
            row[n_g + j] = -fj[k].clone();
        }
        matrix.push(row);
        rhs.push(f_values[d][k].clone());
    }

    let solution = solve_linear_system(&matrix, &rhs)?;
    let g_values = solution[..n_g].to_vec();
    let mut coefficients = solution[n_g..].to_vec();
    coefficients.push(Rational::one());

    // Cross-check the first few equations against the extracted solution.
    for k in 0..=max_k.min(10) {
        let g_k = if k == 0 {
            Rational::zero()
        } else {
            g_values[k - 1].clone()
        };
        let g_k1 = if k < n_g {
            g_values[k].clone()
        } else {
            Rational::zero()
        };
        let lhs = &g_k1 - &g_k;
        let mut sum = Rational::zero();
        for (c, fj) in coefficients.iter().zip(f_values) {
            sum = &sum + &(c * &fj[k]);
        }
        if lhs != sum {
            return None;
        }
    }

    Some((coefficients, g_values))
}

/// Reconstructs the certificate R = f/c from solved G values.
///
/// R(q^k) = G(n,k)/F(n,k) and R = f/c for a polynomial f by the Gosper
/// substitution, so f(q^k) = g_k c(q^k) / F(n,k); f is recovered by Lagrange
/// interpolation over the k where F(n,k) is nonzero, anchored at f(1) = 0
/// from the G(n,0) = 0 boundary.
fn certificate_from_g(
    g_values: &[Rational],
    f_0: &[Rational],
    q_val: &Rational,
    gnf: &GosperNormalForm,
) -> RationalFunc {
    let mut eval_points: Vec<(Rational, Rational)> = vec![(Rational::one(), Rational::zero())];

    let mut qk = Rational::one();
    for (k, g_k) in g_values.iter().enumerate() {
        qk = &qk * q_val;
        let fn_k = &f_0[k + 1];
        if fn_k.is_zero() {
            break;
        }
        let f_at_qk = &(g_k / fn_k) * &gnf.c.eval(&qk);
        eval_points.push((qk.clone(), f_at_qk));
    }

    let mut f_poly = Poly::zero();
    for (i, (xi, yi)) in eval_points.iter().enumerate() {
        let mut basis = Poly::one();
        let mut denom = Rational::one();
        for (j, (xj, _)) in eval_points.iter().enumerate() {
            if j == i {
                continue;
            }
            basis = basis.mul(&Poly::linear(-xj.clone(), Rational::one()));
            denom = &denom * &(xi - xj);
        }
        f_poly = f_poly.add(&basis.scale(&(yi / &denom)));
    }

    RationalFunc::new(f_poly, gnf.c.clone())
}

/// Runs q-Zeilberger creative telescoping, trying orders 1, ..., max_order.
///
/// `n_param_indices` names the upper parameters of the form q^{-n} and
/// `n_is_in_argument` whether the argument carries a q^n factor; see
/// [`detect_n_params`] for the common cases.
#[must_use]
pub fn q_zeilberger(
    series: &HypergeometricSeries,
    q_val: &Rational,
    max_order: usize,
    n_param_indices: &[usize],
    n_is_in_argument: bool,
) -> QZeilbergerResult {
    for d in 1..=max_order {
        if let Some((coefficients, certificate)) =
            try_creative_telescoping(series, q_val, d, n_param_indices, n_is_in_argument)
        {
            log::debug!("creative telescoping succeeded at order {d}");
            return QZeilbergerResult::Recurrence(ZeilbergerResult {
                order: d,
                coefficients,
                certificate,
            });
        }
    }
    QZeilbergerResult::NoRecurrence
}

/// Re-checks a WZ certificate against a recurrence, term by term.
///
/// Verifies c_0 F(n,k) + ... + c_d F(n+d,k) = G(n,k+1) - G(n,k) with
/// G(n,k) = R(q^k) F(n,k) for k = 0, ..., max_k. Indices where the base term
/// vanishes (past termination the certificate has nothing to represent) or
/// where R has a pole are checked for a vanishing left side instead. The
/// certificate may come from anywhere, including a published identity.
#[must_use]
pub fn verify_wz_certificate(
    series: &HypergeometricSeries,
    q_val: &Rational,
    coefficients: &[Rational],
    certificate: &RationalFunc,
    n_param_indices: &[usize],
    n_is_in_argument: bool,
    max_k: usize,
) -> bool {
    let d = coefficients.len().saturating_sub(1);

    let mut f_values = Vec::with_capacity(d + 1);
    for j in 0..=(d as i64) {
        let shifted = if j == 0 {
            series.clone()
        } else {
            build_shifted_series(series, j, n_param_indices, n_is_in_argument)
        };
        let r_j = extract_term_ratio(&shifted, q_val);
        f_values.push(term_values(&r_j, q_val, max_k + 1));
    }

    let mut qk = Rational::one();
    for k in 0..=max_k {
        let mut lhs = Rational::zero();
        for (c, fj) in coefficients.iter().zip(&f_values) {
            lhs = &lhs + &(c * &fj[k]);
        }

        // G = R(q^k) F(n,k) only represents the antidifference where the
        // base term is nonzero; between the base termination and the last
        // shifted termination the slack lives in the abstract G, so those
        // k are skipped, as are poles of R.
        let qk1 = &qk * q_val;
        let representable = !f_values[0][k].is_zero() && !f_values[0][k + 1].is_zero();
        if representable {
            if let (Some(r_k), Some(r_k1)) = (certificate.eval(&qk), certificate.eval(&qk1)) {
                let g_k = &r_k * &f_values[0][k];
                let g_k1 = &r_k1 * &f_values[0][k + 1];
                if lhs != &g_k1 - &g_k {
                    return false;
                }
            }
        }
        qk = qk1;
    }

    true
}

/// S(n) = sum_k F(n,k) by term accumulation, stopping at termination, a
/// pole, or 100 terms.
fn compute_sum(series: &HypergeometricSeries, q_val: &Rational) -> Rational {
    let ratio = extract_term_ratio(series, q_val);
    let mut sum = Rational::one();
    let mut term = Rational::one();
    let mut qk = Rational::one();
    for _ in 0..100 {
        match ratio.eval(&qk) {
            Some(r) if !r.is_zero() => {
                term = &term * &r;
                sum = &sum + &term;
            }
            _ => break,
        }
        qk = &qk * q_val;
    }
    sum
}

/// Cross-checks a recurrence numerically at several n values.
///
/// For each n, reruns the solver (the concrete-q coefficients vary with n),
/// computes S(n), ..., S(n+d) by direct accumulation, and checks
/// c_0 S(n) + ... + c_d S(n+d) = 0. Independent of the certificate.
#[must_use]
pub fn verify_recurrence(
    series_builder: &dyn Fn(i64) -> HypergeometricSeries,
    expected_order: usize,
    q_val: &Rational,
    n_start: i64,
    n_count: usize,
) -> bool {
    for i in 0..n_count {
        let n = n_start + i as i64;
        let series_n = series_builder(n);
        let (n_indices, n_in_arg) = detect_n_params(&series_n, n, q_val);

        let result = q_zeilberger(&series_n, q_val, expected_order + 1, &n_indices, n_in_arg);
        let QZeilbergerResult::Recurrence(zr) = result else {
            return false;
        };
        if zr.order > expected_order + 1 {
            return false;
        }

        let mut check = Rational::zero();
        for (j, c) in zr.coefficients.iter().enumerate() {
            let s_nj = compute_sum(&series_builder(n + j as i64), q_val);
            check = &check + &(c * &s_nj);
        }
        if !check.is_zero() {
            return false;
        }
    }
    true
}
