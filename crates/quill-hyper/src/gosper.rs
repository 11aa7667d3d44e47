//! The q-analogue of Gosper's algorithm for indefinite summation.
//!
//! A q-hypergeometric term t_k is indefinitely summable when some S_k with
//! S_{k+1} - S_k = t_k is again q-hypergeometric. The decision procedure works
//! entirely with the term ratio r(x) = t_{k+1}/t_k as a rational function of
//! x = q^k:
//!
//! - [`extract_term_ratio`] reads r(x) off a [`HypergeometricSeries`] at a
//!   concrete rational q.
//! - [`gosper_normal_form`] splits r(x) = sigma(x)/tau(x) * c(qx)/c(x) with
//!   gcd(sigma(x), tau(q^j x)) trivial for every j >= 1, driven by the
//!   q-dispersion set.
//! - [`solve_key_equation`] finds a polynomial f with
//!   sigma(x) f(qx) - tau(x) f(x) = rhs(x), when one exists.
//! - [`q_gosper`] assembles a certificate y(x) with S_k = y(q^k) t_k, allowing
//!   a q^{-p} pole at the origin so that terms like geometric tails with
//!   Laurent antidifferences are still recognized.

use num_traits::{One, Zero};
use quill_num::Rational;
use quill_poly::{poly_gcd, Poly, RationalFunc};

use crate::series::HypergeometricSeries;

/// Outcome of the q-Gosper algorithm.
#[derive(Clone, Debug)]
pub enum QGosperResult {
    /// An antidifference exists: S_k = certificate(q^k) * t_k satisfies
    /// S_{k+1} - S_k = t_k.
    Summable {
        /// The rational-function certificate y(x) in x = q^k.
        certificate: RationalFunc,
    },
    /// No q-hypergeometric antidifference exists within the search bound.
    NotSummable,
}

/// The sigma/tau/c decomposition of a term ratio.
///
/// r(x) = sigma(x)/tau(x) * c(qx)/c(x), with gcd(sigma(x), tau(q^j x))
/// constant for every j >= 1.
#[derive(Clone, Debug)]
pub struct GosperNormalForm {
    /// Numerator part with the shiftable factors removed.
    pub sigma: Poly,
    /// Denominator part with the shiftable factors removed.
    pub tau: Poly,
    /// The shiftable common factors.
    pub c: Poly,
}

/// The term ratio t_{k+1}/t_k of an `r_phi_s` as a rational function of
/// x = q^k, with every parameter evaluated at a concrete q.
///
/// ```text
/// r(x) = prod_i (1 - a_i x) / [(1 - q x) prod_j (1 - b_j x)]
///        * (-1)^{1+s-r} x^{1+s-r} z
/// ```
#[must_use]
pub fn extract_term_ratio(series: &HypergeometricSeries, q_val: &Rational) -> RationalFunc {
    let mut numer = Poly::one();
    for a in &series.upper {
        let a_eval = a.eval(q_val);
        numer = numer.mul(&Poly::linear(Rational::one(), -a_eval));
    }

    // The (q;q)_k factor contributes (1 - q x) to the denominator.
    let mut denom = Poly::linear(Rational::one(), -q_val.clone());
    for b in &series.lower {
        let b_eval = b.eval(q_val);
        denom = denom.mul(&Poly::linear(Rational::one(), -b_eval));
    }

    let extra = 1 + series.s() as i64 - series.r() as i64;
    let z_eval = series.argument.eval(q_val);
    let extra_coeff = if extra % 2 == 0 { z_eval } else { -z_eval };

    if extra >= 0 {
        numer = numer.mul(&Poly::monomial(extra_coeff, extra as usize));
    } else {
        denom = denom.mul(&Poly::monomial(Rational::one(), (-extra) as usize));
        numer = numer.scale(&extra_coeff);
    }

    RationalFunc::new(numer, denom)
}

/// All j >= 0 with gcd(a(x), b(q^j x)) of positive degree, up to the
/// resultant bound deg(a) * deg(b).
#[must_use]
pub fn q_dispersion(a: &Poly, b: &Poly, q_val: &Rational) -> Vec<i64> {
    q_dispersion_range(a, b, q_val, 0)
}

/// Like [`q_dispersion`] but starting from j = 1, as the normal-form loop
/// requires.
pub(crate) fn q_dispersion_positive(a: &Poly, b: &Poly, q_val: &Rational) -> Vec<i64> {
    q_dispersion_range(a, b, q_val, 1)
}

fn q_dispersion_range(a: &Poly, b: &Poly, q_val: &Rational, start: i64) -> Vec<i64> {
    let (Some(deg_a), Some(deg_b)) = (a.degree(), b.degree()) else {
        return Vec::new();
    };
    if deg_a == 0 || deg_b == 0 {
        return Vec::new();
    }

    let j_max = deg_a * deg_b;
    let mut result = Vec::new();
    for j in start..=j_max {
        let shifted = b.q_shift_n(q_val, j);
        if poly_gcd(a, &shifted).degree().unwrap_or(0) >= 1 {
            result.push(j);
        }
    }
    result
}

/// Decomposes the term ratio numer(x)/denom(x) into Gosper normal form.
///
/// Repeatedly pulls the gcd at the largest positive dispersion out of
/// sigma and tau and pushes its back-shifts into c.
#[must_use]
pub fn gosper_normal_form(numer: &Poly, denom: &Poly, q_val: &Rational) -> GosperNormalForm {
    let mut sigma = numer.clone();
    let mut tau = denom.clone();
    let mut c = Poly::one();

    loop {
        let disp = q_dispersion_positive(&sigma, &tau, q_val);
        let Some(&j_max) = disp.last() else {
            break;
        };

        let tau_shifted = tau.q_shift_n(q_val, j_max);
        let g = poly_gcd(&sigma, &tau_shifted).make_monic();
        if g.is_constant() {
            break;
        }

        // g divides sigma, and g(q^{-j_max} x) divides tau, by construction.
        let (Some(next_sigma), Some(next_tau)) = (
            sigma.exact_div(&g),
            tau.exact_div(&g.q_shift_n(q_val, -j_max)),
        ) else {
            break;
        };
        sigma = next_sigma;
        tau = next_tau;

        // c(qx)/c(x) must contribute g(x)/g(q^{-j_max} x).
        for i in 1..=j_max {
            c = c.mul(&g.q_shift_n(q_val, -i));
        }
    }

    debug_assert!({
        let reconstructed =
            RationalFunc::new(sigma.mul(&c.q_shift(q_val)), tau.mul(&c));
        reconstructed == RationalFunc::new(numer.clone(), denom.clone())
    });

    GosperNormalForm { sigma, tau, c }
}

/// Solves sigma(x) f(qx) - tau(x) f(x) = rhs(x) for a polynomial f.
///
/// Returns `None` when no polynomial solution exists within the degree
/// candidates implied by the leading-coefficient analysis.
#[must_use]
pub fn solve_key_equation(
    sigma: &Poly,
    tau: &Poly,
    rhs: &Poly,
    q_val: &Rational,
) -> Option<Poly> {
    if rhs.is_zero() {
        return Some(Poly::zero());
    }
    let d_rhs = rhs.degree()?;

    match (sigma.degree(), tau.degree()) {
        (None, None) => None,
        // -tau f = rhs, so f = -rhs/tau when the division is exact.
        (None, Some(_)) => rhs.neg().exact_div(tau),
        (Some(d_sigma), None) => {
            if d_rhs < d_sigma {
                return None;
            }
            try_solve_with_degree(sigma, tau, rhs, q_val, (d_rhs - d_sigma) as usize)
        }
        (Some(d_sigma), Some(d_tau)) => {
            for deg_f in degree_candidates(sigma, tau, q_val, d_sigma, d_tau, d_rhs) {
                if let Some(f) = try_solve_with_degree(sigma, tau, rhs, q_val, deg_f) {
                    return Some(f);
                }
            }
            None
        }
    }
}

/// Candidate degree bounds for f in the key equation.
fn degree_candidates(
    sigma: &Poly,
    tau: &Poly,
    q_val: &Rational,
    d_sigma: i64,
    d_tau: i64,
    d_rhs: i64,
) -> Vec<usize> {
    let mut candidates = Vec::new();

    if d_sigma != d_tau {
        // No leading cancellation: deg LHS = max(d_sigma, d_tau) + deg f.
        let max_st = d_sigma.max(d_tau);
        if d_rhs >= max_st {
            candidates.push((d_rhs - max_st) as usize);
        }
        if d_rhs + 1 >= max_st {
            candidates.push((d_rhs - max_st + 1) as usize);
        }
    } else {
        // Equal degrees: the leading terms cancel exactly when
        // q^{deg f} = lc(tau)/lc(sigma).
        let ratio = &tau.leading_coeff() / &sigma.leading_coeff();
        let mut found = false;
        for d in 0..=d_rhs {
            if q_val.pow_i64(d) == ratio {
                candidates.push(d as usize);
                found = true;
                break;
            }
        }
        if !found || d_rhs >= d_sigma {
            let fallback = if d_rhs >= d_sigma {
                (d_rhs - d_sigma) as usize
            } else {
                0
            };
            if !candidates.contains(&fallback) {
                candidates.push(fallback);
            }
        }
        let extra: Vec<usize> = candidates.iter().map(|&d| d + 1).collect();
        for d in extra {
            if !candidates.contains(&d) {
                candidates.push(d);
            }
        }
    }

    candidates
}

fn try_solve_with_degree(
    sigma: &Poly,
    tau: &Poly,
    rhs: &Poly,
    q_val: &Rational,
    deg_f: usize,
) -> Option<Poly> {
    let d_sigma = sigma.degree().unwrap_or(0);
    let d_tau = tau.degree().unwrap_or(0);
    let d_rhs = rhs.degree().unwrap_or(0);

    let n_unknowns = deg_f + 1;
    let max_lhs_deg = d_sigma.max(d_tau) as usize + deg_f;
    let n_equations = max_lhs_deg.max(d_rhs as usize) + 1;

    let mut q_powers = Vec::with_capacity(n_unknowns);
    let mut acc = Rational::one();
    for _ in 0..n_unknowns {
        q_powers.push(acc.clone());
        acc = &acc * q_val;
    }

    // A[k][j] = sigma_{k-j} q^j - tau_{k-j}; the unknowns are the
    // coefficients f_0, ..., f_{deg_f}.
    let mut matrix = vec![vec![Rational::zero(); n_unknowns]; n_equations];
    let mut b = vec![Rational::zero(); n_equations];
    for (k, row) in matrix.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            if k >= j {
                let idx = (k - j) as i64;
                *entry = &(&sigma.coeff(idx) * &q_powers[j]) - &tau.coeff(idx);
            }
        }
        b[k] = rhs.coeff(k as i64);
    }

    solve_linear_system(&matrix, &b).map(Poly::new)
}

/// Gaussian elimination over Q. Overdetermined systems are fine; free
/// variables come back as zero; `None` means inconsistent.
pub(crate) fn solve_linear_system(
    matrix: &[Vec<Rational>],
    rhs: &[Rational],
) -> Option<Vec<Rational>> {
    let m = matrix.len();
    if m == 0 {
        return Some(Vec::new());
    }
    let n = matrix[0].len();
    if n == 0 {
        return rhs.iter().all(Zero::is_zero).then(Vec::new);
    }

    let mut aug: Vec<Vec<Rational>> = matrix
        .iter()
        .zip(rhs)
        .map(|(row, b)| {
            let mut r = row.clone();
            r.push(b.clone());
            r
        })
        .collect();

    let mut pivot_cols = Vec::new();
    let mut pivot_row = 0;

    for col in 0..n {
        if pivot_row >= m {
            break;
        }
        let Some(found) = (pivot_row..m).find(|&r| !aug[r][col].is_zero()) else {
            continue;
        };
        aug.swap(found, pivot_row);

        let pivot = aug[pivot_row][col].clone();
        for entry in &mut aug[pivot_row] {
            *entry = &*entry / &pivot;
        }

        for row in 0..m {
            if row == pivot_row || aug[row][col].is_zero() {
                continue;
            }
            let factor = aug[row][col].clone();
            for j in 0..=n {
                let sub = &factor * &aug[pivot_row][j];
                aug[row][j] = &aug[row][j] - &sub;
            }
        }

        pivot_cols.push(col);
        pivot_row += 1;
    }

    for row in &aug {
        if row[..n].iter().all(Zero::is_zero) && !row[n].is_zero() {
            return None;
        }
    }

    let mut solution = vec![Rational::zero(); n];
    for (row, &col) in pivot_cols.iter().enumerate() {
        solution[col] = aug[row][n].clone();
    }
    Some(solution)
}

/// Runs the q-Gosper algorithm on a hypergeometric term at a concrete q.
#[must_use]
pub fn q_gosper(series: &HypergeometricSeries, q_val: &Rational) -> QGosperResult {
    let ratio = extract_term_ratio(series, q_val);
    q_gosper_ratio(&ratio, q_val)
}

/// Runs the q-Gosper algorithm directly on a term ratio r(x) = t_{k+1}/t_k.
///
/// Writing the certificate y = u/c with u a polynomial turns the telescoping
/// identity y(qx) r(x) - y(x) = 1 into the key equation
///
/// ```text
/// sigma(x) u(qx) - tau(x) u(x) = tau(x) c(x).
/// ```
///
/// Antidifferences with a pole at x = 0 (Laurent u = v / x^p) are searched by
/// substituting u and clearing denominators, which scales sigma by q^{-p} and
/// multiplies the right-hand side by x^p:
///
/// ```text
/// q^{-p} sigma(x) v(qx) - tau(x) v(x) = x^p tau(x) c(x).
/// ```
///
/// p runs from 0 up to deg sigma + deg tau + deg c + 2.
#[must_use]
pub fn q_gosper_ratio(ratio: &RationalFunc, q_val: &Rational) -> QGosperResult {
    let gnf = gosper_normal_form(ratio.numer(), ratio.denom(), q_val);

    let degree_sum = gnf.sigma.degree().unwrap_or(0)
        + gnf.tau.degree().unwrap_or(0)
        + gnf.c.degree().unwrap_or(0);
    let p_max = (degree_sum + 2) as usize;

    let base_rhs = gnf.tau.mul(&gnf.c);
    for p in 0..=p_max {
        let scaled_sigma = gnf.sigma.scale(&q_val.pow_i64(-(p as i64)));
        let rhs = Poly::monomial(Rational::one(), p).mul(&base_rhs);
        if let Some(v) = solve_key_equation(&scaled_sigma, &gnf.tau, &rhs, q_val) {
            let denom = Poly::monomial(Rational::one(), p).mul(&gnf.c);
            return QGosperResult::Summable {
                certificate: RationalFunc::new(v, denom),
            };
        }
    }

    QGosperResult::NotSummable
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::qmonomial::QMonomial;

    fn p(coeffs: &[i64]) -> Poly {
        Poly::from_i64_coeffs(coeffs)
    }

    fn qr(n: i64) -> Rational {
        Rational::from(n)
    }

    /// y(qx) r(x) - y(x) = 1 at a sample point.
    fn telescopes_at(certificate: &RationalFunc, ratio: &RationalFunc, q: &Rational, x: &Rational) {
        let qx = q * x;
        let lhs = &(&certificate.eval(&qx).unwrap() * &ratio.eval(x).unwrap())
            - &certificate.eval(x).unwrap();
        assert_eq!(lhs, Rational::one());
    }

    #[test]
    fn test_extract_term_ratio_2phi1() {
        // 2_phi_1(q^{-2}, q^2; q^3; q, q) at q = 2:
        // r(x) = 2 (1 - x/4)(1 - 4x) / [(1 - 2x)(1 - 8x)].
        let series = HypergeometricSeries::new(
            vec![QMonomial::q_power(-2), QMonomial::q_power(2)],
            vec![QMonomial::q_power(3)],
            QMonomial::q(),
        );
        let r = extract_term_ratio(&series, &qr(2));
        assert_eq!(r.eval(&qr(0)), Some(qr(2)));
        // r(1) = 2 * (3/4) * (-3) / ((-1)(-7)) = -9/14.
        assert_eq!(r.eval(&qr(1)), Some(Rational::from_i64(-9, 14)));
    }

    #[test]
    fn test_extract_term_ratio_negative_extra() {
        // 2_phi_0: extra = 1 + 0 - 2 = -1, so x^{-1} lands in the denominator.
        let series = HypergeometricSeries::new(
            vec![QMonomial::q(), QMonomial::q()],
            vec![],
            QMonomial::q(),
        );
        let r = extract_term_ratio(&series, &qr(2));
        // r(x) = -2 (1 - 2x)^2 / [x (1 - 2x)] = -2 (1 - 2x) / x.
        assert_eq!(r.eval(&qr(1)), Some(qr(2)));
        assert!(r.eval(&qr(0)).is_none());
    }

    #[test]
    fn test_q_dispersion() {
        // a = (1 - x)(1 - 2x), b = 1 - x, q = 2: b(q^j x) = 1 - 2^j x
        // matches a factor of a at j = 0 and j = 1.
        let a = p(&[1, -1]).mul(&p(&[1, -2]));
        let b = p(&[1, -1]);
        assert_eq!(q_dispersion(&a, &b, &qr(2)), vec![0, 1]);
        assert_eq!(q_dispersion_positive(&a, &b, &qr(2)), vec![1]);
        // Constants have no dispersion.
        assert!(q_dispersion(&p(&[3]), &a, &qr(2)).is_empty());
        assert!(q_dispersion(&Poly::zero(), &a, &qr(2)).is_empty());
    }

    #[test]
    fn test_gosper_normal_form_shiftable_factor() {
        // r(x) = (1 - 2x)/(1 - x) at q = 2: the factors differ by one q-shift,
        // so everything moves into c and sigma/tau become constants.
        let numer = p(&[1, -2]);
        let denom = p(&[1, -1]);
        let gnf = gosper_normal_form(&numer, &denom, &qr(2));
        assert!(gnf.sigma.is_constant());
        assert!(gnf.tau.is_constant());
        assert_eq!(gnf.c.degree(), Some(1));
        // sigma(x) c(qx) / (tau(x) c(x)) reconstructs the ratio.
        let reconstructed = RationalFunc::new(
            gnf.sigma.mul(&gnf.c.q_shift(&qr(2))),
            gnf.tau.mul(&gnf.c),
        );
        assert_eq!(reconstructed, RationalFunc::new(numer, denom));
    }

    #[test]
    fn test_gosper_normal_form_coprime_ratio() {
        // No positive dispersion: the input passes through untouched.
        let numer = p(&[1, -3]);
        let denom = p(&[1, -2]);
        let gnf = gosper_normal_form(&numer, &denom, &qr(2));
        assert_eq!(gnf.sigma, numer);
        assert_eq!(gnf.tau, denom);
        assert_eq!(gnf.c, Poly::one());
    }

    #[test]
    fn test_solve_key_equation() {
        // 2 f(2x) - f(x) = 1 has the constant solution f = 1.
        let f = solve_key_equation(&p(&[2]), &p(&[1]), &p(&[1]), &qr(2)).unwrap();
        assert_eq!(f, Poly::one());

        // (1 - x/3) f(2x) - f(x) = x: f = -3 (the x^0 rows force it).
        let sigma = Poly::linear(Rational::one(), Rational::from_i64(-1, 3));
        let f = solve_key_equation(&sigma, &p(&[1]), &p(&[0, 1]), &qr(2)).unwrap();
        assert_eq!(f, p(&[-3]));

        // (2 - 2x/3) f(2x) - f(x) = 1 is inconsistent at the x^1 row.
        let sigma = Poly::linear(qr(2), Rational::from_i64(-2, 3));
        assert!(solve_key_equation(&sigma, &p(&[1]), &p(&[1]), &qr(2)).is_none());

        // Zero right-hand side always admits f = 0.
        let f = solve_key_equation(&p(&[2]), &p(&[1]), &Poly::zero(), &qr(2)).unwrap();
        assert!(f.is_zero());
    }

    #[test]
    fn test_solve_linear_system() {
        // x + y = 3, x - y = 1 -> (2, 1).
        let matrix = vec![
            vec![qr(1), qr(1)],
            vec![qr(1), qr(-1)],
        ];
        let sol = solve_linear_system(&matrix, &[qr(3), qr(1)]).unwrap();
        assert_eq!(sol, vec![qr(2), qr(1)]);

        // Inconsistent: x + y = 1, x + y = 2.
        let matrix = vec![
            vec![qr(1), qr(1)],
            vec![qr(1), qr(1)],
        ];
        assert!(solve_linear_system(&matrix, &[qr(1), qr(2)]).is_none());

        // Underdetermined: the free variable comes back zero.
        let matrix = vec![vec![qr(1), qr(1)]];
        let sol = solve_linear_system(&matrix, &[qr(5)]).unwrap();
        assert_eq!(sol, vec![qr(5), qr(0)]);
    }

    #[test]
    fn test_q_gosper_geometric() {
        // 1_phi_0(q; -; q, q) has t_k = q^k: the (q;q)_k factors cancel and
        // the ratio is the constant q. S_k = q^k works, certificate y = 1.
        let series = HypergeometricSeries::new(
            vec![QMonomial::q()],
            vec![],
            QMonomial::q(),
        );
        let q = qr(2);
        let ratio = extract_term_ratio(&series, &q);
        assert_eq!(ratio, RationalFunc::from_poly(p(&[2])));

        let QGosperResult::Summable { certificate } = q_gosper(&series, &q) else {
            panic!("geometric term must be summable");
        };
        assert_eq!(certificate, RationalFunc::from_poly(Poly::one()));
        telescopes_at(&certificate, &ratio, &q, &qr(1));
        telescopes_at(&certificate, &ratio, &q, &qr(4));
    }

    #[test]
    fn test_q_gosper_laurent_certificate() {
        // r(x) = 2 (1 - x/3) at q = 2 needs a certificate with a pole at the
        // origin: y(x) = -3/x satisfies y(2x) r(x) - y(x) = 1.
        let ratio = RationalFunc::from_poly(Poly::linear(qr(2), Rational::from_i64(-2, 3)));
        let q = qr(2);
        let QGosperResult::Summable { certificate } = q_gosper_ratio(&ratio, &q) else {
            panic!("term with Laurent antidifference must be summable");
        };
        assert_eq!(certificate, RationalFunc::new(p(&[-3]), p(&[0, 1])));
        telescopes_at(&certificate, &ratio, &q, &qr(1));
        telescopes_at(&certificate, &ratio, &q, &qr(2));
        telescopes_at(&certificate, &ratio, &q, &qr(4));
    }

    #[test]
    fn test_q_gosper_not_summable() {
        // t_k = 1/(q;q)_k: the partial sums of Euler's series have no
        // q-hypergeometric closed form.
        let series = HypergeometricSeries::new(
            vec![QMonomial::constant(Rational::zero())],
            vec![],
            QMonomial::constant(Rational::one()),
        );
        assert!(matches!(
            q_gosper(&series, &qr(2)),
            QGosperResult::NotSummable
        ));
    }
}
