//! Ramanujan's classical mock theta functions of orders 3, 5, and 7.
//!
//! Every function expands its defining Eulerian series by term accumulation,
//! keeping a running product for the Pochhammer factor where the base is
//! fixed. The seventh-order functions have denominators whose base moves with
//! n, so those fall back to a fresh product per term.
//!
//! Third order: f, phi, psi, chi, omega, nu, rho. Fifth order: f0, f1, F0,
//! F1, phi0, phi1, psi0, psi1, chi0, chi1. Seventh order: F0, F1, F2.

use num_traits::One;
use quill_expr::{Session, SymbolId};
use quill_num::Rational;
use quill_series::qmonomial::{PochhammerOrder, QMonomial};
use quill_series::{arithmetic, gen::aqprod, Result, Series};

/// 1 + q^m, or 2 when m = 0. Out-of-window factors are 1.
fn one_plus_q_m(variable: SymbolId, m: i64, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, Rational::one());
    } else if m == 0 {
        f.set_coeff(0, Rational::from(2));
    }
    f
}

/// 1 - q^m, or the zero series when m = 0.
fn one_minus_q_m(variable: SymbolId, m: i64, truncation: i64) -> Series {
    if m == 0 {
        return Series::zero(variable, truncation);
    }
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, -Rational::one());
    }
    f
}

/// 1 - q^m + q^{2m}.
fn cyclotomic_factor(variable: SymbolId, m: i64, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, -Rational::one());
    }
    if m > 0 && 2 * m < truncation {
        f.set_coeff(2 * m, Rational::one());
    }
    f
}

/// 1 + q^m + q^{2m}.
fn trinomial_factor(variable: SymbolId, m: i64, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, Rational::one());
    }
    if m > 0 && 2 * m < truncation {
        f.set_coeff(2 * m, Rational::one());
    }
    f
}

/// The substitution q -> -q: negates every odd coefficient.
fn negate_variable(series: &Series) -> Series {
    let mut result = Series::zero(series.variable(), series.truncation());
    for (&k, v) in series.iter() {
        result.set_coeff(k, if k % 2 == 0 { v.clone() } else { -v.clone() });
    }
    result
}

/// Sums q^{exponent(n)} / denominator, where the denominator accumulates
/// one factor per step. `factor(n)` is the factor joining at step n; the
/// `pre` flag multiplies it in before the n-th term instead of after.
fn eulerian_sum(
    variable: SymbolId,
    truncation: i64,
    exponent: impl Fn(i64) -> i64,
    factor: impl Fn(i64) -> Series,
    pre: bool,
    square: bool,
) -> Result<Series> {
    let mut result = Series::zero(variable, truncation);
    let mut denom = Series::one(variable, truncation);
    for n in 0i64.. {
        let q_exp = exponent(n);
        if q_exp >= truncation {
            break;
        }
        if pre {
            denom = arithmetic::mul(&denom, &factor(n));
        }
        let effective = if square {
            arithmetic::mul(&denom, &denom)
        } else {
            denom.clone()
        };
        let numer = Series::monomial(variable, Rational::one(), q_exp, truncation);
        let term = arithmetic::mul(&numer, &arithmetic::invert(&effective)?);
        result = arithmetic::add(&result, &term);
        if !pre {
            denom = arithmetic::mul(&denom, &factor(n));
        }
    }
    Ok(result)
}

/// Sums product(n) * q^{exponent(n)}, with the product in the numerator.
fn partial_product_sum(
    variable: SymbolId,
    truncation: i64,
    exponent: impl Fn(i64) -> i64,
    factor: impl Fn(i64) -> Option<Series>,
) -> Series {
    let mut result = Series::zero(variable, truncation);
    let mut numer_prod = Series::one(variable, truncation);
    for n in 0i64.. {
        let q_exp = exponent(n);
        if q_exp >= truncation {
            break;
        }
        if let Some(f) = factor(n) {
            numer_prod = arithmetic::mul(&numer_prod, &f);
        }
        let q_mono = Series::monomial(variable, Rational::one(), q_exp, truncation);
        result = arithmetic::add(&result, &arithmetic::mul(&numer_prod, &q_mono));
    }
    result
}

/// Third-order f(q) = sum q^{n^2} / (-q;q)_n^2.
///
/// # Errors
///
/// Propagates series inversion failures; the denominators here are unit
/// series, so none occur in practice.
pub fn mock_theta_f3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(v, truncation, |n| n * n, |n| one_plus_q_m(v, n + 1, truncation), false, true)
}

/// Third-order phi(q) = sum q^{n^2} / (-q^2;q^2)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_phi3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| n * n,
        |n| one_plus_q_m(v, 2 * (n + 1), truncation),
        false,
        false,
    )
}

/// Third-order psi(q) = sum_{n>=1} q^{n^2} / (q;q^2)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_psi3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    // Shift the index so the sum starts at n = 1.
    eulerian_sum(
        v,
        truncation,
        |n| (n + 1) * (n + 1),
        |n| one_minus_q_m(v, 2 * n + 1, truncation),
        true,
        false,
    )
}

/// Third-order chi(q) = sum q^{n^2} / prod_{k=1}^{n} (1 - q^k + q^{2k}).
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_chi3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| n * n,
        |n| cyclotomic_factor(v, n + 1, truncation),
        false,
        false,
    )
}

/// Third-order omega(q) = sum q^{2n(n+1)} / (q;q^2)_{n+1}^2.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_omega3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| 2 * n * (n + 1),
        |n| one_minus_q_m(v, 2 * n + 1, truncation),
        true,
        true,
    )
}

/// Third-order nu(q) = sum q^{n(n+1)} / (-q;q^2)_{n+1}.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_nu3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| n * (n + 1),
        |n| one_plus_q_m(v, 2 * n + 1, truncation),
        true,
        false,
    )
}

/// Third-order rho(q) = sum q^{2n(n+1)} / prod_{k=0}^{n} (1 + q^{2k+1} + q^{4k+2}).
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_rho3(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| 2 * n * (n + 1),
        |n| trinomial_factor(v, 2 * n + 1, truncation),
        true,
        false,
    )
}

/// Fifth-order f0(q) = sum q^{n^2} / (-q;q)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_f0_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(v, truncation, |n| n * n, |n| one_plus_q_m(v, n + 1, truncation), false, false)
}

/// Fifth-order f1(q) = sum q^{n^2+n} / (-q;q)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_f1_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| n * n + n,
        |n| one_plus_q_m(v, n + 1, truncation),
        false,
        false,
    )
}

/// Fifth-order F0(q) = sum q^{2n^2} / (q;q^2)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_cap_f0_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| 2 * n * n,
        |n| one_minus_q_m(v, 2 * n + 1, truncation),
        false,
        false,
    )
}

/// Fifth-order F1(q) = sum q^{2n^2+2n} / (q;q^2)_{n+1}.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_cap_f1_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let v = session.q_symbol();
    eulerian_sum(
        v,
        truncation,
        |n| 2 * n * n + 2 * n,
        |n| one_minus_q_m(v, 2 * n + 1, truncation),
        true,
        false,
    )
}

/// Fifth-order phi0(q) = sum (-q;q^2)_n q^{n^2}.
#[must_use]
pub fn mock_theta_phi0_5(session: &mut Session, truncation: i64) -> Series {
    let v = session.q_symbol();
    partial_product_sum(
        v,
        truncation,
        |n| n * n,
        |n| (n >= 1).then(|| one_plus_q_m(v, 2 * n - 1, truncation)),
    )
}

/// Fifth-order phi1(q) = sum (-q;q^2)_n q^{(n+1)^2}.
#[must_use]
pub fn mock_theta_phi1_5(session: &mut Session, truncation: i64) -> Series {
    let v = session.q_symbol();
    partial_product_sum(
        v,
        truncation,
        |n| (n + 1) * (n + 1),
        |n| (n >= 1).then(|| one_plus_q_m(v, 2 * n - 1, truncation)),
    )
}

/// Fifth-order psi0(q) = sum (-1;q)_n q^{n(n+1)/2}.
#[must_use]
pub fn mock_theta_psi0_5(session: &mut Session, truncation: i64) -> Series {
    let v = session.q_symbol();
    partial_product_sum(
        v,
        truncation,
        |n| n * (n + 1) / 2,
        |n| (n >= 1).then(|| one_plus_q_m(v, n - 1, truncation)),
    )
}

/// Fifth-order psi1(q) = sum (-q;q)_n q^{n(n+1)/2}.
#[must_use]
pub fn mock_theta_psi1_5(session: &mut Session, truncation: i64) -> Series {
    let v = session.q_symbol();
    partial_product_sum(
        v,
        truncation,
        |n| n * (n + 1) / 2,
        |n| (n >= 1).then(|| one_plus_q_m(v, n, truncation)),
    )
}

/// Fifth-order chi0(q) = 2 F0(q) - phi0(-q).
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_chi0_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let f0 = mock_theta_cap_f0_5(session, truncation)?;
    let phi0_negq = negate_variable(&mock_theta_phi0_5(session, truncation));
    let two_f0 = arithmetic::scalar_mul(&Rational::from(2), &f0);
    Ok(arithmetic::sub(&two_f0, &phi0_negq))
}

/// Fifth-order chi1(q) = 2 F1(q) + q^{-1} phi1(-q).
///
/// phi1 starts at q, so the shift lands on nonnegative powers.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_chi1_5(session: &mut Session, truncation: i64) -> Result<Series> {
    let f1 = mock_theta_cap_f1_5(session, truncation)?;
    // One extra order so the shifted series still covers the window.
    let phi1_negq = negate_variable(&mock_theta_phi1_5(session, truncation + 1));
    let shifted = arithmetic::shift(&phi1_negq, -1);
    let two_f1 = arithmetic::scalar_mul(&Rational::from(2), &f1);
    Ok(arithmetic::add(&two_f1, &shifted))
}

/// Seventh-order F0(q) = sum q^{n^2} / (q^{n+1};q)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_cap_f0_7(session: &mut Session, truncation: i64) -> Result<Series> {
    seventh_order_sum(session, truncation, |n| n * n, |n| (n + 1, n))
}

/// Seventh-order F1(q) = sum q^{n^2} / (q^n;q)_n.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_cap_f1_7(session: &mut Session, truncation: i64) -> Result<Series> {
    seventh_order_sum(session, truncation, |n| n * n, |n| (n, n))
}

/// Seventh-order F2(q) = sum q^{n^2+n} / (q^{n+1};q)_{n+1}.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn mock_theta_cap_f2_7(session: &mut Session, truncation: i64) -> Result<Series> {
    seventh_order_sum(session, truncation, |n| n * n + n, |n| (n + 1, n + 1))
}

/// Shared accumulator for the seventh-order functions, whose denominator
/// base moves with n and defeats incremental products.
fn seventh_order_sum(
    session: &mut Session,
    truncation: i64,
    exponent: impl Fn(i64) -> i64,
    poch: impl Fn(i64) -> (i64, i64),
) -> Result<Series> {
    let variable = session.q_symbol();
    let mut result = Series::zero(variable, truncation);
    for n in 0i64.. {
        let q_exp = exponent(n);
        if q_exp >= truncation {
            break;
        }
        let (base, order) = poch(n);
        let denom = aqprod(
            session,
            &QMonomial::q_power(base),
            PochhammerOrder::Finite(order),
            truncation,
        )?;
        let numer = Series::monomial(variable, Rational::one(), q_exp, truncation);
        let term = if order == 0 {
            numer
        } else {
            arithmetic::mul(&numer, &arithmetic::invert(&denom)?)
        };
        result = arithmetic::add(&result, &term);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUNC: i64 = 16;

    fn coeffs(series: &Series, up_to: i64) -> Vec<Rational> {
        (0..up_to).map(|k| series.coeff(k)).collect()
    }

    fn ints(values: &[i64]) -> Vec<Rational> {
        values.iter().map(|&n| Rational::from(n)).collect()
    }

    #[test]
    fn test_f3_expansion() {
        // 1 + q/(1+q)^2 + q^4/((1+q)(1+q^2))^2 + ...
        let mut session = Session::new();
        let f = mock_theta_f3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f, 5), ints(&[1, 1, -2, 3, -3]));
    }

    #[test]
    fn test_phi3_expansion() {
        let mut session = Session::new();
        let phi = mock_theta_phi3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&phi, 5), ints(&[1, 1, 0, -1, 1]));
    }

    #[test]
    fn test_psi3_starts_at_q() {
        let mut session = Session::new();
        let psi = mock_theta_psi3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&psi, 5), ints(&[0, 1, 1, 1, 2]));
    }

    #[test]
    fn test_chi3_expansion() {
        let mut session = Session::new();
        let chi = mock_theta_chi3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&chi, 5), ints(&[1, 1, 1, 0, 0]));
    }

    #[test]
    fn test_omega3_expansion() {
        let mut session = Session::new();
        let omega = mock_theta_omega3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&omega, 5), ints(&[1, 2, 3, 4, 6]));
    }

    #[test]
    fn test_nu3_expansion() {
        let mut session = Session::new();
        let nu = mock_theta_nu3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&nu, 5), ints(&[1, -1, 2, -2, 2]));
    }

    #[test]
    fn test_rho3_expansion() {
        let mut session = Session::new();
        let rho = mock_theta_rho3(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&rho, 5), ints(&[1, -1, 0, 1, 0]));
    }

    #[test]
    fn test_f0_5_expansion() {
        let mut session = Session::new();
        let f0 = mock_theta_f0_5(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f0, 5), ints(&[1, 1, -1, 1, 0]));
    }

    #[test]
    fn test_f1_5_expansion() {
        let mut session = Session::new();
        let f1 = mock_theta_f1_5(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f1, 5), ints(&[1, 0, 1, -1, 1]));
    }

    #[test]
    fn test_cap_f1_5_expansion() {
        let mut session = Session::new();
        let cap_f1 = mock_theta_cap_f1_5(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&cap_f1, 5), ints(&[1, 1, 1, 1, 2]));
    }

    #[test]
    fn test_phi0_5_expansion() {
        let mut session = Session::new();
        let phi0 = mock_theta_phi0_5(&mut session, TRUNC);
        assert_eq!(coeffs(&phi0, 5), ints(&[1, 1, 1, 0, 1]));
    }

    #[test]
    fn test_phi1_5_expansion() {
        let mut session = Session::new();
        let phi1 = mock_theta_phi1_5(&mut session, TRUNC);
        assert_eq!(coeffs(&phi1, 6), ints(&[0, 1, 0, 0, 1, 1]));
    }

    #[test]
    fn test_psi0_5_expansion() {
        let mut session = Session::new();
        let psi0 = mock_theta_psi0_5(&mut session, TRUNC);
        assert_eq!(coeffs(&psi0, 5), ints(&[1, 2, 0, 2, 2]));
    }

    #[test]
    fn test_psi1_5_expansion() {
        let mut session = Session::new();
        let psi1 = mock_theta_psi1_5(&mut session, TRUNC);
        assert_eq!(coeffs(&psi1, 5), ints(&[1, 1, 1, 1, 1]));
    }

    #[test]
    fn test_chi0_5_combination() {
        // chi0 = 2 F0 - phi0(-q), term by term.
        let mut session = Session::new();
        let chi0 = mock_theta_chi0_5(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&chi0, 5), ints(&[1, 1, 1, 2, 1]));
    }

    #[test]
    fn test_chi1_5_combination() {
        let mut session = Session::new();
        let chi1 = mock_theta_chi1_5(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&chi1, 5), ints(&[1, 2, 2, 3, 4]));
    }

    #[test]
    fn test_cap_f0_7_expansion() {
        let mut session = Session::new();
        let f0 = mock_theta_cap_f0_7(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f0, 5), ints(&[1, 1, 0, 1, 1]));
    }

    #[test]
    fn test_cap_f1_7_expansion() {
        let mut session = Session::new();
        let f1 = mock_theta_cap_f1_7(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f1, 5), ints(&[1, 1, 1, 1, 2]));
    }

    #[test]
    fn test_cap_f2_7_expansion() {
        let mut session = Session::new();
        let f2 = mock_theta_cap_f2_7(&mut session, TRUNC).unwrap();
        assert_eq!(coeffs(&f2, 5), ints(&[1, 1, 2, 1, 2]));
    }

    #[test]
    fn test_negate_variable_involution() {
        let mut session = Session::new();
        let f = mock_theta_f3(&mut session, TRUNC).unwrap();
        assert_eq!(negate_variable(&negate_variable(&f)), f);
    }
}
