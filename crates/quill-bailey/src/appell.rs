//! Appell-Lerch sums, the universal mock theta functions g2 and g3, and
//! symbolic Zwegers completions.
//!
//! The Appell-Lerch sum of Hickerson and Mortenson is
//!
//! ```text
//! m(x, q, z) = (1/j(z;q)) * sum_{r in Z} (-1)^r q^{r(r-1)/2} z^r / (1 - x q^r z)
//! ```
//!
//! with j(z;q) = (z;q)_inf (q/z;q)_inf (q;q)_inf. When x and z are integer
//! powers of q the theta factor j(z;q) vanishes, so the normalized m is not a
//! formal power series. What is computable is the bilateral sum itself, with
//! the poles at x q^r z = 1 skipped, and that is what
//! [`appell_lerch_bilateral`] produces. Identities whose j factors cancel can
//! be checked on the bilateral sums directly.
//!
//! The universal mock theta functions g2 and g3 of Gordon and McIntosh have
//! denominators (x;q)_{n+1} (q/x;q)_{n+1} that degenerate at x = q^a: for
//! a >= 2 the factor (q^{1-a};q)_{n+1} vanishes once n >= a - 1. The
//! negative-exponent part is rewritten as
//!
//! ```text
//! (q^{1-a};q)_{n+1} = (-1)^{n+1} q^{-S} prod_{k=0}^{n} (1 - q^{a-1-k})
//! ```
//!
//! and only the non-degenerate terms are summed.

use num_traits::{One, Zero};
use quill_expr::Session;
use quill_num::Rational;
use quill_series::qmonomial::{PochhammerOrder, QMonomial};
use quill_series::{arithmetic, gen::aqprod, Result, Series};

/// 1/(1 - q^k) as a power series.
///
/// For k > 0 this is the geometric series sum q^{mk}. For k < 0,
/// 1/(1 - q^{-|k|}) = -q^{|k|}/(1 - q^{|k|}), which stays a power series.
///
/// # Panics
///
/// Panics when `k == 0`, where 1/(1 - 1) is a pole.
fn geometric_series_q_power(
    k: i64,
    variable: quill_expr::SymbolId,
    truncation: i64,
) -> Series {
    assert!(k != 0, "1/(1 - q^0) is a pole");

    let mut result = Series::zero(variable, truncation);
    if k > 0 {
        let mut exp = 0i64;
        while exp < truncation {
            result.set_coeff(exp, Rational::one());
            exp += k;
        }
    } else {
        let ak = -k;
        let mut exp = ak;
        while exp < truncation {
            result.set_coeff(exp, -Rational::one());
            exp += ak;
        }
    }
    result
}

/// The bilateral Appell-Lerch sum, without theta normalization:
///
/// ```text
/// S(q^a, q, q^z) = sum_{r in Z} (-1)^r q^{r(r-1)/2 + z*r} / (1 - q^{a+r+z})
/// ```
///
/// Indices r with a + r + z = 0 hit a pole of the summand and are skipped.
#[must_use]
pub fn appell_lerch_bilateral(
    session: &mut Session,
    a_pow: i64,
    z_pow: i64,
    truncation: i64,
) -> Series {
    let variable = session.q_symbol();
    let mut bilateral = Series::zero(variable, truncation);

    let mut add_term = |bilateral: &mut Series, r: i64| {
        let q_exp = r * (r - 1) / 2 + z_pow * r;
        let denom_pow = a_pow + r + z_pow;
        if denom_pow == 0 {
            return;
        }
        // Terms with a negative numerator power reach into the window from
        // below, so the geometric factor is expanded further out.
        let effective = if q_exp < 0 { truncation - q_exp } else { truncation };
        let sign = if r.rem_euclid(2) == 0 { Rational::one() } else { -Rational::one() };
        let geom = geometric_series_q_power(denom_pow, variable, effective);
        let numer = Series::monomial(variable, sign, q_exp, effective);
        let term = arithmetic::mul(&numer, &geom);

        let mut windowed = Series::zero(variable, truncation);
        for (&k, v) in term.iter() {
            if k < truncation {
                windowed.set_coeff(k, v.clone());
            }
        }
        *bilateral = arithmetic::add(bilateral, &windowed);
    };

    for r in 0i64.. {
        if r * (r - 1) / 2 + z_pow * r >= truncation {
            break;
        }
        add_term(&mut bilateral, r);
    }
    for r_abs in 1i64.. {
        let r = -r_abs;
        if r * (r - 1) / 2 + z_pow * r >= truncation {
            break;
        }
        add_term(&mut bilateral, r);
    }

    bilateral
}

/// The Appell-Lerch sum m(q^{a_pow}, q, q^{z_pow}).
///
/// At integer powers of q the theta normalization j(z;q) vanishes, so this
/// returns the bilateral numerator, suitable for identities where the theta
/// factors cancel between both sides.
#[must_use]
pub fn appell_lerch_m(
    session: &mut Session,
    a_pow: i64,
    z_pow: i64,
    truncation: i64,
) -> Series {
    appell_lerch_bilateral(session, a_pow, z_pow, truncation)
}

/// The largest n for which the g2/g3 denominator products at x = q^{a_pow}
/// are nonzero, or `None` when every n is valid.
///
/// (q^a;q)_{n+1} vanishes once n >= -a, and (q^{1-a};q)_{n+1} once
/// n >= a - 1. For a = 1 the second product opens with (1 - q^0) = 0, so no
/// term survives.
fn compute_max_valid_n(a_pow: i64) -> Option<i64> {
    let limit1 = (a_pow <= 0).then(|| -a_pow - 1);
    let limit2 = if a_pow >= 2 {
        Some(a_pow - 2)
    } else if a_pow == 1 {
        Some(-1i64)
    } else {
        None
    };

    match (limit1, limit2) {
        (None, None) => None,
        (Some(l), None) | (None, Some(l)) => Some(l.max(-1)),
        (Some(l1), Some(l2)) => Some(l1.min(l2).max(-1)),
    }
}

/// The universal mock theta function g3(q^{a_pow}, q):
///
/// ```text
/// g3(x, q) = sum_{n>=0} q^{n(n+1)/2} / [(x;q)_{n+1} (q/x;q)_{n+1}]
/// ```
///
/// Only the terms with nonvanishing denominators are summed; for a_pow <= 1
/// no term survives and the result is zero.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn universal_mock_theta_g3(
    session: &mut Session,
    a_pow: i64,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let mut result = Series::zero(variable, truncation);
    if a_pow <= 1 {
        return Ok(result);
    }

    let max_valid_n = compute_max_valid_n(a_pow);

    // denom1 accumulates (q^a;q)_{n+1}, denom2 the positive-exponent rewrite
    // of (q^{1-a};q)_{n+1}; the q^{-S} and sign it sheds fold into the term.
    let mut denom1 = one_minus_q_m(variable, a_pow, truncation);
    let mut denom2 = one_minus_q_m(variable, a_pow - 1, truncation);

    for n in 0i64.. {
        if let Some(max_n) = max_valid_n {
            if n > max_n {
                break;
            }
        }
        let q_exp = (n + 1) * (a_pow - 1);
        if q_exp >= truncation {
            break;
        }

        let sign = if (n + 1) % 2 == 0 { Rational::one() } else { -Rational::one() };
        let denom = arithmetic::mul(&denom1, &denom2);
        if denom.is_zero() || denom.coeff(0).is_zero() {
            break;
        }
        let numer = Series::monomial(variable, sign, q_exp, truncation);
        let term = arithmetic::mul(&numer, &arithmetic::invert(&denom)?);
        result = arithmetic::add(&result, &term);

        let f1_exp = a_pow + n + 1;
        if f1_exp < truncation {
            denom1 = arithmetic::mul(&denom1, &one_minus_q_m(variable, f1_exp, truncation));
        }
        let f2_exp = a_pow - 2 - n;
        if f2_exp > 0 {
            if f2_exp < truncation {
                denom2 = arithmetic::mul(&denom2, &one_minus_q_m(variable, f2_exp, truncation));
            }
        } else {
            break;
        }
    }

    Ok(result)
}

/// The universal mock theta function g2(q^{a_pow}, q):
///
/// ```text
/// g2(x, q) = x^{-1} (-q;q)_inf
///            * sum_{n>=0} q^{n(n+1)/2} (-q;q)_n / [(x;q)_{n+1} (q/x;q)_{n+1}]
/// ```
///
/// The x^{-1} prefactor makes the result a Laurent series starting at
/// q^{-a_pow}; the interior is computed at an extended order so the shift
/// preserves the requested truncation.
///
/// # Errors
///
/// Propagates series inversion failures.
pub fn universal_mock_theta_g2(
    session: &mut Session,
    a_pow: i64,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    if a_pow <= 1 {
        return Ok(Series::zero(variable, truncation));
    }

    let extended = truncation + a_pow;
    let neg_q = QMonomial::new(-Rational::one(), 1);
    let neg_q_inf = aqprod(session, &neg_q, PochhammerOrder::Infinite, extended)?;

    let max_valid_n = compute_max_valid_n(a_pow);

    let mut denom1 = one_minus_q_m(variable, a_pow, extended);
    let mut denom2 = one_minus_q_m(variable, a_pow - 1, extended);
    let mut numer_poch = Series::one(variable, extended);
    let mut inner_sum = Series::zero(variable, extended);

    for n in 0i64.. {
        if let Some(max_n) = max_valid_n {
            if n > max_n {
                break;
            }
        }
        let q_exp = (n + 1) * (a_pow - 1);
        if q_exp >= extended {
            break;
        }

        let sign = if (n + 1) % 2 == 0 { Rational::one() } else { -Rational::one() };
        let denom = arithmetic::mul(&denom1, &denom2);
        if denom.is_zero() || denom.coeff(0).is_zero() {
            break;
        }
        let numer = Series::monomial(variable, sign, q_exp, extended);
        let term = arithmetic::mul(
            &arithmetic::mul(&numer, &numer_poch),
            &arithmetic::invert(&denom)?,
        );
        inner_sum = arithmetic::add(&inner_sum, &term);

        numer_poch = arithmetic::mul(&numer_poch, &one_plus_q_m(variable, n + 1, extended));

        let f1_exp = a_pow + n + 1;
        if f1_exp < extended {
            denom1 = arithmetic::mul(&denom1, &one_minus_q_m(variable, f1_exp, extended));
        }
        let f2_exp = a_pow - 2 - n;
        if f2_exp > 0 {
            if f2_exp < extended {
                denom2 = arithmetic::mul(&denom2, &one_minus_q_m(variable, f2_exp, extended));
            }
        } else {
            break;
        }
    }

    let product = arithmetic::mul(&neg_q_inf, &inner_sum);
    Ok(arithmetic::shift(&product, -a_pow))
}

fn one_minus_q_m(variable: quill_expr::SymbolId, m: i64, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, -Rational::one());
    }
    f
}

fn one_plus_q_m(variable: quill_expr::SymbolId, m: i64, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if m > 0 && m < truncation {
        f.set_coeff(m, Rational::one());
    }
    f
}

/// A symbolic Zwegers completion of a mock theta function.
///
/// The completed form hat_f(tau) = f(q) + R(tau) is a harmonic Maass form;
/// the correction R involves the complementary error function and is
/// transcendental, so it is carried as a description while the holomorphic
/// part stays an exact series.
#[derive(Clone, Debug)]
pub struct ZwegersCompletion {
    /// Which mock theta function is being completed.
    pub mock_theta_name: String,
    /// The mock theta function itself, truncated.
    pub holomorphic_part: Series,
    /// Description of the non-holomorphic correction R(tau).
    pub correction_description: String,
    /// Modular weight of the completed form, as (numerator, denominator).
    pub weight: (i64, i64),
    /// Modular level of the completed form.
    pub level: i64,
}

impl ZwegersCompletion {
    /// Completion of a third-order mock theta function: weight 1/2, level 2,
    /// corrected by a period integral of a weight-3/2 unary theta function.
    #[must_use]
    pub fn third_order(name: &str, holomorphic: Series) -> Self {
        Self {
            mock_theta_name: name.to_string(),
            holomorphic_part: holomorphic,
            correction_description: format!(
                "R(tau) = non-holomorphic Eichler integral of the weight-3/2 unary \
                 theta function attached to the third-order mock theta function {name}; \
                 a sum over half-integers of sgn(n) erfc(|n| sqrt(2 Im(tau)))."
            ),
            weight: (1, 2),
            level: 2,
        }
    }

    /// Completion of a fifth-order mock theta function: weight 1/2, level 5.
    #[must_use]
    pub fn fifth_order(name: &str, holomorphic: Series) -> Self {
        Self {
            mock_theta_name: name.to_string(),
            holomorphic_part: holomorphic,
            correction_description: format!(
                "R(tau) = non-holomorphic Eichler integral of the weight-3/2 theta \
                 function attached to the fifth-order mock theta function {name}."
            ),
            weight: (1, 2),
            level: 5,
        }
    }

    /// Completion with caller-supplied correction, weight, and level.
    #[must_use]
    pub fn custom(
        name: &str,
        holomorphic: Series,
        correction_description: &str,
        weight: (i64, i64),
        level: i64,
    ) -> Self {
        Self {
            mock_theta_name: name.to_string(),
            holomorphic_part: holomorphic,
            correction_description: correction_description.to_string(),
            weight,
            level,
        }
    }

    /// Whether c1 * self + c2 * other equals `target` on the holomorphic
    /// parts, to the common truncation.
    #[must_use]
    pub fn verify_linear_relation(
        &self,
        other: &ZwegersCompletion,
        c1: &Rational,
        c2: &Rational,
        target: &Series,
    ) -> bool {
        let part1 = arithmetic::scalar_mul(c1, &self.holomorphic_part);
        let part2 = arithmetic::scalar_mul(c2, &other.holomorphic_part);
        let combo = arithmetic::add(&part1, &part2);
        arithmetic::sub(&combo, target).is_zero()
    }

    /// Whether the holomorphic part is nonzero.
    #[must_use]
    pub fn is_nontrivial(&self) -> bool {
        !self.holomorphic_part.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_theta::mock_theta_f3;

    const TRUNC: i64 = 12;

    #[test]
    fn test_geometric_series_positive_power() {
        let mut session = Session::new();
        let v = session.q_symbol();
        let geom = geometric_series_q_power(3, v, 10);
        for k in 0..10 {
            let expected = i64::from(k % 3 == 0);
            assert_eq!(geom.coeff(k), Rational::from(expected));
        }
    }

    #[test]
    fn test_geometric_series_negative_power() {
        // 1/(1 - q^{-2}) = -q^2 - q^4 - q^6 - ...
        let mut session = Session::new();
        let v = session.q_symbol();
        let geom = geometric_series_q_power(-2, v, 9);
        assert!(geom.coeff(0).is_zero());
        assert_eq!(geom.coeff(2), Rational::from(-1));
        assert_eq!(geom.coeff(4), Rational::from(-1));
        assert!(geom.coeff(3).is_zero());
    }

    #[test]
    fn test_bilateral_sum_at_a1_z1() {
        // S(q, q, q) through q^4: the r = -1 term cancels almost everything
        // and leaves -2q.
        let mut session = Session::new();
        let s = appell_lerch_bilateral(&mut session, 1, 1, 5);
        assert!(s.coeff(0).is_zero());
        assert_eq!(s.coeff(1), Rational::from(-2));
        assert!(s.coeff(2).is_zero());
        assert!(s.coeff(3).is_zero());
        assert!(s.coeff(4).is_zero());
    }

    #[test]
    fn test_m_is_the_bilateral_sum() {
        let mut session = Session::new();
        let m = appell_lerch_m(&mut session, 2, 1, TRUNC);
        let s = appell_lerch_bilateral(&mut session, 2, 1, TRUNC);
        assert_eq!(m, s);
    }

    #[test]
    fn test_max_valid_n_ranges() {
        assert_eq!(compute_max_valid_n(3), Some(1));
        assert_eq!(compute_max_valid_n(2), Some(0));
        assert_eq!(compute_max_valid_n(1), Some(-1));
        assert_eq!(compute_max_valid_n(0), Some(-1));
        assert_eq!(compute_max_valid_n(-2), Some(1));
    }

    #[test]
    fn test_g3_at_a2() {
        // Only n = 0 survives: g3(q^2, q) = -q / ((1-q)(1-q^2)).
        let mut session = Session::new();
        let g3 = universal_mock_theta_g3(&mut session, 2, 6).unwrap();
        let expected: Vec<Rational> =
            [0, -1, -1, -2, -2, -3].iter().map(|&n| Rational::from(n)).collect();
        let got: Vec<Rational> = (0..6).map(|k| g3.coeff(k)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_g3_degenerate_parameters_are_zero() {
        let mut session = Session::new();
        assert!(universal_mock_theta_g3(&mut session, 1, TRUNC).unwrap().is_zero());
        assert!(universal_mock_theta_g3(&mut session, 0, TRUNC).unwrap().is_zero());
    }

    #[test]
    fn test_g2_at_a2_is_laurent() {
        // g2(q^2, q) = q^{-2} (-q;q)_inf * (-q/((1-q)(1-q^2))).
        let mut session = Session::new();
        let g2 = universal_mock_theta_g2(&mut session, 2, 8).unwrap();
        assert_eq!(g2.coeff(-1), Rational::from(-1));
        assert_eq!(g2.coeff(0), Rational::from(-2));
        assert_eq!(g2.coeff(1), Rational::from(-4));
        assert_eq!(g2.coeff(2), Rational::from(-7));
    }

    #[test]
    fn test_completion_metadata() {
        let mut session = Session::new();
        let f = mock_theta_f3(&mut session, TRUNC).unwrap();
        let completion = ZwegersCompletion::third_order("f", f);
        assert_eq!(completion.weight, (1, 2));
        assert_eq!(completion.level, 2);
        assert!(completion.is_nontrivial());
        assert!(completion.correction_description.contains("erfc"));
    }

    #[test]
    fn test_linear_relation_on_holomorphic_parts() {
        let mut session = Session::new();
        let f = mock_theta_f3(&mut session, TRUNC).unwrap();
        let a = ZwegersCompletion::third_order("f", f.clone());
        let b = ZwegersCompletion::custom("f-copy", f.clone(), "none", (1, 2), 2);
        let target = arithmetic::scalar_mul(&Rational::from(2), &f);
        assert!(a.verify_linear_relation(&b, &Rational::one(), &Rational::one(), &target));
        assert!(!a.verify_linear_relation(
            &b,
            &Rational::one(),
            &Rational::from(2),
            &target
        ));
    }
}
