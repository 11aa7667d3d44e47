//! q-Petkovsek solving of constant-coefficient q-recurrences.
//!
//! At a concrete q, the recurrences produced by creative telescoping have
//! constant rational coefficients, so a q-hypergeometric solution with
//! y(n+1)/y(n) = r pins r to a root of the characteristic polynomial
//! c_0 + c_1 r + ... + c_d r^d. Rational roots are found by the rational
//! root theorem; each one is then tentatively re-expressed as a ratio of
//! q-Pochhammer steps.

use num_traits::{One, Zero};
use quill_num::arith::divisors;
use quill_num::{Integer, Rational};
use quill_series::qmonomial::QMonomial;

/// A solution ratio written as q-Pochhammer products.
///
/// Encodes scalar * q^{m n(n-1)/2} * prod_i (a_i;q)_n / prod_j (b_j;q)_n.
/// Plain geometric behavior r^n is deliberately not covered here; it is
/// already captured exactly by [`QPetkovsekResult::ratio`], and a closed form
/// is only reported when the ratio genuinely factors into Pochhammer steps.
#[derive(Clone, Debug)]
pub struct ClosedForm {
    /// Scalar prefactor from the S(0) normalization.
    pub scalar: Rational,
    /// m in the q^{m n(n-1)/2} prefactor.
    pub q_power_coeff: i64,
    /// The (a_i; q)_n numerator factors.
    pub numer_factors: Vec<QMonomial>,
    /// The (b_j; q)_n denominator factors.
    pub denom_factors: Vec<QMonomial>,
}

/// One q-hypergeometric solution of a constant-coefficient recurrence.
#[derive(Clone, Debug)]
pub struct QPetkovsekResult {
    /// The exact solution ratio y(n+1)/y(n).
    pub ratio: Rational,
    /// A Pochhammer decomposition of the ratio, when one was found. `None`
    /// leaves the ratio itself as the answer.
    pub closed_form: Option<ClosedForm>,
}

/// The sorted positive divisors of |n|; empty for zero or when the value
/// does not fit the machine-word trial division.
fn positive_divisors(n: &Integer) -> Vec<i64> {
    match n.to_i64() {
        Some(0) | None => Vec::new(),
        Some(v) => divisors(v.abs()),
    }
}

/// Finds all q-hypergeometric solutions of
/// c_0 S(n) + c_1 S(n+1) + ... + c_d S(n+d) = 0.
///
/// Order 1 has the unique ratio -c_0/c_1; higher orders enumerate the
/// rational roots of the characteristic polynomial. An empty result means no
/// rational root exists (or the coefficient integers were too large to
/// factor by trial division).
///
/// # Panics
///
/// Panics when fewer than two coefficients are supplied or the leading
/// coefficient is zero.
#[must_use]
pub fn q_petkovsek(coefficients: &[Rational], q_val: &Rational) -> Vec<QPetkovsekResult> {
    assert!(
        coefficients.len() >= 2,
        "q_petkovsek: need at least 2 coefficients, got {}",
        coefficients.len()
    );
    let d = coefficients.len() - 1;
    assert!(
        !coefficients[d].is_zero(),
        "q_petkovsek: leading coefficient c_{d} must be nonzero"
    );

    if d == 1 {
        let ratio = -&(&coefficients[0] / &coefficients[1]);
        let closed_form = try_decompose_ratio(&ratio, q_val);
        return vec![QPetkovsekResult { ratio, closed_form }];
    }

    // Clear denominators so the rational root theorem applies.
    let mut lcm_denom = Integer::new(1);
    for c in coefficients {
        lcm_denom = lcm_denom.lcm(&c.denominator());
    }
    let scale = Rational::from_integer(lcm_denom);
    let int_coeffs: Vec<Integer> = coefficients
        .iter()
        .map(|c| (c * &scale).numerator())
        .collect();

    if int_coeffs[0].is_zero() {
        // r = 0 is a root; the rest come from the deflated polynomial.
        let mut results = vec![QPetkovsekResult {
            ratio: Rational::zero(),
            closed_form: None,
        }];
        if d >= 2 {
            results.append(&mut q_petkovsek(&coefficients[1..], q_val));
        }
        return results;
    }

    let p_divisors = positive_divisors(&int_coeffs[0]);
    let s_divisors = positive_divisors(&int_coeffs[d]);
    if p_divisors.is_empty()
        || s_divisors.is_empty()
        || p_divisors.len() * s_divisors.len() > 5000
    {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for &p in &p_divisors {
        for &s in &s_divisors {
            candidates.push(Rational::from_i64(p, s));
            candidates.push(Rational::from_i64(-p, s));
        }
    }
    candidates.sort();
    candidates.dedup();

    candidates
        .into_iter()
        .filter(|r| eval_char_poly(coefficients, r).is_zero())
        .map(|ratio| {
            let closed_form = try_decompose_ratio(&ratio, q_val);
            QPetkovsekResult { ratio, closed_form }
        })
        .collect()
}

/// c_0 + c_1 r + ... + c_d r^d by Horner's method.
fn eval_char_poly(coefficients: &[Rational], val: &Rational) -> Rational {
    let mut result = Rational::zero();
    for c in coefficients.iter().rev() {
        result = &(&result * val) + c;
    }
    result
}

/// Tries to write a ratio as a step of q-Pochhammer products.
///
/// Pure q-powers q^m come back as `None`; they are geometric, not
/// Pochhammer. Otherwise single ratios (1-q^a)/(1-q^b) and products of two
/// such ratios are searched over small exponent windows.
fn try_decompose_ratio(ratio: &Rational, q_val: &Rational) -> Option<ClosedForm> {
    if ratio.is_zero() {
        return None;
    }

    for m in -20i64..=20 {
        if ratio == &q_val.pow_i64(m) {
            return None;
        }
    }

    let one_minus = |k: i64| {
        let v = &Rational::one() - &q_val.pow_i64(k);
        (!v.is_zero()).then_some(v)
    };

    for a in (-10i64..=10).filter(|&a| a != 0) {
        let Some(numer) = one_minus(a) else { continue };
        for b in (-10i64..=10).filter(|&b| b != 0) {
            let Some(denom) = one_minus(b) else { continue };
            if &(&numer / &denom) == ratio {
                return Some(ClosedForm {
                    scalar: Rational::one(),
                    q_power_coeff: 0,
                    numer_factors: vec![QMonomial::q_power(a)],
                    denom_factors: vec![QMonomial::q_power(b)],
                });
            }
        }
    }

    for a1 in (-6i64..=6).filter(|&a| a != 0) {
        let Some(n1) = one_minus(a1) else { continue };
        for a2 in (a1..=6).filter(|&a| a != 0) {
            let Some(n2) = one_minus(a2) else { continue };
            let numer = &n1 * &n2;
            for b1 in (-6i64..=6).filter(|&b| b != 0) {
                let Some(d1) = one_minus(b1) else { continue };
                for b2 in (b1..=6).filter(|&b| b != 0) {
                    let Some(d2) = one_minus(b2) else { continue };
                    if &(&numer / &(&d1 * &d2)) == ratio {
                        return Some(ClosedForm {
                            scalar: Rational::one(),
                            q_power_coeff: 0,
                            numer_factors: vec![
                                QMonomial::q_power(a1),
                                QMonomial::q_power(a2),
                            ],
                            denom_factors: vec![
                                QMonomial::q_power(b1),
                                QMonomial::q_power(b2),
                            ],
                        });
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::HypergeometricSeries;
    use crate::zeilberger::{q_zeilberger, QZeilbergerResult};

    fn qr(n: i64) -> Rational {
        Rational::from(n)
    }

    #[test]
    fn test_order1_simple() {
        // S(n) - 2 S(n+1) = 0: ratio 1/2.
        let results = q_petkovsek(&[qr(1), qr(-2)], &Rational::from_i64(1, 3));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ratio, Rational::from_i64(1, 2));
    }

    #[test]
    fn test_order2_two_roots() {
        // (r - 1/2)(r - 1/3) = r^2 - 5/6 r + 1/6.
        let coeffs = vec![
            Rational::from_i64(1, 6),
            Rational::from_i64(-5, 6),
            qr(1),
        ];
        let mut ratios: Vec<Rational> = q_petkovsek(&coeffs, &Rational::from_i64(1, 5))
            .into_iter()
            .map(|r| r.ratio)
            .collect();
        ratios.sort();
        assert_eq!(
            ratios,
            vec![Rational::from_i64(1, 3), Rational::from_i64(1, 2)]
        );
    }

    #[test]
    fn test_order2_no_rational_roots() {
        // r^2 + 1 = 0.
        assert!(q_petkovsek(&[qr(1), qr(0), qr(1)], &qr(2)).is_empty());
    }

    #[test]
    fn test_order3_one_rational_root() {
        // (r - 2)(r^2 + 1) = r^3 - 2r^2 + r - 2.
        let results = q_petkovsek(&[qr(-2), qr(1), qr(-2), qr(1)], &qr(3));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ratio, qr(2));
    }

    #[test]
    fn test_order2_repeated_root() {
        // (r - 3)^2 = r^2 - 6r + 9.
        let results = q_petkovsek(&[qr(9), qr(-6), qr(1)], &qr(2));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ratio, qr(3));
    }

    #[test]
    fn test_order3_all_roots() {
        // (r - 1)(r - 2)(r - 3) = r^3 - 6r^2 + 11r - 6.
        let mut ratios: Vec<Rational> = q_petkovsek(&[qr(-6), qr(11), qr(-6), qr(1)], &qr(2))
            .into_iter()
            .map(|r| r.ratio)
            .collect();
        ratios.sort();
        assert_eq!(ratios, vec![qr(1), qr(2), qr(3)]);
    }

    #[test]
    fn test_zero_constant_term_deflates() {
        // r(r - 2) = r^2 - 2r: roots 0 and 2.
        let mut ratios: Vec<Rational> = q_petkovsek(&[qr(0), qr(-2), qr(1)], &qr(2))
            .into_iter()
            .map(|r| r.ratio)
            .collect();
        ratios.sort();
        assert_eq!(ratios, vec![qr(0), qr(2)]);
    }

    #[test]
    fn test_closed_form_q_power_is_geometric() {
        let q = qr(2);
        for m in [-3i64, -1, 0, 1, 2, 5] {
            assert!(try_decompose_ratio(&q.pow_i64(m), &q).is_none());
        }
    }

    #[test]
    fn test_closed_form_pochhammer_ratio() {
        // (1 - q^2)/(1 - q^3) = 3/7 at q = 2.
        let q = qr(2);
        let ratio = Rational::from_i64(3, 7);
        let cf = try_decompose_ratio(&ratio, &q).unwrap();
        assert_eq!(cf.numer_factors, vec![QMonomial::q_power(2)]);
        assert_eq!(cf.denom_factors, vec![QMonomial::q_power(3)]);
    }

    #[test]
    fn test_closed_form_none_for_arbitrary_ratio() {
        assert!(try_decompose_ratio(&Rational::from_i64(7, 13), &qr(2)).is_none());
    }

    #[test]
    fn test_eval_char_poly() {
        // 2 + 3r + r^2.
        let coeffs = vec![qr(2), qr(3), qr(1)];
        assert_eq!(eval_char_poly(&coeffs, &qr(0)), qr(2));
        assert_eq!(eval_char_poly(&coeffs, &qr(1)), qr(6));
        assert!(eval_char_poly(&coeffs, &qr(-1)).is_zero());
    }

    #[test]
    fn test_positive_divisors() {
        assert_eq!(positive_divisors(&Integer::new(12)), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(positive_divisors(&Integer::new(-6)), vec![1, 2, 3, 6]);
        assert!(positive_divisors(&Integer::new(0)).is_empty());
    }

    #[test]
    #[should_panic(expected = "need at least 2 coefficients")]
    fn test_too_few_coefficients_panics() {
        q_petkovsek(&[qr(5)], &qr(2));
    }

    #[test]
    #[should_panic(expected = "leading coefficient")]
    fn test_leading_zero_panics() {
        q_petkovsek(&[qr(1), qr(0)], &qr(2));
    }

    #[test]
    fn test_roundtrip_with_zeilberger() {
        // q-Vandermonde at n = 5, q = 1/3: the telescoped recurrence has
        // order 1 and its unique ratio satisfies c_0 + c_1 r = 0.
        let q = Rational::from_i64(1, 3);
        let series = HypergeometricSeries::new(
            vec![QMonomial::q_power(-5), QMonomial::q_power(2)],
            vec![QMonomial::q_power(3)],
            QMonomial::q_power(6),
        );
        let QZeilbergerResult::Recurrence(zr) = q_zeilberger(&series, &q, 3, &[0], true) else {
            panic!("expected a recurrence");
        };
        assert_eq!(zr.order, 1);

        let results = q_petkovsek(&zr.coefficients, &q);
        assert_eq!(results.len(), 1);
        let check = &zr.coefficients[0] + &(&zr.coefficients[1] * &results[0].ratio);
        assert!(check.is_zero());
    }
}
