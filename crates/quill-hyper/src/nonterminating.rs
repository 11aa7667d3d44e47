//! Parameter specialization for proving nonterminating identities.
//!
//! Creative telescoping needs a terminating sum, which rules out direct
//! attacks on identities like q-Gauss where both sides are infinite. The
//! workaround replaces a free parameter with q^{-n}: each specialization is a
//! terminating sum, [`crate::zeilberger::q_zeilberger`] finds a recurrence in
//! n for the left side, and the identity follows once the right side
//! satisfies the same recurrence with matching initial values.
//!
//! Callers supply both sides as builders over n. The left builder returns the
//! specialized series; the right builder returns the closed form evaluated at
//! the concrete q, so the comparison stays in exact rational arithmetic.

use num_traits::{One, Zero};
use quill_num::Rational;
use quill_series::{arithmetic, Series};

use crate::gosper::extract_term_ratio;
use crate::series::HypergeometricSeries;
use crate::zeilberger::{detect_n_params, q_zeilberger, QZeilbergerResult};

/// Outcome of a parameter-specialization proof.
#[derive(Clone, Debug)]
pub enum NonterminatingProofResult {
    /// Both sides satisfy the same recurrence and agree on the initial
    /// values, so they agree for every n.
    Proved {
        /// The shared recurrence order.
        recurrence_order: usize,
        /// Recurrence coefficients found at the test index, normalized so
        /// the leading coefficient is one.
        recurrence_coefficients: Vec<Rational>,
        /// How many initial values were compared.
        initial_conditions_checked: usize,
    },
    /// Some step of the proof did not go through.
    Failed {
        /// What failed.
        reason: String,
    },
}

/// The value of a terminating sum at concrete q, by term-ratio accumulation.
/// Stops at a zero ratio (the sum has terminated), at a pole, or after 100
/// terms.
fn compute_sum_at_q(series: &HypergeometricSeries, q_val: &Rational) -> Rational {
    let ratio = extract_term_ratio(series, q_val);
    let max_terms: usize = 100;
    let mut sum = Rational::one();
    let mut term = Rational::one();

    for k in 0..max_terms {
        let qk = q_val.pow_i64(k as i64);
        match ratio.eval(&qk) {
            Some(r) => {
                if r.is_zero() {
                    break;
                }
                term = &term * &r;
                sum = &sum + &term;
            }
            None => break,
        }
    }
    sum
}

/// Whether a scalar sequence f(n), ..., f(n+d) satisfies
/// c_0 f(n) + ... + c_d f(n+d) = 0.
///
/// # Panics
///
/// When `values` and `coefficients` differ in length.
#[must_use]
pub fn check_recurrence_on_values(values: &[Rational], coefficients: &[Rational]) -> bool {
    assert_eq!(
        values.len(),
        coefficients.len(),
        "values and coefficients must have the same length"
    );
    let mut sum = Rational::zero();
    for (c, v) in coefficients.iter().zip(values) {
        sum = &sum + &(c * v);
    }
    sum.is_zero()
}

/// Whether a sequence of series satisfies c_0 f(n) + ... + c_d f(n+d) = 0
/// coefficientwise.
///
/// # Panics
///
/// When `series_values` and `coefficients` differ in length, or
/// `series_values` is empty.
#[must_use]
pub fn check_recurrence_on_series(series_values: &[Series], coefficients: &[Rational]) -> bool {
    assert_eq!(
        series_values.len(),
        coefficients.len(),
        "series values and coefficients must have the same length"
    );
    let mut result = arithmetic::scalar_mul(&coefficients[0], &series_values[0]);
    for (c, f) in coefficients.iter().zip(series_values).skip(1) {
        result = arithmetic::add(&result, &arithmetic::scalar_mul(c, f));
    }
    result.is_zero()
}

/// Proves an identity between a specialized terminating sum and a closed
/// form.
///
/// `lhs_builder` maps n to the left side specialized at q^{-n}; the series it
/// returns must terminate. `rhs_builder` maps n to the right side's value at
/// the concrete q. The proof finds a recurrence for the left side at
/// `n_test`, re-derives it at nearby indices to confirm the right side
/// satisfies it too, then compares both sides at n = 0, ..., d.
///
/// A `Proved` outcome is a finite certificate: the recurrence plus d+1 agreed
/// initial values force agreement for all n.
#[must_use]
pub fn prove_nonterminating(
    lhs_builder: &dyn Fn(i64) -> HypergeometricSeries,
    rhs_builder: &dyn Fn(i64) -> Rational,
    q_val: &Rational,
    n_test: i64,
    max_order: usize,
) -> NonterminatingProofResult {
    let lhs_series = lhs_builder(n_test);
    if lhs_series.termination_order().is_none() {
        return NonterminatingProofResult::Failed {
            reason: "left side at the test index is not terminating".to_string(),
        };
    }

    let (n_indices, n_in_arg) = detect_n_params(&lhs_series, n_test, q_val);
    let zr = match q_zeilberger(&lhs_series, q_val, max_order, &n_indices, n_in_arg) {
        QZeilbergerResult::Recurrence(zr) => zr,
        QZeilbergerResult::NoRecurrence => {
            return NonterminatingProofResult::Failed {
                reason: format!("no recurrence for the left side up to order {max_order}"),
            };
        }
    };
    let d = zr.order;

    // The telescoped coefficients are specific to the n they were derived at,
    // so the right side is checked against a freshly derived recurrence at
    // each verification index.
    let verify_n_values: Vec<i64> = if n_test >= 2 {
        vec![n_test - 2, n_test - 1, n_test]
    } else {
        vec![n_test]
    };

    for &n_v in &verify_n_values {
        let lhs_at_nv = lhs_builder(n_v);
        if lhs_at_nv.termination_order().is_none() {
            continue;
        }
        let (nv_indices, nv_in_arg) = detect_n_params(&lhs_at_nv, n_v, q_val);
        let zr_nv = match q_zeilberger(&lhs_at_nv, q_val, max_order, &nv_indices, nv_in_arg) {
            QZeilbergerResult::Recurrence(zr) => zr,
            QZeilbergerResult::NoRecurrence => continue,
        };

        let rhs_vals: Vec<Rational> = (0..=(zr_nv.order as i64))
            .map(|j| rhs_builder(n_v + j))
            .collect();
        if !check_recurrence_on_values(&rhs_vals, &zr_nv.coefficients) {
            return NonterminatingProofResult::Failed {
                reason: format!("right side does not satisfy the recurrence at n={n_v}"),
            };
        }
    }

    for n in 0..=(d as i64) {
        let lhs_val = compute_sum_at_q(&lhs_builder(n), q_val);
        if lhs_val != rhs_builder(n) {
            return NonterminatingProofResult::Failed {
                reason: format!("initial condition mismatch at n={n}"),
            };
        }
    }

    NonterminatingProofResult::Proved {
        recurrence_order: d,
        recurrence_coefficients: zr.coefficients,
        initial_conditions_checked: d + 1,
    }
}
