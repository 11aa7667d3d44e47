//! Eta-quotient identity proving via the valence formula.
//!
//! A weight-0 modular function on Gamma_0(N) with nonnegative orders at
//! every cusp is constant. So to prove LHS = RHS for two eta quotients:
//! check Newman's conditions on the ratio, compute its order at each cusp,
//! and confirm the constant by comparing q-expansions. Window agreement past
//! that point is a proof, not numeric evidence.

use std::collections::BTreeMap;

use num_traits::{One, Zero};
use quill_expr::Session;
use quill_num::Rational;
use quill_series::{arithmetic, Result, Series};

use crate::cusps::{cuspmake, Cusp};
use crate::eta::{EtaExpression, ModularityResult};
use crate::orders::eta_order_at_cusp;

/// Outcome of an identity proof attempt.
#[derive(Clone, Debug)]
pub enum ProofResult {
    /// Identity proved.
    Proved {
        /// The level N of Gamma_0(N) used.
        level: i64,
        /// Invariant order at each cusp; empty for expansion-only proofs.
        cusp_orders: Vec<(Cusp, Rational)>,
        /// The order bound the expansion was checked against.
        order_bound: i64,
        /// Number of q-expansion coefficients verified.
        verification_terms: i64,
    },
    /// Every checked q-expansion coefficient agrees, but no structural bound
    /// covers the identity: window agreement only, not a proof.
    VerifiedToOrder {
        /// The level N of Gamma_0(N) used.
        level: i64,
        /// Number of q-expansion coefficients that agreed.
        verification_terms: i64,
    },
    /// The combined quotient fails Newman's conditions.
    NotModular {
        /// Descriptions of the failed conditions.
        failed_conditions: Vec<String>,
    },
    /// A cusp order is negative: the identity cannot be certified at this
    /// level (and may be false).
    NegativeOrder {
        /// The offending cusp.
        cusp: Cusp,
        /// Its invariant order.
        order: Rational,
    },
    /// A q-expansion coefficient refutes the identity.
    CounterExample {
        /// Index of the first mismatched coefficient.
        coefficient_index: i64,
        /// What the identity requires there.
        expected: Rational,
        /// What the expansion produced.
        actual: Rational,
    },
}

impl ProofResult {
    /// True for [`ProofResult::Proved`].
    #[must_use]
    pub fn is_proved(&self) -> bool {
        matches!(self, ProofResult::Proved { .. })
    }

    /// True for [`ProofResult::VerifiedToOrder`].
    #[must_use]
    pub fn is_verified_to_order(&self) -> bool {
        matches!(self, ProofResult::VerifiedToOrder { .. })
    }

    /// True for [`ProofResult::CounterExample`].
    #[must_use]
    pub fn is_counterexample(&self) -> bool {
        matches!(self, ProofResult::CounterExample { .. })
    }
}

/// An identity sum_i c_i f_i(q) = 0 over eta quotients.
#[derive(Clone, Debug)]
pub struct EtaIdentity {
    /// The (coefficient, eta quotient) terms.
    pub terms: Vec<(Rational, EtaExpression)>,
    /// The level N for Gamma_0(N).
    pub level: i64,
}

impl EtaIdentity {
    /// Builds an identity from its terms.
    #[must_use]
    pub fn new(terms: Vec<(Rational, EtaExpression)>, level: i64) -> Self {
        Self { terms, level }
    }

    /// Builds LHS = RHS as LHS - RHS = 0.
    #[must_use]
    pub fn two_sided(lhs: EtaExpression, rhs: EtaExpression, level: i64) -> Self {
        Self {
            terms: vec![(Rational::one(), lhs), (-Rational::one(), rhs)],
            level,
        }
    }
}

/// The Sturm bound floor(k * [SL_2(Z) : Gamma_0(N)] / 12) for weight k on
/// Gamma_0(N), with index N prod_{p | N} (1 + 1/p).
#[must_use]
pub fn sturm_bound(weight: i64, level: i64) -> i64 {
    let mut n = level;
    let mut index_numer = level;
    let mut index_denom = 1i64;
    let mut p = 2i64;
    while p * p <= n {
        if n % p == 0 {
            index_numer *= p + 1;
            index_denom *= p;
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        index_numer *= n + 1;
        index_denom *= n;
    }
    (weight * index_numer) / (12 * index_denom)
}

/// Proves an eta-quotient identity.
///
/// Two-term identities with unit coefficients go through the valence
/// formula on the ratio LHS/RHS and can come back [`ProofResult::Proved`].
/// Everything else falls back to exact q-expansion comparison over a fixed
/// window and is reported as [`ProofResult::VerifiedToOrder`]: numeric
/// evidence, never conflated with a proof.
///
/// # Errors
///
/// Propagates series expansion failures (fractional q-shift, vanishing
/// constant term under inversion).
pub fn prove_eta_id(session: &mut Session, identity: &EtaIdentity) -> Result<ProofResult> {
    if identity.terms.len() == 2 {
        let (c1, e1) = &identity.terms[0];
        let (c2, e2) = &identity.terms[1];

        let pair = if c1.is_one() && (-c2.clone()).is_one() {
            Some((e1, e2))
        } else if (-c1.clone()).is_one() && c2.is_one() {
            Some((e2, e1))
        } else {
            None
        };

        if let Some((lhs, rhs)) = pair {
            let mut combined: BTreeMap<i64, i64> = BTreeMap::new();
            for (&delta, &r) in &lhs.factors {
                *combined.entry(delta).or_insert(0) += r;
            }
            for (&delta, &r) in &rhs.factors {
                *combined.entry(delta).or_insert(0) -= r;
            }
            combined.retain(|_, r| *r != 0);

            let ratio = EtaExpression::new(combined, identity.level);
            return prove_ratio(session, &ratio, identity);
        }
    }

    prove_by_expansion(session, identity)
}

/// Valence-formula proof that the ratio LHS/RHS is the constant 1.
fn prove_ratio(
    session: &mut Session,
    ratio: &EtaExpression,
    identity: &EtaIdentity,
) -> Result<ProofResult> {
    let level = identity.level;

    // All factors cancelled: LHS and RHS are the same quotient.
    if ratio.factors.is_empty() {
        let cusp_orders = cuspmake(level)
            .into_iter()
            .map(|c| (c, Rational::zero()))
            .collect();
        return Ok(ProofResult::Proved {
            level,
            cusp_orders,
            order_bound: 0,
            verification_terms: 0,
        });
    }

    if let ModularityResult::NotModular { failed_conditions } = ratio.check_modularity() {
        return Ok(ProofResult::NotModular { failed_conditions });
    }

    let cusps = cuspmake(level);
    let mut cusp_orders: Vec<(Cusp, Rational)> = Vec::with_capacity(cusps.len());
    for cusp in cusps {
        let ord = eta_order_at_cusp(ratio, &cusp);
        if ord < Rational::zero() {
            return Ok(ProofResult::NegativeOrder { cusp, order: ord });
        }
        cusp_orders.push((cusp, ord));
    }

    // Weight is zero once Newman passes, so a constant is pinned by its
    // constant term alone; a few extra coefficients guard the expansion
    // code itself.
    let order_bound = 1i64;
    let verification_terms = order_bound.max(5);
    let truncation = verification_terms + 10;

    if let Some(refuted) = expansion_counterexample(session, identity, truncation, verification_terms)? {
        return Ok(refuted);
    }

    log::debug!(
        "valence proof at level {level}: {} cusps, {verification_terms} terms checked",
        cusp_orders.len()
    );
    Ok(ProofResult::Proved {
        level,
        cusp_orders,
        order_bound,
        verification_terms,
    })
}

/// Expansion-only fallback for multi-term or non-unit-coefficient
/// identities. Agreement on the window is not a proof.
fn prove_by_expansion(session: &mut Session, identity: &EtaIdentity) -> Result<ProofResult> {
    let truncation = 100i64;

    if let Some(refuted) = expansion_counterexample(session, identity, truncation, truncation)? {
        return Ok(refuted);
    }

    Ok(ProofResult::VerifiedToOrder {
        level: identity.level,
        verification_terms: truncation,
    })
}

/// Expands sum c_i f_i and scans for a nonzero coefficient below the check
/// bound. `Ok(None)` means the window is identically zero.
fn expansion_counterexample(
    session: &mut Session,
    identity: &EtaIdentity,
    truncation: i64,
    check_terms: i64,
) -> Result<Option<ProofResult>> {
    let variable = session.q_symbol();
    let mut total = Series::zero(variable, truncation);
    for (coeff, eta_expr) in &identity.terms {
        let expanded = eta_expr.to_series(session, truncation)?;
        total = arithmetic::add(&total, &arithmetic::scalar_mul(coeff, &expanded));
    }

    for i in 0..check_terms.min(total.truncation()) {
        let c = total.coeff(i);
        if !c.is_zero() {
            return Ok(Some(ProofResult::CounterExample {
                coefficient_index: i,
                expected: Rational::zero(),
                actual: c,
            }));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sturm_bound() {
        // index of Gamma_0(2) is 3, of Gamma_0(6) is 12, of Gamma_0(11)
        // is 12.
        assert_eq!(sturm_bound(12, 1), 1);
        assert_eq!(sturm_bound(4, 2), 1);
        assert_eq!(sturm_bound(2, 6), 2);
        assert_eq!(sturm_bound(2, 11), 2);
    }

    #[test]
    fn test_trivial_identity_proved() {
        let mut session = Session::new();
        let e = EtaExpression::from_factors(&[(1, 24), (2, -24)], 2);
        let identity = EtaIdentity::two_sided(e.clone(), e, 2);
        let result = prove_eta_id(&mut session, &identity).unwrap();
        assert!(result.is_proved());
    }

    #[test]
    fn test_false_identity_refuted() {
        // eta(tau)^24 vs eta(2 tau)^24 at level 2: the ratio is modular but
        // has a negative cusp order (or the expansion differs), so this must
        // not be proved.
        let mut session = Session::new();
        let lhs = EtaExpression::from_factors(&[(1, 24)], 2);
        let rhs = EtaExpression::from_factors(&[(2, 24)], 2);
        let identity = EtaIdentity::two_sided(lhs, rhs, 2);
        let result = prove_eta_id(&mut session, &identity).unwrap();
        assert!(!result.is_proved());
    }

    #[test]
    fn test_not_modular_reported() {
        let mut session = Session::new();
        let lhs = EtaExpression::from_factors(&[(1, 1)], 2);
        let rhs = EtaExpression::from_factors(&[(2, 1)], 2);
        let identity = EtaIdentity::two_sided(lhs, rhs, 2);
        let result = prove_eta_id(&mut session, &identity).unwrap();
        assert!(matches!(result, ProofResult::NotModular { .. }));
    }

    #[test]
    fn test_expansion_fallback_counterexample() {
        // Three terms force the expansion path: f + f - f = f is nonzero.
        let mut session = Session::new();
        let e = EtaExpression::from_factors(&[(1, 24)], 1);
        let identity = EtaIdentity::new(
            vec![
                (Rational::one(), e.clone()),
                (Rational::one(), e.clone()),
                (-Rational::one(), e),
            ],
            1,
        );
        let result = prove_eta_id(&mut session, &identity).unwrap();
        assert!(result.is_counterexample());
    }

    #[test]
    fn test_expansion_fallback_is_not_a_proof() {
        // 2f - f - f = 0 through the multi-term path: the window agrees, but
        // without a valence bound the result must stay below `Proved`.
        let mut session = Session::new();
        let e = EtaExpression::from_factors(&[(1, 24)], 1);
        let identity = EtaIdentity::new(
            vec![
                (Rational::from(2), e.clone()),
                (-Rational::one(), e.clone()),
                (-Rational::one(), e),
            ],
            1,
        );
        let result = prove_eta_id(&mut session, &identity).unwrap();
        assert!(!result.is_proved());
        assert!(result.is_verified_to_order());
        let ProofResult::VerifiedToOrder {
            verification_terms, ..
        } = result
        else {
            unreachable!();
        };
        assert!(verification_terms > 0);
    }
}
