//! Bounded search for linear identities among eta quotients.
//!
//! Enumerates eta quotients over a caller-supplied divisor set with
//! per-delta exponent ranges, keeps the ones whose q-shift is an integer,
//! and hands their expansions to the relation engine. Each null-space
//! relation becomes a candidate identity tagged with the engine's window
//! evidence; two-term relations with unit ratio additionally go through the
//! valence-formula prover and come back [`Evidence::Exact`] when it
//! certifies them.
//!
//! Eta quotients are multiplicatively independent, so the interesting finds
//! are additive theta-type relations; they need no Newman filtering on the
//! candidates themselves.

use num_traits::{One, Zero};
use quill_expr::Session;
use quill_num::Rational;
use quill_relate::{findhom, Evidence};
use quill_series::{Error, Result, Series};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::eta::EtaExpression;
use crate::prove::{prove_eta_id, EtaIdentity};

/// Caller-supplied bounds for [`search_identities`].
#[derive(Clone, Debug)]
pub struct SearchBounds {
    /// The level N of Gamma_0(N) used when certifying matches.
    pub level: i64,
    /// The deltas of the candidate quotients; each must divide the level.
    pub deltas: Vec<i64>,
    /// Inclusive exponent range per delta, parallel to `deltas`.
    pub exponent_ranges: Vec<(i64, i64)>,
    /// Truncation order of the comparison window. Must exceed the candidate
    /// count for the window to pin the relations down.
    pub truncation: i64,
    /// Cap on candidates handed to the relation engine; a seeded subsample
    /// is taken above it.
    pub max_candidates: usize,
    /// Cap on reported identities.
    pub max_results: usize,
    /// RNG seed for the candidate subsample.
    pub seed: u64,
}

/// An identity found by the search, with how strongly it is supported.
#[derive(Clone, Debug)]
pub struct DiscoveredIdentity {
    /// The identity, as a sum of (coefficient, eta quotient) terms equal to
    /// zero.
    pub identity: EtaIdentity,
    /// `Exact` when the valence prover certified it, otherwise the window
    /// evidence from the relation engine.
    pub evidence: Evidence,
}

/// Searches for linear identities among eta quotients within the bounds.
///
/// Returns up to `max_results` identities; an empty vector means the
/// bounded search found none, not that none exist.
///
/// # Errors
///
/// `MalformedParameter` for inconsistent bounds (level < 1, empty or
/// mismatched delta/range lists, a delta not dividing the level, a range
/// with lo > hi, truncation < 2). Expansion failures propagate.
pub fn search_identities(
    session: &mut Session,
    bounds: &SearchBounds,
) -> Result<Vec<DiscoveredIdentity>> {
    validate(bounds)?;

    let mut candidates = enumerate_candidates(bounds);
    log::debug!(
        "identity search at level {}: {} integer-shift candidates",
        bounds.level,
        candidates.len()
    );
    if candidates.len() > bounds.max_candidates {
        let mut rng = ChaCha8Rng::seed_from_u64(bounds.seed);
        candidates.shuffle(&mut rng);
        candidates.truncate(bounds.max_candidates);
    }

    let mut kept: Vec<(EtaExpression, Series)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let series = candidate.to_series(session, bounds.truncation)?;
        if !series.is_zero() {
            kept.push((candidate, series));
        }
    }

    let series_refs: Vec<&Series> = kept.iter().map(|(_, s)| s).collect();
    let relation_set = findhom(&series_refs, 1, 2)?;
    log::debug!("{} independent relations on the window", relation_set.relations.len());

    let mut results = Vec::new();
    for relation in &relation_set.relations {
        if results.len() >= bounds.max_results {
            break;
        }

        let mut terms: Vec<(Rational, EtaExpression)> = Vec::new();
        for (k, coeff) in relation.iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            // Degree-1 monomials carry a single unit exponent; its position
            // is the candidate index.
            let Some(index) = relation_set.monomials[k].iter().position(|&e| e == 1) else {
                continue;
            };
            terms.push((coeff.clone(), kept[index].0.clone()));
        }
        if terms.len() < 2 {
            continue;
        }

        // Normalize to a unit leading coefficient.
        let lead = terms[0].0.clone();
        for (c, _) in &mut terms {
            *c = &*c * &lead.recip();
        }

        let identity = EtaIdentity::new(terms, bounds.level);
        let evidence = certify(session, &identity)?.unwrap_or(relation_set.evidence);
        results.push(DiscoveredIdentity { identity, evidence });
    }

    Ok(results)
}

/// Tries the valence prover on two-term unit-ratio relations. `Ok(None)`
/// when the identity is not of that shape or the proof does not go through.
fn certify(session: &mut Session, identity: &EtaIdentity) -> Result<Option<Evidence>> {
    if identity.terms.len() != 2 {
        return Ok(None);
    }
    let c1 = &identity.terms[0].0;
    let c2 = &identity.terms[1].0;
    if !(c1.is_one() && (-c2).is_one() || (-c1).is_one() && c2.is_one()) {
        return Ok(None);
    }
    let proof = prove_eta_id(session, identity)?;
    Ok(proof.is_proved().then_some(Evidence::Exact))
}

fn validate(bounds: &SearchBounds) -> Result<()> {
    if bounds.level < 1 {
        return Err(Error::MalformedParameter(format!(
            "level must be >= 1, got {}",
            bounds.level
        )));
    }
    if bounds.deltas.is_empty() || bounds.deltas.len() != bounds.exponent_ranges.len() {
        return Err(Error::MalformedParameter(
            "deltas and exponent_ranges must be nonempty and parallel".to_string(),
        ));
    }
    for &delta in &bounds.deltas {
        if delta < 1 || bounds.level % delta != 0 {
            return Err(Error::MalformedParameter(format!(
                "delta {delta} does not divide level {}",
                bounds.level
            )));
        }
    }
    for &(lo, hi) in &bounds.exponent_ranges {
        if lo > hi {
            return Err(Error::MalformedParameter(format!(
                "empty exponent range ({lo}, {hi})"
            )));
        }
    }
    if bounds.truncation < 2 {
        return Err(Error::MalformedParameter(format!(
            "truncation must be >= 2, got {}",
            bounds.truncation
        )));
    }
    Ok(())
}

/// Walks the exponent grid, keeping nonempty vectors whose q-shift is an
/// integer.
fn enumerate_candidates(bounds: &SearchBounds) -> Vec<EtaExpression> {
    let mut exponents: Vec<i64> = bounds.exponent_ranges.iter().map(|&(lo, _)| lo).collect();
    let mut candidates = Vec::new();

    'grid: loop {
        if exponents.iter().any(|&r| r != 0) {
            let shift_numerator: i64 = bounds
                .deltas
                .iter()
                .zip(&exponents)
                .map(|(&d, &r)| d * r)
                .sum();
            if shift_numerator % 24 == 0 {
                let pairs: Vec<(i64, i64)> = bounds
                    .deltas
                    .iter()
                    .copied()
                    .zip(exponents.iter().copied())
                    .collect();
                candidates.push(EtaExpression::from_factors(&pairs, bounds.level));
            }
        }

        // Odometer step.
        for k in 0..exponents.len() {
            if exponents[k] < bounds.exponent_ranges[k].1 {
                exponents[k] += 1;
                continue 'grid;
            }
            exponents[k] = bounds.exponent_ranges[k].0;
        }
        break;
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::arithmetic;

    /// A grid around the theta quotients phi(q), phi(-q), and phi(q^4),
    /// which satisfy phi(q) + phi(-q) = 2 phi(q^4).
    fn theta_bounds() -> SearchBounds {
        SearchBounds {
            level: 16,
            deltas: vec![1, 2, 4, 8, 16],
            exponent_ranges: vec![(-2, 2), (-1, 5), (-2, 0), (0, 5), (-2, 0)],
            truncation: 120,
            max_candidates: 150,
            max_results: 200,
            seed: 11,
        }
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let mut session = Session::new();
        let mut b = theta_bounds();
        b.level = 0;
        assert!(search_identities(&mut session, &b).is_err());

        let mut b = theta_bounds();
        b.deltas = vec![1, 3];
        b.exponent_ranges = vec![(-1, 1), (-1, 1)];
        assert!(search_identities(&mut session, &b).is_err());

        let mut b = theta_bounds();
        b.exponent_ranges.pop();
        assert!(search_identities(&mut session, &b).is_err());

        let mut b = theta_bounds();
        b.exponent_ranges[0] = (2, -2);
        assert!(search_identities(&mut session, &b).is_err());
    }

    #[test]
    fn test_enumeration_keeps_integer_shifts() {
        let candidates = enumerate_candidates(&theta_bounds());
        assert!(!candidates.is_empty());
        for candidate in &candidates {
            assert!(candidate.q_shift().is_integer());
        }
    }

    #[test]
    fn test_theta_relation_holds_on_window() {
        // Independent check that the relation the search is pointed at is
        // real: phi(q) + phi(-q) - 2 phi(q^4) = 0.
        let mut session = Session::new();
        let phi = EtaExpression::from_factors(&[(1, -2), (2, 5), (4, -2)], 16);
        let phi_neg = EtaExpression::from_factors(&[(1, 2), (2, -1)], 16);
        let phi_q4 = EtaExpression::from_factors(&[(4, -2), (8, 5), (16, -2)], 16);

        let a = phi.to_series(&mut session, 60).unwrap();
        let b = phi_neg.to_series(&mut session, 60).unwrap();
        let c = phi_q4.to_series(&mut session, 60).unwrap();

        let sum = arithmetic::add(&a, &b);
        let twice = arithmetic::scalar_mul(&Rational::from(2), &c);
        assert!(arithmetic::sub(&sum, &twice).is_zero());
    }

    #[test]
    fn test_search_finds_theta_relations() {
        let mut session = Session::new();
        let found = search_identities(&mut session, &theta_bounds()).unwrap();
        assert!(!found.is_empty());
        for item in &found {
            assert!(item.identity.terms.len() >= 2);
            assert!(item.identity.terms[0].0.is_one());
            // Every reported relation must actually vanish on the window.
            let mut total = Series::zero(session.q_symbol(), 80);
            for (coeff, expr) in &item.identity.terms {
                let expanded = expr.to_series(&mut session, 80).unwrap();
                total = arithmetic::add(&total, &arithmetic::scalar_mul(coeff, &expanded));
            }
            assert!(total.is_zero());
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut session = Session::new();
        let a = search_identities(&mut session, &theta_bounds()).unwrap();
        let b = search_identities(&mut session, &theta_bounds()).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.identity.terms.len(), y.identity.terms.len());
            for ((cx, ex), (cy, ey)) in x.identity.terms.iter().zip(&y.identity.terms) {
                assert_eq!(cx, cy);
                assert_eq!(ex.factors, ey.factors);
            }
        }
    }
}
