//! Identity discovery over Bailey chains.
//!
//! Every pair in a database is pushed through the Bailey chain, each chain
//! element is turned into its weak-lemma generating function, and that series
//! is handed to the relation engine against a caller-supplied dictionary of
//! reference series. A hit means the chain output is a linear combination of
//! known functions on the checked window, which is how Rogers-Ramanujan-type
//! identities are recognized.

use quill_expr::Session;
use quill_num::Rational;
use quill_relate::{findlincombo, Evidence};
use quill_series::qmonomial::QMonomial;
use quill_series::{Error, Result, Series};

use crate::database::BaileyDatabase;
use crate::lemma::{bailey_chain, weak_bailey_lemma};

/// Caller-supplied bounds for [`bailey_discover`].
#[derive(Clone, Debug)]
pub struct DiscoverBounds {
    /// Chain depth per database pair; depth 0 scans the seed pairs only.
    pub depth: usize,
    /// Largest summation index fed to the weak lemma.
    pub max_n: i64,
    /// Truncation order of the comparison window.
    pub truncation: i64,
    /// Extra rows for the relation engine.
    pub topshift: i64,
}

/// A chain output recognized as a combination of reference series.
#[derive(Clone, Debug)]
pub struct DiscoveredBaileyIdentity {
    /// Name of the chain element (seed name plus lemma decorations).
    pub pair_name: String,
    /// Position in the chain, 0 for the seed pair.
    pub chain_index: usize,
    /// The weak-lemma generating function of the chain element.
    pub series: Series,
    /// One coefficient per reference series, in input order.
    pub coefficients: Vec<Rational>,
    /// Window evidence from the relation engine.
    pub evidence: Evidence,
}

/// Scans the (database pair x chain depth) grid for chain outputs the
/// relation engine can express in the reference dictionary.
///
/// Chains that fail to evaluate for the given parameters are skipped, not
/// fatal. An empty result means the bounded grid was exhausted without a
/// match, not that no identity exists.
///
/// # Errors
///
/// `MalformedParameter` for inconsistent bounds (no references, truncation
/// < 2, negative max_n or topshift).
pub fn bailey_discover(
    session: &mut Session,
    database: &BaileyDatabase,
    a: &QMonomial,
    b: &QMonomial,
    c: &QMonomial,
    references: &[&Series],
    bounds: &DiscoverBounds,
) -> Result<Vec<DiscoveredBaileyIdentity>> {
    if references.is_empty() {
        return Err(Error::MalformedParameter(
            "discovery needs at least one reference series".to_string(),
        ));
    }
    if bounds.truncation < 2 {
        return Err(Error::MalformedParameter(format!(
            "truncation must be >= 2, got {}",
            bounds.truncation
        )));
    }
    if bounds.max_n < 0 || bounds.topshift < 0 {
        return Err(Error::MalformedParameter(format!(
            "max_n and topshift must be nonnegative, got {} and {}",
            bounds.max_n, bounds.topshift
        )));
    }

    let mut results = Vec::new();
    for seed in database.all_pairs() {
        let chain = match bailey_chain(
            session,
            seed,
            a,
            b,
            c,
            bounds.depth,
            bounds.max_n,
            bounds.truncation,
        ) {
            Ok(chain) => chain,
            Err(err) => {
                log::debug!("chain from '{}' skipped: {err}", seed.name);
                continue;
            }
        };

        for (chain_index, pair) in chain.iter().enumerate() {
            let (lhs, _) =
                match weak_bailey_lemma(session, pair, a, bounds.max_n, bounds.truncation) {
                    Ok(sides) => sides,
                    Err(err) => {
                        log::debug!("weak lemma for '{}' skipped: {err}", pair.name);
                        continue;
                    }
                };

            if let Some(combo) = findlincombo(&lhs, references, bounds.topshift)? {
                log::debug!(
                    "'{}' (chain index {chain_index}) matched the dictionary",
                    pair.name
                );
                results.push(DiscoveredBaileyIdentity {
                    pair_name: pair.name.clone(),
                    chain_index,
                    series: lhs,
                    coefficients: combo.coefficients,
                    evidence: combo.evidence,
                });
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::{BaileyPair, BaileyPairKind};
    use num_traits::One;
    use quill_series::arithmetic;
    use quill_series::gen::etaq;

    const TRUNC: i64 = 20;

    fn one() -> QMonomial {
        QMonomial::constant(Rational::one())
    }

    fn bounds() -> DiscoverBounds {
        DiscoverBounds {
            depth: 0,
            max_n: 10,
            truncation: TRUNC,
            topshift: 2,
        }
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let mut session = Session::new();
        let db = BaileyDatabase::new();
        let refs: Vec<&Series> = Vec::new();
        assert!(
            bailey_discover(&mut session, &db, &one(), &one(), &one(), &refs, &bounds()).is_err()
        );

        let s = Series::one(0, TRUNC);
        let mut b = bounds();
        b.truncation = 1;
        assert!(
            bailey_discover(&mut session, &db, &one(), &one(), &one(), &[&s], &b).is_err()
        );
    }

    #[test]
    fn test_discovers_rogers_ramanujan_identity() {
        // The Rogers-Ramanujan seed at a = 1 has weak-lemma left side
        // sum q^{n^2}/(q;q)_n, which the first Rogers-Ramanujan identity
        // equates to 1/((q;q^5) (q^4;q^5)).
        let mut session = Session::new();
        let mut db = BaileyDatabase::new();
        db.add(BaileyPair {
            name: "extra-unit".into(),
            kind: BaileyPairKind::Unit,
            tags: vec!["derived".into()],
        });

        let product = arithmetic::invert(&arithmetic::mul(
            &etaq(&mut session, 1, 5, TRUNC).unwrap(),
            &etaq(&mut session, 4, 5, TRUNC).unwrap(),
        ))
        .unwrap();

        let found = bailey_discover(
            &mut session,
            &db,
            &one(),
            &one(),
            &one(),
            &[&product],
            &bounds(),
        )
        .unwrap();

        let hit = found
            .iter()
            .find(|d| d.pair_name == "rogers-ramanujan")
            .expect("the Rogers-Ramanujan chain output must be recognized");
        assert_eq!(hit.chain_index, 0);
        assert_eq!(hit.coefficients, vec![Rational::one()]);
        assert!(matches!(hit.evidence, Evidence::Numeric { .. }));
    }

    #[test]
    fn test_unmatched_dictionary_is_exhausted() {
        // theta-like reference unrelated to any seed chain output.
        let mut session = Session::new();
        let db = BaileyDatabase::new();
        let unrelated = etaq(&mut session, 1, 1, TRUNC).unwrap();
        let found = bailey_discover(
            &mut session,
            &db,
            &one(),
            &one(),
            &one(),
            &[&unrelated],
            &bounds(),
        )
        .unwrap();
        assert!(found
            .iter()
            .all(|d| d.pair_name != "rogers-ramanujan"));
    }
}
