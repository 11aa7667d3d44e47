//! The Bailey lemma, chain iteration, and the weak Bailey lemma.

use quill_expr::Session;
use quill_series::qmonomial::{PochhammerOrder, QMonomial};
use quill_series::{arithmetic, gen::aqprod, Result, Series};

use crate::pair::{BaileyPair, BaileyPairKind};

/// Applies the Bailey lemma with parameters b, c, producing a tabulated pair
/// for n = 0, ..., max_n:
///
/// ```text
/// alpha'_n = (b;q)_n (c;q)_n (aq/(bc))^n / [(aq/b;q)_n (aq/c;q)_n] alpha_n
/// beta'_n  = 1/[(aq/b;q)_n (aq/c;q)_n] * sum_{k=0}^{n}
///            (b;q)_k (c;q)_k (aq/(bc);q)_{n-k} (aq/(bc))^k / (q;q)_{n-k} beta_k
/// ```
///
/// # Errors
///
/// `DivisionByZero` when a Pochhammer denominator vanishes for the given
/// parameters.
pub fn bailey_lemma(
    session: &mut Session,
    pair: &BaileyPair,
    a: &QMonomial,
    b: &QMonomial,
    c: &QMonomial,
    max_n: i64,
    truncation: i64,
) -> Result<BaileyPair> {
    let variable = session.q_symbol();
    let aq = a.mul(&QMonomial::q());
    let aq_over_bc = aq.mul(&b.mul(c).recip());
    let aq_over_b = aq.mul(&b.recip());
    let aq_over_c = aq.mul(&c.recip());

    let mut alphas = Vec::with_capacity(usize::try_from(max_n + 1).unwrap_or(0));
    let mut betas = Vec::with_capacity(alphas.capacity());

    for n in 0..=max_n {
        let b_poch_n = aqprod(session, b, PochhammerOrder::Finite(n), truncation)?;
        let c_poch_n = aqprod(session, c, PochhammerOrder::Finite(n), truncation)?;
        let aq_b_poch_n = aqprod(session, &aq_over_b, PochhammerOrder::Finite(n), truncation)?;
        let aq_c_poch_n = aqprod(session, &aq_over_c, PochhammerOrder::Finite(n), truncation)?;

        let ratio_pow_n = aq_over_bc.pow(n);
        let ratio_pow_n =
            Series::monomial(variable, ratio_pow_n.coeff, ratio_pow_n.power, truncation);

        let old_alpha_n = pair.alpha_term(session, n, a, truncation)?;
        let numer = arithmetic::mul(
            &arithmetic::mul(&b_poch_n, &c_poch_n),
            &arithmetic::mul(&ratio_pow_n, &old_alpha_n),
        );
        let denom = arithmetic::mul(&aq_b_poch_n, &aq_c_poch_n);
        alphas.push(arithmetic::mul(&numer, &arithmetic::invert(&denom)?));

        let outer_inv = arithmetic::invert(&denom)?;
        let mut inner_sum = Series::zero(variable, truncation);
        for k in 0..=n {
            let b_poch_k = aqprod(session, b, PochhammerOrder::Finite(k), truncation)?;
            let c_poch_k = aqprod(session, c, PochhammerOrder::Finite(k), truncation)?;
            let ratio_poch_nk =
                aqprod(session, &aq_over_bc, PochhammerOrder::Finite(n - k), truncation)?;
            let q_q_nk =
                aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n - k), truncation)?;

            let ratio_pow_k = aq_over_bc.pow(k);
            let ratio_pow_k =
                Series::monomial(variable, ratio_pow_k.coeff, ratio_pow_k.power, truncation);

            let old_beta_k = pair.beta_term(session, k, a, truncation)?;
            let term_numer = arithmetic::mul(
                &arithmetic::mul(&b_poch_k, &c_poch_k),
                &arithmetic::mul(&arithmetic::mul(&ratio_poch_nk, &ratio_pow_k), &old_beta_k),
            );
            let term = arithmetic::mul(&term_numer, &arithmetic::invert(&q_q_nk)?);
            inner_sum = arithmetic::add(&inner_sum, &term);
        }
        betas.push(arithmetic::mul(&outer_inv, &inner_sum));
    }

    log::debug!("bailey lemma applied to '{}' up to n={max_n}", pair.name);
    Ok(BaileyPair {
        name: format!("lemma({}, b={b}, c={c})", pair.name),
        kind: BaileyPairKind::Tabulated { alphas, betas },
        tags: vec!["derived".into()],
    })
}

/// Iterates [`bailey_lemma`] `depth` times with fixed parameters.
///
/// The returned chain has `depth + 1` entries, starting with the original
/// pair.
///
/// # Errors
///
/// Propagates the first lemma failure.
pub fn bailey_chain(
    session: &mut Session,
    pair: &BaileyPair,
    a: &QMonomial,
    b: &QMonomial,
    c: &QMonomial,
    depth: usize,
    max_n: i64,
    truncation: i64,
) -> Result<Vec<BaileyPair>> {
    let mut chain = Vec::with_capacity(depth + 1);
    chain.push(pair.clone());
    for _ in 0..depth {
        let next = bailey_lemma(session, chain.last().unwrap_or(pair), a, b, c, max_n, truncation)?;
        chain.push(next);
    }
    Ok(chain)
}

/// Both sides of the weak Bailey lemma,
///
/// ```text
/// sum_{n>=0} q^{n^2} a^n beta_n
///   = 1/(aq;q)_inf * sum_{n>=0} q^{n^2} a^n alpha_n
/// ```
///
/// summed over n = 0, ..., max_n or until the q^{n^2} weight leaves the
/// truncation window. The caller compares the two.
///
/// # Errors
///
/// Propagates term evaluation failures.
pub fn weak_bailey_lemma(
    session: &mut Session,
    pair: &BaileyPair,
    a: &QMonomial,
    max_n: i64,
    truncation: i64,
) -> Result<(Series, Series)> {
    let variable = session.q_symbol();

    let mut lhs = Series::zero(variable, truncation);
    let mut alpha_sum = Series::zero(variable, truncation);
    for n in 0..=max_n {
        let a_n = a.pow(n);
        let q_exp = n * n + a_n.power;
        if q_exp >= truncation {
            break;
        }
        let weight = Series::monomial(variable, a_n.coeff, q_exp, truncation);

        let beta_n = pair.beta_term(session, n, a, truncation)?;
        lhs = arithmetic::add(&lhs, &arithmetic::mul(&weight, &beta_n));

        let alpha_n = pair.alpha_term(session, n, a, truncation)?;
        alpha_sum = arithmetic::add(&alpha_sum, &arithmetic::mul(&weight, &alpha_n));
    }

    let aq = a.mul(&QMonomial::q());
    let aq_inf = aqprod(session, &aq, PochhammerOrder::Infinite, truncation)?;
    let rhs = arithmetic::mul(&arithmetic::invert(&aq_inf)?, &alpha_sum);

    Ok((lhs, rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::verify_bailey_pair;
    use num_traits::One;
    use quill_num::Rational;

    const TRUNC: i64 = 20;

    fn unit_pair() -> BaileyPair {
        BaileyPair {
            name: "unit".into(),
            kind: BaileyPairKind::Unit,
            tags: vec!["canonical".into()],
        }
    }

    fn rr_pair() -> BaileyPair {
        BaileyPair {
            name: "rogers-ramanujan".into(),
            kind: BaileyPairKind::RogersRamanujan,
            tags: vec!["canonical".into()],
        }
    }

    fn one() -> QMonomial {
        QMonomial::constant(Rational::one())
    }

    #[test]
    fn test_lemma_output_is_a_bailey_pair() {
        // Constant b, c keep every Pochhammer argument at a nonnegative
        // q-power, so all products are exact.
        let mut session = Session::new();
        let b = QMonomial::constant(Rational::from(2));
        let c = QMonomial::constant(Rational::from(3));
        let derived =
            bailey_lemma(&mut session, &unit_pair(), &one(), &b, &c, 4, TRUNC).unwrap();
        assert!(matches!(derived.kind, BaileyPairKind::Tabulated { .. }));
        assert!(verify_bailey_pair(&mut session, &derived, &one(), 4, TRUNC).unwrap());
    }

    #[test]
    fn test_lemma_preserves_unit_alphas() {
        // The unit pair's alpha is fixed by the lemma: every transform factor
        // is 1 at n = 0 and alpha_n = 0 keeps the rest zero.
        let mut session = Session::new();
        let v = session.q_symbol();
        let b = QMonomial::constant(Rational::from(2));
        let c = QMonomial::constant(Rational::from(3));
        let derived =
            bailey_lemma(&mut session, &unit_pair(), &one(), &b, &c, 3, TRUNC).unwrap();
        let BaileyPairKind::Tabulated { alphas, .. } = &derived.kind else {
            panic!("lemma output must be tabulated");
        };
        assert_eq!(alphas[0], Series::one(v, TRUNC));
        assert!(alphas[1].is_zero());
        assert!(alphas[2].is_zero());
    }

    #[test]
    fn test_chain_length_and_validity() {
        let mut session = Session::new();
        let b = QMonomial::constant(Rational::from(2));
        let c = QMonomial::constant(Rational::from(3));
        let chain =
            bailey_chain(&mut session, &unit_pair(), &one(), &b, &c, 2, 3, TRUNC).unwrap();
        assert_eq!(chain.len(), 3);
        for pair in &chain {
            assert!(verify_bailey_pair(&mut session, pair, &one(), 3, TRUNC).unwrap());
        }
    }

    #[test]
    fn test_weak_lemma_unit_pair() {
        let mut session = Session::new();
        let (lhs, rhs) = weak_bailey_lemma(&mut session, &unit_pair(), &one(), 10, TRUNC).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_weak_lemma_rogers_ramanujan() {
        // With the Rogers-Ramanujan pair at a = 1 the left side is the
        // Rogers-Ramanujan function sum q^{n^2}/(q;q)_n.
        let mut session = Session::new();
        let (lhs, rhs) = weak_bailey_lemma(&mut session, &rr_pair(), &one(), 10, TRUNC).unwrap();
        assert_eq!(lhs, rhs);
        let (lhs_q, rhs_q) =
            weak_bailey_lemma(&mut session, &rr_pair(), &QMonomial::q(), 10, TRUNC).unwrap();
        assert_eq!(lhs_q, rhs_q);
    }
}
