//! Bailey pairs and their defining relation.
//!
//! A Bailey pair relative to a is a pair of sequences (alpha_n, beta_n) with
//!
//! ```text
//! beta_n = sum_{j=0}^{n} alpha_j / [(q;q)_{n-j} (aq;q)_{n+j}]
//! ```
//!
//! The canonical pairs here are evaluated lazily from their closed forms; a
//! [`BaileyPairKind::Tabulated`] pair stores explicit term tables, which is
//! what lemma application produces.

use num_traits::One;
use quill_expr::Session;
use quill_num::Rational;
use quill_series::qmonomial::{PochhammerOrder, QMonomial};
use quill_series::{arithmetic, gen::aqprod, Result, Series};

/// Closed-form classification of a Bailey pair.
#[derive(Clone, Debug)]
pub enum BaileyPairKind {
    /// alpha_0 = 1, alpha_n = 0 for n > 0; beta_n = 1/[(q;q)_n (aq;q)_n].
    Unit,
    /// The Rogers-Ramanujan pair:
    /// alpha_n = (a;q)_n (1 - aq^{2n}) (-1)^n q^{n(3n-1)/2} a^n
    ///           / [(q;q)_n (1 - a)], beta_n = 1/(q;q)_n.
    RogersRamanujan,
    /// alpha_n = (-1)^n z^n q^{n(n-1)/2}; beta_n is derived from the
    /// defining relation.
    QBinomial {
        /// The free parameter z.
        z: Rational,
    },
    /// Explicit term tables, as produced by lemma application. Terms are
    /// stored as series since lemma output mixes q-powers into the
    /// coefficients.
    Tabulated {
        /// alpha_0, alpha_1, ...
        alphas: Vec<Series>,
        /// beta_0, beta_1, ...
        betas: Vec<Series>,
    },
}

/// A named Bailey pair.
#[derive(Clone, Debug)]
pub struct BaileyPair {
    /// Identifier, unique within a database.
    pub name: String,
    /// How the terms are evaluated.
    pub kind: BaileyPairKind,
    /// Search tags, e.g. "canonical" or "derived".
    pub tags: Vec<String>,
}

/// (1 - a) as a series, for a monomial a with nonnegative power.
fn one_minus(variable: quill_expr::SymbolId, a: &QMonomial, truncation: i64) -> Series {
    let mut f = Series::one(variable, truncation);
    if a.power == 0 {
        f.set_coeff(0, Rational::one() - &a.coeff);
    } else if a.power < truncation {
        f.set_coeff(a.power, -a.coeff.clone());
    }
    f
}

impl BaileyPair {
    /// The n-th alpha term, relative to a.
    ///
    /// The parameter a is supplied at evaluation time since the classical
    /// pairs hold for general a. Tabulated pairs return zero past the end of
    /// their table.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` when a closed form requires inverting a product that
    /// vanishes at the given a.
    pub fn alpha_term(
        &self,
        session: &mut Session,
        n: i64,
        a: &QMonomial,
        truncation: i64,
    ) -> Result<Series> {
        let variable = session.q_symbol();
        match &self.kind {
            BaileyPairKind::Unit => Ok(if n == 0 {
                Series::one(variable, truncation)
            } else {
                Series::zero(variable, truncation)
            }),
            BaileyPairKind::RogersRamanujan => rr_alpha_term(session, n, a, truncation),
            BaileyPairKind::QBinomial { z } => {
                Ok(qbinom_alpha_term(variable, n, z, truncation))
            }
            BaileyPairKind::Tabulated { alphas, .. } => {
                Ok(alphas.get(usize::try_from(n).unwrap_or(usize::MAX)).map_or_else(
                    || Series::zero(variable, truncation),
                    Clone::clone,
                ))
            }
        }
    }

    /// The n-th beta term, relative to a.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` when a closed form requires inverting a product that
    /// vanishes at the given a.
    pub fn beta_term(
        &self,
        session: &mut Session,
        n: i64,
        a: &QMonomial,
        truncation: i64,
    ) -> Result<Series> {
        let variable = session.q_symbol();
        match &self.kind {
            BaileyPairKind::Unit => unit_beta_term(session, n, a, truncation),
            BaileyPairKind::RogersRamanujan => {
                let q_q_n =
                    aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n), truncation)?;
                arithmetic::invert(&q_q_n)
            }
            BaileyPairKind::QBinomial { z } => qbinom_beta_term(session, n, a, z, truncation),
            BaileyPairKind::Tabulated { betas, .. } => {
                Ok(betas.get(usize::try_from(n).unwrap_or(usize::MAX)).map_or_else(
                    || Series::zero(variable, truncation),
                    Clone::clone,
                ))
            }
        }
    }
}

fn unit_beta_term(
    session: &mut Session,
    n: i64,
    a: &QMonomial,
    truncation: i64,
) -> Result<Series> {
    let q_q_n = aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n), truncation)?;
    let aq = a.mul(&QMonomial::q());
    let aq_q_n = aqprod(session, &aq, PochhammerOrder::Finite(n), truncation)?;
    arithmetic::invert(&arithmetic::mul(&q_q_n, &aq_q_n))
}

/// alpha_n of the Rogers-Ramanujan pair. For a = 1 the (1 - a) denominator
/// is a removable singularity; the limit form is
/// alpha_n = (1 + q^n) (-1)^n q^{n(3n-1)/2}.
fn rr_alpha_term(
    session: &mut Session,
    n: i64,
    a: &QMonomial,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    if n == 0 {
        return Ok(Series::one(variable, truncation));
    }

    let sign = if n % 2 == 0 {
        Rational::one()
    } else {
        -Rational::one()
    };

    if a.is_one() {
        let q_exp = n * (3 * n - 1) / 2;
        let term1 = Series::monomial(variable, sign.clone(), q_exp, truncation);
        let term2 = Series::monomial(variable, sign, q_exp + n, truncation);
        return Ok(arithmetic::add(&term1, &term2));
    }

    let a_poch_n = aqprod(session, a, PochhammerOrder::Finite(n), truncation)?;
    let one_minus_aq2n = one_minus(variable, &a.mul(&QMonomial::q_power(2 * n)), truncation);

    // (-1)^n q^{n(3n-1)/2} a^n folded into one monomial.
    let a_n = a.pow(n);
    let q_factor = Series::monomial(
        variable,
        sign * a_n.coeff,
        n * (3 * n - 1) / 2 + a_n.power,
        truncation,
    );

    let q_q_n = aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n), truncation)?;
    let one_minus_a = one_minus(variable, a, truncation);

    let numer = arithmetic::mul(&arithmetic::mul(&a_poch_n, &one_minus_aq2n), &q_factor);
    let denom = arithmetic::mul(&q_q_n, &one_minus_a);
    Ok(arithmetic::mul(&numer, &arithmetic::invert(&denom)?))
}

fn qbinom_alpha_term(
    variable: quill_expr::SymbolId,
    n: i64,
    z: &Rational,
    truncation: i64,
) -> Series {
    let sign = if n % 2 == 0 {
        Rational::one()
    } else {
        -Rational::one()
    };
    Series::monomial(
        variable,
        sign * z.pow_i64(n),
        n * (n - 1) / 2,
        truncation,
    )
}

/// beta_n of the q-binomial pair, computed from the defining relation.
fn qbinom_beta_term(
    session: &mut Session,
    n: i64,
    a: &QMonomial,
    z: &Rational,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let aq = a.mul(&QMonomial::q());
    let mut result = Series::zero(variable, truncation);
    for j in 0..=n {
        let alpha_j = qbinom_alpha_term(variable, j, z, truncation);
        let q_q_nj =
            aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n - j), truncation)?;
        let aq_q_npj = aqprod(session, &aq, PochhammerOrder::Finite(n + j), truncation)?;
        let denom = arithmetic::mul(&q_q_nj, &aq_q_npj);
        let term = arithmetic::mul(&alpha_j, &arithmetic::invert(&denom)?);
        result = arithmetic::add(&result, &term);
    }
    Ok(result)
}

/// Checks the defining relation for n = 0, ..., max_n, as truncated series.
///
/// # Errors
///
/// Propagates term evaluation failures.
pub fn verify_bailey_pair(
    session: &mut Session,
    pair: &BaileyPair,
    a: &QMonomial,
    max_n: i64,
    truncation: i64,
) -> Result<bool> {
    let variable = session.q_symbol();
    let aq = a.mul(&QMonomial::q());

    for n in 0..=max_n {
        let beta_n = pair.beta_term(session, n, a, truncation)?;

        let mut relation_sum = Series::zero(variable, truncation);
        for j in 0..=n {
            let alpha_j = pair.alpha_term(session, j, a, truncation)?;
            let q_q_nj =
                aqprod(session, &QMonomial::q(), PochhammerOrder::Finite(n - j), truncation)?;
            let aq_q_npj = aqprod(session, &aq, PochhammerOrder::Finite(n + j), truncation)?;
            let denom = arithmetic::mul(&q_q_nj, &aq_q_npj);
            let term = arithmetic::mul(&alpha_j, &arithmetic::invert(&denom)?);
            relation_sum = arithmetic::add(&relation_sum, &term);
        }

        if !arithmetic::sub(&beta_n, &relation_sum).is_zero() {
            return Ok(false);
        }
    }
    Ok(true)
}
