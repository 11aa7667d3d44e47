//! A catalog of classical summation theorems.
//!
//! [`try_summation`] matches an `r_phi_s` against the closed-form summable
//! shapes (q-Gauss, both q-Vandermonde forms, q-Saalschutz, Bailey-Daum) and
//! returns the product side as a truncated series when one applies. Matching
//! is purely structural on the q-monomial parameters; a series that fits no
//! catalog entry comes back `NotApplicable`, which says nothing about whether
//! some other closed form exists.
//!
//! Terminating entries assemble their finite Pochhammer quotients exactly,
//! including the Laurent prefactors that q^{-n} parameters drag in, so the
//! result is the true value of the sum rather than its truncated-model
//! rendition.

use num_traits::{One, Zero};
use quill_expr::Session;
use quill_num::Rational;
use quill_series::qmonomial::QMonomial;
use quill_series::{arithmetic, Result, Series};

use crate::series::{q_neg_power, HypergeometricSeries};

/// Outcome of a catalog lookup.
#[derive(Clone, Debug)]
pub enum SummationResult {
    /// The sum equals this closed-form product, exactly.
    ClosedForm(Series),
    /// No catalog entry matches the series shape.
    NotApplicable,
}

/// (a; q)_n for n >= 0 as a Laurent prefactor times a series with constant
/// term, splitting each negative-exponent factor as
/// (1 - c q^{-m}) = -c q^{-m} (1 - q^m / c) so the series part stays
/// invertible.
fn finite_poch_parts(
    variable: quill_expr::SymbolId,
    a: &QMonomial,
    n: i64,
    truncation: i64,
) -> (QMonomial, Series) {
    let mut pref = QMonomial::constant(Rational::one());
    let mut unit = Series::one(variable, truncation);
    if a.coeff.is_zero() {
        return (pref, unit);
    }
    for k in 0..n {
        let exp = a.power + k;
        let mut factor = Series::one(variable, truncation);
        if exp >= 0 {
            factor.add_coeff(exp, &-a.coeff.clone());
        } else {
            pref = pref.mul(&QMonomial::new(-a.coeff.clone(), exp));
            factor.add_coeff(-exp, &-a.coeff.recip());
        }
        unit = arithmetic::mul(&unit, &factor);
    }
    (pref, unit)
}

/// A quotient of finite Pochhammer symbols times a monomial prefactor.
///
/// # Errors
///
/// `DivisionByZero` when a denominator symbol has a vanishing factor.
fn pochhammer_quotient(
    session: &mut Session,
    numer: &[(QMonomial, i64)],
    denom: &[(QMonomial, i64)],
    prefactor: &QMonomial,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let mut pref = prefactor.clone();
    let mut num = Series::one(variable, truncation);
    let mut den = Series::one(variable, truncation);
    for (a, n) in numer {
        let (p, u) = finite_poch_parts(variable, a, *n, truncation);
        pref = pref.mul(&p);
        num = arithmetic::mul(&num, &u);
    }
    for (a, n) in denom {
        let (p, u) = finite_poch_parts(variable, a, *n, truncation);
        pref = pref.mul(&p.recip());
        den = arithmetic::mul(&den, &u);
    }
    let ratio = arithmetic::mul(&num, &arithmetic::invert(&den)?);
    Ok(arithmetic::mul(
        &ratio,
        &Series::monomial(variable, pref.coeff, pref.power, truncation),
    ))
}

/// prod_{k>=0} (1 - coeff * q^{start + k*step}), truncated. Callers ensure
/// start >= 1 so every factor has a positive exponent.
pub(crate) fn infinite_product(
    variable: quill_expr::SymbolId,
    coeff: &Rational,
    start: i64,
    step: i64,
    truncation: i64,
) -> Series {
    let mut result = Series::one(variable, truncation);
    let mut exp = start;
    while exp < truncation {
        let mut factor = Series::one(variable, truncation);
        factor.add_coeff(exp, &-coeff.clone());
        result = arithmetic::mul(&result, &factor);
        exp += step;
    }
    result
}

/// Looks the series up in the summation catalog.
///
/// Covered shapes:
///
/// - q-Vandermonde, both forms:
///   2_phi_1(q^{-n}, b; c; q, q) = (c/b;q)_n b^n / (c;q)_n and
///   2_phi_1(q^{-n}, b; c; q, cq^n/b) = (c/b;q)_n / (c;q)_n.
/// - q-Gauss: 2_phi_1(a, b; c; q, c/(ab))
///   = (c/a;q)_inf (c/b;q)_inf / [(c;q)_inf (c/(ab);q)_inf].
/// - Bailey-Daum (q-Kummer): 2_phi_1(a, b; aq/b; q, -q/b)
///   = (-q;q)_inf (aq;q^2)_inf (aq^2/b^2;q^2)_inf
///     / [(aq/b;q)_inf (-q/b;q)_inf].
/// - q-Saalschutz: 3_phi_2(a, b, q^{-n}; c, abq^{1-n}/c; q, q)
///   = (c/a;q)_n (c/b;q)_n / [(c;q)_n (c/(ab);q)_n].
///
/// The nonterminating entries only fire when every product argument has a
/// positive q-power, so the truncated products are exact.
///
/// # Errors
///
/// `DivisionByZero` when a matched closed form has a vanishing denominator
/// factor (a degenerate parameter choice).
pub fn try_summation(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<SummationResult> {
    match (series.r(), series.s()) {
        (2, 1) => try_2phi1(session, series, truncation),
        (3, 2) => try_saalschutz(session, series, truncation),
        _ => Ok(SummationResult::NotApplicable),
    }
}

fn try_2phi1(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<SummationResult> {
    let c = &series.lower[0];
    let z = &series.argument;

    // Terminating forms first: a q^{-n} upper parameter plus the right
    // argument pins down a Vandermonde evaluation.
    for idx in 0..2 {
        let Some(n) = q_neg_power(&series.upper[idx]) else {
            continue;
        };
        let b = &series.upper[1 - idx];
        if b.coeff.is_zero() {
            continue;
        }
        let cb = c.mul(&b.recip());

        if z == &QMonomial::q() {
            let value = pochhammer_quotient(
                session,
                &[(cb, n)],
                &[(c.clone(), n)],
                &b.pow(n),
                truncation,
            )?;
            return Ok(SummationResult::ClosedForm(value));
        }
        if z == &c.mul(&QMonomial::q_power(n)).mul(&b.recip()) {
            let value = pochhammer_quotient(
                session,
                &[(cb, n)],
                &[(c.clone(), n)],
                &QMonomial::constant(Rational::one()),
                truncation,
            )?;
            return Ok(SummationResult::ClosedForm(value));
        }
    }

    let a = &series.upper[0];
    let b = &series.upper[1];
    if a.coeff.is_zero() || b.coeff.is_zero() {
        return Ok(SummationResult::NotApplicable);
    }
    let variable = session.q_symbol();

    // q-Gauss.
    let ca = c.mul(&a.recip());
    let cb = c.mul(&b.recip());
    let cab = ca.mul(&b.recip());
    if z == &cab && ca.power >= 1 && cb.power >= 1 && c.power >= 1 && cab.power >= 1 {
        let num = arithmetic::mul(
            &infinite_product(variable, &ca.coeff, ca.power, 1, truncation),
            &infinite_product(variable, &cb.coeff, cb.power, 1, truncation),
        );
        let den = arithmetic::mul(
            &infinite_product(variable, &c.coeff, c.power, 1, truncation),
            &infinite_product(variable, &cab.coeff, cab.power, 1, truncation),
        );
        let value = arithmetic::mul(&num, &arithmetic::invert(&den)?);
        return Ok(SummationResult::ClosedForm(value));
    }

    // Bailey-Daum, for a = q^alpha and a constant b.
    if a.coeff.is_one()
        && a.power >= 1
        && b.power == 0
        && !b.coeff.is_one()
        && *c == QMonomial::new(b.coeff.recip(), a.power + 1)
        && *z == QMonomial::new(-b.coeff.recip(), 1)
    {
        let alpha = a.power;
        let b_inv = b.coeff.recip();
        let num = arithmetic::mul(
            &arithmetic::mul(
                &infinite_product(variable, &-Rational::one(), 1, 1, truncation),
                &infinite_product(variable, &Rational::one(), alpha + 1, 2, truncation),
            ),
            &infinite_product(variable, &(&b_inv * &b_inv), alpha + 2, 2, truncation),
        );
        let den = arithmetic::mul(
            &infinite_product(variable, &b_inv, alpha + 1, 1, truncation),
            &infinite_product(variable, &-b_inv.clone(), 1, 1, truncation),
        );
        let value = arithmetic::mul(&num, &arithmetic::invert(&den)?);
        return Ok(SummationResult::ClosedForm(value));
    }

    Ok(SummationResult::NotApplicable)
}

fn try_saalschutz(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<SummationResult> {
    if series.argument != QMonomial::q() {
        return Ok(SummationResult::NotApplicable);
    }

    for t_idx in 0..3 {
        let Some(n) = q_neg_power(&series.upper[t_idx]) else {
            continue;
        };
        let others: Vec<&QMonomial> = series
            .upper
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t_idx)
            .map(|(_, p)| p)
            .collect();
        let (a, b) = (others[0], others[1]);
        if a.coeff.is_zero() || b.coeff.is_zero() {
            continue;
        }

        for c_idx in 0..2 {
            let c = &series.lower[c_idx];
            let other = &series.lower[1 - c_idx];
            if c.coeff.is_zero() {
                continue;
            }
            // Balance: the second lower parameter must be a b q^{1-n} / c.
            let expected = a
                .mul(b)
                .mul(&QMonomial::q_power(1 - n))
                .mul(&c.recip());
            if other != &expected {
                continue;
            }

            let ca = c.mul(&a.recip());
            let cb = c.mul(&b.recip());
            let cab = ca.mul(&b.recip());
            let value = pochhammer_quotient(
                session,
                &[(ca, n), (cb, n)],
                &[(c.clone(), n), (cab, n)],
                &QMonomial::constant(Rational::one()),
                truncation,
            )?;
            return Ok(SummationResult::ClosedForm(value));
        }
    }

    Ok(SummationResult::NotApplicable)
}
