//! Basic hypergeometric series `r_phi_s` and bilateral `r_psi_s`.

use num_traits::{One, Zero};
use quill_expr::Session;
use quill_num::Rational;
use quill_series::qmonomial::{PochhammerOrder, QMonomial};
use quill_series::{arithmetic, gen::aqprod, Result, Series};

/// Parameters of a basic hypergeometric series `r_phi_s(a; b; q, z)`.
///
/// The series is
///
/// ```text
/// sum_{n>=0} [(a_1;q)_n ... (a_r;q)_n] / [(q;q)_n (b_1;q)_n ... (b_s;q)_n]
///     * [(-1)^n q^{n(n-1)/2}]^{1+s-r} * z^n
/// ```
///
/// with every parameter and the argument a rational q-power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HypergeometricSeries {
    /// Upper parameters `a_1, ..., a_r`.
    pub upper: Vec<QMonomial>,
    /// Lower parameters `b_1, ..., b_s`.
    pub lower: Vec<QMonomial>,
    /// The argument z.
    pub argument: QMonomial,
}

impl HypergeometricSeries {
    /// Creates an `r_phi_s` from its parameter lists and argument.
    #[must_use]
    pub fn new(upper: Vec<QMonomial>, lower: Vec<QMonomial>, argument: QMonomial) -> Self {
        Self {
            upper,
            lower,
            argument,
        }
    }

    /// The number of upper parameters.
    #[must_use]
    pub fn r(&self) -> usize {
        self.upper.len()
    }

    /// The number of lower parameters.
    #[must_use]
    pub fn s(&self) -> usize {
        self.lower.len()
    }

    /// The smallest n with some upper parameter equal to `q^{-n}`, if any.
    ///
    /// Such a parameter kills every term past index n, so the series is a
    /// finite sum.
    #[must_use]
    pub fn termination_order(&self) -> Option<i64> {
        self.upper.iter().filter_map(q_neg_power).min()
    }
}

/// Parameters of a bilateral series `r_psi_s(a; b; q, z)`.
///
/// The sum runs over all integers n, there is no `(q;q)_n` factor, and the
/// sign/q-power factor carries exponent `s - r` rather than `1 + s - r`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BilateralSeries {
    /// Upper parameters `a_1, ..., a_r`.
    pub upper: Vec<QMonomial>,
    /// Lower parameters `b_1, ..., b_s`.
    pub lower: Vec<QMonomial>,
    /// The argument z.
    pub argument: QMonomial,
}

impl BilateralSeries {
    /// Creates an `r_psi_s` from its parameter lists and argument.
    #[must_use]
    pub fn new(upper: Vec<QMonomial>, lower: Vec<QMonomial>, argument: QMonomial) -> Self {
        Self {
            upper,
            lower,
            argument,
        }
    }

    /// The number of upper parameters.
    #[must_use]
    pub fn r(&self) -> usize {
        self.upper.len()
    }

    /// The number of lower parameters.
    #[must_use]
    pub fn s(&self) -> usize {
        self.lower.len()
    }
}

/// `Some(n)` when the monomial is exactly `q^{-n}` with n >= 0.
pub(crate) fn q_neg_power(a: &QMonomial) -> Option<i64> {
    (a.coeff.is_one() && a.power <= 0).then(|| -a.power)
}

/// The two-term series `1 - c*q^m`.
///
/// m == 0 collapses to the constant `1 - c`; an exponent at or beyond the
/// truncation, or below zero, leaves just 1.
pub(crate) fn one_minus_cq_m(
    coeff: &Rational,
    m: i64,
    variable: quill_expr::SymbolId,
    truncation: i64,
) -> Series {
    let mut f = Series::one(variable, truncation);
    if m == 0 {
        f.set_coeff(0, Rational::one() - coeff);
    } else if m > 0 && m < truncation {
        f.set_coeff(m, -coeff);
    }
    f
}

/// Evaluates `r_phi_s` as a truncated series in q.
///
/// Terms are accumulated via the step ratio from term n to n+1:
///
/// ```text
/// ratio = prod_i (1 - a_i q^{a_i.power+n})
///       / [(1 - q^{n+1}) prod_j (1 - b_j q^{b_j.power+n})]
///       * (-1)^extra q^{n*extra} * z        with extra = 1 + s - r.
/// ```
///
/// # Errors
///
/// `DivisionByZero` when a lower parameter makes a step denominator vanish
/// at order zero.
pub fn eval_phi(
    session: &mut Session,
    series: &HypergeometricSeries,
    truncation: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let extra = 1 + series.s() as i64 - series.r() as i64;

    let max_n = series
        .termination_order()
        .map_or(truncation, |n| n.min(truncation));

    let mut result = Series::zero(variable, truncation);
    let mut term = Series::one(variable, truncation);

    for n in 0..=max_n {
        result = arithmetic::add(&result, &term);
        if n == max_n {
            break;
        }

        let mut numer = Series::one(variable, truncation);
        for a in &series.upper {
            let factor = one_minus_cq_m(&a.coeff, a.power + n, variable, truncation);
            numer = arithmetic::mul(&numer, &factor);
        }

        let mut denom = one_minus_cq_m(&Rational::one(), n + 1, variable, truncation);
        for b in &series.lower {
            let factor = one_minus_cq_m(&b.coeff, b.power + n, variable, truncation);
            denom = arithmetic::mul(&denom, &factor);
        }

        let mut ratio = arithmetic::mul(&numer, &arithmetic::invert(&denom)?);

        if extra != 0 {
            let sign = if extra % 2 == 0 {
                Rational::one()
            } else {
                -Rational::one()
            };
            let q_shift = n * extra;
            if q_shift >= truncation {
                break;
            }
            ratio = arithmetic::mul(&ratio, &Series::monomial(variable, sign, q_shift, truncation));
        }

        let z = Series::monomial(
            variable,
            series.argument.coeff.clone(),
            series.argument.power,
            truncation,
        );
        ratio = arithmetic::mul(&ratio, &z);

        term = arithmetic::mul(&term, &ratio);
        if term.is_zero() {
            break;
        }
    }
    Ok(result)
}

/// True when `(a;q)_{-m}` hits a vanishing factor: `a = q^p` with 0 < p <= m.
fn negative_pochhammer_pole(a: &QMonomial, m: i64) -> bool {
    a.coeff.is_one() && a.power > 0 && a.power <= m
}

/// Evaluates `r_psi_s` as a truncated series in q.
///
/// The positive half (n >= 0) runs like [`eval_phi`] minus the `(q;q)_n`
/// factor; the negative half computes each term directly through negative-
/// order Pochhammer symbols, skipping indices where any parameter produces a
/// pole (a 0/0 the truncated model cannot resolve).
///
/// # Errors
///
/// `DivisionByZero` when a lower-parameter product cannot be inverted.
pub fn eval_psi(
    session: &mut Session,
    series: &BilateralSeries,
    truncation: i64,
) -> Result<Series> {
    let extra = series.s() as i64 - series.r() as i64;
    let positive = eval_psi_positive(session, series, truncation, extra)?;
    let negative = eval_psi_negative(session, series, truncation, extra)?;
    Ok(arithmetic::add(&positive, &negative))
}

fn eval_psi_positive(
    session: &mut Session,
    series: &BilateralSeries,
    truncation: i64,
    extra: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let mut result = Series::zero(variable, truncation);
    let mut term = Series::one(variable, truncation);

    for n in 0..=truncation {
        result = arithmetic::add(&result, &term);
        if n == truncation {
            break;
        }

        let mut numer = Series::one(variable, truncation);
        for a in &series.upper {
            let factor = one_minus_cq_m(&a.coeff, a.power + n, variable, truncation);
            numer = arithmetic::mul(&numer, &factor);
        }
        let mut denom = Series::one(variable, truncation);
        for b in &series.lower {
            let factor = one_minus_cq_m(&b.coeff, b.power + n, variable, truncation);
            denom = arithmetic::mul(&denom, &factor);
        }

        let mut ratio = arithmetic::mul(&numer, &arithmetic::invert(&denom)?);
        if extra != 0 {
            let sign = if extra % 2 == 0 {
                Rational::one()
            } else {
                -Rational::one()
            };
            ratio = arithmetic::mul(
                &ratio,
                &Series::monomial(variable, sign, n * extra, truncation),
            );
        }
        let z = Series::monomial(
            variable,
            series.argument.coeff.clone(),
            series.argument.power,
            truncation,
        );
        ratio = arithmetic::mul(&ratio, &z);

        term = arithmetic::mul(&term, &ratio);
        if term.is_zero() {
            break;
        }
    }
    Ok(result)
}

fn eval_psi_negative(
    session: &mut Session,
    series: &BilateralSeries,
    truncation: i64,
    extra: i64,
) -> Result<Series> {
    let variable = session.q_symbol();
    let mut result = Series::zero(variable, truncation);

    for m in 1..=truncation {
        let pole = series
            .upper
            .iter()
            .chain(&series.lower)
            .any(|p| negative_pochhammer_pole(p, m));
        if pole {
            // A vanishing upper factor zeroes the term; a vanishing lower
            // factor makes it infinite. Either way it contributes nothing
            // the truncated model can represent.
            continue;
        }

        let mut term = Series::one(variable, truncation);
        for a in &series.upper {
            let poch = aqprod(session, a, PochhammerOrder::Finite(-m), truncation)?;
            term = arithmetic::mul(&term, &poch);
        }
        for b in &series.lower {
            let poch = aqprod(session, b, PochhammerOrder::Finite(-m), truncation)?;
            term = arithmetic::mul(&term, &arithmetic::invert(&poch)?);
        }

        // [(-1)^{-m} q^{(-m)(-m-1)/2}]^extra = [(-1)^m q^{m(m+1)/2}]^extra.
        if extra != 0 {
            let sign = if extra % 2 == 0 || m % 2 == 0 {
                Rational::one()
            } else {
                -Rational::one()
            };
            let q_pow = m * (m + 1) / 2 * extra;
            term = arithmetic::mul(&term, &Series::monomial(variable, sign, q_pow, truncation));
        }

        if series.argument.coeff.is_zero() {
            break;
        }
        let z_inv = series.argument.recip();
        let z_neg_m = z_inv.pow(m);
        term = arithmetic::mul(
            &term,
            &Series::monomial(variable, z_neg_m.coeff, z_neg_m.power, truncation),
        );

        if !term.is_zero() {
            result = arithmetic::add(&result, &term);
        }
    }
    Ok(result)
}
