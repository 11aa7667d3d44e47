//! Eta-quotient and (1+q^n)-product reinterpretations of prodmake output.

use std::collections::BTreeMap;

use num_traits::Zero;
use quill_expr::{functions, ExprHandle, Session};
use quill_num::arith::{divisors, moebius};
use quill_num::Rational;
use quill_series::{Result, Series};
use smallvec::{smallvec, SmallVec};

use crate::prodmake::prodmake;

/// An eta quotient `prod_d eta(d*tau)^{r_d}`.
///
/// `eta(d*tau) = q^{d/24} (q^d; q^d)_inf`, so the quotient carries the
/// fractional prefactor `q^{q_shift}` with `q_shift = sum r_d d / 24`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EtaQuotient {
    /// Maps d to `r_d`.
    pub factors: BTreeMap<i64, i64>,
    /// Prefactor exponent `sum r_d d / 24`.
    pub q_shift: Rational,
}

impl EtaQuotient {
    /// Renders `prod eta(d)^{r_d}` as an expression. The `q_shift` prefactor
    /// stays on the struct; it is not part of the rendered product.
    pub fn to_expr(&self, session: &mut Session) -> ExprHandle {
        if self.factors.is_empty() {
            return session.integer(1);
        }
        let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for (&d, &r) in &self.factors {
            let arg = session.integer(d);
            let eta = session.function(functions::ETA, smallvec![arg]);
            parts.push(session.int_pow(eta, r));
        }
        session.mul(parts)
    }
}

/// The same data in Pochhammer notation: `prod_d (q^d; q^d)_inf^{r_d}`,
/// without the `q^{d/24}` prefactors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QEtaForm {
    /// Maps d to `r_d`.
    pub factors: BTreeMap<i64, i64>,
}

impl QEtaForm {
    /// Renders `prod pochinf(q^d, q^d)^{r_d}` as an expression.
    pub fn to_expr(&self, session: &mut Session) -> ExprHandle {
        if self.factors.is_empty() {
            return session.integer(1);
        }
        let q = session.q();
        let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for (&d, &r) in &self.factors {
            let qd = session.int_pow(q, d);
            let poch = session.function(functions::POCHHAMMER_INF, smallvec![qd, qd]);
            parts.push(session.int_pow(poch, r));
        }
        session.mul(parts)
    }
}

/// Expresses `f` as an eta quotient.
///
/// Runs [`prodmake`], then inverts `sum_{d|n} r_d = -a_n` by a second Moebius
/// pass: `r_n = sum_{d|n} mu(n/d) (-a_d)`.
///
/// Returns `Ok(None)` when an exponent comes out noninteger; the window then
/// rules out an eta quotient.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn etamake(f: &Series, max_n: i64) -> Result<Option<EtaQuotient>> {
    let product = prodmake(f, max_n)?;

    // e_n = -a_n is the exponent of (1 - q^n) in the product.
    let mut e: BTreeMap<i64, Rational> = BTreeMap::new();
    for (&n, a) in &product.exponents {
        e.insert(n, -a);
    }

    let mut factors = BTreeMap::new();
    for n in 1..=product.terms_used {
        let mut sum = Rational::zero();
        for d in divisors(n) {
            if let Some(ed) = e.get(&d) {
                let mu = moebius(n / d);
                if mu != 0 {
                    sum = sum + &(Rational::from(mu) * ed);
                }
            }
        }
        if !sum.is_zero() {
            let Some(r) = sum.to_integer().and_then(|v| v.to_i64()) else {
                return Ok(None);
            };
            factors.insert(n, r);
        }
    }

    let mut q_shift = Rational::zero();
    for (&d, &r) in &factors {
        q_shift = q_shift + &Rational::from_i64(r * d, 24);
    }

    Ok(Some(EtaQuotient { factors, q_shift }))
}

/// Expresses `f` as `prod (q^d; q^d)_inf^{r_d}`.
///
/// Same recovery as [`etamake`], in Pochhammer notation.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn qetamake(f: &Series, max_n: i64) -> Result<Option<QEtaForm>> {
    Ok(etamake(f, max_n)?.map(|eta| QEtaForm {
        factors: eta.factors,
    }))
}

/// Expresses `f` as `prod (1 + q^n)^{m_n}`.
///
/// Uses `(1 + q^n) = (1 - q^{2n})/(1 - q^n)`: working upward from n = 1, the
/// residual prodmake exponent at n becomes `m_n` and cascades `+m_n` into the
/// exponent at 2n.
///
/// Returns `Ok(None)` when a prodmake exponent is noninteger.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn mprodmake(f: &Series, max_n: i64) -> Result<Option<BTreeMap<i64, i64>>> {
    let product = prodmake(f, max_n)?;
    let Some(mut a) = product.integer_exponents() else {
        return Ok(None);
    };

    let mut m = BTreeMap::new();
    for n in 1..=product.terms_used {
        let a_n = a.remove(&n).unwrap_or(0);
        if a_n == 0 {
            continue;
        }
        m.insert(n, a_n);
        let two_n = 2 * n;
        if two_n <= product.terms_used {
            let entry = a.entry(two_n).or_insert(0);
            *entry += a_n;
            if *entry == 0 {
                a.remove(&two_n);
            }
        }
    }
    Ok(Some(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::gen::{distinct_parts_gf, etaq, partition_gf};

    const TRUNC: i64 = 40;

    #[test]
    fn test_etamake_euler() {
        let mut session = Session::new();
        let euler = etaq(&mut session, 1, 1, TRUNC).unwrap();
        let eta = etamake(&euler, TRUNC).unwrap().unwrap();
        assert_eq!(eta.factors, BTreeMap::from([(1, 1)]));
        assert_eq!(eta.q_shift, Rational::from_i64(1, 24));
    }

    #[test]
    fn test_etamake_partition_gf() {
        let mut session = Session::new();
        let gf = partition_gf(&mut session, TRUNC);
        let eta = etamake(&gf, TRUNC).unwrap().unwrap();
        assert_eq!(eta.factors, BTreeMap::from([(1, -1)]));
        assert_eq!(eta.q_shift, Rational::from_i64(-1, 24));
    }

    #[test]
    fn test_etamake_eta_quotient() {
        // (q^2; q^2)_inf / (q; q)_inf: factors {1: -1, 2: 1}.
        let mut session = Session::new();
        let e2 = etaq(&mut session, 2, 2, TRUNC).unwrap();
        let e1 = etaq(&mut session, 1, 1, TRUNC).unwrap();
        let quotient = quill_series::arithmetic::div(&e2, &e1).unwrap();
        let eta = etamake(&quotient, TRUNC).unwrap().unwrap();
        assert_eq!(eta.factors, BTreeMap::from([(1, -1), (2, 1)]));
        assert_eq!(eta.q_shift, Rational::from_i64(1, 24));
    }

    #[test]
    fn test_qetamake_drops_shift() {
        let mut session = Session::new();
        let euler = etaq(&mut session, 1, 1, TRUNC).unwrap();
        let qeta = qetamake(&euler, TRUNC).unwrap().unwrap();
        assert_eq!(qeta.factors, BTreeMap::from([(1, 1)]));
        let expr = qeta.to_expr(&mut session);
        assert_eq!(session.render(expr), "pochinf(q, q)");
    }

    #[test]
    fn test_mprodmake_distinct_parts() {
        // prod (1+q^n): m_n = 1 for every n in range.
        let mut session = Session::new();
        let gf = distinct_parts_gf(&mut session, TRUNC);
        let m = mprodmake(&gf, TRUNC).unwrap().unwrap();
        for n in 1..=(TRUNC - 1) / 2 {
            assert_eq!(m.get(&n), Some(&1), "m_{n}");
        }
    }

    #[test]
    fn test_eta_to_expr() {
        let mut session = Session::new();
        let gf = partition_gf(&mut session, TRUNC);
        let eta = etamake(&gf, TRUNC).unwrap().unwrap();
        let expr = eta.to_expr(&mut session);
        assert_eq!(session.render(expr), "eta(1)^(-1)");
    }
}
