//! Symbolic eta quotients with Newman modularity checks.
//!
//! An eta quotient is `prod_{delta | N} eta(delta * tau)^{r_delta}` with
//! `eta(tau) = q^{1/24} (q;q)_inf`. The structure (the delta -> r_delta map
//! and the level) is kept symbolic; weight, q-shift, and Newman's conditions
//! read straight off it, and expansion to a truncated series goes through
//! `etaq`.

use std::collections::BTreeMap;

use num_traits::One;
use quill_analyze::eta::EtaQuotient;
use quill_expr::Session;
use quill_num::arith::gcd_i64;
use quill_num::Rational;
use quill_series::{arithmetic, gen::etaq, Error, Result, Series};

/// Outcome of checking Newman's conditions on Gamma_0(N).
#[derive(Clone, Debug)]
pub enum ModularityResult {
    /// Every condition holds; the quotient is a modular function.
    Modular,
    /// At least one condition failed.
    NotModular {
        /// Human-readable description of each failed condition.
        failed_conditions: Vec<String>,
    },
}

impl ModularityResult {
    /// True for [`ModularityResult::Modular`].
    #[must_use]
    pub fn is_modular(&self) -> bool {
        matches!(self, ModularityResult::Modular)
    }
}

/// A symbolic eta quotient `prod_{delta | N} eta(delta * tau)^{r_delta}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EtaExpression {
    /// Maps delta to r_delta; only nonzero exponents are stored.
    pub factors: BTreeMap<i64, i64>,
    /// The level N. Every delta divides N.
    pub level: i64,
}

impl EtaExpression {
    /// Builds an eta expression at the given level.
    ///
    /// # Panics
    ///
    /// Panics if some delta does not divide the level.
    #[must_use]
    pub fn new(factors: BTreeMap<i64, i64>, level: i64) -> Self {
        for &delta in factors.keys() {
            assert!(
                level % delta == 0,
                "delta {delta} does not divide level {level}"
            );
        }
        Self { factors, level }
    }

    /// Builds from (delta, r_delta) pairs, dropping zero exponents.
    ///
    /// # Panics
    ///
    /// Panics if some delta does not divide the level.
    #[must_use]
    pub fn from_factors(pairs: &[(i64, i64)], level: i64) -> Self {
        let mut factors = BTreeMap::new();
        for &(delta, r_delta) in pairs {
            if r_delta != 0 {
                factors.insert(delta, r_delta);
            }
        }
        Self::new(factors, level)
    }

    /// Lifts an analyzer [`EtaQuotient`], taking the level as the lcm of the
    /// deltas.
    #[must_use]
    pub fn from_etaquotient(quotient: &EtaQuotient) -> Self {
        if quotient.factors.is_empty() {
            return Self { factors: BTreeMap::new(), level: 1 };
        }
        let mut level = 1i64;
        for &delta in quotient.factors.keys() {
            level = level / gcd_i64(level, delta) * delta;
        }
        Self { factors: quotient.factors.clone(), level }
    }

    /// The weight, sum(r_delta) / 2.
    #[must_use]
    pub fn weight(&self) -> Rational {
        let sum: i64 = self.factors.values().sum();
        Rational::from_i64(sum, 2)
    }

    /// The q-shift, sum(delta * r_delta) / 24.
    #[must_use]
    pub fn q_shift(&self) -> Rational {
        let sum: i64 = self.factors.iter().map(|(&d, &r)| d * r).sum();
        Rational::from_i64(sum, 24)
    }

    /// Checks Newman's conditions for a modular function on Gamma_0(N):
    /// sum(delta * r_delta) and sum((N/delta) * r_delta) both divisible by
    /// 24, prod(delta^|r_delta|) a perfect square, and weight zero.
    #[must_use]
    pub fn check_modularity(&self) -> ModularityResult {
        let mut errors = Vec::new();

        for &delta in self.factors.keys() {
            if self.level % delta != 0 {
                errors.push(format!("delta {delta} does not divide level {}", self.level));
            }
        }

        let sum1: i64 = self.factors.iter().map(|(&d, &r)| d * r).sum();
        if sum1 % 24 != 0 {
            errors.push(format!("sum(delta * r_delta) = {sum1} is not divisible by 24"));
        }

        let sum2: i64 = self.factors.iter().map(|(&d, &r)| (self.level / d) * r).sum();
        if sum2 % 24 != 0 {
            errors.push(format!("sum((N/delta) * r_delta) = {sum2} is not divisible by 24"));
        }

        if !product_is_square(&self.factors) {
            errors.push("prod(delta^|r_delta|) is not a perfect square".to_string());
        }

        let sum_r: i64 = self.factors.values().sum();
        if sum_r != 0 {
            errors.push(format!(
                "sum(r_delta) = {sum_r} (weight {} is not zero)",
                Rational::from_i64(sum_r, 2)
            ));
        }

        if errors.is_empty() {
            ModularityResult::Modular
        } else {
            ModularityResult::NotModular { failed_conditions: errors }
        }
    }

    /// Expands to a truncated series: the product of
    /// `etaq(delta, delta)^{r_delta}` times `q^{q_shift}`.
    ///
    /// # Errors
    ///
    /// `MalformedParameter` when the q-shift is not an integer, so the
    /// quotient has no integer-power expansion. `DivisionByZero` propagates
    /// from inverting factors with negative exponents.
    pub fn to_series(&self, session: &mut Session, truncation: i64) -> Result<Series> {
        let shift = self.q_shift().to_integer().and_then(|n| n.to_i64()).ok_or_else(|| {
            Error::MalformedParameter(format!(
                "eta quotient q-shift {} is not an integer",
                self.q_shift()
            ))
        })?;

        let variable = session.q_symbol();
        let mut result = Series::one(variable, truncation);
        for (&delta, &r_delta) in &self.factors {
            let eta_delta = etaq(session, delta, delta, truncation)?;
            let powered = arithmetic::pow(&eta_delta, r_delta)?;
            result = arithmetic::mul(&result, &powered);
        }

        if shift != 0 {
            let monomial = Series::monomial(variable, Rational::one(), shift, truncation);
            result = arithmetic::mul(&monomial, &result);
        }
        Ok(result)
    }
}

/// Whether prod(delta^|r_delta|) is a perfect square, by parity of prime
/// valuations. Avoids building the (possibly huge) product.
fn product_is_square(factors: &BTreeMap<i64, i64>) -> bool {
    let mut odd_primes: Vec<i64> = Vec::new();
    for (&delta, &r) in factors {
        let r_abs = r.unsigned_abs();
        if r_abs % 2 == 0 {
            continue;
        }
        let mut m = delta;
        let mut p = 2i64;
        while p * p <= m {
            while m % p == 0 {
                m /= p;
                toggle(&mut odd_primes, p);
            }
            p += 1;
        }
        if m > 1 {
            toggle(&mut odd_primes, m);
        }
    }
    odd_primes.is_empty()
}

fn toggle(set: &mut Vec<i64>, p: i64) {
    if let Some(pos) = set.iter().position(|&x| x == p) {
        set.swap_remove(pos);
    } else {
        set.push(p);
    }
}
