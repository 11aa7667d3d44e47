//! Jacobi product recognition: fit prodmake exponents to JAC(a, b) factors.

use std::collections::BTreeMap;

use quill_expr::{functions, ExprHandle, Session};
use quill_series::{Result, Series};
use smallvec::{smallvec, SmallVec};

use crate::prodmake::prodmake;

/// A product of Jacobi triple products `prod JAC(a, b)^e` sharing one period.
///
/// `JAC(a, b) = (q^a; q^b)_inf (q^{b-a}; q^b)_inf (q^b; q^b)_inf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JacobiProductForm {
    /// Maps (a, b) to the exponent e.
    pub factors: BTreeMap<(i64, i64), i64>,
    /// The period b shared by all factors.
    pub period: i64,
}

impl JacobiProductForm {
    /// Renders `prod jac(a, b)^e` as an expression.
    pub fn to_expr(&self, session: &mut Session) -> ExprHandle {
        if self.factors.is_empty() {
            return session.integer(1);
        }
        let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for (&(a, b), &e) in &self.factors {
            let ah = session.integer(a);
            let bh = session.integer(b);
            let jac = session.function(functions::JAC, smallvec![ah, bh]);
            parts.push(session.int_pow(jac, e));
        }
        session.mul(parts)
    }
}

/// Searches for a Jacobi-product decomposition of `f`.
///
/// Runs [`prodmake`], then tries each period `b = 2..=max_period`: within a
/// period, exponents must be constant on each residue class, with class `r`
/// and class `b - r` agreeing (they come from the same JAC factor) and class
/// `0` absorbing the `(q^b; q^b)_inf` parts. The first period that explains
/// every exponent wins.
///
/// Returns `Ok(None)` when no period up to the cap gives an exact fit, or
/// when a prodmake exponent is noninteger.
///
/// # Errors
///
/// `MalformedParameter` if the series is identically zero.
pub fn jacprodmake(f: &Series, max_n: i64, max_period: i64) -> Result<Option<JacobiProductForm>> {
    let product = prodmake(f, max_n)?;
    let Some(a) = product.integer_exponents() else {
        return Ok(None);
    };
    if a.is_empty() {
        return Ok(Some(JacobiProductForm {
            factors: BTreeMap::new(),
            period: 0,
        }));
    }

    for b in 2..=max_period.min(product.terms_used) {
        if let Some(factors) = try_period(&a, b, product.terms_used) {
            log::debug!("jacprodmake matched period {b} with {} factors", factors.len());
            return Ok(Some(JacobiProductForm { factors, period: b }));
        }
    }
    Ok(None)
}

/// Tries to explain the exponent table with period `b`. `JAC(r, b)^e`
/// contributes `-e` to `a_n` on the classes `r`, `b - r`, and `0` (mod b);
/// the class `b/2` of an even period is hit twice by its own factor.
fn try_period(a: &BTreeMap<i64, i64>, b: i64, max_n: i64) -> Option<BTreeMap<(i64, i64), i64>> {
    let class_value = |residual: &BTreeMap<i64, i64>, r: i64| -> Option<i64> {
        let mut value = None;
        let mut n = if r == 0 { b } else { r };
        while n <= max_n {
            let v = residual.get(&n).copied().unwrap_or(0);
            match value {
                None => value = Some(v),
                Some(prev) if prev != v => return None,
                Some(_) => {}
            }
            n += b;
        }
        value
    };

    let clear_class = |residual: &mut BTreeMap<i64, i64>, r: i64, amount: i64| {
        let mut n = if r == 0 { b } else { r };
        while n <= max_n {
            let v = residual.get(&n).copied().unwrap_or(0) - amount;
            if v == 0 {
                residual.remove(&n);
            } else {
                residual.insert(n, v);
            }
            n += b;
        }
    };

    let mut residual = a.clone();
    let mut factors = BTreeMap::new();

    for r in 1..=(b - 1) / 2 {
        let vr = class_value(&residual, r)?;
        let vbr = class_value(&residual, b - r)?;
        if vr != vbr {
            return None;
        }
        if vr != 0 {
            // a_n = -e on classes r, b-r, and 0.
            factors.insert((r, b), -vr);
            clear_class(&mut residual, r, vr);
            clear_class(&mut residual, b - r, vr);
            clear_class(&mut residual, 0, vr);
        }
    }

    if b % 2 == 0 {
        let r = b / 2;
        let vr = class_value(&residual, r)?;
        if vr != 0 {
            // Both shifted sub-products land on class b/2.
            if vr % 2 != 0 {
                return None;
            }
            factors.insert((r, b), -vr / 2);
            clear_class(&mut residual, r, vr);
            clear_class(&mut residual, 0, vr / 2);
        }
    }

    if residual.is_empty() {
        Some(factors)
    } else {
        None
    }
}
