//! Orders of vanishing of eta quotients at cusps.
//!
//! The invariant order at a cusp a/c of Gamma_0(N) comes from Ligozat's
//! formula and depends only on the denominator c:
//!
//! ```text
//! ord(f, a/c) = sum_{delta | N} gcd(c, delta)^2 r_delta / (24 delta)
//! ```
//!
//! The weighted order is the invariant order times the cusp width
//! N / gcd(c^2, N); for a weight-0 modular function the weighted orders sum
//! to zero over all cusps.

use num_traits::Zero;
use quill_num::arith::gcd_i64;
use quill_num::Rational;

use crate::cusps::Cusp;
use crate::eta::EtaExpression;

/// The invariant order of vanishing of an eta quotient at a cusp.
///
/// At infinity this is the q-shift sum(delta * r_delta) / 24.
#[must_use]
pub fn eta_order_at_cusp(eta: &EtaExpression, cusp: &Cusp) -> Rational {
    if cusp.is_infinity() {
        return eta.q_shift();
    }

    let c = cusp.denom.abs();
    let mut sum = Rational::zero();
    for (&delta, &r_delta) in &eta.factors {
        if r_delta == 0 {
            continue;
        }
        let g = gcd_i64(c, delta);
        sum = sum + Rational::from_i64(g * g * r_delta, 24 * delta);
    }
    sum
}

/// The width of a cusp on Gamma_0(N): N / gcd(c^2, N), and 1 at infinity.
#[must_use]
pub fn cusp_width(n: i64, cusp: &Cusp) -> i64 {
    if cusp.is_infinity() {
        return 1;
    }
    let c = cusp.denom.abs();
    n / gcd_i64(c * c, n)
}

/// The sum of width-weighted orders over the given cusps. Zero for a
/// weight-0 modular function when the cusp list is complete.
#[must_use]
pub fn total_order(eta: &EtaExpression, cusps: &[Cusp]) -> Rational {
    let n = eta.level;
    let mut total = Rational::zero();
    for cusp in cusps {
        let ord = eta_order_at_cusp(eta, cusp);
        total = total + ord * Rational::from(cusp_width(n, cusp));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cusps::cuspmake;

    #[test]
    fn test_order_at_infinity_is_q_shift() {
        let e = EtaExpression::from_factors(&[(1, 24), (2, -24)], 2);
        assert_eq!(eta_order_at_cusp(&e, &Cusp::infinity()), e.q_shift());
        assert_eq!(eta_order_at_cusp(&e, &Cusp::infinity()), Rational::from(-1));
    }

    #[test]
    fn test_order_at_zero() {
        // At 0/1: gcd(1, delta)^2 = 1 for every delta, so the order is
        // sum r_delta / (24 delta) = 24/24 - 24/48 = 1/2.
        let e = EtaExpression::from_factors(&[(1, 24), (2, -24)], 2);
        assert_eq!(eta_order_at_cusp(&e, &Cusp::new(0, 1)), Rational::from_i64(1, 2));
    }

    #[test]
    fn test_cusp_widths() {
        assert_eq!(cusp_width(4, &Cusp::infinity()), 1);
        assert_eq!(cusp_width(4, &Cusp::new(0, 1)), 4);
        assert_eq!(cusp_width(4, &Cusp::new(1, 2)), 1);
    }

    #[test]
    fn test_total_order_vanishes_for_modular_functions() {
        // The valence formula check: weighted orders of a weight-0 modular
        // function sum to zero across all cusps.
        let e = EtaExpression::from_factors(&[(1, 24), (2, -24)], 2);
        assert!(e.check_modularity().is_modular());
        let cusps = cuspmake(2);
        assert!(total_order(&e, &cusps).is_zero());

        let e6 = EtaExpression::from_factors(&[(1, 12), (2, -6), (3, -12), (6, 6)], 6);
        let cusps6 = cuspmake(6);
        assert!(total_order(&e6, &cusps6).is_zero());
    }
}
