//! Property tests for series arithmetic.

use proptest::prelude::*;
use quill_num::Rational;

use crate::arithmetic;
use crate::gen;
use crate::series::Series;

const TRUNC: i64 = 16;

fn arb_series() -> impl Strategy<Value = Series> {
    proptest::collection::vec((0i64..TRUNC, -20i64..=20), 0..8).prop_map(|terms| {
        let mut s = Series::zero(0, TRUNC);
        for (e, c) in terms {
            s.add_coeff(e, &Rational::from(c));
        }
        s
    })
}

fn arb_unit_series() -> impl Strategy<Value = Series> {
    // Constant term forced nonzero so the series is invertible.
    (arb_series(), prop_oneof![Just(1i64), Just(-1), Just(2), Just(3)]).prop_map(|(mut s, c0)| {
        s.set_coeff(0, Rational::from(c0));
        s
    })
}

proptest! {
    #[test]
    fn prop_add_commutes(a in arb_series(), b in arb_series()) {
        prop_assert_eq!(arithmetic::add(&a, &b), arithmetic::add(&b, &a));
    }

    #[test]
    fn prop_mul_commutes(a in arb_series(), b in arb_series()) {
        prop_assert_eq!(arithmetic::mul(&a, &b), arithmetic::mul(&b, &a));
    }

    #[test]
    fn prop_mul_distributes(a in arb_series(), b in arb_series(), c in arb_series()) {
        let lhs = arithmetic::mul(&a, &arithmetic::add(&b, &c));
        let rhs = arithmetic::add(&arithmetic::mul(&a, &b), &arithmetic::mul(&a, &c));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn prop_sub_self_is_zero(a in arb_series()) {
        prop_assert!(arithmetic::sub(&a, &a).is_zero());
    }

    #[test]
    fn prop_invert_round_trips(a in arb_unit_series()) {
        let inv = arithmetic::invert(&a).unwrap();
        prop_assert!(arithmetic::mul(&a, &inv).is_one());
    }

    #[test]
    fn prop_pow_matches_repeated_mul(a in arb_series(), n in 0i64..5) {
        let mut expected = Series::one(0, TRUNC);
        for _ in 0..n {
            expected = arithmetic::mul(&expected, &a);
        }
        prop_assert_eq!(arithmetic::pow(&a, n).unwrap(), expected);
    }

    #[test]
    fn prop_sift_partitions_the_series(a in arb_series(), m in 1i64..5) {
        // Reassembling every residue class recovers the original series up to
        // the shortest sifted truncation.
        let mut reassembled = Series::zero(a.variable(), TRUNC);
        let mut min_reach = TRUNC;
        for j in 0..m {
            let sifted = gen::sift(&a, m, j).unwrap();
            min_reach = min_reach.min(sifted.truncation() * m);
            for (&n, c) in sifted.iter() {
                reassembled.add_coeff(m * n + j, c);
            }
        }
        let lhs = reassembled.truncated(min_reach.max(1));
        let rhs = a.truncated(min_reach.max(1));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn prop_shift_then_truncate_preserves_coeffs(a in arb_series(), k in 0i64..6) {
        let shifted = arithmetic::shift(&a, k);
        for (&n, c) in a.iter() {
            prop_assert_eq!(&shifted.coeff(n + k), c);
        }
    }
}
