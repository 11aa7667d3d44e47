//! The q-series generator catalog.
//!
//! Every entry point takes the session explicitly and produces a [`Series`]
//! in the session's q symbol. Generators that can fail on their parameters
//! return `Result`; the total ones return a plain series.
//!
//! - Pochhammer products: [`aqprod`]
//! - Named infinite products: [`etaq`], [`jacprod`], [`tripleprod`],
//!   [`quinprod`], [`winquist`]
//! - Theta functions: [`theta2`], [`theta3`], [`theta4`]
//! - Partitions: [`partition_count`], [`partition_gf`], [`distinct_parts_gf`],
//!   [`odd_parts_gf`], [`bounded_parts_gf`]
//! - Rank and crank: [`rank_gf`], [`crank_gf`]
//! - Gaussian binomials: [`qbin`]
//! - Utilities: [`sift`], [`qdegree`], [`lqdegree`]

mod partitions;
mod pochhammer;
mod products;
mod qbinomial;
mod rank_crank;
mod theta;
mod utilities;

pub use partitions::{
    bounded_parts_gf, distinct_parts_gf, odd_parts_gf, partition_count, partition_gf,
};
pub use pochhammer::aqprod;
pub use products::{etaq, jacprod, quinprod, tripleprod, winquist};
pub use qbinomial::qbin;
pub use rank_crank::{crank_gf, rank_gf};
pub use theta::{theta2, theta3, theta4};
pub use utilities::{lqdegree, qdegree, sift};

use num_traits::One;
use quill_expr::SymbolId;
use quill_num::Rational;

use crate::series::Series;

/// Shared helper: the truncated infinite product
/// `prod_{n>=0} (1 - coeff * q^{base + step*n})`.
///
/// Factors whose exponent is negative or at/above the truncation contribute
/// nothing. A factor `(1 - 1*q^0)` vanishes and makes the whole product the
/// zero series; a factor `(1 - c)` with c != 1 is an honest constant factor.
pub(crate) fn step_product(
    coeff: &Rational,
    base: i64,
    step: i64,
    variable: SymbolId,
    truncation: i64,
) -> Series {
    debug_assert!(step > 0, "step must be positive");

    let mut result = Series::one(variable, truncation);
    let mut exp = base;
    while exp < truncation {
        if exp >= 0 {
            if exp == 0 && coeff.is_one() {
                return Series::zero(variable, truncation);
            }
            let mut factor = Series::one(variable, truncation);
            factor.add_coeff(exp, &-coeff.clone());
            result = crate::arithmetic::mul(&result, &factor);
        }
        exp += step;
    }
    result
}

/// The Euler product (q; q)_inf = prod_{n>=1} (1 - q^n), truncated.
pub(crate) fn euler_product(variable: SymbolId, truncation: i64) -> Series {
    step_product(&Rational::from(1), 1, 1, variable, truncation)
}
