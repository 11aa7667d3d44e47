//! Dense univariate polynomials and rational functions over [`Rational`].
//!
//! The telescoping machinery treats a hypergeometric term ratio as a rational
//! function of `x = q^k` at a concrete rational `q`, so everything here is
//! specialized to exact rational coefficients: [`Poly`] with Euclidean
//! division, monic gcd, and the substitution `x -> q^n x`, plus the
//! auto-reducing quotient type [`RationalFunc`].
//!
//! [`Rational`]: quill_num::Rational

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

mod dense;
mod ratfunc;

pub use dense::{poly_gcd, Poly};
pub use ratfunc::RationalFunc;
