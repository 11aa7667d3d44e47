//! # quill-analyze
//!
//! Series-to-product analysis: the inverse direction of the generator catalog.
//!
//! Given a truncated q-series, [`prodmake`] runs Andrews' algorithm to recover
//! exponents `a_n` with `f = prod (1 - q^n)^{-a_n}` up to the truncation. The
//! post-processing passes reinterpret that raw exponent vector:
//!
//! - [`etamake`] as an eta quotient `prod eta(d*tau)^{r_d}`
//! - [`qetamake`] as `prod (q^d; q^d)_inf^{r_d}`
//! - [`mprodmake`] as `prod (1 + q^n)^{m_n}`
//! - [`jacprodmake`] as a product of Jacobi triple products `JAC(a, b)`
//!
//! [`qfactor`] is the polynomial counterpart: exact division of a q-polynomial
//! into `(1 - q^i)` factors.
//!
//! Everything here reads a finite window of coefficients, so a match is
//! numeric evidence up to the truncation, not a proof.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod eta;
pub mod factor;
pub mod jacobi;
pub mod prodmake;

pub use eta::{etamake, mprodmake, qetamake, EtaQuotient, QEtaForm};
pub use factor::{qfactor, QFactorization};
pub use jacobi::{jacprodmake, JacobiProductForm};
pub use prodmake::{prodmake, ProductForm};
