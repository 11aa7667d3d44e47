//! # Quill
//!
//! An exact computer-algebra engine for q-series: generating functions,
//! product analysis, relation discovery, hypergeometric summation, and
//! eta-quotient identity proving.
//!
//! The engine is split into focused crates, re-exported here under short
//! module names:
//!
//! - [`num`]: arbitrary-precision integers and rationals plus the
//!   number-theoretic helpers (divisors, Moebius, pentagonal numbers).
//! - [`expr`]: the expression session and symbol interning.
//! - [`rings`]: ring and field abstractions over the exact scalars.
//! - [`series`]: truncated q-expansions with exact coefficients, q-monomials,
//!   their arithmetic, and the classical generators (`etaq`, `theta`,
//!   `aqprod`).
//! - [`linalg`]: exact dense kernels and nullspace computation.
//! - [`poly`]: dense univariate polynomials over the rationals.
//! - [`analyze`]: inverse views of a series (`prodmake`, `etamake`,
//!   `jacprodmake`, `qfactor`).
//! - [`relate`]: linear and homogeneous-polynomial relation search over
//!   series windows.
//! - [`hyper`]: q-hypergeometric certification (q-Gosper, q-Zeilberger).
//! - [`bailey`]: Bailey pairs, chains, mock theta functions, and
//!   Appell-Lerch sums.
//! - [`prove`]: the valence-formula prover for eta-quotient identities and
//!   the bounded identity search.
//!
//! The [`batch`] module runs parameter scans over any of the generators in
//! parallel.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;

pub use quill_analyze as analyze;
pub use quill_bailey as bailey;
pub use quill_expr as expr;
pub use quill_hyper as hyper;
pub use quill_linalg as linalg;
pub use quill_num as num;
pub use quill_poly as poly;
pub use quill_prove as prove;
pub use quill_relate as relate;
pub use quill_rings as rings;
pub use quill_series as series;

/// Commonly used types, in one import.
pub mod prelude {
    pub use quill_expr::Session;
    pub use quill_num::{Integer, Rational};
    pub use quill_prove::{EtaExpression, EtaIdentity, ProofResult};
    pub use quill_relate::{findhom, findlincombo, Evidence};
    pub use quill_series::{arithmetic, gen, Error, QMonomial, Result, Series};
}
