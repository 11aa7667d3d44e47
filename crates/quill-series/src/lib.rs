//! # quill-series
//!
//! Truncated formal power series in q and the classical q-series generators.
//!
//! The central type is [`Series`]: a sparse, exact-rational power series known
//! modulo `q^truncation`. Everything downstream (product analysis, relation
//! discovery, hypergeometric machinery) works coefficientwise on these.
//!
//! The [`gen`] module holds the generator catalog: q-Pochhammer products, the
//! named infinite products (eta, Jacobi, quintuple, Winquist), theta
//! functions, partition generating functions, rank/crank, Gaussian binomials,
//! and the sift/degree utilities.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arithmetic;
pub mod error;
pub mod gen;
pub mod qmonomial;
pub mod series;

#[cfg(test)]
mod proptests;

pub use error::{Error, Result};
pub use qmonomial::{PochhammerOrder, QMonomial};
pub use series::Series;
