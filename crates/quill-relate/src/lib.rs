//! # quill-relate
//!
//! Relation discovery over truncated q-series.
//!
//! Everything here follows one pattern: build candidate series (the inputs, or
//! monomials in them), stack a finite window of their coefficients into a
//! matrix, and read relations off the rational or modular null space. A match
//! therefore holds up to the truncation order and no further; every result
//! carries an [`Evidence`] tag saying how many coefficients were checked.
//!
//! - Linear: [`findlincombo`], [`findlincombomodp`]
//! - Polynomial combinations of a target: [`findhomcombo`],
//!   [`findnonhomcombo`], [`findhomcombomodp`]
//! - Relations among series: [`findhom`], [`findnonhom`], [`findhommodp`]
//! - Structure probes: [`findmaxind`], [`findpoly`], [`findprod`]
//! - Congruence search: [`findcong`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combo;
pub mod cong;
pub mod evidence;
mod matrix;
pub mod poly;
pub mod product;
pub mod relations;

pub use combo::{
    findhomcombo, findhomcombomodp, findlincombo, findlincombomodp, findnonhomcombo,
    LinearCombination, ModularCombination, ModularMonomialCombination, MonomialCombination,
};
pub use cong::{findcong, Congruence};
pub use evidence::Evidence;
pub use poly::{findpoly, PolynomialRelation};
pub use product::{findprod, ProductIdentity};
pub use relations::{findhom, findhommodp, findmaxind, findnonhom, ModularRelationSet, RelationSet};
