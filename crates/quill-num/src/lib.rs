//! # quill-num
//!
//! Exact arithmetic for the Quill q-series engine.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Modular arithmetic over a runtime prime (`mod_pow`, `mod_inv`, `ModP`-friendly helpers)
//! - Number-theoretic helpers used by product analysis (divisors, Möbius mu,
//!   pentagonal numbers)
//!
//! Every q-series coefficient in the workspace is a `Rational`; nothing here
//! ever rounds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arith;
pub mod integer;
pub mod modular;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use modular::{mod_inv, mod_mul, mod_pow};
pub use rational::Rational;
