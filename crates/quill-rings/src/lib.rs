//! # quill-rings
//!
//! Algebraic trait seams for the Quill q-series engine.
//!
//! The relation-discovery engines run the same Gaussian elimination over the
//! exact rationals and over Z/pZ; the `Ring`/`Field` traits here are the seam
//! that lets `quill-linalg` be written once for both.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod modp;
pub mod traits;

pub use modp::ModP;
pub use traits::{Field, Ring};
