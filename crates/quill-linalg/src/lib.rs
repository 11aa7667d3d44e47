//! # quill-linalg
//!
//! Exact dense linear algebra for relation discovery.
//!
//! One `DenseMatrix<F: Field>` implementation serves both coefficient domains
//! the relation engine uses: the exact rationals and Z/pZ. Everything reduces
//! to reduced row echelon form with partial pivoting; no floating point
//! anywhere.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dense_matrix;

pub use dense_matrix::DenseMatrix;
