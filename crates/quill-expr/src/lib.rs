//! # quill-expr
//!
//! Expression DAG and session state for the Quill q-series engine.
//!
//! This crate provides:
//! - A hash-consed, arena-allocated expression store (`Session`)
//! - Type-safe 32-bit expression handles
//! - O(1) structural equality via interning
//!
//! Every engine in the workspace takes an explicit `&mut Session` (or
//! `&Session`): there is no global interpreter state, and two sessions never
//! share handles. Product forms, eta quotients, and closed-form summations are
//! rendered into the DAG rather than into strings.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod handle;
pub mod node;
pub mod session;

pub use handle::ExprHandle;
pub use node::{functions, ExprNode, FunctionId, SymbolId};
pub use session::Session;
