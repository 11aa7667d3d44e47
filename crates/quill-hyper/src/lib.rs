//! # quill-hyper
//!
//! Basic hypergeometric series and the algorithms that decide things about
//! them.
//!
//! A series is a symbolic `r_phi_s` or `r_psi_s` shape over q-monomial
//! parameters; [`eval_phi`] and [`eval_psi`] expand one into a truncated
//! q-series. On top of that sit the decision procedures:
//!
//! - [`q_gosper`]: indefinite summation, with a rational certificate
//! - [`q_zeilberger`]: creative telescoping, recurrences for definite sums
//! - [`q_petkovsek`]: closed-form solutions of the recurrences so found
//! - [`try_summation`]: a catalog of classical summation theorems
//! - [`heine1`], [`heine2`], [`heine3`]: Heine's transformations
//! - [`prove_nonterminating`]: nonterminating identities by parameter
//!   specialization
//!
//! The telescoping algorithms work at a concrete rational q, which keeps all
//! linear algebra in exact rational arithmetic; the catalogs work symbolically
//! on the q-monomial parameters and hand back truncated series.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod gosper;
pub mod nonterminating;
pub mod petkovsek;
pub mod series;
pub mod summation;
pub mod transform;
pub mod zeilberger;

pub use gosper::{
    extract_term_ratio, gosper_normal_form, q_dispersion, q_gosper, q_gosper_ratio,
    solve_key_equation, GosperNormalForm, QGosperResult,
};
pub use nonterminating::{
    check_recurrence_on_series, check_recurrence_on_values, prove_nonterminating,
    NonterminatingProofResult,
};
pub use petkovsek::{q_petkovsek, ClosedForm, QPetkovsekResult};
pub use series::{eval_phi, eval_psi, BilateralSeries, HypergeometricSeries};
pub use summation::{try_summation, SummationResult};
pub use transform::{heine1, heine2, heine3, verify_transformation, TransformationResult};
pub use zeilberger::{
    detect_n_params, q_zeilberger, verify_recurrence, verify_wz_certificate, QZeilbergerResult,
    ZeilbergerResult,
};
