//! # quill-prove
//!
//! Eta-quotient identity proving and bounded identity search.
//!
//! - [`eta`]: symbolic eta quotients with Newman modularity checks and
//!   expansion to truncated series.
//! - [`cusps`]: cusp enumeration for Gamma_0(N) and Gamma_1(N).
//! - [`orders`]: Ligozat orders of vanishing at cusps and cusp widths.
//! - [`prove`]: the valence-formula prover. A weight-0 modular function
//!   with nonnegative cusp orders is constant, so window agreement past
//!   the computed bound is a proof.
//! - [`search`]: bounded enumeration of eta quotients fed through the
//!   relation engine, with matches certified by the prover where possible.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cusps;
pub mod eta;
pub mod orders;
pub mod prove;
pub mod search;

pub use cusps::{cuspmake, cuspmake1, euler_phi, num_cusps_gamma0, Cusp};
pub use eta::{EtaExpression, ModularityResult};
pub use orders::{cusp_width, eta_order_at_cusp, total_order};
pub use prove::{prove_eta_id, sturm_bound, EtaIdentity, ProofResult};
pub use search::{search_identities, DiscoveredIdentity, SearchBounds};
