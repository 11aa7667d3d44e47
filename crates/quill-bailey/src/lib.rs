//! # quill-bailey
//!
//! Bailey pairs and the machinery built on them:
//!
//! - [`pair`]: Bailey pairs relative to a, with term evaluation and a
//!   defining-relation checker.
//! - [`lemma`]: the Bailey lemma, iterated Bailey chains, and the weak
//!   Bailey lemma that turns a pair into a series identity.
//! - [`database`]: an in-memory catalog of known pairs, searchable by
//!   name and tag.
//! - [`discover`]: a bounded grid search pushing database pairs through
//!   chains and matching the outputs against known series.
//! - [`mock_theta`]: Ramanujan's classical mock theta functions of
//!   orders 3, 5, and 7 as truncated q-expansions.
//! - [`appell`]: Appell-Lerch bilateral sums, the universal mock theta
//!   functions g2 and g3, and symbolic Zwegers completions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod appell;
pub mod database;
pub mod discover;
pub mod lemma;
pub mod mock_theta;
pub mod pair;

pub use appell::{
    appell_lerch_bilateral, appell_lerch_m, universal_mock_theta_g2, universal_mock_theta_g3,
    ZwegersCompletion,
};
pub use database::BaileyDatabase;
pub use discover::{bailey_discover, DiscoverBounds, DiscoveredBaileyIdentity};
pub use lemma::{bailey_chain, bailey_lemma, weak_bailey_lemma};
pub use mock_theta::{
    mock_theta_cap_f0_5, mock_theta_cap_f0_7, mock_theta_cap_f1_5, mock_theta_cap_f1_7,
    mock_theta_cap_f2_7, mock_theta_chi0_5, mock_theta_chi1_5, mock_theta_chi3,
    mock_theta_f0_5, mock_theta_f1_5, mock_theta_f3, mock_theta_nu3, mock_theta_omega3,
    mock_theta_phi0_5, mock_theta_phi1_5, mock_theta_phi3, mock_theta_psi0_5,
    mock_theta_psi1_5, mock_theta_psi3, mock_theta_rho3,
};
pub use pair::{verify_bailey_pair, BaileyPair, BaileyPairKind};
