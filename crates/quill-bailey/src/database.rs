//! An in-memory catalog of Bailey pairs.

use num_traits::One;
use quill_num::Rational;

use crate::pair::{BaileyPair, BaileyPairKind};

/// A searchable collection of Bailey pairs, seeded with the canonical ones.
#[derive(Clone, Debug)]
pub struct BaileyDatabase {
    pairs: Vec<BaileyPair>,
}

impl Default for BaileyDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl BaileyDatabase {
    /// A database holding the unit, Rogers-Ramanujan, and q-binomial pairs.
    #[must_use]
    pub fn new() -> Self {
        let pairs = vec![
            BaileyPair {
                name: "unit".into(),
                kind: BaileyPairKind::Unit,
                tags: vec!["canonical".into(), "unit".into()],
            },
            BaileyPair {
                name: "rogers-ramanujan".into(),
                kind: BaileyPairKind::RogersRamanujan,
                tags: vec!["canonical".into(), "rogers-ramanujan".into()],
            },
            BaileyPair {
                name: "q-binomial(z=1)".into(),
                kind: BaileyPairKind::QBinomial {
                    z: Rational::one(),
                },
                tags: vec!["canonical".into(), "q-binomial".into()],
            },
        ];
        BaileyDatabase { pairs }
    }

    /// Adds a pair.
    pub fn add(&mut self, pair: BaileyPair) {
        self.pairs.push(pair);
    }

    /// All pairs carrying the tag, case-insensitively.
    #[must_use]
    pub fn search_by_tag(&self, tag: &str) -> Vec<&BaileyPair> {
        let tag_lower = tag.to_lowercase();
        self.pairs
            .iter()
            .filter(|p| p.tags.iter().any(|t| t.to_lowercase() == tag_lower))
            .collect()
    }

    /// All pairs whose name contains the query, case-insensitively.
    #[must_use]
    pub fn search_by_name(&self, name: &str) -> Vec<&BaileyPair> {
        let name_lower = name.to_lowercase();
        self.pairs
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&name_lower))
            .collect()
    }

    /// Every pair, in insertion order.
    #[must_use]
    pub fn all_pairs(&self) -> &[BaileyPair] {
        &self.pairs
    }

    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the database is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
