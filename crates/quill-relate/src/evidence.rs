//! Evidence tags for discovered relations.

/// How strongly a reported relation is supported.
///
/// Coefficient matching over a finite window is evidence, not proof: a
/// relation that holds for every checked coefficient can still fail beyond
/// the truncation. `Exact` is reserved for results verified past a computed
/// sufficiency bound (the prover emits those, never the matrix searches).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evidence {
    /// The relation was checked coefficientwise over a finite window.
    Numeric {
        /// Number of coefficient rows that matched.
        terms_checked: usize,
    },
    /// The relation was verified to a bound that makes it a proof.
    Exact,
}

impl Evidence {
    /// True for [`Evidence::Exact`].
    #[must_use]
    pub fn is_exact(self) -> bool {
        matches!(self, Evidence::Exact)
    }
}
