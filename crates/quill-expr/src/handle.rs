//! Type-safe expression handles.
//!
//! Handles are 32-bit indices into a session's arena. Within one session, two
//! handles are equal if and only if they denote the same structurally
//! identical expression, thanks to hash-consing. Handles from different
//! sessions must never be mixed; the session that minted a handle is the only
//! one that can resolve it.

use std::fmt;

/// A handle to an expression in a session's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the session.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
