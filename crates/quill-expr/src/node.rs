//! Expression node types.
//!
//! The node vocabulary is tuned to what q-series output needs: exact small
//! rationals, symbols, sums/products with inline argument storage, integer
//! powers, and a fixed table of named special functions (Pochhammer symbols,
//! eta and theta functions).

use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// Unique identifier for a symbol.
pub type SymbolId = u32;

/// Unique identifier for a named function.
pub type FunctionId = u32;

/// An expression node stored in a session's arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// A 64-bit integer literal.
    Integer(i64),

    /// A rational number (numerator, denominator).
    ///
    /// Invariant: denominator > 0, gcd(num, den) == 1.
    Rational(i64, u64),

    /// A symbolic variable.
    Symbol(SymbolId),

    // === Compound expressions ===
    /// Sum of expressions: a + b + c + ...
    ///
    /// Invariant: at least 2 arguments.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions: a * b * c * ...
    ///
    /// Invariant: at least 2 arguments.
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power expression: base^exp.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// Negation: -expr.
    Neg(ExprHandle),

    /// Division: numerator / denominator.
    Div {
        /// The numerator.
        num: ExprHandle,
        /// The denominator.
        den: ExprHandle,
    },

    // === Functions ===
    /// A named function application: f(arg1, arg2, ...).
    Function {
        /// The function identifier.
        id: FunctionId,
        /// The arguments.
        args: SmallVec<[ExprHandle; 2]>,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Integer(_) | ExprNode::Rational(_, _) | ExprNode::Symbol(_)
        )
    }

    /// Returns true if this is the integer zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, ExprNode::Integer(0))
    }

    /// Returns true if this is the integer one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, ExprNode::Integer(1))
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Integer(_) | ExprNode::Rational(_, _) | ExprNode::Symbol(_) => {
                SmallVec::new()
            }
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Neg(arg) => smallvec::smallvec![*arg],
            ExprNode::Div { num, den } => smallvec::smallvec![*num, *den],
            ExprNode::Function { args, .. } => args.iter().copied().collect(),
        }
    }
}

/// Function identifiers for q-series output forms.
pub mod functions {
    use super::FunctionId;

    /// Finite q-Pochhammer symbol (a; q)_n, args (a, q, n).
    pub const POCHHAMMER: FunctionId = 0;
    /// Infinite q-Pochhammer symbol (a; q)_inf, args (a, q).
    pub const POCHHAMMER_INF: FunctionId = 1;
    /// Dedekind eta (without the q^(1/24) prefactor), args (t) for eta(q^t).
    pub const ETA: FunctionId = 2;
    /// Jacobi theta function, args (index, q).
    pub const THETA: FunctionId = 3;
    /// Jacobi-style product JAC(a, b), args (a, b).
    pub const JAC: FunctionId = 4;

    /// Returns the display name for a function id, if known.
    #[must_use]
    pub fn name(id: FunctionId) -> Option<&'static str> {
        match id {
            POCHHAMMER => Some("poch"),
            POCHHAMMER_INF => Some("pochinf"),
            ETA => Some("eta"),
            THETA => Some("theta"),
            JAC => Some("JAC"),
            _ => None,
        }
    }
}
