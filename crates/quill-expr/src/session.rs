//! The session: arena-allocated, hash-consed expression storage.
//!
//! A `Session` owns every expression and symbol created during a computation.
//! All engines take the session explicitly; dropping it frees everything at
//! once.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::handle::ExprHandle;
use crate::node::{functions, ExprNode, FunctionId, SymbolId};

/// Session state for a q-series computation.
///
/// All expressions are stored contiguously in a `Vec`, with hash-consing
/// ensuring each structurally unique expression is stored exactly once.
#[derive(Debug, Default)]
pub struct Session {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol table: maps symbol names to their IDs.
    symbols: HashMap<String, SymbolId>,
    /// Reverse symbol table for display.
    symbol_names: Vec<String>,
}

impl Session {
    /// Creates a new empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with pre-allocated node capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
            symbols: HashMap::new(),
            symbol_names: Vec::new(),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "session arena capacity exceeded");

        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not minted by this session.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Interns a symbol name, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }

        let id = self.symbol_names.len() as SymbolId;
        self.symbols.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbol_names.get(id as usize).map(String::as_str)
    }

    /// The distinguished series variable q, interned on first use.
    pub fn q_symbol(&mut self) -> SymbolId {
        self.intern_symbol("q")
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Convenience constructors ===

    /// Creates an integer expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.intern(ExprNode::Integer(value))
    }

    /// Creates a reduced rational expression.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        assert!(den != 0, "denominator cannot be zero");
        let (mut num, mut den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        if g > 1 {
            num /= g as i64;
            den /= g as i64;
        }
        if den == 1 {
            self.integer(num)
        } else {
            self.intern(ExprNode::Rational(num, den as u64))
        }
    }

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// The expression for the series variable q.
    pub fn q(&mut self) -> ExprHandle {
        self.symbol("q")
    }

    /// Creates an addition expression.
    pub fn add(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Add(args))
    }

    /// Creates a multiplication expression.
    pub fn mul(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Mul(args))
    }

    /// Creates a power expression.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates base^n for an integer exponent, collapsing n = 1.
    pub fn int_pow(&mut self, base: ExprHandle, n: i64) -> ExprHandle {
        if n == 1 {
            return base;
        }
        let exp = self.integer(n);
        self.pow(base, exp)
    }

    /// Creates a negation expression.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// Creates a division expression.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// Creates a named function application.
    pub fn function(
        &mut self,
        id: FunctionId,
        args: impl Into<SmallVec<[ExprHandle; 2]>>,
    ) -> ExprHandle {
        self.intern(ExprNode::Function { id, args: args.into() })
    }

    /// Renders an expression to a display string.
    ///
    /// This is the human-facing form; structural identity lives in the
    /// handles, not in the rendering.
    #[must_use]
    pub fn render(&self, handle: ExprHandle) -> String {
        match self.get(handle) {
            ExprNode::Integer(n) => n.to_string(),
            ExprNode::Rational(n, d) => format!("{n}/{d}"),
            ExprNode::Symbol(id) => self
                .symbol_name(*id)
                .map_or_else(|| format!("?{id}"), str::to_string),
            ExprNode::Add(args) => {
                let parts: Vec<String> = args.iter().map(|&a| self.render(a)).collect();
                parts.join(" + ")
            }
            ExprNode::Mul(args) => {
                let parts: Vec<String> = args.iter().map(|&a| self.render_factor(a)).collect();
                parts.join("*")
            }
            ExprNode::Pow { base, exp } => {
                format!("{}^{}", self.render_factor(*base), self.render_factor(*exp))
            }
            ExprNode::Neg(arg) => format!("-{}", self.render_factor(*arg)),
            ExprNode::Div { num, den } => {
                format!("{}/{}", self.render_factor(*num), self.render_factor(*den))
            }
            ExprNode::Function { id, args } => {
                let name = functions::name(*id).map_or_else(|| format!("f{id}"), str::to_string);
                let parts: Vec<String> = args.iter().map(|&a| self.render(a)).collect();
                format!("{}({})", name, parts.join(", "))
            }
        }
    }

    fn render_factor(&self, handle: ExprHandle) -> String {
        let node = self.get(handle);
        let inner = self.render(handle);
        match node {
            ExprNode::Add(_) | ExprNode::Div { .. } | ExprNode::Rational(_, _) => {
                format!("({inner})")
            }
            ExprNode::Integer(n) if *n < 0 => format!("({inner})"),
            _ => inner,
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
