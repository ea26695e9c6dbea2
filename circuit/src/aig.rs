//! Structurally hashed and-inverter graph.
//!
//! Every gate is a two-input AND whose edges may be inverted. Constant folding and hash-consing
//! keep the graph compact and deterministic: building the same expression twice yields the same
//! literal.

use core::ops::Not;
use std::collections::HashMap;

/// Identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Return the underlying node index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A reference to a node, optionally inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    node: NodeId,
    inverted: bool,
}

impl Lit {
    /// The constant false literal (node 0).
    pub const FALSE: Lit = Lit { node: NodeId(0), inverted: false };
    /// The constant true literal.
    pub const TRUE: Lit = Lit { node: NodeId(0), inverted: true };

    const fn positive(node: NodeId) -> Self {
        Self { node, inverted: false }
    }

    /// Returns the literal for a constant bit.
    pub const fn constant(value: bool) -> Self {
        if value { Self::TRUE } else { Self::FALSE }
    }

    pub const fn node(self) -> NodeId {
        self.node
    }

    pub const fn is_inverted(self) -> bool {
        self.inverted
    }

    /// Returns the constant value of the literal, if it refers to the constant node.
    pub const fn const_value(self) -> Option<bool> {
        if self.node.0 == 0 { Some(self.inverted) } else { None }
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit { node: self.node, inverted: !self.inverted }
    }
}

/// Node kinds in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// The constant false node; always node 0.
    False,
    /// A free variable: an input bit or a latch output bit.
    Leaf,
    /// Conjunction of two earlier nodes.
    And(Lit, Lit),
}

/// A hash-consed and-inverter graph.
///
/// Nodes are stored in topological order: the operands of an `And` node always have smaller
/// indices than the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aig {
    nodes: Vec<Node>,
    cache: HashMap<(Lit, Lit), NodeId>,
}

impl Aig {
    /// Create a graph containing only the constant node.
    pub fn new() -> Self {
        Self { nodes: vec![Node::False], cache: HashMap::new() }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of AND gates in the graph.
    pub fn num_ands(&self) -> usize {
        self.nodes.iter().filter(|node| matches!(node, Node::And(..))).count()
    }

    /// Add a fresh free variable.
    pub fn leaf(&mut self) -> Lit {
        Lit::positive(self.push(Node::Leaf))
    }

    /// Add an AND gate (with constant folding).
    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        match (a.const_value(), b.const_value()) {
            (Some(false), _) | (_, Some(false)) => return Lit::FALSE,
            (Some(true), _) => return b,
            (_, Some(true)) => return a,
            _ => {},
        }
        if a == b {
            return a;
        }
        if a == !b {
            return Lit::FALSE;
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(id) = self.cache.get(&key) {
            return Lit::positive(*id);
        }
        let id = self.push(Node::And(key.0, key.1));
        self.cache.insert(key, id);
        Lit::positive(id)
    }

    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        !self.and(!a, !b)
    }

    pub fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        let a_not_b = self.and(a, !b);
        let not_a_b = self.and(!a, b);
        self.or(a_not_b, not_a_b)
    }

    /// `sel ? when_true : when_false`
    pub fn mux(&mut self, sel: Lit, when_true: Lit, when_false: Lit) -> Lit {
        let t = self.and(sel, when_true);
        let f = self.and(!sel, when_false);
        self.or(t, f)
    }

    /// Conjunction of all literals; true for an empty iterator.
    pub fn and_all(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        lits.into_iter().fold(Lit::TRUE, |acc, lit| self.and(acc, lit))
    }

    /// Disjunction of all literals; false for an empty iterator.
    pub fn or_all(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        lits.into_iter().fold(Lit::FALSE, |acc, lit| self.or(acc, lit))
    }

    /// Copy every node of `other` into this graph.
    ///
    /// `bind` is called once per leaf of `other` and returns the literal the leaf is replaced
    /// with; return `None` to allocate a fresh leaf. The returned table maps every node of
    /// `other` to its image in `self`.
    pub fn import(
        &mut self,
        other: &Aig,
        mut bind: impl FnMut(NodeId) -> Option<Lit>,
    ) -> ImportMap {
        let mut images = Vec::with_capacity(other.nodes.len());
        for (idx, node) in other.nodes.iter().enumerate() {
            let image = match node {
                Node::False => Lit::FALSE,
                Node::Leaf => match bind(NodeId(idx as u32)) {
                    Some(lit) => lit,
                    None => self.leaf(),
                },
                Node::And(a, b) => {
                    let a = translate(&images, *a);
                    let b = translate(&images, *b);
                    self.and(a, b)
                },
            };
            images.push(image);
        }
        ImportMap { images }
    }

    /// Evaluate every node given an assignment for the leaves.
    ///
    /// Leaves missing from `leaves` evaluate to false.
    pub fn eval(&self, leaves: &HashMap<NodeId, bool>) -> Vec<bool> {
        let mut values = Vec::with_capacity(self.nodes.len());
        for (idx, node) in self.nodes.iter().enumerate() {
            let value = match node {
                Node::False => false,
                Node::Leaf => leaves.get(&NodeId(idx as u32)).copied().unwrap_or(false),
                Node::And(a, b) => lit_value(&values, *a) && lit_value(&values, *b),
            };
            values.push(value);
        }
        values
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

/// Node images produced by [`Aig::import`].
#[derive(Debug, Clone)]
pub struct ImportMap {
    images: Vec<Lit>,
}

impl ImportMap {
    /// Translate a literal of the imported graph into the receiving graph.
    pub fn lit(&self, lit: Lit) -> Lit {
        translate(&self.images, lit)
    }

    pub fn lits<'a>(&'a self, lits: &'a [Lit]) -> impl Iterator<Item = Lit> + 'a {
        lits.iter().map(|lit| self.lit(*lit))
    }
}

/// Reads the value of a literal from a node value table.
pub fn lit_value(values: &[bool], lit: Lit) -> bool {
    values[lit.node.index()] ^ lit.inverted
}

fn translate(images: &[Lit], lit: Lit) -> Lit {
    let image = images[lit.node.index()];
    if lit.inverted { !image } else { image }
}
