//! The Huffman code tree and its deterministic construction.

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::min_heap::MinHeap;

#[derive(Debug, Clone)]
pub struct CodeTree<S: Symbol> {
    pub root: HuffNode<S>,
}

impl<S: Symbol> CodeTree<S> {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Every node gets a sequence number when it is created: leaves in table
    /// order, then each merged node in turn. The heap orders by
    /// `(weight, seq)`, so equal weights resolve to the older node and the
    /// result is fully determined by the table.
    pub fn build(frequencies: &FrequencyTable<S>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let leaves: Vec<HuffNode<S>> = frequencies
            .iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| HuffNode::new(symbol.clone(), weight, seq))
            .collect();
        let mut next_seq = leaves.len();

        let mut heap = MinHeap::build(leaves);
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            trace!("merging weights {} (seq {}) and {} (seq {})", x.weight(), x.seq(), y.weight(), y.seq());

            heap.insert(HuffNode::merge(x, y, next_seq));
            next_seq += 1;
        }

        let root = heap.into_single()?;
        debug!(
            "built code tree: {} leaves, {} nodes, total weight {}",
            frequencies.len(),
            next_seq,
            root.weight()
        );
        Ok(CodeTree { root })
    }

    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        CodeTree::build(&FrequencyTable::from_symbols(symbols))
    }

    /// Longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    fn fmt_node(f: &mut fmt::Formatter<'_>, node: &HuffNode<S>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight, .. } => {
                writeln!(f, "{}{}-> Leaf: {:?} [weight: {}]", indent, label, symbol, weight)
            }
            HuffNode::Internal { weight, left, right, .. } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                Self::fmt_node(f, left, depth + 1, "L")?;
                Self::fmt_node(f, right, depth + 1, "R")
            }
        }
    }
}

impl<S: Symbol> fmt::Display for CodeTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        Self::fmt_node(f, &self.root, 0, "root")
    }
}

impl TryFrom<&str> for CodeTree<char> {
    type Error = HuffmanError;

    fn try_from(text: &str) -> Result<Self> {
        CodeTree::from_symbols(text.chars())
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode<S: Symbol> {
    Leaf {
        symbol: S,
        weight: usize,
        seq: usize,
    },
    Internal {
        weight: usize,
        seq: usize,
        left: Box<HuffNode<S>>,
        right: Box<HuffNode<S>>,
    },
}

impl<S: Symbol> HuffNode<S> {
    pub fn new(symbol: S, weight: usize, seq: usize) -> Self {
        HuffNode::Leaf { symbol, weight, seq }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn seq(&self) -> usize {
        match self {
            HuffNode::Leaf { seq, .. } => *seq,
            HuffNode::Internal { seq, .. } => *seq,
        }
    }

    /// `a` becomes the left child, `b` the right.
    pub fn merge(a: Self, b: Self, seq: usize) -> Self {
        HuffNode::Internal {
            weight: a.weight().saturating_add(b.weight()),
            seq,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

// Nodes compare by (weight, seq) only. Sequence numbers are unique within a
// tree, so this is a total order.
impl<S: Symbol> PartialEq for HuffNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Symbol> Eq for HuffNode<S> {}

impl<S: Symbol> PartialOrd for HuffNode<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Symbol> Ord for HuffNode<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight()
            .cmp(&other.weight())
            .then_with(|| self.seq().cmp(&other.seq()))
    }
}
