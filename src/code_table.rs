//! Symbol <-> code mappings derived from a [`CodeTree`].

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::bit_vec::Bits;
use crate::error::Result;
use crate::frequency::{FrequencyTable, Symbol};
use crate::hufftree::{CodeTree, HuffNode};

pub type SymbolToCode<S> = HashMap<S, Bits>;
pub type CodeToSymbol<S> = HashMap<Bits, S>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    encode: SymbolToCode<S>,
    decode: CodeToSymbol<S>,
}

impl<S: Symbol> CodeTable<S> {
    /// Walks the tree depth first, appending `0` for each left edge and `1`
    /// for each right edge. A tree that is a single leaf gets the one-bit
    /// code `0` so every code is non-empty.
    pub fn from_tree(tree: &CodeTree<S>) -> Self {
        let mut table = CodeTable::default();
        match &tree.root {
            HuffNode::Leaf { symbol, .. } => table.insert(symbol.clone(), bitvec![u8, Msb0; 0]),
            root => table.walk(root, &mut Bits::new()),
        }
        table
    }

    pub fn from_frequencies(frequencies: &FrequencyTable<S>) -> Result<Self> {
        Ok(CodeTable::from_tree(&CodeTree::build(frequencies)?))
    }

    fn walk(&mut self, node: &HuffNode<S>, path: &mut Bits) {
        match node {
            HuffNode::Leaf { symbol, .. } => self.insert(symbol.clone(), path.clone()),
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    fn insert(&mut self, symbol: S, code: Bits) {
        self.decode.insert(code.clone(), symbol.clone());
        self.encode.insert(symbol, code);
    }

    pub fn encoder(&self) -> &SymbolToCode<S> {
        &self.encode
    }

    pub fn decoder(&self) -> &CodeToSymbol<S> {
        &self.decode
    }

    pub fn into_parts(self) -> (SymbolToCode<S>, CodeToSymbol<S>) {
        (self.encode, self.decode)
    }

    pub fn code_for(&self, symbol: &S) -> Option<&Bits> {
        self.encode.get(symbol)
    }

    pub fn symbol_for(&self, code: &Bits) -> Option<&S> {
        self.decode.get(code)
    }

    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.encode.values().map(|code| code.len()).max().unwrap_or(0)
    }

    /// Number of bits an input with these frequencies encodes to. Symbols
    /// without a code contribute nothing.
    pub fn encoded_len(&self, frequencies: &FrequencyTable<S>) -> usize {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| self.encode.get(symbol).map(|code| code.len() * count))
            .sum()
    }

    /// Entries ordered by code length, then by code.
    pub fn sorted(&self) -> Vec<(&S, &Bits)> {
        let mut entries: Vec<(&S, &Bits)> = self.encode.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            a.len()
                .cmp(&b.len())
                .then_with(|| a.as_bitslice().cmp(b.as_bitslice()))
        });
        entries
    }
}

impl<S: Symbol> Default for CodeTable<S> {
    fn default() -> Self {
        CodeTable {
            encode: HashMap::new(),
            decode: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_vec::format_bits;

    fn table_for(text: &str) -> CodeTable<char> {
        CodeTable::from_frequencies(&FrequencyTable::from(text)).unwrap()
    }

    fn code(table: &CodeTable<char>, c: char) -> String {
        format_bits(table.code_for(&c).unwrap())
    }

    #[test]
    fn single_symbol_gets_one_bit_code() {
        let table = table_for("aaaa");
        assert_eq!(table.len(), 1);
        assert_eq!(code(&table, 'a'), "0");
        assert_eq!(table.symbol_for(&bitvec![u8, Msb0; 0]), Some(&'a'));
    }

    #[test]
    fn aabbc_codes() {
        let table = table_for("aabbc");
        assert_eq!(code(&table, 'b'), "0");
        assert_eq!(code(&table, 'c'), "10");
        assert_eq!(code(&table, 'a'), "11");
        let longest = table.max_code_len();
        assert_eq!(table.code_for(&'c').unwrap().len(), longest);
        assert_eq!(table.encoded_len(&FrequencyTable::from("aabbc")), 8);
    }

    #[test]
    fn maps_are_inverse() {
        let table = table_for("mississippi river");
        assert_eq!(table.encoder().len(), table.decoder().len());
        for (symbol, code) in table.encoder() {
            assert_eq!(table.symbol_for(code), Some(symbol));
        }
    }

    #[test]
    fn codes_are_prefix_free() {
        let table = table_for("she sells sea shells by the sea shore");
        let codes: Vec<&Bits> = table.encoder().values().collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_bitslice()), "{} prefixes {}", format_bits(a), format_bits(b));
                }
            }
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let frequencies = FrequencyTable::from("determinism is deterministic");
        let first = CodeTable::from_frequencies(&frequencies).unwrap();
        let second = CodeTable::from_frequencies(&frequencies).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sorted_is_shortest_first() {
        let table = table_for("aaaaaaaabbbbccd");
        let lengths: Vec<usize> = table.sorted().iter().map(|(_, code)| code.len()).collect();
        let mut expected = lengths.clone();
        expected.sort();
        assert_eq!(lengths, expected);
        assert_eq!(table.sorted()[0].0, &'a');
    }
}
