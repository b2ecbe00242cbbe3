//! Symbol occurrence counts.
//!
//! Entries are kept in the order each symbol first appears. Tree construction
//! numbers its leaves in that order, so the same input always produces the
//! same tree.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Anything that can be Huffman coded.
pub trait Symbol: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Symbol for T {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    entries: Vec<(S, usize)>,
    index: HashMap<S, usize>,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn from_symbols<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut table = FrequencyTable::default();
        for symbol in symbols {
            table.add(symbol, 1);
        }
        table
    }

    /// Assembles a table from explicit counts. Zero counts are dropped and
    /// repeated symbols are summed.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
    {
        let mut table = FrequencyTable::default();
        for (symbol, count) in counts {
            if count > 0 {
                table.add(symbol, count);
            }
        }
        table
    }

    fn add(&mut self, symbol: S, count: usize) {
        match self.index.get(&symbol) {
            Some(&slot) => self.entries[slot].1 = self.entries[slot].1.saturating_add(count),
            None => {
                self.index.insert(symbol.clone(), self.entries.len());
                self.entries.push((symbol, count));
            }
        }
    }

    pub fn get(&self, symbol: &S) -> Option<usize> {
        self.index.get(symbol).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input. Saturates
    /// at `usize::MAX` for tables assembled from oversized counts.
    pub fn total(&self) -> usize {
        self.entries.iter().fold(0usize, |acc, (_, count)| acc.saturating_add(*count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> + '_ {
        self.entries.iter().map(|(symbol, count)| (symbol, *count))
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        FrequencyTable {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl From<&str> for FrequencyTable<char> {
    fn from(text: &str) -> Self {
        FrequencyTable::from_symbols(text.chars())
    }
}

impl From<&[u8]> for FrequencyTable<u8> {
    fn from(bytes: &[u8]) -> Self {
        FrequencyTable::from_symbols(bytes.iter().copied())
    }
}

pub fn build_frequencies<S: Symbol>(input: &[S]) -> FrequencyTable<S> {
    FrequencyTable::from_symbols(input.iter().cloned())
}
