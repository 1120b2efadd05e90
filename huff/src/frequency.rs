use std::collections::BTreeMap;
use std::io::Read;

use crate::error::Result;
use crate::symbol::{Symbol, SymbolReader, SENTINEL};

/// Occurrence count of every symbol in an input, plus the sentinel with a
/// count of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    /// A table holding only the sentinel, which is what an empty input yields.
    pub fn new() -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(SENTINEL, 1);
        Self { counts }
    }

    pub fn add(&mut self, character: char) {
        *self.counts.entry(character as Symbol).or_insert(0) += 1;
    }

    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();
        for character in text.chars() {
            table.add(character);
        }
        table
    }

    /// Builds a table from raw counts; the sentinel is added with a count of
    /// one and zero counts are dropped.
    pub fn from_counts(counts: impl IntoIterator<Item = (Symbol, u64)>) -> Self {
        let mut table = Self::new();
        for (symbol, count) in counts {
            if symbol != SENTINEL && count > 0 {
                *table.counts.entry(symbol).or_insert(0) += count;
            }
        }
        table
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols, the sentinel included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false: the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of symbols counted from the input, the sentinel excluded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() - 1
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans the whole input once and counts every character in it.
pub fn count_frequencies(reader: impl Read) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::new();

    for character in SymbolReader::new(reader) {
        table.add(character?);
    }

    Ok(table)
}
