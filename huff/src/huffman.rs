use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;

use crate::error::FormatError;
use crate::frequency::FrequencyTable;
use crate::symbol::{self, Symbol, SENTINEL};

/// A Huffman tree stored as an arena. Children are referenced by index and the
/// root is the last node pushed.
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: usize,
        right: usize,
    },
}

// Ordered by weight, then by the smallest symbol under the node. Leaf sets of
// the trees in the heap are disjoint, so the order is total and `idx` never
// decides it.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: u64,
    min_symbol: Symbol,
    idx: usize,
}

/// A code of `length` bits, stored in the low bits of `code` with the first
/// bit highest.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PrefixCode {
    pub code: u128,
    pub length: u8,
}

/// Symbol to code mapping. No code is a prefix of another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, PrefixCode>,
}

/// Code to symbol mapping, the inverse of a `CodeTable`.
#[derive(Debug, Clone)]
pub struct ReverseCodeTable {
    symbols: HashMap<PrefixCode, Symbol>,
    max_length: u8,
}

impl Node {
    fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }
}

impl PrefixCode {
    /// Longest representable code. Weights are `u64`, which keeps any Huffman
    /// tree shallower than this.
    pub const MAX_LENGTH: u8 = 128;

    pub fn update(prefix_code: PrefixCode, bit: bool) -> PrefixCode {
        PrefixCode {
            code: (prefix_code.code << 1) | bit as u128,
            length: prefix_code.length + 1,
        }
    }

    /// Parses a string of `0` and `1` characters.
    pub fn parse(bits: &str) -> Option<PrefixCode> {
        if bits.is_empty() || bits.len() > Self::MAX_LENGTH as usize {
            return None;
        }

        bits.chars().try_fold(PrefixCode::default(), |code, c| match c {
            '0' => Some(PrefixCode::update(code, false)),
            '1' => Some(PrefixCode::update(code, true)),
            _ => None,
        })
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.length).rev().map(move |i| (self.code >> i) & 1 == 1)
    }

    pub fn is_prefix_of(&self, other: &PrefixCode) -> bool {
        self.length <= other.length
            && (self.length == 0 || other.code >> (other.length - self.length) == self.code)
    }
}

impl fmt::Display for PrefixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for PrefixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrefixCode({})", self)
    }
}

impl HuffmanTree {
    pub fn build(freqs: &FrequencyTable) -> HuffmanTree {
        let mut nodes = Vec::with_capacity(2 * freqs.len() - 1);

        // Reversed so that it becomes a min heap.
        let mut heap = BinaryHeap::<Reverse<HeapEntry>>::new();

        for (symbol, weight) in freqs.iter() {
            heap.push(Reverse(HeapEntry {
                weight,
                min_symbol: symbol,
                idx: nodes.len(),
            }));
            nodes.push(Node::Leaf { symbol, weight });
        }

        // The first entry popped is the smaller one under the heap order, and
        // it always becomes the left child.
        let mut root = 0;
        while let Some(Reverse(left)) = heap.pop() {
            let Some(Reverse(right)) = heap.pop() else {
                root = left.idx;
                break;
            };

            let weight = left.weight + right.weight;
            heap.push(Reverse(HeapEntry {
                weight,
                min_symbol: left.min_symbol.min(right.min_symbol),
                idx: nodes.len(),
            }));
            nodes.push(Node::Internal {
                weight,
                left: left.idx,
                right: right.idx,
            });
        }

        HuffmanTree { nodes, root }
    }

    /// Total weight, i.e. the number of symbols the tree encodes.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::default();

        match self.nodes[self.root] {
            // No branch to descend, but the code still needs a bit.
            Node::Leaf { symbol, .. } => {
                table.codes.insert(symbol, PrefixCode::update(PrefixCode::default(), false));
            }
            Node::Internal { .. } => self.assign_codes(self.root, PrefixCode::default(), &mut table),
        }

        table
    }

    fn assign_codes(&self, idx: usize, code: PrefixCode, table: &mut CodeTable) {
        match self.nodes[idx] {
            Node::Leaf { symbol, .. } => {
                table.codes.insert(symbol, code);
            }
            Node::Internal { left, right, .. } => {
                self.assign_codes(left, PrefixCode::update(code, false), table);
                self.assign_codes(right, PrefixCode::update(code, true), table);
            }
        }
    }
}

impl From<&FrequencyTable> for CodeTable {
    fn from(freqs: &FrequencyTable) -> Self {
        HuffmanTree::build(freqs).code_table()
    }
}

impl CodeTable {
    /// Builds a table from parsed entries without checking prefix-freeness.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Symbol, PrefixCode)>,
    ) -> Result<Self, FormatError> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if codes.insert(symbol, code).is_some() {
                return Err(FormatError::DuplicateSymbol { symbol });
            }
        }
        Ok(Self { codes })
    }

    pub fn code(&self, symbol: Symbol) -> Option<&PrefixCode> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &PrefixCode)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_length(&self) -> u8 {
        self.codes.values().map(|code| code.length).max().unwrap_or(0)
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut codes = self.codes.values().collect::<Vec<_>>();
        // Sorting bitstrings lexicographically puts any prefix directly
        // before the codes it prefixes.
        codes.sort_by_key(|code| code.to_string());
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    pub fn reverse(&self) -> Result<ReverseCodeTable, FormatError> {
        let mut symbols = HashMap::with_capacity(self.codes.len());
        for (&symbol, &code) in &self.codes {
            if symbols.insert(code, symbol).is_some() {
                return Err(FormatError::DuplicateCode {
                    code: code.to_string(),
                });
            }
        }

        Ok(ReverseCodeTable {
            symbols,
            max_length: self.max_length(),
        })
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            match symbol::to_char(symbol) {
                Some(c) => writeln!(f, "{:?} ({}): {}", c, symbol, code)?,
                None if symbol == SENTINEL => writeln!(f, "EOF ({}): {}", symbol, code)?,
                None => writeln!(f, "? ({}): {}", symbol, code)?,
            }
        }
        Ok(())
    }
}

impl ReverseCodeTable {
    pub fn symbol(&self, code: &PrefixCode) -> Option<Symbol> {
        self.symbols.get(code).copied()
    }

    pub fn max_length(&self) -> u8 {
        self.max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn code(bits: &str) -> PrefixCode {
        PrefixCode::parse(bits).unwrap()
    }

    #[test]
    fn abracadabra_codes() {
        let table = CodeTable::from(&FrequencyTable::from_text("ABRACADABRA\n"));

        let expected = [
            ('\n' as Symbol, "1000"),
            ('A' as Symbol, "0"),
            ('B' as Symbol, "101"),
            ('C' as Symbol, "1001"),
            ('D' as Symbol, "1100"),
            ('R' as Symbol, "111"),
            (SENTINEL, "1101"),
        ];
        for (symbol, bits) in expected {
            assert_eq!(table.code(symbol), Some(&code(bits)), "symbol {}", symbol);
        }
        assert_eq!(table.len(), expected.len());
    }

    #[test]
    fn tree_weight_is_symbol_count_plus_sentinel() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("ABRACADABRA\n"));
        assert_eq!(tree.weight(), 13);
    }

    #[test]
    fn single_entry_gets_one_bit() {
        let table = CodeTable::from(&FrequencyTable::new());
        assert_eq!(table.len(), 1);
        assert_eq!(table.code(SENTINEL), Some(&code("0")));
    }

    #[test]
    fn single_symbol_with_sentinel() {
        let table = CodeTable::from(&FrequencyTable::from_text("aaaaa"));
        assert_eq!(table.code(SENTINEL), Some(&code("0")));
        assert_eq!(table.code('a' as Symbol), Some(&code("1")));
    }

    #[test]
    fn equal_weights_break_ties_by_symbol() {
        let table = CodeTable::from(&FrequencyTable::from_counts([(99, 1), (98, 1), (97, 1)]));
        // (a, b) merge first, then (c, EOF), then the two pairs.
        assert_eq!(table.code(97), Some(&code("00")));
        assert_eq!(table.code(98), Some(&code("01")));
        assert_eq!(table.code(99), Some(&code("10")));
        assert_eq!(table.code(SENTINEL), Some(&code("11")));
    }

    #[test]
    fn skewed_input_gives_frequent_symbol_the_shortest_code() {
        let table = CodeTable::from(&FrequencyTable::from_text("AAAAAAAAB"));
        assert_eq!(table.code('A' as Symbol).unwrap().length, 1);
        assert_eq!(table.max_length(), 2);
    }

    #[test]
    fn prefix_code_parse_and_display() {
        assert_eq!(code("0010").to_string(), "0010");
        assert_eq!(code("0010").length, 4);
        assert_ne!(code("0"), code("00"));
        assert_eq!(PrefixCode::parse(""), None);
        assert_eq!(PrefixCode::parse("012"), None);
        assert_eq!(PrefixCode::parse(&"1".repeat(129)), None);
    }

    #[test]
    fn prefix_relation() {
        assert!(code("10").is_prefix_of(&code("101")));
        assert!(code("10").is_prefix_of(&code("10")));
        assert!(!code("11").is_prefix_of(&code("101")));
        assert!(!code("101").is_prefix_of(&code("10")));
    }

    #[test]
    fn reverse_rejects_shared_codes() {
        let table = CodeTable::from_entries([(97, code("01")), (98, code("01"))]).unwrap();
        assert_eq!(
            table.reverse().unwrap_err(),
            FormatError::DuplicateCode {
                code: "01".to_string()
            }
        );
    }

    #[test]
    fn from_entries_rejects_repeated_symbols() {
        let err = CodeTable::from_entries([(97, code("0")), (97, code("1"))]).unwrap_err();
        assert_eq!(err, FormatError::DuplicateSymbol { symbol: 97 });
    }

    #[test]
    fn reverse_finds_every_symbol() {
        let table = CodeTable::from(&FrequencyTable::from_text("mississippi"));
        let reverse = table.reverse().unwrap();
        for (symbol, code) in table.iter() {
            assert_eq!(reverse.symbol(code), Some(symbol));
        }
        assert_eq!(reverse.max_length(), table.max_length());
    }

    #[test]
    fn detects_prefix_violation() {
        let table = CodeTable::from_entries([(97, code("0")), (98, code("01"))]).unwrap();
        assert!(!table.is_prefix_free());
    }

    #[quickcheck]
    fn generated_codes_are_prefix_free(counts: Vec<(u16, u8)>) -> bool {
        let freqs =
            FrequencyTable::from_counts(counts.into_iter().map(|(s, c)| (s as Symbol, c as u64)));
        let table = CodeTable::from(&freqs);

        table.len() == freqs.len()
            && table.iter().all(|(_, code)| code.length > 0)
            && table.is_prefix_free()
    }

    #[quickcheck]
    fn building_is_deterministic(text: String) -> bool {
        let freqs = FrequencyTable::from_text(&text);
        CodeTable::from(&freqs) == CodeTable::from(&freqs.clone())
    }
}
