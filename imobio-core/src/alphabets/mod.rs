pub mod dna;
pub mod protein;

use bit_set::BitSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use vector_map::VecMap;

pub type SymbolRanks = VecMap<usize, u8>;

/// Molecule class of a sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    #[default]
    Unknown,
    Protein,
    Nucleotide,
    Dna,
    Rna,
}

impl Alphabet {
    pub fn is_nucleotide(self) -> bool {
        matches!(self, Alphabet::Nucleotide | Alphabet::Dna | Alphabet::Rna)
    }

    pub fn is_protein(self) -> bool {
        self == Alphabet::Protein
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alphabet::Unknown => "Unknown",
            Alphabet::Protein => "Protein",
            Alphabet::Nucleotide => "Nucleotide",
            Alphabet::Dna => "DNA",
            Alphabet::Rna => "RNA",
        };
        f.write_str(name)
    }
}

const GUESS_SAMPLE: usize = 100;
const GUESS_PERCENT: usize = 95;

/// Infer the alphabet from the first 100 non-gap characters.
///
/// RNA wins over DNA when both reach the 95% threshold, so a sample made
/// only of `A`, `C`, `G` and `N` is reported as RNA.
pub fn guess_alphabet(text: &str) -> Alphabet {
    let mut total = 0usize;
    let mut dna = 0usize;
    let mut rna = 0usize;

    for b in text.bytes().filter(|b| !dna::is_gap(*b)).take(GUESS_SAMPLE) {
        total += 1;
        let upper = b.to_ascii_uppercase();
        if matches!(upper, b'A' | b'G' | b'C' | b'N') {
            dna += 1;
            rna += 1;
        } else if upper == b'T' {
            dna += 1;
        } else if upper == b'U' {
            rna += 1;
        }
    }

    if total == 0 {
        return Alphabet::Unknown;
    }
    if rna * 100 / total >= GUESS_PERCENT {
        Alphabet::Rna
    } else if dna * 100 / total >= GUESS_PERCENT {
        Alphabet::Dna
    } else {
        Alphabet::Protein
    }
}

/// Unordered set of byte symbols.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolSet {
    pub symbols: BitSet,
}

impl SymbolSet {
    pub fn new<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let mut s = BitSet::new();
        s.extend(symbols.into_iter().map(|c| *c.borrow() as usize));
        SymbolSet { symbols: s }
    }

    #[inline]
    pub fn contains(&self, a: u8) -> bool {
        self.symbols.contains(a as usize)
    }

    pub fn is_word<C, T>(&self, text: T) -> bool
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        text.into_iter().all(|c| self.contains(*c.borrow()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn union(&self, other: &SymbolSet) -> Self {
        SymbolSet {
            symbols: self.symbols.union(&other.symbols).collect(),
        }
    }
}

/// Maps the symbols of an ordered alphabet to their position in it.
#[derive(Default, Clone, Debug)]
pub struct RankTransform {
    pub ranks: SymbolRanks,
}

impl RankTransform {
    /// Ranks follow the order of `symbols`; both cases of a letter share a rank.
    pub fn new(symbols: &[u8]) -> Self {
        let mut ranks = VecMap::new();
        for (r, &c) in symbols.iter().enumerate() {
            ranks.insert(c.to_ascii_lowercase() as usize, r as u8);
            ranks.insert(c.to_ascii_uppercase() as usize, r as u8);
        }
        RankTransform { ranks }
    }

    #[inline]
    pub fn get(&self, a: u8) -> Option<u8> {
        self.ranks.get(&(a as usize)).copied()
    }

    /// Ranks of every symbol in `text`, or `None` if any symbol is outside the alphabet.
    pub fn transform<C, T>(&self, text: T) -> Option<Vec<u8>>
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        text.into_iter().map(|c| self.get(*c.borrow())).collect()
    }

    pub fn len(&self) -> usize {
        self.ranks.values().copied().max().map_or(0, |m| m as usize + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
