use crate::alphabets::{dna, guess_alphabet, protein, Alphabet};
use crate::error::{BioError, BioResult};
use crate::seq::nucleotide::NucleotideStats;
use memchr::memmem;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Immutable biological sequence tagged with its alphabet.
///
/// Derived statistics are computed on first use and kept for the lifetime
/// of the value; the character data itself never changes.
#[derive(Clone)]
pub struct Sequence {
    data: Box<str>,
    alphabet: Alphabet,
    pub(crate) stats: OnceLock<NucleotideStats>,
    pub(crate) default_tm: OnceLock<f64>,
}

impl Sequence {
    /// Build a sequence with a guessed alphabet. Whitespace is removed, case is kept.
    pub fn new(text: &str) -> Self {
        let data = strip_whitespace(text);
        let alphabet = guess_alphabet(&data);
        Self::from_clean(data, alphabet)
    }

    /// Build a sequence with a known alphabet, applying its case convention:
    /// nucleotides are stored lowercase and proteins uppercase.
    pub fn with_alphabet(text: &str, alphabet: Alphabet) -> Self {
        let mut data = strip_whitespace(text);
        if alphabet.is_nucleotide() {
            data.make_ascii_lowercase();
        } else if alphabet.is_protein() {
            data.make_ascii_uppercase();
        }
        Self::from_clean(data, alphabet)
    }

    pub fn dna(text: &str) -> Self {
        Self::with_alphabet(text, Alphabet::Dna)
    }

    pub fn rna(text: &str) -> Self {
        Self::with_alphabet(text, Alphabet::Rna)
    }

    pub fn protein(text: &str) -> Self {
        Self::with_alphabet(text, Alphabet::Protein)
    }

    fn from_clean(data: String, alphabet: Alphabet) -> Self {
        Self {
            data: data.into_boxed_str(),
            alphabet,
            stats: OnceLock::new(),
            default_tm: OnceLock::new(),
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Substring of `length` symbols from `start`; a negative length takes
    /// `|length|` symbols and reverses them.
    pub fn sub_seq(&self, start: usize, length: isize) -> BioResult<Sequence> {
        let n = length.unsigned_abs();
        let slice = start
            .checked_add(n)
            .and_then(|end| self.data.get(start..end));
        let Some(slice) = slice else {
            return Err(BioError::InvalidRange {
                start,
                length,
                seq_len: self.len(),
            });
        };
        let data = if length < 0 {
            slice.chars().rev().collect()
        } else {
            slice.to_string()
        };
        Ok(Self::from_clean(data, self.alphabet))
    }

    pub fn reverse(&self) -> Sequence {
        Self::from_clean(self.data.chars().rev().collect(), self.alphabet)
    }

    /// Complementary strand; symbols without a complement become `-`.
    pub fn complement(&self) -> Sequence {
        let bytes: Vec<u8> = self.as_bytes().iter().map(|&b| dna::complement(b)).collect();
        Self::from_clean(bytes_to_string(bytes), self.alphabet)
    }

    pub fn reverse_complement(&self) -> Sequence {
        let bytes = dna::reverse_complement(self.as_bytes());
        Self::from_clean(bytes_to_string(bytes), self.alphabet)
    }

    /// True if any symbol is outside the unambiguous alphabet
    /// (`acgt` for nucleotides, the 20 standard residues for proteins).
    pub fn has_ambiguous(&self) -> bool {
        if self.alphabet.is_protein() {
            let residues = protein::alphabet();
            !residues.is_word(self.as_bytes())
        } else {
            self.nucleotide_stats().ambiguous
        }
    }

    /// Residue counts in the order `ARNDCQEGHILKMFPSTWYVBZX*`; other symbols are skipped.
    pub fn count_residues(&self) -> [usize; 24] {
        let mut counts = [0usize; 24];
        for &b in self.as_bytes() {
            let upper = b.to_ascii_uppercase();
            if let Some(idx) = protein::RESIDUES_N.iter().position(|&r| r == upper) {
                counts[idx] += 1;
            }
        }
        counts
    }

    /// Human readable length, `"N bp"` for nucleotides and `"N AA"` otherwise.
    pub fn length_label(&self) -> String {
        if self.alphabet.is_nucleotide() {
            format!("{} bp", self.len())
        } else {
            format!("{} AA", self.len())
        }
    }

    /// Copy keeping only ASCII letters.
    pub fn remove_gaps(&self) -> Sequence {
        let data: String = self.data.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        Self::from_clean(data, self.alphabet)
    }

    /// Start of the first case-insensitive occurrence of `motif`.
    pub fn find(&self, motif: &str) -> Option<usize> {
        if motif.is_empty() {
            return Some(0);
        }
        let hay = self.data.to_ascii_uppercase();
        memmem::find(hay.as_bytes(), motif.to_ascii_uppercase().as_bytes())
    }

    /// Starts of all case-insensitive occurrences of `motif`, overlaps included.
    pub fn find_all(&self, motif: &str) -> Vec<usize> {
        if motif.is_empty() {
            return Vec::new();
        }
        let hay = self.data.to_ascii_uppercase();
        let needle = motif.to_ascii_uppercase();
        let finder = memmem::Finder::new(needle.as_bytes());
        let mut hits = Vec::new();
        let mut pos = 0usize;
        while let Some(i) = finder.find(&hay.as_bytes()[pos..]) {
            hits.push(pos + i);
            pos += i + 1;
        }
        hits
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("alphabet", &self.alphabet)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.data == other.data
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alphabet.hash(state);
        self.data.hash(state);
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.data
    }
}

impl From<&str> for Sequence {
    fn from(text: &str) -> Self {
        Sequence::new(text)
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

// the complement table only produces ASCII
fn bytes_to_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn construction_strips_whitespace_only() {
        let seq = Sequence::new("AC GT\tac\ngt");
        assert_eq!(seq.as_str(), "ACGTacgt");
        assert_eq!(seq.alphabet(), Alphabet::Dna);
    }

    #[test]
    fn typed_constructors_apply_case_convention() {
        assert_eq!(Sequence::dna("ACgT").as_str(), "acgt");
        assert_eq!(Sequence::protein("mkv").as_str(), "MKV");
        assert_eq!(Sequence::new("mkv").as_str(), "mkv");
    }

    #[test]
    fn sub_seq_negative_length_reverses() {
        let seq = Sequence::dna("acgtta");
        assert_eq!(seq.sub_seq(1, 3).unwrap().as_str(), "cgt");
        assert_eq!(seq.sub_seq(1, -3).unwrap().as_str(), "tgc");
        assert_eq!(seq.sub_seq(6, 0).unwrap().as_str(), "");
        match seq.sub_seq(4, 3).unwrap_err() {
            BioError::InvalidRange { .. } => {}
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn complement_and_reverse() {
        let seq = Sequence::dna("aacgn");
        assert_eq!(seq.complement().as_str(), "ttgcn");
        assert_eq!(seq.reverse().as_str(), "ngcaa");
        assert_eq!(seq.reverse_complement().as_str(), "ncgtt");
    }

    #[test]
    fn ambiguity_depends_on_alphabet() {
        assert!(!Sequence::dna("acgt").has_ambiguous());
        assert!(Sequence::dna("acgnt").has_ambiguous());
        assert!(!Sequence::protein("MKV").has_ambiguous());
        assert!(Sequence::protein("MKX").has_ambiguous());
    }

    #[test]
    fn labels_and_gaps() {
        assert_eq!(Sequence::dna("acgt").length_label(), "4 bp");
        assert_eq!(Sequence::protein("MKV").length_label(), "3 AA");
        assert_eq!(Sequence::dna("ac--g.t").remove_gaps().as_str(), "acgt");
    }

    #[test]
    fn residue_counts_skip_unknown() {
        let counts = Sequence::protein("AAR#*").count_residues();
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[23], 1);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn motif_search_is_case_insensitive_and_overlapping() {
        let seq = Sequence::dna("aaaTTTaaa");
        assert_eq!(seq.find("TTTA"), Some(3));
        assert_eq!(seq.find("ggg"), None);
        assert_eq!(seq.find_all("AA"), vec![0, 1, 6, 7]);
        assert!(seq.find_all("").is_empty());
    }

    proptest! {
        #[test]
        fn reverse_complement_round_trips(s in "[acgt]{0,200}") {
            let seq = Sequence::dna(&s);
            prop_assert_eq!(seq.reverse_complement().reverse_complement(), seq);
        }
    }
}
