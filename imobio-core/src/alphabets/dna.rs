use crate::alphabets::{RankTransform, SymbolSet};
use std::sync::LazyLock;

/// Unambiguous bases, in the order used by composition counts and thermodynamic tables.
pub const BASES: &[u8; 4] = b"acgt";
/// Bases plus the ambiguity code `n`.
pub const BASES_N: &[u8; 5] = b"acgtn";

pub fn alphabet() -> SymbolSet {
    SymbolSet::new(b"ACGTacgt")
}

pub fn iupac_alphabet() -> SymbolSet {
    SymbolSet::new(b"ACGTURYSWKMBDHVNacgturyswkmbdhvn")
}

pub(crate) static BASE_RANKS: LazyLock<RankTransform> =
    LazyLock::new(|| RankTransform::new(BASES_N));

#[inline]
pub fn is_gap(b: u8) -> bool {
    b == b'-' || b == b'.'
}

static COMPLEMENT: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut comp = [b'-'; 256];
    comp[b'*' as usize] = b'*';
    b"acgturykmswbvdhn"
        .iter()
        .zip(b"tgcaayrmkswvbhdn".iter())
        .for_each(|(&a, &b)| {
            comp[a as usize] = b;
            comp[a.to_ascii_uppercase() as usize] = b.to_ascii_uppercase();
        });
    comp
});

/// Complement of one base; case is kept, unknown symbols become `-`.
#[inline]
pub fn complement(a: u8) -> u8 {
    COMPLEMENT[a as usize]
}

pub fn reverse_complement(text: &[u8]) -> Vec<u8> {
    text.iter().rev().map(|&a| complement(a)).collect()
}

/// Watson-Crick pairing of two unambiguous bases, case-insensitive.
#[inline]
pub fn is_complement(a: u8, b: u8) -> bool {
    matches!(
        (a.to_ascii_lowercase(), b.to_ascii_lowercase()),
        (b'a', b't') | (b't', b'a') | (b'g', b'c') | (b'c', b'g')
    )
}
