use crate::alphabets::SymbolSet;

/// The 20 standard residues.
pub const RESIDUES: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";
/// Standard residues plus `B`, `Z`, `X` and the stop symbol, the order used for counts.
pub const RESIDUES_N: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

pub fn alphabet() -> SymbolSet {
    SymbolSet::new(RESIDUES)
}

pub fn iupac_alphabet() -> SymbolSet {
    SymbolSet::new(RESIDUES_N)
}
