//! Residue substitution scoring matrices.

use std::fmt;

const PROTEIN_ORDER: &str = "ARNDCQEGHILKMFPSTWYVBZX*";

/// Square scoring matrix over the residues of `order`.
///
/// Cells are stored row-major with `stride` columns, which lets a matrix
/// over a prefix of the residues share the cells of a larger one.
pub struct SubstitutionMatrix {
    pub name: &'static str,
    pub order: &'static str,
    pub scale: f64,
    pub entropy: f64,
    pub expected_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    stride: usize,
    cells: &'static [i8],
}

impl SubstitutionMatrix {
    pub fn size(&self) -> usize {
        self.order.len()
    }

    fn rank(&self, residue: u8) -> Option<usize> {
        let up = residue.to_ascii_uppercase();
        self.order.bytes().position(|r| r == up)
    }

    /// Score of substituting `a` by `b`, case-insensitive.
    pub fn score(&self, a: u8, b: u8) -> Option<i32> {
        let (i, j) = (self.rank(a)?, self.rank(b)?);
        Some(self.cells[i * self.stride + j] as i32)
    }

    /// Row `i` of the matrix, in `order`.
    pub fn row(&self, i: usize) -> Option<&'static [i8]> {
        if i >= self.size() {
            return None;
        }
        let start = i * self.stride;
        Some(&self.cells[start..start + self.size()])
    }

    /// All six bundled matrices.
    pub fn all() -> [&'static SubstitutionMatrix; 6] {
        [&BLOSUM50, &BLOSUM50_STANDARD, &BLOSUM62, &PAM50, &PAM150, &NUC44]
    }

    /// Case-insensitive lookup by name; the 24-residue BLOSUM50 wins over
    /// its 20-residue restriction.
    pub fn by_name(name: &str) -> Option<&'static SubstitutionMatrix> {
        Self::all()
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for SubstitutionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionMatrix")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

pub static BLOSUM50: SubstitutionMatrix = SubstitutionMatrix {
    name: "BLOSUM50",
    order: PROTEIN_ORDER,
    scale: 1.0 / 3.0,
    entropy: 0.4808,
    expected_score: -0.3573,
    highest_score: 15.0,
    lowest_score: -5.0,
    stride: 24,
    cells: &BLOSUM50_CELLS,
};

/// BLOSUM50 over the 20 standard amino acids.
pub static BLOSUM50_STANDARD: SubstitutionMatrix = SubstitutionMatrix {
    name: "BLOSUM50",
    order: "ARNDCQEGHILKMFPSTWYV",
    scale: 1.0 / 3.0,
    entropy: 0.4808,
    expected_score: -0.3573,
    highest_score: 15.0,
    lowest_score: -5.0,
    stride: 24,
    cells: &BLOSUM50_CELLS,
};

pub static BLOSUM62: SubstitutionMatrix = SubstitutionMatrix {
    name: "BLOSUM62",
    order: PROTEIN_ORDER,
    scale: 0.5,
    entropy: 0.6979,
    expected_score: -0.5209,
    highest_score: 11.0,
    lowest_score: -4.0,
    stride: 24,
    cells: &BLOSUM62_CELLS,
};

pub static PAM50: SubstitutionMatrix = SubstitutionMatrix {
    name: "PAM50",
    order: PROTEIN_ORDER,
    scale: 0.5,
    entropy: 2.00,
    expected_score: -3.70,
    highest_score: 13.0,
    lowest_score: -13.0,
    stride: 24,
    cells: &PAM50_CELLS,
};

pub static PAM150: SubstitutionMatrix = SubstitutionMatrix {
    name: "PAM150",
    order: PROTEIN_ORDER,
    scale: 0.5,
    entropy: 0.754,
    expected_score: -1.25,
    highest_score: 12.0,
    lowest_score: -7.0,
    stride: 24,
    cells: &PAM150_CELLS,
};

/// NCBI nucleotide matrix over the IUPAC codes.
pub static NUC44: SubstitutionMatrix = SubstitutionMatrix {
    name: "NUC4.4",
    order: "ACGTRYKMSWBDHVN",
    scale: 0.277316,
    entropy: 0.5164710,
    expected_score: -1.7495024,
    highest_score: 5.0,
    lowest_score: -4.0,
    stride: 15,
    cells: &NUC44_CELLS,
};

#[rustfmt::skip]
const BLOSUM50_CELLS: [i8; 576] = [
     5, -2, -1, -2, -1, -1, -1,  0, -2, -1, -2, -1, -1, -3, -1,  1,  0, -3, -2,  0, -2, -1, -1, -5,
    -2,  7, -1, -2, -4,  1,  0, -3,  0, -4, -3,  3, -2, -3, -3, -1, -1, -3, -1, -3, -1,  0, -1, -5,
    -1, -1,  7,  2, -2,  0,  0,  0,  1, -3, -4,  0, -2, -4, -2,  1,  0, -4, -2, -3,  4,  0, -1, -5,
    -2, -2,  2,  8, -4,  0,  2, -1, -1, -4, -4, -1, -4, -5, -1,  0, -1, -5, -3, -4,  5,  1, -1, -5,
    -1, -4, -2, -4, 13, -3, -3, -3, -3, -2, -2, -3, -2, -2, -4, -1, -1, -5, -3, -1, -3, -3, -2, -5,
    -1,  1,  0,  0, -3,  7,  2, -2,  1, -3, -2,  2,  0, -4, -1,  0, -1, -1, -1, -3,  0,  4, -1, -5,
    -1,  0,  0,  2, -3,  2,  6, -3,  0, -4, -3,  1, -2, -3, -1, -1, -1, -3, -2, -3,  1,  5, -1, -5,
     0, -3,  0, -1, -3, -2, -3,  8, -2, -4, -4, -2, -3, -4, -2,  0, -2, -3, -3, -4, -1, -2, -2, -5,
    -2,  0,  1, -1, -3,  1,  0, -2, 10, -4, -3,  0, -1, -1, -2, -1, -2, -3,  2, -4,  0,  0, -1, -5,
    -1, -4, -3, -4, -2, -3, -4, -4, -4,  5,  2, -3,  2,  0, -3, -3, -1, -3, -1,  4, -4, -3, -1, -5,
    -2, -3, -4, -4, -2, -2, -3, -4, -3,  2,  5, -3,  3,  1, -4, -3, -1, -2, -1,  1, -4, -3, -1, -5,
    -1,  3,  0, -1, -3,  2,  1, -2,  0, -3, -3,  6, -2, -4, -1,  0, -1, -3, -2, -3,  0,  1, -1, -5,
    -1, -2, -2, -4, -2,  0, -2, -3, -1,  2,  3, -2,  7,  0, -3, -2, -1, -1,  0,  1, -3, -1, -1, -5,
    -3, -3, -4, -5, -2, -4, -3, -4, -1,  0,  1, -4,  0,  8, -4, -3, -2,  1,  4, -1, -4, -4, -2, -5,
    -1, -3, -2, -1, -4, -1, -1, -2, -2, -3, -4, -1, -3, -4, 10, -1, -1, -4, -3, -3, -2, -1, -2, -5,
     1, -1,  1,  0, -1,  0, -1,  0, -1, -3, -3,  0, -2, -3, -1,  5,  2, -4, -2, -2,  0,  0, -1, -5,
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  2,  5, -3, -2,  0,  0, -1,  0, -5,
    -3, -3, -4, -5, -5, -1, -3, -3, -3, -3, -2, -3, -1,  1, -4, -4, -3, 15,  2, -3, -5, -2, -3, -5,
    -2, -1, -2, -3, -3, -1, -2, -3,  2, -1, -1, -2,  0,  4, -3, -2, -2,  2,  8, -1, -3, -2, -1, -5,
     0, -3, -3, -4, -1, -3, -3, -4, -4,  4,  1, -3,  1, -1, -3, -2,  0, -3, -1,  5, -4, -3, -1, -5,
    -2, -1,  4,  5, -3,  0,  1, -1,  0, -4, -4,  0, -3, -4, -2,  0,  0, -5, -3, -4,  5,  2, -1, -5,
    -1,  0,  0,  1, -3,  4,  5, -2,  0, -3, -3,  1, -1, -4, -1,  0, -1, -2, -2, -3,  2,  5, -1, -5,
    -1, -1, -1, -1, -2, -1, -1, -2, -1, -1, -1, -1, -1, -2, -2, -1,  0, -3, -1, -1, -1, -1, -1, -5,
    -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5, -5,  1,
];

#[rustfmt::skip]
const BLOSUM62_CELLS: [i8; 576] = [
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4,
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4,
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4,
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4,
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4,
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4,
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4,
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4,
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4,
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4,
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4,
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4,
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4,
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4,
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4,
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4,
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4,
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4,
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4,
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4,
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4,
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4,
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4,
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1,
];

#[rustfmt::skip]
const PAM50_CELLS: [i8; 576] = [
     5, -5, -2, -2, -5, -3, -1, -1, -5, -3, -5, -5, -4, -7,  0,  0,  0,-11, -6, -1, -2, -2, -2,-13,
    -5,  8, -4, -7, -6,  0, -7, -7,  0, -4, -7,  1, -3, -8, -3, -2, -5, -1, -8, -6, -5, -2, -4,-13,
    -2, -4,  7,  2, -8, -2, -1, -2,  1, -4, -6,  0, -6, -7, -4,  1, -1, -7, -3, -6,  5, -1, -2,-13,
    -2, -7,  2,  7,-11, -1,  3, -2, -2, -6,-10, -3, -8,-12, -6, -2, -3,-12, -9, -6,  6,  2, -4,-13,
    -5, -6, -8,-11,  9,-11,-11, -7, -6, -5,-12,-11,-11,-10, -6, -2, -6,-13, -3, -5, -9,-11, -7,-13,
    -3,  0, -2, -1,-11,  8,  2, -5,  2, -6, -4, -2, -3,-10, -2, -4, -4,-10, -9, -5, -2,  6, -3,-13,
    -1, -7, -1,  3,-11,  2,  7, -3, -3, -4, -7, -3, -5,-11, -4, -3, -4,-13, -7, -5,  2,  6, -3,-13,
    -1, -7, -2, -2, -7, -5, -3,  6, -7, -8, -9, -6, -7, -8, -4, -1, -4,-12,-11, -4, -2, -4, -4,-13,
    -5,  0,  1, -2, -6,  2, -3, -7,  9, -7, -5, -4, -8, -5, -3, -4, -5, -6, -2, -5,  0,  0, -4,-13,
    -3, -4, -4, -6, -5, -6, -4, -8, -7,  8,  0, -5,  0, -1, -7, -5, -1,-11, -5,  3, -5, -5, -3,-13,
    -5, -7, -6,-10,-12, -4, -7, -9, -5,  0,  6, -6,  2, -1, -6, -7, -5, -5, -5, -1, -7, -5, -5,-13,
    -5,  1,  0, -3,-11, -2, -3, -6, -4, -5, -6,  6, -1,-11, -5, -3, -2, -9, -8, -7, -1, -2, -4,-13,
    -4, -3, -6, -8,-11, -3, -5, -7, -8,  0,  2, -1, 10, -3, -6, -4, -3,-10, -8,  0, -7, -4, -4,-13,
    -7, -8, -7,-12,-10,-10,-11, -8, -5, -1, -1,-11, -3,  9, -8, -5, -7, -3,  3, -6, -9,-11, -6,-13,
     0, -3, -4, -6, -6, -2, -4, -4, -3, -7, -6, -5, -6, -8,  8, -1, -3,-11,-11, -4, -5, -3, -4,-13,
     0, -2,  1, -2, -2, -4, -3, -1, -4, -5, -7, -3, -4, -5, -1,  6,  1, -4, -5, -4, -1, -3, -2,-13,
     0, -5, -1, -3, -6, -4, -4, -4, -5, -1, -5, -2, -3, -7, -3,  1,  6,-10, -5, -2, -2, -4, -2,-13,
   -11, -1, -7,-12,-13,-10,-13,-12, -6,-11, -5, -9,-10, -3,-11, -4,-10, 13, -4,-12, -8,-11, -9,-13,
    -6, -8, -3, -9, -3, -9, -7,-11, -2, -5, -5, -8, -8,  3,-11, -5, -5, -4,  9, -6, -5, -8, -6,-13,
    -1, -6, -6, -6, -5, -5, -5, -4, -5,  3, -1, -7,  0, -6, -4, -4, -2,-12, -6,  7, -6, -5, -3,-13,
    -2, -5,  5,  6, -9, -2,  2, -2,  0, -5, -7, -1, -7, -9, -5, -1, -2, -8, -5, -6,  5,  1, -3,-13,
    -2, -2, -1,  2,-11,  6,  6, -4,  0, -5, -5, -2, -4,-11, -3, -3, -4,-11, -8, -5,  1,  6, -3,-13,
    -2, -4, -2, -4, -7, -3, -3, -4, -4, -3, -5, -4, -4, -6, -4, -2, -2, -9, -6, -3, -3, -3, -4,-13,
   -13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,-13,  1,
];

#[rustfmt::skip]
const PAM150_CELLS: [i8; 576] = [
     3, -2,  0,  0, -2, -1,  0,  1, -2, -1, -2, -2, -1, -4,  1,  1,  1, -6, -3,  0,  0,  0, -1, -7,
    -2,  6, -1, -2, -4,  1, -2, -3,  1, -2, -3,  3, -1, -4, -1, -1, -2,  1, -4, -3, -2,  0, -1, -7,
     0, -1,  3,  2, -4,  0,  1,  0,  2, -2, -3,  1, -2, -4, -1,  1,  0, -4, -2, -2,  3,  1, -1, -7,
     0, -2,  2,  4, -6,  1,  3,  0,  0, -3, -5, -1, -3, -6, -2,  0, -1, -7, -4, -3,  3,  2, -1, -7,
    -2, -4, -4, -6,  9, -6, -6, -4, -3, -2, -6, -6, -5, -5, -3,  0, -3, -7,  0, -2, -5, -6, -3, -7,
    -1,  1,  0,  1, -6,  5,  2, -2,  3, -3, -2,  0, -1, -5,  0, -1, -1, -5, -4, -2,  1,  4, -1, -7,
     0, -2,  1,  3, -6,  2,  4, -1,  0, -2, -4, -1, -2, -6, -1, -1, -1, -7, -4, -2,  2,  4, -1, -7,
     1, -3,  0,  0, -4, -2, -1,  4, -3, -3, -4, -2, -3, -5, -1,  1, -1, -7, -5, -2,  0, -1, -1, -7,
    -2,  1,  2,  0, -3,  3,  0, -3,  6, -3, -2, -1, -3, -2, -1, -1, -2, -3,  0, -3,  1,  1, -1, -7,
    -1, -2, -2, -3, -2, -3, -2, -3, -3,  5,  1, -2,  2,  0, -3, -2,  0, -5, -2,  3, -2, -2, -1, -7,
    -2, -3, -3, -5, -6, -2, -4, -4, -2,  1,  5, -3,  3,  1, -3, -3, -2, -2, -2,  1, -4, -3, -2, -7,
    -2,  3,  1, -1, -6,  0, -1, -2, -1, -2, -3,  4,  0, -6, -2, -1,  0, -4, -4, -3,  0,  0, -1, -7,
    -1, -1, -2, -3, -5, -1, -2, -3, -3,  2,  3,  0,  7, -1, -3, -2, -1, -5, -3,  1, -3, -2, -1, -7,
    -4, -4, -4, -6, -5, -5, -6, -5, -2,  0,  1, -6, -1,  7, -5, -3, -3, -1,  5, -2, -5, -5, -3, -7,
     1, -1, -1, -2, -3,  0, -1, -1, -1, -3, -3, -2, -3, -5,  6,  1,  0, -6, -5, -2, -2, -1, -1, -7,
     1, -1,  1,  0,  0, -1, -1,  1, -1, -2, -3, -1, -2, -3,  1,  2,  1, -2, -3, -1,  0, -1,  0, -7,
     1, -2,  0, -1, -3, -1, -1, -1, -2,  0, -2,  0, -1, -3,  0,  1,  4, -5, -3,  0,  0, -1, -1, -7,
    -6,  1, -4, -7, -7, -5, -7, -7, -3, -5, -2, -4, -5, -1, -6, -2, -5, 12, -1, -6, -5, -6, -4, -7,
    -3, -4, -2, -4,  0, -4, -4, -5,  0, -2, -2, -4, -3,  5, -5, -3, -3, -1,  8, -3, -3, -4, -3, -7,
     0, -3, -2, -3, -2, -2, -2, -2, -3,  3,  1, -3,  1, -2, -2, -1,  0, -6, -3,  4, -2, -2, -1, -7,
     0, -2,  3,  3, -5,  1,  2,  0,  1, -2, -4,  0, -3, -5, -2,  0,  0, -5, -3, -2,  3,  2, -1, -7,
     0,  0,  1,  2, -6,  4,  4, -1,  1, -2, -3,  0, -2, -5, -1, -1, -1, -6, -4, -2,  2,  4, -1, -7,
    -1, -1, -1, -1, -3, -1, -1, -1, -1, -1, -2, -1, -1, -3, -1,  0, -1, -4, -3, -1, -1, -1, -1, -7,
    -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7, -7,  1,
];

#[rustfmt::skip]
const NUC44_CELLS: [i8; 225] = [
     5, -4, -4, -4,  1, -4, -4,  1, -4,  1, -4, -1, -1, -1, -2,
    -4,  5, -4, -4, -4,  1, -4,  1,  1, -4, -1, -4, -1, -1, -2,
    -4, -4,  5, -4,  1, -4,  1, -4,  1, -4, -1, -1, -4, -1, -2,
    -4, -4, -4,  5, -4,  1,  1, -4, -4,  1, -1, -1, -1, -4, -2,
     1, -4,  1, -4, -1, -4, -2, -2, -2, -2, -3, -1, -3, -1, -1,
    -4,  1, -4,  1, -4, -1, -2, -2, -2, -2, -1, -3, -1, -3, -1,
    -4, -4,  1,  1, -2, -2, -1, -4, -2, -2, -1, -1, -3, -3, -1,
     1,  1, -4, -4, -2, -2, -4, -1, -2, -2, -3, -3, -1, -1, -1,
    -4,  1,  1, -4, -2, -2, -2, -2, -1, -4, -1, -3, -3, -1, -1,
     1, -4, -4,  1, -2, -2, -2, -2, -4, -1, -3, -1, -1, -3, -1,
    -4, -1, -1, -1, -3, -1, -1, -3, -1, -3, -1, -2, -2, -2, -1,
    -1, -4, -1, -1, -1, -3, -1, -3, -3, -1, -2, -1, -2, -2, -1,
    -1, -1, -4, -1, -3, -1, -3, -1, -3, -1, -2, -2, -1, -2, -1,
    -1, -1, -1, -4, -1, -3, -3, -1, -1, -3, -2, -2, -2, -1, -1,
    -2, -2, -2, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];
