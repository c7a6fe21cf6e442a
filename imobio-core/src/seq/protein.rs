use crate::alphabets::protein::RESIDUES_N;
use crate::error::{BioError, BioResult};
use crate::seq::sequence::Sequence;

/// Half-life of a protein with this N-terminal residue, in hours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfLife {
    pub mammalian: f64,
    pub yeast: f64,
    pub ecoli: f64,
}

/// Physicochemical constants of one amino acid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AminoAcidInfo {
    pub code: char,
    pub triplet: &'static str,
    pub name: &'static str,
    pub formula: &'static str,
    pub mol_weight: f64,
    pub composition: f64,
    pub bulkiness: f64,
    pub polarity: f64,
    pub recognition_factor: f64,
    pub hydrophobicity: f64,
    pub hydropathy_kd: f64,
    pub refractivity: f64,
    pub codons: f64,
    pub percent_buried: f64,
    pub percent_accessible: f64,
    pub average_area_buried: f64,
    pub average_flexibility: f64,
    pub half_life: HalfLife,
}

/// pK values of ionisable groups (EMBOSS set).
pub mod pk {
    pub const N_TERM: f64 = 8.6;
    pub const K: f64 = 10.8;
    pub const R: f64 = 12.5;
    pub const H: f64 = 6.5;
    pub const D: f64 = 3.9;
    pub const E: f64 = 4.1;
    pub const C: f64 = 8.5;
    pub const Y: f64 = 10.1;
    pub const C_TERM: f64 = 3.6;
}

const WATER: f64 = 18.01528;

#[allow(clippy::too_many_arguments)]
const fn aa(
    code: char,
    triplet: &'static str,
    name: &'static str,
    formula: &'static str,
    numbers: [f64; 13],
    half_life: [f64; 3],
) -> AminoAcidInfo {
    AminoAcidInfo {
        code,
        triplet,
        name,
        formula,
        mol_weight: numbers[0],
        composition: numbers[1],
        bulkiness: numbers[2],
        polarity: numbers[3],
        recognition_factor: numbers[4],
        hydrophobicity: numbers[5],
        hydropathy_kd: numbers[6],
        refractivity: numbers[7],
        codons: numbers[8],
        percent_buried: numbers[9],
        percent_accessible: numbers[10],
        average_area_buried: numbers[11],
        average_flexibility: numbers[12],
        half_life: HalfLife {
            mammalian: half_life[0],
            yeast: half_life[1],
            ecoli: half_life[2],
        },
    }
}

const MIN: f64 = 1.0 / 60.0;

pub static AMINO_ACIDS: [AminoAcidInfo; 21] = [
    aa('A', "ala", "Alanine", "C3H7NO2",
        [89.09, 8.3, 11.5, 8.1, 78.0, 0.62, 1.8, 4.34, 4.0, 11.2, 6.6, 86.6, 0.36], [4.4, 20.0, 10.0]),
    aa('C', "cys", "Cysteine", "C3H7NO2S",
        [121.15, 1.7, 13.46, 15.5, 89.0, 0.29, 2.5, 35.77, 1.0, 4.1, 0.9, 132.3, 0.35], [1.2, 20.0, 10.0]),
    aa('D', "asp", "AsparticAcid", "C4H7NO4",
        [133.1, 5.3, 11.68, 13.0, 81.0, -0.9, -3.5, 13.28, 2.0, 2.9, 7.7, 97.8, 0.51], [1.1, 2.0, 10.0]),
    aa('E', "glu", "GlutamicAcid", "C5H9NO4",
        [147.13, 6.2, 13.57, 12.3, 78.0, -0.74, -3.5, 17.56, 2.0, 1.8, 5.7, 113.9, 0.5], [1.0, 30.0, 10.0]),
    aa('F', "phe", "Phenylalanine", "C9H11NO2",
        [165.19, 3.9, 19.8, 5.2, 81.0, 1.19, 2.8, 29.4, 2.0, 5.1, 2.4, 194.1, 0.31], [1.1, 3.0, 2.0]),
    aa('G', "gly", "Glycine", "C2H5NO2",
        [75.07, 7.2, 3.4, 9.0, 84.0, 0.48, -0.4, 0.0, 4.0, 11.8, 6.7, 62.9, 0.54], [30.0, 20.0, 10.0]),
    aa('H', "his", "Histidine", "C6H9N3O2",
        [155.16, 2.2, 13.69, 10.4, 84.0, -0.4, -3.2, 21.81, 2.0, 2.0, 2.5, 155.8, 0.32], [3.5, 10.0, 10.0]),
    aa('I', "ile", "Isoleucine", "C6H13NO2",
        [131.17, 5.2, 21.4, 5.2, 88.0, 1.38, 4.5, 18.78, 3.0, 8.6, 2.8, 158.0, 0.46], [20.0, 30.0, 10.0]),
    aa('K', "lys", "Lysine", "C6H14N2O2",
        [146.19, 5.7, 15.71, 11.3, 87.0, -1.5, -3.9, 21.29, 2.0, 0.5, 10.3, 115.5, 0.47], [1.3, 3.0 * MIN, 2.0 * MIN]),
    aa('L', "leu", "Leucine", "C6H13NO2",
        [131.17, 9.0, 21.4, 4.9, 85.0, 1.06, 3.8, 19.06, 6.0, 11.7, 4.8, 164.1, 0.37], [5.5, 3.0 * MIN, 2.0 * MIN]),
    aa('M', "met", "Methionine", "C5H11NO2S",
        [149.21, 2.4, 16.25, 5.7, 80.0, 0.64, 1.9, 21.64, 1.0, 1.9, 1.0, 172.9, 0.3], [30.0, 20.0, 10.0]),
    aa('N', "asn", "Asparagine", "C4H8N2O3",
        [132.12, 4.4, 12.82, 11.6, 94.0, -0.78, -3.5, 12.0, 2.0, 2.9, 6.7, 103.3, 0.46], [1.4, 3.0, 10.0]),
    aa('P', "pro", "Proline", "C5H9NO2",
        [115.13, 5.1, 17.43, 8.0, 91.0, 0.12, -1.6, 10.93, 4.0, 2.7, 4.8, 92.9, 0.51], [20.0, 20.0, f64::NAN]),
    aa('Q', "gln", "Glutamine", "C5H10N2O3",
        [146.15, 4.0, 14.45, 10.5, 87.0, -0.85, -3.5, 17.26, 2.0, 1.6, 5.2, 119.2, 0.49], [0.8, 10.0, 10.0]),
    aa('R', "arg", "Arginine", "C6H14N4O2",
        [174.2, 5.7, 14.28, 10.5, 95.0, -2.53, -4.5, 26.66, 6.0, 0.5, 4.5, 162.2, 0.53], [1.0, 2.0 * MIN, 2.0 * MIN]),
    aa('S', "ser", "Serine", "C3H7NO3",
        [105.09, 6.9, 9.47, 9.2, 107.0, -0.18, -0.8, 6.35, 6.0, 8.0, 9.4, 85.6, 0.51], [1.9, 20.0, 10.0]),
    aa('T', "thr", "Threonine", "C4H9NO3",
        [119.12, 5.8, 15.77, 8.6, 93.0, -0.05, -0.7, 11.01, 4.0, 4.9, 7.0, 106.5, 0.44], [7.2, 20.0, 10.0]),
    aa('V', "val", "Valine", "C5H11NO2",
        [117.15, 6.6, 21.57, 5.9, 89.0, 1.08, 4.2, 13.92, 4.0, 12.9, 4.5, 141.0, 0.39], [100.0, 20.0, 10.0]),
    aa('W', "trp", "Tryptophan", "C11H12N2O2",
        [204.23, 1.3, 21.67, 5.4, 104.0, 0.81, -0.9, 42.53, 1.0, 2.2, 1.4, 224.6, 0.31], [2.8, 3.0 * MIN, 2.0 * MIN]),
    aa('Y', "tyr", "Tyrosine", "C9H11NO3",
        [181.19, 3.2, 18.03, 6.2, 84.0, 0.26, -1.3, 31.53, 2.0, 2.6, 5.1, 177.7, 0.42], [2.8, 10.0, 2.0]),
    // average residue
    aa('X', "xxx", "", "",
        [119.7863, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN,
         f64::NAN, f64::NAN, f64::NAN, f64::NAN],
        [f64::NAN, f64::NAN, f64::NAN]),
];

/// Reference data for a one-letter code (case-insensitive).
pub fn amino_acid(code: char) -> Option<&'static AminoAcidInfo> {
    let code = code.to_ascii_uppercase();
    AMINO_ACIDS.iter().find(|info| info.code == code)
}

/// Fraction of the group carrying charge when `pa` exceeds `pb`.
#[inline]
fn partial_charge(pa: f64, pb: f64) -> f64 {
    let cr = 10f64.powf(pa - pb);
    cr / (cr + 1.0)
}

const PI_TOLERANCE: f64 = 1e-3;
const PI_MAX_STEPS: usize = 64;

impl Sequence {
    /// Average molecular weight of the polypeptide; residues without reference data are skipped.
    pub fn protein_mol_weight(&self) -> BioResult<f64> {
        if self.is_empty() {
            return Err(BioError::empty_sequence("protein molecular weight"));
        }
        let mut total = 0.0;
        let mut residues = 0usize;
        for &b in self.as_bytes() {
            if let Some(info) = amino_acid(b as char) {
                total += info.mol_weight;
                residues += 1;
            }
        }
        Ok(total - WATER * residues.saturating_sub(1) as f64)
    }

    /// Net charge at `ph` from the residue counts.
    pub fn net_charge(&self, ph: f64) -> f64 {
        let counts = self.count_residues();
        let count = |code: u8| {
            RESIDUES_N
                .iter()
                .position(|&r| r == code)
                .map_or(0.0, |idx| counts[idx] as f64)
        };
        partial_charge(pk::N_TERM, ph)
            + count(b'K') * partial_charge(pk::K, ph)
            + count(b'R') * partial_charge(pk::R, ph)
            + count(b'H') * partial_charge(pk::H, ph)
            - count(b'D') * partial_charge(ph, pk::D)
            - count(b'E') * partial_charge(ph, pk::E)
            - count(b'C') * partial_charge(ph, pk::C)
            - count(b'Y') * partial_charge(ph, pk::Y)
            - partial_charge(ph, pk::C_TERM)
    }

    /// Estimated isoelectric point, bisecting from pH 7 with an initial step of 3.5.
    pub fn isoelectric_point(&self) -> BioResult<f64> {
        if self.is_empty() {
            return Err(BioError::empty_sequence("isoelectric point"));
        }
        let mut ph = 7.0;
        let mut step = 3.5;
        let mut charge = self.net_charge(ph);
        for _ in 0..PI_MAX_STEPS {
            if charge.abs() < PI_TOLERANCE {
                break;
            }
            ph += charge.signum() * step;
            step /= 2.0;
            charge = self.net_charge(ph);
        }
        Ok(ph)
    }
}
