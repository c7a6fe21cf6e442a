use crate::error::{BioError, BioResult};
use crate::seq::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// NCBI translation tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneticCode {
    #[default]
    Standard,
    VertebrateMitochondrial,
    YeastMitochondrial,
    MoldProtozoanCoelenterateMitochondrial,
    InvertebrateMitochondrial,
    CiliateDasycladaceanHexamitaNuclear,
    EchinodermMitochondrial,
    EuplotidNuclear,
    BacterialPlantPlastid,
    AlternativeYeastNuclear,
    AscidianMitochondrial,
    FlatwormMitochondrial,
    BlepharismaNuclear,
    ChlorophyceanMitochondrial,
    TrematodeMitochondrial,
    ScenedesmusObliquusMitochondrial,
    ThraustochytriumMitochondrial,
}

struct Table {
    id: u8,
    description: &'static str,
    // amino acids in TCAG codon order: TTT, TTC, TTA, TTG, TCT, ...
    residues: &'static [u8; 64],
    starts: &'static [&'static str],
}

const TABLES: [Table; 17] = [
    Table {
        id: 1,
        description: "Standard",
        residues: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "CTG", "TTG"],
    },
    Table {
        id: 2,
        description: "Vertebrate Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
        starts: &["ATG", "ATA", "ATC", "ATT", "GTG"],
    },
    Table {
        id: 3,
        description: "Yeast Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "ATA"],
    },
    Table {
        id: 4,
        description: "Mold, Protozoan, and Coelenterate Mitochondrial and Mycoplasma/Spiroplasma",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "ATA", "ATC", "ATT", "CTG", "GTG", "TTA", "TTG"],
    },
    Table {
        id: 5,
        description: "Invertebrate Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
        starts: &["ATG", "ATA", "ATC", "ATT", "GTG", "TTG"],
    },
    Table {
        id: 6,
        description: "Ciliate, Dasycladacean and Hexamita Nuclear",
        residues: b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 9,
        description: "Echinoderm Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: &["ATG", "GTG"],
    },
    Table {
        id: 10,
        description: "Euplotid Nuclear",
        residues: b"FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 11,
        description: "Bacterial and Plant Plastid",
        residues: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "ATA", "ATC", "ATT", "CTG", "GTG", "TTG"],
    },
    Table {
        id: 12,
        description: "Alternative Yeast Nuclear",
        residues: b"FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "CTG"],
    },
    Table {
        id: 13,
        description: "Ascidian Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 14,
        description: "Flatworm Mitochondrial",
        residues: b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 15,
        description: "Blepharisma Nuclear",
        residues: b"FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 16,
        description: "Chlorophycean Mitochondrial",
        residues: b"FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 21,
        description: "Trematode Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: &["ATG", "GTG"],
    },
    Table {
        id: 22,
        description: "Scenedesmus obliquus Mitochondrial",
        residues: b"FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG"],
    },
    Table {
        id: 23,
        description: "Thraustochytrium Mitochondrial",
        residues: b"FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: &["ATG", "ATT", "GTG"],
    },
];

impl GeneticCode {
    pub const ALL: [GeneticCode; 17] = [
        GeneticCode::Standard,
        GeneticCode::VertebrateMitochondrial,
        GeneticCode::YeastMitochondrial,
        GeneticCode::MoldProtozoanCoelenterateMitochondrial,
        GeneticCode::InvertebrateMitochondrial,
        GeneticCode::CiliateDasycladaceanHexamitaNuclear,
        GeneticCode::EchinodermMitochondrial,
        GeneticCode::EuplotidNuclear,
        GeneticCode::BacterialPlantPlastid,
        GeneticCode::AlternativeYeastNuclear,
        GeneticCode::AscidianMitochondrial,
        GeneticCode::FlatwormMitochondrial,
        GeneticCode::BlepharismaNuclear,
        GeneticCode::ChlorophyceanMitochondrial,
        GeneticCode::TrematodeMitochondrial,
        GeneticCode::ScenedesmusObliquusMitochondrial,
        GeneticCode::ThraustochytriumMitochondrial,
    ];

    fn table(self) -> &'static Table {
        &TABLES[self as usize]
    }

    /// Look up a table by its NCBI translation table id.
    pub fn from_id(id: u8) -> BioResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.id() == id)
            .ok_or(BioError::UnknownGeneticCode { id })
    }

    pub fn id(self) -> u8 {
        self.table().id
    }

    pub fn description(self) -> &'static str {
        self.table().description
    }

    pub fn start_codons(self) -> &'static [&'static str] {
        self.table().starts
    }

    pub fn is_start_codon(self, codon: &[u8]) -> bool {
        self.table()
            .starts
            .iter()
            .any(|s| s.as_bytes().eq_ignore_ascii_case(codon))
    }

    /// Amino acid (or `*`) for an upper-case DNA codon; `---` gives `-`.
    pub fn amino_acid(self, codon: &[u8]) -> Option<u8> {
        if codon == b"---" {
            return Some(b'-');
        }
        let [a, b, c] = codon else {
            return None;
        };
        let idx = 16 * tcag_rank(*a)? + 4 * tcag_rank(*b)? + tcag_rank(*c)?;
        Some(self.table().residues[idx])
    }
}

impl fmt::Display for GeneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[inline]
fn tcag_rank(base: u8) -> Option<usize> {
    match base {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate a nucleotide string read in `frame` (1..=3, frame 1 starts at
/// the first base). A trailing partial codon is dropped.
///
/// With `alt_starts`, a first codon that is a start codon of `code` is
/// rendered as `M` whatever the table maps it to.
pub fn translate(nt: &str, frame: u8, code: GeneticCode, alt_starts: bool) -> BioResult<String> {
    if !(1..=3).contains(&frame) {
        return Err(BioError::InvalidFrame {
            frame: i16::from(frame),
        });
    }
    let bytes: Vec<u8> = nt
        .bytes()
        .map(|b| match b.to_ascii_uppercase() {
            b'U' => b'T',
            up => up,
        })
        .collect();
    let offset = frame as usize - 1;
    let body = bytes.get(offset..).unwrap_or_default();

    let mut aa = String::with_capacity(body.len() / 3);
    for (i, codon) in body.chunks_exact(3).enumerate() {
        let residue = code
            .amino_acid(codon)
            .ok_or_else(|| BioError::InvalidCodon {
                codon: String::from_utf8_lossy(codon).into_owned(),
                pos: offset + 3 * i,
            })?;
        aa.push(residue as char);
    }

    if alt_starts && body.len() >= 3 && code.is_start_codon(&body[..3]) {
        aa.replace_range(..1, "M");
    }
    Ok(aa)
}

impl Sequence {
    /// Translate into a protein sequence.
    pub fn translate(&self, frame: u8, code: GeneticCode, alt_starts: bool) -> BioResult<Sequence> {
        translate(self.as_str(), frame, code, alt_starts).map(|aa| Sequence::protein(&aa))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn standard_orf() {
        assert_eq!(translate("ATGGCTTAA", 1, GeneticCode::Standard, true).unwrap(), "MA*");
        assert_eq!(translate("atggcttaa", 1, GeneticCode::Standard, false).unwrap(), "MA*");
    }

    #[test]
    fn rna_input_is_read_as_dna() {
        assert_eq!(translate("AUGUUUUGA", 1, GeneticCode::Standard, false).unwrap(), "MF*");
    }

    #[test]
    fn frames_and_partial_codons() {
        assert_eq!(translate("CATGGCTA", 2, GeneticCode::Standard, false).unwrap(), "MA");
        assert_eq!(translate("CCATGGCT", 3, GeneticCode::Standard, false).unwrap(), "MA");
        assert_eq!(translate("AT", 1, GeneticCode::Standard, true).unwrap(), "");
        assert_eq!(translate("A", 3, GeneticCode::Standard, true).unwrap(), "");
        let err = translate("ATG", 4, GeneticCode::Standard, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(translate("ATG", 0, GeneticCode::Standard, true).is_err());
        let err = translate("ATG", 200, GeneticCode::Standard, false).unwrap_err();
        assert_eq!(err.to_string(), "invalid frame: 200");
    }

    #[test]
    fn alternative_starts() {
        assert_eq!(translate("TTGGCT", 1, GeneticCode::Standard, true).unwrap(), "MA");
        assert_eq!(translate("TTGGCT", 1, GeneticCode::Standard, false).unwrap(), "LA");
        // TTG is not a start in the yeast mitochondrial table
        assert_eq!(translate("TTGGCT", 1, GeneticCode::YeastMitochondrial, true).unwrap(), "LA");
        assert_eq!(
            translate("ATAGCT", 1, GeneticCode::VertebrateMitochondrial, true).unwrap(),
            "MA"
        );
    }

    #[test]
    fn gap_codon() {
        assert_eq!(translate("ATG---GCT", 1, GeneticCode::Standard, true).unwrap(), "M-A");
    }

    #[test]
    fn invalid_codon_reports_position() {
        match translate("ATGGCNTAA", 1, GeneticCode::Standard, true).unwrap_err() {
            BioError::InvalidCodon { codon, pos } => {
                assert_eq!(codon, "GCN");
                assert_eq!(pos, 3);
            }
            other => panic!("expected invalid codon, got {other:?}"),
        }
        let err = translate("AT-GCT", 1, GeneticCode::Standard, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCodon);
    }

    #[test]
    fn table_differences() {
        let tga = |code: GeneticCode| code.amino_acid(b"TGA").unwrap();
        assert_eq!(tga(GeneticCode::Standard), b'*');
        assert_eq!(tga(GeneticCode::VertebrateMitochondrial), b'W');
        assert_eq!(tga(GeneticCode::EuplotidNuclear), b'C');
        assert_eq!(GeneticCode::VertebrateMitochondrial.amino_acid(b"AGA"), Some(b'*'));
        assert_eq!(GeneticCode::YeastMitochondrial.amino_acid(b"CTG"), Some(b'T'));
        assert_eq!(GeneticCode::CiliateDasycladaceanHexamitaNuclear.amino_acid(b"TAA"), Some(b'Q'));
        assert_eq!(GeneticCode::ThraustochytriumMitochondrial.amino_acid(b"TTA"), Some(b'*'));
        assert_eq!(GeneticCode::Standard.amino_acid(b"ATGA"), None);
    }

    #[test]
    fn ids_round_trip() {
        for code in GeneticCode::ALL {
            assert_eq!(GeneticCode::from_id(code.id()).unwrap(), code);
        }
        assert_eq!(GeneticCode::from_id(11).unwrap(), GeneticCode::BacterialPlantPlastid);
        assert_eq!(GeneticCode::from_id(7).unwrap_err().kind(), ErrorKind::Lookup);
        assert_eq!(GeneticCode::default().to_string(), "Standard");
    }

    #[test]
    fn sequence_translation() {
        let cds = Sequence::dna("atggcttaa");
        let protein = cds.translate(1, GeneticCode::Standard, true).unwrap();
        assert_eq!(protein.as_str(), "MA*");
        assert!(protein.alphabet().is_protein());
    }

    proptest! {
        #[test]
        fn one_residue_per_full_codon(nt in "[ACGT]{0,90}", frame in 1u8..=3) {
            let aa = translate(&nt, frame, GeneticCode::Standard, true).unwrap();
            let usable = nt.len().saturating_sub(frame as usize - 1);
            prop_assert_eq!(aa.len(), usable / 3);
        }
    }
}
