use crate::alphabets::dna::{self, BASE_RANKS};
use crate::error::{BioError, BioResult};
use crate::seq::sequence::Sequence;
use crate::seq::thermo::{self, Duplex, NearestNeighborMethod, Thermo};

/// Molar masses of A, C, G and T residues in g/mol.
pub const DNA_MOL_WEIGHT: [f64; 4] = [313.21, 289.18, 329.21, 304.2];
const WATER_LOSS: f64 = 61.96;

pub const DEFAULT_SALT: f64 = 0.05;
pub const DEFAULT_PRIMER_CONC: f64 = 50e-6;

/// Below this length the Wallace rule is used instead of the GC formula.
const SHORT_OLIGO: usize = 14;

/// Codon usage table over `acgtn`, indexed `[first][second][third]`.
pub type CodonCounts = [[[u32; 5]; 5]; 5];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NucleotideStats {
    /// Counts of a, c, g, t, n (case-insensitive).
    pub counts: [usize; 5],
    pub ambiguous: bool,
    pub symmetric: bool,
    pub only_at: bool,
    pub gc: f64,
    pub mol_weight: f64,
}

impl NucleotideStats {
    fn compute(bytes: &[u8]) -> Self {
        let mut counts = [0usize; 5];
        let mut ambiguous = false;
        let mut only_at = true;
        for &b in bytes {
            match BASE_RANKS.get(b) {
                Some(rank) => {
                    counts[rank as usize] += 1;
                    ambiguous |= rank == 4;
                    only_at &= matches!(rank, 0 | 3 | 4);
                }
                None => {
                    ambiguous = true;
                    only_at = false;
                }
            }
        }

        let len = bytes.len();
        let symmetric = (0..len).all(|i| dna::is_complement(bytes[i], bytes[len - 1 - i]));

        let [a, c, g, t, n] = counts.map(|x| x as f64);
        let gc = if len == 0 {
            0.0
        } else {
            100.0 * (g + c + n / 2.0) / len as f64
        };
        let mut mol_weight = a * DNA_MOL_WEIGHT[0] + c * DNA_MOL_WEIGHT[1] + g * DNA_MOL_WEIGHT[2]
            + t * DNA_MOL_WEIGHT[3]
            - WATER_LOSS;
        if ambiguous {
            mol_weight += n * (DNA_MOL_WEIGHT[2] + DNA_MOL_WEIGHT[1]) / 2.0;
        }

        Self {
            counts,
            ambiguous,
            symmetric,
            only_at,
            gc,
            mol_weight,
        }
    }
}

impl Sequence {
    pub(crate) fn nucleotide_stats(&self) -> &NucleotideStats {
        self.stats
            .get_or_init(|| NucleotideStats::compute(self.as_bytes()))
    }

    fn non_empty(&self, op: &'static str) -> BioResult<&NucleotideStats> {
        if self.is_empty() {
            return Err(BioError::empty_sequence(op));
        }
        Ok(self.nucleotide_stats())
    }

    /// Counts of `a`, `c`, `g`, `t`; other symbols are skipped.
    pub fn count_bases(&self) -> [usize; 4] {
        let c = self.nucleotide_stats().counts;
        [c[0], c[1], c[2], c[3]]
    }

    /// Counts of `a`, `c`, `g`, `t`, `n`; other symbols are skipped.
    pub fn count_bases_with_n(&self) -> [usize; 5] {
        self.nucleotide_stats().counts
    }

    /// Self reverse-complementary over unambiguous bases.
    pub fn is_symmetry(&self) -> bool {
        self.nucleotide_stats().symmetric
    }

    /// Only `a`, `t` and `n` symbols.
    pub fn is_only_at(&self) -> bool {
        self.nucleotide_stats().only_at
    }

    /// GC content in percent; each `n` counts as half a G/C.
    pub fn gc(&self) -> BioResult<f64> {
        Ok(self.non_empty("GC content")?.gc)
    }

    pub fn mol_weight(&self) -> BioResult<f64> {
        Ok(self.non_empty("molecular weight")?.mol_weight)
    }

    /// Wallace rule below 14 nt, GC formula from 14 nt on.
    pub fn basic_melting_temp(&self) -> BioResult<f64> {
        let stats = self.non_empty("melting temperature")?;
        let [a, c, g, t, n] = stats.counts.map(|x| x as f64);
        let len = self.len() as f64;
        let short = self.len() < SHORT_OLIGO;
        let tm = match (stats.ambiguous, short) {
            (false, true) => 2.0 * (a + t) + 4.0 * (g + c),
            (false, false) => 64.9 + 41.0 * ((c + g - 16.4) / len),
            (true, true) => 2.0 * (a + t) + 4.0 * (g + c) + 3.0 * n,
            (true, false) => 64.9 + 41.0 * (c + g - 16.4 + n / 2.0) / len,
        };
        Ok(tm)
    }

    /// Melting temperature corrected for a monovalent salt concentration in mol/l.
    pub fn salt_adjust_tm(&self, salt: f64) -> BioResult<f64> {
        const OP: &str = "salt adjusted melting temperature";
        let stats = self.non_empty(OP)?;
        let salt = concentration(OP, salt)?;
        let [_, c, g, _, n] = stats.counts.map(|x| x as f64);
        let len = self.len() as f64;
        if self.len() < SHORT_OLIGO {
            let basic = self.basic_melting_temp()?;
            return Ok(basic - 16.6 * DEFAULT_SALT.log10() + 16.6 * salt.log10());
        }
        let tm = if stats.ambiguous {
            100.5 - (820.0 / len) + (16.6 * salt.log10()) + 41.0 * ((g + c + n / 2.0) / len)
        } else {
            100.5 + ((41.0 * (c + g)) / len) - (820.0 / len) + (16.6 * salt.log10())
        };
        Ok(tm)
    }

    /// Nearest-neighbour enthalpy and entropy of the duplex.
    pub fn thermo_prop(&self, method: NearestNeighborMethod) -> BioResult<Thermo> {
        let stats = self.non_empty("nearest-neighbour thermodynamics")?;
        // ambiguity codes other than n are read as n
        let ranks: Vec<u8> = self
            .as_bytes()
            .iter()
            .map(|&b| BASE_RANKS.get(b).unwrap_or(4))
            .collect();
        let duplex = Duplex {
            ranks: &ranks,
            ambiguous: stats.ambiguous,
            only_at: stats.only_at,
            symmetric: stats.symmetric,
        };
        Ok(thermo::nearest_neighbor(&duplex, method))
    }

    /// Nearest-neighbour melting temperature in °C.
    ///
    /// Without explicit thermodynamics the SantaLucia 1998 set is used. With
    /// ambiguous bases the result averages the two extreme readings.
    pub fn melting_temp(&self, salt: f64, primer_conc: f64, nn: Option<Thermo>) -> BioResult<f64> {
        const OP: &str = "melting temperature";
        let stats = self.non_empty(OP)?;
        let salt = concentration(OP, salt)?;
        let primer_conc = concentration(OP, primer_conc)?;
        let nn = match nn {
            Some(nn) => nn,
            None => self.thermo_prop(NearestNeighborMethod::SantaLucia98)?,
        };
        let b = if stats.symmetric { 1.0 } else { 4.0 };
        if !stats.ambiguous {
            return Ok(thermo::duplex_tm(nn.enthalpy, nn.entropy, salt, primer_conc, b));
        }
        let high = thermo::duplex_tm(
            nn.enthalpy + nn.enthalpy_delta,
            nn.entropy + nn.entropy_delta,
            salt,
            primer_conc,
            b,
        );
        let low = thermo::duplex_tm(
            nn.enthalpy - nn.enthalpy_delta,
            nn.entropy - nn.entropy_delta,
            salt,
            primer_conc,
            b,
        );
        Ok((high + low) / 2.0)
    }

    /// Melting temperature at 0.05 M salt and 50 µM primer with SantaLucia 1998 parameters.
    pub fn default_melting_temp(&self) -> BioResult<f64> {
        if let Some(tm) = self.default_tm.get() {
            return Ok(*tm);
        }
        let tm = self.melting_temp(DEFAULT_SALT, DEFAULT_PRIMER_CONC, None)?;
        Ok(*self.default_tm.get_or_init(|| tm))
    }

    /// Codon counts in one of the frames ±1, ±2, ±3; negative frames read the
    /// reverse complement. Codons with symbols outside `acgtn` are skipped.
    pub fn codon_count(&self, frame: i8) -> BioResult<CodonCounts> {
        if frame == 0 || !(-3..=3).contains(&frame) {
            return Err(BioError::InvalidFrame {
                frame: frame.into(),
            });
        }
        let bytes = if frame < 0 {
            dna::reverse_complement(self.as_bytes())
        } else {
            self.as_bytes().to_vec()
        };
        let offset = (frame.unsigned_abs() - 1) as usize;
        let mut counts = [[[0u32; 5]; 5]; 5];
        for codon in bytes.get(offset..).unwrap_or_default().chunks_exact(3) {
            let ranks = BASE_RANKS.transform(codon);
            if let Some([i, j, k]) = ranks.as_deref() {
                counts[*i as usize][*j as usize][*k as usize] += 1;
            }
        }
        Ok(counts)
    }
}

/// Salt and primer concentrations go through a logarithm.
fn concentration(op: &'static str, value: f64) -> BioResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(BioError::NumericDomain {
            op,
            msg: "a non-positive concentration",
        })
    }
}
