//! Nearest-neighbour thermodynamics for DNA duplexes.
//!
//! Each parameter set is stored as 5×5 enthalpy (kcal/mol) and entropy
//! (cal/K/mol) tables indexed by `acgtn`. The `n` row and column hold the
//! average of the flanking values; unambiguous sequences only ever touch
//! the leading 4×4 block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas constant in cal/(K·mol).
pub const GAS_CONSTANT: f64 = 1.9872;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NearestNeighborMethod {
    Breslauer86,
    SantaLucia96,
    #[default]
    SantaLucia98,
    Sugimoto96,
}

impl NearestNeighborMethod {
    pub const ALL: [NearestNeighborMethod; 4] = [
        NearestNeighborMethod::Breslauer86,
        NearestNeighborMethod::SantaLucia96,
        NearestNeighborMethod::SantaLucia98,
        NearestNeighborMethod::Sugimoto96,
    ];

    pub fn description(self) -> &'static str {
        match self {
            NearestNeighborMethod::Breslauer86 => "Breslauer et. al. 1986",
            NearestNeighborMethod::SantaLucia96 => "SantaLucia et. al. 1996",
            NearestNeighborMethod::SantaLucia98 => "SantaLucia et. al. 1998",
            NearestNeighborMethod::Sugimoto96 => "Sugimoto et. al. 1996",
        }
    }

    fn table(self) -> &'static NnTable {
        match self {
            NearestNeighborMethod::Breslauer86 => &BRESLAUER_86,
            NearestNeighborMethod::SantaLucia96 => &SANTALUCIA_96,
            NearestNeighborMethod::SantaLucia98 => &SANTALUCIA_98,
            NearestNeighborMethod::Sugimoto96 => &SUGIMOTO_96,
        }
    }

    /// Entropy initiation for sequences made only of A/T.
    fn only_at_init(self) -> (f64, f64) {
        match self {
            NearestNeighborMethod::Breslauer86 => (0.0, -20.13),
            NearestNeighborMethod::SantaLucia96 => (0.0, -9.0),
            NearestNeighborMethod::SantaLucia98 => (0.0, 0.0),
            NearestNeighborMethod::Sugimoto96 => (0.6, -9.0),
        }
    }

    fn mixed_init(self) -> (f64, f64) {
        match self {
            NearestNeighborMethod::Breslauer86 => (0.0, -16.77),
            NearestNeighborMethod::SantaLucia96 => (0.0, -5.9),
            NearestNeighborMethod::SantaLucia98 => (0.0, 0.0),
            NearestNeighborMethod::Sugimoto96 => (0.6, -9.0),
        }
    }

    fn symmetry_entropy(self, ambiguous: bool) -> f64 {
        match (self, ambiguous) {
            (NearestNeighborMethod::Breslauer86, false) => -1.34,
            (NearestNeighborMethod::Breslauer86, true) => -16.77,
            (NearestNeighborMethod::SantaLucia96, true) => -5.9,
            _ => -1.4,
        }
    }
}

impl fmt::Display for NearestNeighborMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Duplex enthalpy and entropy with their uncertainty.
///
/// The uncertainty terms are zero for unambiguous sequences. With ambiguous
/// bases they are half the spread between the all-GC and all-AT readings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Thermo {
    pub enthalpy: f64,
    pub entropy: f64,
    pub enthalpy_delta: f64,
    pub entropy_delta: f64,
}

impl Thermo {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.enthalpy,
            self.entropy,
            self.enthalpy_delta,
            self.entropy_delta,
        ]
    }
}

struct NnTable {
    h: [[f64; 5]; 5],
    s: [[f64; 5]; 5],
}

/// Inputs of the nearest-neighbour sum, gathered by the caller.
pub(crate) struct Duplex<'a> {
    /// Base ranks in `acgtn`; other ambiguity codes are ranked as `n`.
    pub ranks: &'a [u8],
    pub ambiguous: bool,
    pub only_at: bool,
    pub symmetric: bool,
}

const A: u8 = 0;
const C: u8 = 1;
const G: u8 = 2;
const T: u8 = 3;
const N: u8 = 4;

const SANTALUCIA_98_GC_TERMINAL: (f64, f64) = (0.1, -2.8);
const SANTALUCIA_98_AT_TERMINAL: (f64, f64) = (2.3, 4.1);

pub(crate) fn nearest_neighbor(duplex: &Duplex<'_>, method: NearestNeighborMethod) -> Thermo {
    let table = method.table();
    let ranks = duplex.ranks;
    let (mut h, mut s) = (0.0f64, 0.0f64);
    for pair in ranks.windows(2) {
        let (i, j) = (pair[0] as usize, pair[1] as usize);
        h += table.h[i][j];
        s += table.s[i][j];
    }
    if ranks.is_empty() {
        return Thermo::default();
    }
    let first = ranks[0];
    let last = ranks[ranks.len() - 1];
    let sant98 = method == NearestNeighborMethod::SantaLucia98;

    if !duplex.ambiguous {
        let (dh, ds) = if duplex.only_at {
            method.only_at_init()
        } else {
            method.mixed_init()
        };
        h += dh;
        s += ds;
        if duplex.symmetric {
            s += method.symmetry_entropy(false);
        }
        if sant98 {
            // the 5' block tests the 3' base when the 5' base is not G/C
            if first == C || first == G {
                add(&mut h, &mut s, SANTALUCIA_98_GC_TERMINAL);
            } else if last == A || last == T {
                add(&mut h, &mut s, SANTALUCIA_98_AT_TERMINAL);
            }
            if last == G || last == C {
                add(&mut h, &mut s, SANTALUCIA_98_GC_TERMINAL);
            } else if last == A || last == T {
                add(&mut h, &mut s, SANTALUCIA_98_AT_TERMINAL);
            }
        }
        return Thermo {
            enthalpy: h,
            entropy: s,
            enthalpy_delta: 0.0,
            entropy_delta: 0.0,
        };
    }

    if duplex.symmetric {
        s += method.symmetry_entropy(true);
    }
    // N read as G/C and N read as A/T
    let (mut h_gc, mut s_gc) = (h, s);
    let (mut h_at, mut s_at) = (h, s);
    if duplex.only_at {
        let (dh, ds) = method.only_at_init();
        h_gc += dh;
        s_gc += ds;
    } else {
        let (dh, ds) = method.mixed_init();
        h_at += dh;
        s_at += ds;
    }
    if sant98 {
        if first == G || first == C || first == N {
            add(&mut h_at, &mut s_at, SANTALUCIA_98_GC_TERMINAL);
        } else if first == A || first == T {
            add(&mut h_gc, &mut s_gc, SANTALUCIA_98_AT_TERMINAL);
        }
        if last == G || last == C {
            add(&mut h_at, &mut s_at, SANTALUCIA_98_GC_TERMINAL);
        } else if last == A || last == T || last == N {
            add(&mut h_gc, &mut s_gc, SANTALUCIA_98_AT_TERMINAL);
        }
    }

    Thermo {
        enthalpy: (h_gc + h_at) * 0.5,
        entropy: (s_gc + s_at) * 0.5,
        enthalpy_delta: (h_gc - h_at).abs() / 2.0,
        entropy_delta: (s_gc - s_at).abs() / 2.0,
    }
}

#[inline]
fn add(h: &mut f64, s: &mut f64, (dh, ds): (f64, f64)) {
    *h += dh;
    *s += ds;
}

/// Two-state melting temperature in °C for one (ΔH, ΔS) reading.
pub(crate) fn duplex_tm(enthalpy: f64, entropy: f64, salt: f64, primer_conc: f64, b: f64) -> f64 {
    enthalpy * 1000.0 / (entropy + GAS_CONSTANT * (primer_conc / b).ln()) + 16.6 * salt.log10()
        - 273.15
}

static BRESLAUER_86: NnTable = NnTable {
    h: [
        [-9.1, -6.5, -7.8, -8.6, -8.0],
        [-5.8, -11.0, -11.9, -7.8, -9.125],
        [-5.6, -11.1, -11.0, -6.5, -8.55],
        [-6.0, -5.6, -5.8, -9.1, -6.625],
        [-6.625, -8.55, -9.125, -8.0, -8.075],
    ],
    s: [
        [-24.0, -17.3, -20.8, -23.9, -21.5],
        [-12.9, -26.6, -27.8, -20.8, -22.025],
        [-13.5, -26.7, -26.6, -17.3, -21.025],
        [-16.9, -13.5, -12.9, -24.0, -16.825],
        [-16.825, -21.025, -22.025, -21.5, -20.3438],
    ],
};

static SANTALUCIA_96: NnTable = NnTable {
    h: [
        [-8.4, -8.6, -6.1, -6.5, -7.4],
        [-7.4, -6.7, -10.1, -6.1, -7.575],
        [-7.7, -11.1, -6.7, -8.6, -8.525],
        [-6.3, -7.7, -7.4, -8.4, -7.45],
        [-7.45, -8.525, -7.575, -7.4, -7.7375],
    ],
    s: [
        [-23.6, -23.0, -16.1, -18.8, -20.375],
        [-19.3, -15.6, -25.5, -16.1, -19.125],
        [-20.3, -28.4, -15.6, -23.0, -21.825],
        [-18.5, -20.3, -19.3, -23.6, -20.425],
        [-20.425, -21.825, -19.125, -20.375, -20.4375],
    ],
};

static SANTALUCIA_98: NnTable = NnTable {
    h: [
        [-7.9, -8.4, -7.8, -7.2, -7.825],
        [-8.5, -8.0, -10.6, -7.8, -8.725],
        [-8.2, -9.8, -8.0, -8.4, -8.6],
        [-7.2, -8.2, -8.5, -7.9, -7.95],
        [-7.95, -8.6, -8.725, -7.825, -8.275],
    ],
    s: [
        [-22.2, -22.4, -21.0, -20.4, -21.5],
        [-22.7, -19.9, -27.2, -21.0, -22.7],
        [-22.2, -24.4, -19.9, -22.4, -22.225],
        [-21.3, -22.2, -22.7, -22.2, -22.1],
        [-22.1, -22.225, -22.7, -21.5, -22.1313],
    ],
};

static SUGIMOTO_96: NnTable = NnTable {
    h: [
        [-8.0, -9.4, -6.6, -5.6, -7.4],
        [-8.2, -10.9, -11.8, -6.6, -9.375],
        [-8.8, -10.5, -10.9, -9.4, -9.9],
        [-6.6, -8.8, -8.2, -8.0, -7.9],
        [-7.9, -9.9, -9.375, -7.4, -8.6437],
    ],
    s: [
        [-21.9, -25.5, -16.4, -15.2, -19.75],
        [-21.0, -28.4, -29.0, -16.4, -23.7],
        [-23.5, -26.4, -28.4, -25.5, -25.95],
        [-18.4, -23.5, -21.0, -21.9, -21.2],
        [-21.2, -25.95, -23.7, -19.75, -22.65],
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(s: &[u8]) -> Vec<u8> {
        s.iter()
            .map(|b| match b {
                b'a' => A,
                b'c' => C,
                b'g' => G,
                b't' => T,
                _ => N,
            })
            .collect()
    }

    #[test]
    fn n_row_and_column_average_the_block() {
        for method in NearestNeighborMethod::ALL {
            let table = method.table();
            for i in 0..4 {
                let row = table.h[i][..4].iter().sum::<f64>() / 4.0;
                let col = (0..4).map(|k| table.h[k][i]).sum::<f64>() / 4.0;
                assert!((table.h[i][4] - row).abs() < 1e-9, "{method:?} row {i}");
                assert!((table.h[4][i] - col).abs() < 1e-9, "{method:?} col {i}");
            }
        }
    }

    #[test]
    fn unambiguous_sum_has_no_delta() {
        let r = ranks(b"gcgc");
        let duplex = Duplex {
            ranks: &r,
            ambiguous: false,
            only_at: false,
            symmetric: true,
        };
        let thermo = nearest_neighbor(&duplex, NearestNeighborMethod::Breslauer86);
        // gc + cg + gc, mixed initiation, symmetry
        assert!((thermo.enthalpy - (-11.1 - 11.9 - 11.1)).abs() < 1e-9);
        assert!((thermo.entropy - (-26.7 - 27.8 - 26.7 - 16.77 - 1.34)).abs() < 1e-9);
        assert_eq!(thermo.enthalpy_delta, 0.0);
    }

    #[test]
    fn santalucia98_terminal_corrections() {
        let r = ranks(b"aca");
        let duplex = Duplex {
            ranks: &r,
            ambiguous: false,
            only_at: false,
            symmetric: false,
        };
        let thermo = nearest_neighbor(&duplex, NearestNeighborMethod::SantaLucia98);
        // ac + ca, then the A/T terminal term is applied by both blocks
        assert!((thermo.enthalpy - (-8.4 - 8.5 + 2.3 + 2.3)).abs() < 1e-9);
        assert!((thermo.entropy - (-22.4 - 22.7 + 4.1 + 4.1)).abs() < 1e-9);
    }

    #[test]
    fn ambiguous_reports_spread() {
        let r = ranks(b"acng");
        let duplex = Duplex {
            ranks: &r,
            ambiguous: true,
            only_at: false,
            symmetric: false,
        };
        let thermo = nearest_neighbor(&duplex, NearestNeighborMethod::Breslauer86);
        // only the A/T reading receives the mixed initiation
        assert!((thermo.entropy_delta - 16.77 / 2.0).abs() < 1e-9);
        assert_eq!(thermo.enthalpy_delta, 0.0);
    }

    #[test]
    fn descriptions() {
        assert_eq!(
            NearestNeighborMethod::SantaLucia98.to_string(),
            "SantaLucia et. al. 1998"
        );
        assert_eq!(NearestNeighborMethod::default(), NearestNeighborMethod::SantaLucia98);
    }
}
