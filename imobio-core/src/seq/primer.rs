//! Self-complementarity screening for PCR primers.
//!
//! A primer folded back on itself or paired antiparallel with a second copy
//! of itself is described by one [`ComplementMatrix`]. Row `i` and column
//! `c` hold whether base `i` pairs with base `c - i`, so every column is
//! one fold axis (hairpins) or one offset of two antiparallel copies
//! (self-dimers). `n` pairs with any base.

use crate::alphabets::dna;
use crate::error::{BioError, BioResult};
use crate::seq::sequence::Sequence;

/// Minimum stems used when screening a primer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureThresholds {
    /// Consecutive pairs needed to report a self-dimer.
    pub dimer_bases: usize,
    /// Consecutive pairs needed in a hairpin stem.
    pub hairpin_bases: usize,
    /// Unpaired bases needed in a hairpin loop.
    pub hairpin_loop: usize,
}

impl Default for StructureThresholds {
    fn default() -> Self {
        Self {
            dimer_bases: 3,
            hairpin_bases: 4,
            hairpin_loop: 2,
        }
    }
}

#[inline]
fn base_pairs(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b'n') || b.eq_ignore_ascii_case(&b'n') || dna::is_complement(a, b)
}

pub struct ComplementMatrix {
    len: usize,
    cells: Vec<bool>,
}

impl ComplementMatrix {
    pub fn new(seq: &[u8]) -> Self {
        let len = seq.len();
        let width = (2 * len).saturating_sub(1);
        let mut cells = vec![false; len * width];
        for (i, &a) in seq.iter().enumerate() {
            for (k, &b) in seq.iter().enumerate() {
                cells[i * width + i + k] = base_pairs(a, b);
            }
        }
        Self { len, cells }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of columns, `2 * len - 1`.
    pub fn width(&self) -> usize {
        (2 * self.len).saturating_sub(1)
    }

    /// Whether base `row` pairs with base `col - row`.
    pub fn pairs(&self, row: usize, col: usize) -> bool {
        row < self.len && col < self.width() && self.cells[row * self.width() + col]
    }

    /// Rows of `col` that close a run of at least `bases` paired rows.
    fn run_ends(&self, col: usize, bases: usize) -> impl Iterator<Item = usize> + '_ {
        let mut run = 0;
        (0..self.len).filter(move |&row| {
            run = if self.pairs(row, col) { run + 1 } else { 0 };
            run >= bases
        })
    }

    /// Offsets at which two antiparallel copies share a stem of at least
    /// `min_bases` pairs, in increasing order.
    pub fn self_dimers(&self, min_bases: usize) -> Vec<usize> {
        (0..self.width())
            .filter(|&col| self.run_ends(col, min_bases).next().is_some())
            .collect()
    }

    /// Fold axes where two stems of `min_bases` pairs are separated by at
    /// least `min_loop` further bases.
    pub fn hairpins(&self, min_bases: usize, min_loop: usize) -> Vec<Hairpin> {
        (0..self.width())
            .filter(|&col| {
                let mut ends = self.run_ends(col, min_bases);
                let Some(first) = ends.next() else {
                    return false;
                };
                let last = ends.last().unwrap_or(first);
                last - first >= min_bases + min_loop
            })
            .map(|axis| Hairpin { axis })
            .collect()
    }
}

/// A fold of the primer onto itself. Base `i` faces base `axis - i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hairpin {
    axis: usize,
}

impl Hairpin {
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Position of the turn; a half value falls between two bases.
    pub fn center(&self) -> f64 {
        self.axis as f64 / 2.0
    }
}

/// A candidate primer with its self-dimers and hairpins.
#[derive(Clone, Debug)]
pub struct Primer {
    seq: Sequence,
    self_dimers: Vec<usize>,
    hairpins: Vec<Hairpin>,
}

impl Primer {
    pub fn new(seq: Sequence) -> Self {
        Self::with_thresholds(seq, StructureThresholds::default())
    }

    pub fn with_thresholds(seq: Sequence, thresholds: StructureThresholds) -> Self {
        let matrix = ComplementMatrix::new(seq.as_bytes());
        let self_dimers = matrix.self_dimers(thresholds.dimer_bases);
        let hairpins = matrix.hairpins(thresholds.hairpin_bases, thresholds.hairpin_loop);
        Self {
            seq,
            self_dimers,
            hairpins,
        }
    }

    pub fn seq(&self) -> &Sequence {
        &self.seq
    }

    pub fn self_dimers(&self) -> &[usize] {
        &self.self_dimers
    }

    pub fn hairpins(&self) -> &[Hairpin] {
        &self.hairpins
    }

    pub fn has_structure(&self) -> bool {
        !self.self_dimers.is_empty() || !self.hairpins.is_empty()
    }

    pub fn melting_temp(&self) -> BioResult<f64> {
        self.seq.default_melting_temp()
    }

    /// Three-line picture of the primer over its reversed copy at `offset`,
    /// with `|` under each pair.
    pub fn dimer_diagram(&self, offset: usize) -> String {
        let bases = self.seq.as_bytes();
        let len = bases.len();
        let width = (2 * len).saturating_sub(1);
        let bars: String = (0..len)
            .map(|j| match offset.checked_sub(j) {
                Some(partner) if partner < len && base_pairs(bases[j], bases[partner]) => '|',
                _ => ' ',
            })
            .collect();
        let reversed: String = self.seq.as_str().chars().rev().collect();
        format!(
            "{:>width$}\n{:>width$}\n{:>rev_width$}",
            self.seq.as_str(),
            bars,
            reversed,
            rev_width = offset + len
        )
    }

    /// The primer with its turn marked: `ab|cd` between two bases, or
    /// `ab]c[de` around a single unpaired base.
    pub fn hairpin_diagram(&self, hairpin: &Hairpin) -> String {
        let text = self.seq.as_str();
        let mid = hairpin.axis / 2;
        if hairpin.axis % 2 == 1 {
            let (left, right) = text.split_at((mid + 1).min(text.len()));
            return format!("{left}|{right}");
        }
        match (text.get(..mid), text.get(mid..=mid), text.get(mid + 1..)) {
            (Some(left), Some(turn), Some(right)) => format!("{left}]{turn}[{right}"),
            _ => text.to_string(),
        }
    }
}

/// Primer length limits for a [`PrimerRegion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
    pub target: usize,
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            min: 15,
            max: 24,
            target: 20,
        }
    }
}

impl LengthRange {
    /// Shrink to fit a region of `len` bases, keeping `min <= target <= max`.
    fn fit(self, len: usize) -> Self {
        let max = self.max.min(len).max(1);
        let min = self.min.clamp(1, max);
        Self {
            min,
            max,
            target: self.target.clamp(min, max),
        }
    }

    /// Lengths from the target outwards: target, +1, -1, +2, -2, ...
    pub fn search_order(&self) -> Vec<usize> {
        let mut order = vec![self.target];
        for step in 1.. {
            let up = Some(self.target + step).filter(|&l| l <= self.max);
            let down = self.target.checked_sub(step).filter(|&l| l >= self.min);
            if up.is_none() && down.is_none() {
                break;
            }
            order.extend(up);
            order.extend(down);
        }
        order
    }
}

/// Every primer of one length inside a region, by start offset.
#[derive(Debug)]
pub struct PrimerSet {
    length: usize,
    primers: Vec<Primer>,
}

impl PrimerSet {
    fn new(region: &Sequence, length: usize, thresholds: StructureThresholds) -> BioResult<Self> {
        let primers = (0..=region.len() - length)
            .map(|start| -> BioResult<Primer> {
                let seq = region.sub_seq(start, length as isize)?;
                Ok(Primer::with_thresholds(seq, thresholds))
            })
            .collect::<BioResult<Vec<_>>>()?;
        Ok(Self { length, primers })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn len(&self) -> usize {
        self.primers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primers.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&Primer> {
        self.primers.get(offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primer> {
        self.primers.iter()
    }
}

/// Candidate primers inside a stretch of a template.
///
/// `start <= end` reads the forward strand over `start..end`; otherwise the
/// region is the reverse complement of `end..start`, as a reverse primer
/// would be written.
#[derive(Debug)]
pub struct PrimerRegion {
    seq: Sequence,
    start: usize,
    forward: bool,
    lengths: LengthRange,
    sets: Vec<PrimerSet>,
}

impl PrimerRegion {
    pub fn new(template: &Sequence, start: usize, end: usize) -> BioResult<Self> {
        Self::with_options(
            template,
            start,
            end,
            LengthRange::default(),
            StructureThresholds::default(),
        )
    }

    pub fn with_options(
        template: &Sequence,
        start: usize,
        end: usize,
        lengths: LengthRange,
        thresholds: StructureThresholds,
    ) -> BioResult<Self> {
        let forward = start <= end;
        let (from, len) = if forward {
            (start, end - start)
        } else {
            (end, start - end)
        };
        if len == 0 {
            return Err(BioError::InvalidRange {
                start,
                length: 0,
                seq_len: template.len(),
            });
        }
        let stretch = template.sub_seq(from, len as isize)?;
        let seq = if forward {
            stretch
        } else {
            stretch.reverse_complement()
        };

        let lengths = lengths.fit(len);
        let order = lengths.search_order();
        let sets: BioResult<Vec<PrimerSet>> =
            par_map!(order, |&length: &usize| PrimerSet::new(&seq, length, thresholds));
        Ok(Self {
            seq,
            start,
            forward,
            lengths,
            sets: sets?,
        })
    }

    pub fn seq(&self) -> &Sequence {
        &self.seq
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn lengths(&self) -> LengthRange {
        self.lengths
    }

    /// Primer sets in search order, starting at the target length.
    pub fn sets(&self) -> &[PrimerSet] {
        &self.sets
    }

    pub fn primers_at(&self, length: usize) -> BioResult<&PrimerSet> {
        self.sets
            .iter()
            .find(|set| set.length == length)
            .ok_or(BioError::InvalidPrimerLength {
                length,
                min: self.lengths.min,
                max: self.lengths.max,
            })
    }
}
