//! Cheap file-format detection.
//!
//! `sneak` looks at the first non-blank line of a file (and scans ahead for
//! further record markers) to decide which full reader applies, without
//! parsing any record.

use crate::alphabets::{guess_alphabet, Alphabet};
use crate::error::BioResult;
use crate::io::source_name;
use memchr::{memchr, memmem};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    #[default]
    Unknown,
    GenBank,
    Fasta,
    PlainSequence,
    MultiAlign,
    Trace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SneakAnswer {
    #[default]
    UnknownFormat,
    Ok,
    Error,
    Ambiguous,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LocusTopology {
    #[default]
    Unknown,
    Linear,
    Circular,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Quantity {
    #[default]
    Single,
    Multiple,
}

/// What a peek at a file revealed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SneakResult {
    pub file_type: FileType,
    pub answer: SneakAnswer,
    pub alphabet: Alphabet,
    pub name: Option<Box<str>>,
    pub base_count: usize,
    pub topology: LocusTopology,
    pub quantity: Quantity,
    pub path: Box<str>,
}

impl SneakResult {
    fn new(path: &str) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.answer == SneakAnswer::Ok
    }
}

/// Classify the file at `path`. Failing to read the file is an error; an
/// unrecognised layout is reported through [`SneakAnswer`].
pub fn sneak(path: impl AsRef<Path>) -> BioResult<SneakResult> {
    let path = path.as_ref();
    let name = source_name(path);

    if path.extension().is_some_and(|ext| ext == "scf") {
        let result = SneakResult {
            file_type: FileType::Trace,
            answer: SneakAnswer::Ok,
            alphabet: Alphabet::Dna,
            ..SneakResult::new(&name)
        };
        debug!("{name}: sequencing trace");
        return Ok(result);
    }

    let data = std::fs::read(path)?;
    let mut result = sneak_bytes(&data);
    result.path = name.into_boxed_str();
    if result.file_type == FileType::PlainSequence {
        result.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned().into_boxed_str());
    }
    debug!(
        "{}: {:?} ({:?}, {:?})",
        result.path, result.file_type, result.answer, result.quantity
    );
    Ok(result)
}

/// Classify in-memory file contents.
pub fn sneak_bytes(data: &[u8]) -> SneakResult {
    let mut result = SneakResult::new("");
    let mut lines = Lines::new(data);

    let Some(first) = lines.by_ref().find(|line| !line.trim_ascii().is_empty()) else {
        result.answer = SneakAnswer::Error;
        return result;
    };
    let rest = lines.remainder();

    if first.starts_with(b"LOCUS") {
        sneak_locus(first, rest, &mut result);
    } else if first.starts_with(b">") {
        result.file_type = FileType::Fasta;
        result.answer = SneakAnswer::Ok;
        result.name = String::from_utf8_lossy(&first[1..])
            .split_whitespace()
            .next()
            .map(Into::into);
        if count_markers(rest, b">") > 0 {
            result.quantity = Quantity::Multiple;
        }
    } else if first.trim_ascii().starts_with(b"CLUSTAL") {
        result.file_type = FileType::MultiAlign;
        result.answer = SneakAnswer::Ok;
        result.quantity = Quantity::Multiple;
    } else if Lines::new(data).all(is_sequence_line) {
        let letters: Vec<u8> = data
            .iter()
            .copied()
            .filter(u8::is_ascii_alphabetic)
            .collect();
        result.file_type = FileType::PlainSequence;
        result.answer = SneakAnswer::Ok;
        result.base_count = letters.len();
        result.alphabet = guess_alphabet(&String::from_utf8_lossy(&letters));
    }
    result
}

fn sneak_locus(first: &[u8], rest: &[u8], result: &mut SneakResult) {
    result.file_type = FileType::GenBank;
    let line = String::from_utf8_lossy(first);
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() > 5 {
        result.answer = SneakAnswer::Ok;
        result.name = Some(tokens[1].into());
        result.base_count = leading_number(tokens[2]).unwrap_or(0);
    } else {
        result.answer = SneakAnswer::Ambiguous;
    }

    result.alphabet = if tokens.iter().any(|t| *t == "DNA" || t.ends_with("-DNA")) {
        Alphabet::Dna
    } else if tokens.iter().any(|t| t.ends_with("RNA")) {
        Alphabet::Rna
    } else if tokens.iter().any(|t| *t == "Protein" || *t == "protein") {
        Alphabet::Protein
    } else {
        Alphabet::Unknown
    };

    result.topology = if tokens.contains(&"circular") {
        LocusTopology::Circular
    } else if tokens.contains(&"linear") {
        LocusTopology::Linear
    } else {
        LocusTopology::Unknown
    };

    if count_markers(rest, b"LOCUS") > 0 {
        result.quantity = Quantity::Multiple;
    }
}

/// First run of decimal digits in `token`.
fn leading_number(token: &str) -> Option<usize> {
    let start = token.find(|c: char| c.is_ascii_digit())?;
    let digits = &token[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

fn is_sequence_line(line: &[u8]) -> bool {
    line.iter().all(|&b| {
        b.is_ascii_alphanumeric() || b.is_ascii_whitespace() || matches!(b, b'-' | b'.' | b'*')
    })
}

/// Lines of a byte buffer split on `\n`, keeping track of where the
/// unread remainder starts.
struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remainder(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let end = memchr(b'\n', rest).unwrap_or(rest.len());
        self.pos += (end + 1).min(rest.len());
        let line = &rest[..end];
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }
}

/// Number of lines in `data` starting with `marker`.
pub fn count_markers(data: &[u8], marker: &[u8]) -> usize {
    let at_line_start = |pos: usize| pos == 0 || data[pos - 1] == b'\n';
    memmem::find_iter(data, marker).filter(|&pos| at_line_start(pos)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LOCUS: &str =
        "LOCUS       SYNPUC19CV  2686 bp    ds-DNA     circular SYN 30-SEP-2020\nDEFINITION  x\n//\n";

    #[test]
    fn genbank_locus_line() {
        let result = sneak_bytes(LOCUS.as_bytes());
        assert_eq!(result.file_type, FileType::GenBank);
        assert!(result.is_ok());
        assert_eq!(result.name.as_deref(), Some("SYNPUC19CV"));
        assert_eq!(result.base_count, 2686);
        assert_eq!(result.alphabet, Alphabet::Dna);
        assert_eq!(result.topology, LocusTopology::Circular);
        assert_eq!(result.quantity, Quantity::Single);
    }

    #[test]
    fn short_locus_is_ambiguous_and_second_locus_is_multiple() {
        let text = format!("\n\nLOCUS X 10\n//\n{LOCUS}");
        let result = sneak_bytes(text.as_bytes());
        assert_eq!(result.file_type, FileType::GenBank);
        assert_eq!(result.answer, SneakAnswer::Ambiguous);
        assert_eq!(result.quantity, Quantity::Multiple);
        assert_eq!(result.topology, LocusTopology::Unknown);
    }

    #[test]
    fn fasta_single_and_multiple() {
        let single = sneak_bytes(b">seq1 desc\nACGT\n");
        assert_eq!(single.file_type, FileType::Fasta);
        assert_eq!(single.name.as_deref(), Some("seq1"));
        assert_eq!(single.quantity, Quantity::Single);

        let multi = sneak_bytes(b">a\nAC\r\n>b\r\nGT\r\n");
        assert_eq!(multi.quantity, Quantity::Multiple);
        assert_eq!(count_markers(b">a\nAC\n>b\nGT\n", b">"), 2);
    }

    #[test]
    fn clustal_and_plain_sequence() {
        let clustal = sneak_bytes(b"CLUSTAL W (1.83)\n\nseq_a ACGT\n");
        assert_eq!(clustal.file_type, FileType::MultiAlign);
        assert_eq!(clustal.quantity, Quantity::Multiple);

        let plain = sneak_bytes(b"acgtacgtac gtacgt\n  11 acgt\n");
        assert_eq!(plain.file_type, FileType::PlainSequence);
        assert_eq!(plain.base_count, 20);
        assert_eq!(plain.alphabet, Alphabet::Dna);
    }

    #[test]
    fn unknown_and_empty() {
        let unknown = sneak_bytes(b"{\"not\": \"a sequence\"}\n");
        assert_eq!(unknown.file_type, FileType::Unknown);
        assert_eq!(unknown.answer, SneakAnswer::UnknownFormat);

        let empty = sneak_bytes(b"  \n\n");
        assert_eq!(empty.answer, SneakAnswer::Error);
    }

    #[test]
    fn path_based_detection() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("read.scf");
        let result = sneak(&trace).unwrap();
        assert_eq!(result.file_type, FileType::Trace);
        assert_eq!(result.alphabet, Alphabet::Dna);

        let plain = dir.path().join("insert.txt");
        let mut file = std::fs::File::create(&plain).unwrap();
        writeln!(file, "MKVLAAGIWQRSTEDF").unwrap();
        drop(file);
        let result = sneak(&plain).unwrap();
        assert_eq!(result.file_type, FileType::PlainSequence);
        assert_eq!(result.alphabet, Alphabet::Protein);
        assert_eq!(result.name.as_deref(), Some("insert"));

        assert!(sneak(dir.path().join("missing.gb")).is_err());
    }
}
