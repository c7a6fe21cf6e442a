pub mod clustal;
pub mod fasta;
pub mod genbank;
pub mod sneak;

use crate::error::{BioError, BioResult};
use crate::seq::record::{InsdcRecord, SeqRecord};
use crate::seq::Sequence;
use sneak::{FileType, SneakAnswer};
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    #[default]
    Raise,
    Skip,
}

/// A record a lenient reader dropped instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 0-based position among the records seen so far.
    pub record: usize,
    pub line: usize,
    pub message: Box<str>,
}

impl SkippedRecord {
    pub(crate) fn from_error(record: usize, err: &BioError) -> Self {
        let line = match err {
            BioError::Parse { line, .. } => *line,
            _ => 0,
        };
        Self {
            record,
            line,
            message: err.to_string().into_boxed_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadReport<T> {
    pub data: T,
    pub skipped: Vec<SkippedRecord>,
}

/// Append the sequence symbols of `line` to `buf`, dropping ASCII whitespace.
pub fn push_seq_chars(buf: &mut String, line: &str) {
    buf.extend(line.chars().filter(|c| !c.is_ascii_whitespace()));
}

pub(crate) fn source_name(path: &Path) -> String {
    path.display().to_string()
}

/// Records read by [`read_any`], grouped by the reader that produced them.
#[derive(Clone, Debug)]
pub enum Contents {
    GenBank(Vec<InsdcRecord>),
    Sequences(Vec<SeqRecord>),
    Alignment(Vec<SeqRecord>),
}

impl Contents {
    pub fn len(&self) -> usize {
        match self {
            Contents::GenBank(records) => records.len(),
            Contents::Sequences(records) | Contents::Alignment(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Peek at `path` with [`sneak::sneak`] and hand it to the matching reader.
///
/// A plain sequence file becomes one record named after the file stem.
/// Trace files and unrecognised layouts are reported as unsupported.
pub fn read_any(path: impl AsRef<Path>) -> BioResult<Contents> {
    let path = path.as_ref();
    let peek = sneak::sneak(path)?;
    if peek.answer == SneakAnswer::Error {
        return Err(BioError::UnsupportedFormat {
            path: source_name(path),
            format: "empty".to_string(),
        });
    }
    debug!("dispatching {} as {:?}", peek.path, peek.file_type);
    match peek.file_type {
        FileType::GenBank => genbank::read_genbank_from_path(path).map(Contents::GenBank),
        FileType::Fasta => fasta::read_fasta_records_from_path(path).map(Contents::Sequences),
        FileType::MultiAlign => clustal::read_clustal_from_path(path).map(Contents::Alignment),
        FileType::PlainSequence => {
            let text = std::fs::read_to_string(path)?;
            let mut buf = String::with_capacity(peek.base_count);
            for line in text.lines() {
                push_seq_chars(&mut buf, line);
            }
            let name = peek.name.unwrap_or_default();
            Ok(Contents::Sequences(vec![SeqRecord::new(name, Sequence::new(&buf))]))
        }
        other => Err(BioError::UnsupportedFormat {
            path: source_name(path),
            format: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::Alphabet;
    use crate::error::ErrorKind;

    #[test]
    fn sequence_lines_drop_whitespace() {
        let mut buf = String::from("gg");
        push_seq_chars(&mut buf, " ac gt\tn\r\n");
        assert_eq!(buf, "ggacgtn");
    }

    #[test]
    fn skipped_record_keeps_parse_line() {
        let err = BioError::parse("x.gb", 7, "LOCUS line too short");
        let skipped = SkippedRecord::from_error(2, &err);
        assert_eq!(skipped.line, 7);
        assert_eq!(skipped.record, 2);
        assert!(skipped.message.contains("x.gb"));
    }

    #[test]
    fn read_any_dispatches_on_detected_format() {
        let dir = tempfile::tempdir().unwrap();

        let fasta = dir.path().join("reads.fa");
        std::fs::write(&fasta, ">r1\nACGT\n>r2\nGGCC\n").unwrap();
        match read_any(&fasta).unwrap() {
            Contents::Sequences(records) => assert_eq!(records.len(), 2),
            other => panic!("expected sequences, got {other:?}"),
        }

        let plain = dir.path().join("insert.seq");
        std::fs::write(&plain, "acgtacgt\nacgg\n").unwrap();
        let contents = read_any(&plain).unwrap();
        let Contents::Sequences(records) = contents else {
            panic!("expected one plain sequence");
        };
        assert_eq!(records[0].name(), "insert");
        assert_eq!(records[0].seq().as_str(), "acgtacgtacgg");
        assert_eq!(records[0].seq().alphabet(), Alphabet::Dna);

        let aln = dir.path().join("family.aln");
        std::fs::write(&aln, "CLUSTAL W\n\na ACGT\nb ACGA\n").unwrap();
        assert!(matches!(read_any(&aln).unwrap(), Contents::Alignment(ref r) if r.len() == 2));
    }

    #[test]
    fn read_any_rejects_traces_and_unknown_files() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("read.scf");
        std::fs::write(&trace, [0u8, 1, 2]).unwrap();
        assert_eq!(read_any(&trace).unwrap_err().kind(), ErrorKind::InvalidInput);

        let json = dir.path().join("notes.json");
        std::fs::write(&json, "{\"a\": 1}\n").unwrap();
        assert!(matches!(
            read_any(&json).unwrap_err(),
            BioError::UnsupportedFormat { .. }
        ));
    }
}
