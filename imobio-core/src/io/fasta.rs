use crate::error::{BioError, BioResult};
use crate::io::{push_seq_chars, source_name};
use crate::seq::record::SeqRecord;
use crate::seq::Sequence;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Residues per line when writing.
pub const LINE_WIDTH: usize = 60;

/// Iterator over the records of a FASTA stream.
pub struct FastaRecords<R> {
    reader: R,
    source: Box<str>,
    line_no: usize,
    // title line read while scanning the previous record's residues
    pending: Option<(String, usize)>,
    line: String,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            source: "<reader>".into(),
            line_no: 0,
            pending: None,
            line: String::new(),
        }
    }

    /// Name used for the input in parse errors.
    pub fn with_source(mut self, source: impl Into<Box<str>>) -> Self {
        self.source = source.into();
        self
    }

    /// Read the next line into `self.line`; `false` at end of input.
    fn fill(&mut self) -> BioResult<bool> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    fn title(&mut self) -> BioResult<Option<(String, usize)>> {
        if let Some(title) = self.pending.take() {
            return Ok(Some(title));
        }
        while self.fill()? {
            if self.line.starts_with('>') {
                return Ok(Some((self.line.clone(), self.line_no)));
            }
            if !self.line.trim().is_empty() {
                return Err(BioError::parse(
                    &self.source,
                    self.line_no,
                    "expected header line starting with '>'",
                ));
            }
        }
        Ok(None)
    }

    fn read_record(&mut self) -> BioResult<Option<SeqRecord>> {
        let Some((title, title_line)) = self.title()? else {
            return Ok(None);
        };
        let (id, desc) = split_title(&title, &self.source, title_line)?;

        let mut residues = String::new();
        while self.fill()? {
            if self.line.starts_with('>') {
                self.pending = Some((self.line.clone(), self.line_no));
                break;
            }
            push_seq_chars(&mut residues, &self.line);
        }

        let mut record = SeqRecord::new(id, Sequence::new(&residues));
        record.desc = desc.map(Into::into);
        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = BioResult<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

pub fn fasta_records_from_reader<R: BufRead>(reader: R) -> FastaRecords<R> {
    FastaRecords::new(reader)
}

pub fn read_fasta_records_from_reader<R: BufRead>(reader: R) -> BioResult<Vec<SeqRecord>> {
    fasta_records_from_reader(reader).collect()
}

pub fn read_fasta_records_from_path(path: impl AsRef<Path>) -> BioResult<Vec<SeqRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    FastaRecords::new(reader)
        .with_source(source_name(path))
        .collect()
}

pub fn read_fasta_records_from_bytes(data: &[u8]) -> BioResult<Vec<SeqRecord>> {
    let reader = BufReader::new(Cursor::new(data));
    read_fasta_records_from_reader(reader)
}

/// Split a `>` line into the record name and an optional description.
fn split_title<'a>(
    line: &'a str,
    source: &str,
    line_no: usize,
) -> BioResult<(&'a str, Option<&'a str>)> {
    let title = line
        .strip_prefix('>')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BioError::parse(source, line_no, "empty header"))?;
    Ok(match title.split_once(|c: char| c.is_whitespace()) {
        Some((id, rest)) => {
            let rest = rest.trim();
            (id, (!rest.is_empty()).then_some(rest))
        }
        None => (title, None),
    })
}

/// Write records as FASTA, wrapping sequence lines at `width` residues
/// (`0` keeps each sequence on one line).
pub fn write_fasta<'a, W, I>(writer: &mut W, records: I, width: usize) -> BioResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a SeqRecord>,
{
    for record in records {
        match record.desc() {
            Some(desc) => writeln!(writer, ">{} {}", record.id, desc)?,
            None => writeln!(writer, ">{}", record.id)?,
        }
        let bytes = record.seq().as_bytes();
        if width == 0 {
            writer.write_all(bytes)?;
            writer.write_all(b"\n")?;
            continue;
        }
        for chunk in bytes.chunks(width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn write_fasta_to_path(
    path: impl AsRef<Path>,
    records: &[SeqRecord],
    width: usize,
) -> BioResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_fasta(&mut writer, records, width)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::Alphabet;
    use crate::error::ErrorKind;

    #[test]
    fn parse_single_record() {
        let data = b">seq1\nACGT\n";
        let records = read_fasta_records_from_bytes(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "seq1");
        assert_eq!(records[0].desc(), None);
        assert_eq!(records[0].seq().as_str(), "ACGT");
        assert_eq!(records[0].seq().alphabet(), Alphabet::Dna);
    }

    #[test]
    fn header_with_description() {
        let data = b">seq1 some desc here\nAC\nGT\n";
        let records = read_fasta_records_from_bytes(data).unwrap();
        assert_eq!(records[0].name(), "seq1");
        assert_eq!(records[0].desc(), Some("some desc here"));
        assert_eq!(records[0].seq().as_str(), "ACGT");
    }

    #[test]
    fn multiple_records_guess_alphabets() {
        let data = b">seq1\nAC\n>prot\nMKVLAAGIW\n>rna\nACGUACGU\n";
        let records = read_fasta_records_from_bytes(data).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].name(), "prot");
        assert_eq!(records[1].seq().alphabet(), Alphabet::Protein);
        assert_eq!(records[2].seq().alphabet(), Alphabet::Rna);
    }

    #[test]
    fn empty_sequence_allowed() {
        let data = b">seq1\n>seq2\nA\n";
        let records = read_fasta_records_from_bytes(data).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].seq().is_empty());
        assert_eq!(records[0].seq().alphabet(), Alphabet::Unknown);
        assert_eq!(records[1].seq().as_str(), "A");
    }

    #[test]
    fn text_before_header_is_a_parse_error() {
        let data = b"\nACGT\n>seq1\nAC\n";
        match read_fasta_records_from_bytes(data).unwrap_err() {
            BioError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
        let err = read_fasta_records_from_bytes(b">  \nAC\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn writer_wraps_lines() {
        let seq = Sequence::dna(&"acgt".repeat(40));
        let records = vec![SeqRecord::new("long", seq).with_desc("160 bp")];
        let mut out = Vec::new();
        write_fasta(&mut out, &records, LINE_WIDTH).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">long 160 bp");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[3].len(), 40);

        let back = read_fasta_records_from_bytes(text.as_bytes()).unwrap();
        assert_eq!(back[0].seq().as_str(), records[0].seq().as_str());
    }

    #[test]
    fn write_and_read_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta");
        let records = vec![SeqRecord::new("p1", Sequence::protein("MKVLA"))];
        write_fasta_to_path(&path, &records, 0).unwrap();
        let back = read_fasta_records_from_path(&path).unwrap();
        assert_eq!(back[0].name(), "p1");
        assert_eq!(back[0].seq().as_str(), "MKVLA");
    }
}
