//! GenBank flat-file reader.
//!
//! The format is line oriented with a 12-column header field. Columns used
//! for the LOCUS line follow the NCBI release notes:
//!
//! ```text
//! 13-28 name   30-40 length   45-47 strandedness   48-53 molecule type
//! 56-63 topology   65-67 division   69-79 modification date
//! ```

use crate::error::{BioError, BioResult};
use crate::io::{push_seq_chars, source_name, OnError, ReadReport, SkippedRecord};
use crate::seq::feature::{is_feature_key, Feature, KEY_UNKNOWN};
use crate::seq::record::{keys, InsdcRecord};
use crate::seq::Sequence;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::{debug, warn};

const HEADER_WIDTH: usize = 12;
const FEATURE_INDENT: usize = 6;
const QUALIFIER_INDENT: usize = 16;
const SEQUENCE_INDENT: usize = 10;
const LOCUS_MIN_LEN: usize = 62;

/// Header fields whose text may continue on following lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Definition,
    Accession,
    Version,
    Keywords,
    Source,
    Organism,
    Comment,
    Project,
    Segment,
    Reference,
    ReferenceDetail,
}

impl Field {
    fn from_header(head: &str) -> Option<Self> {
        Some(match head {
            "DEFINITION" => Field::Definition,
            "ACCESSION" => Field::Accession,
            "VERSION" => Field::Version,
            "KEYWORDS" => Field::Keywords,
            "SOURCE" => Field::Source,
            "ORGANISM" => Field::Organism,
            "COMMENT" => Field::Comment,
            "PROJECT" | "DBLINK" => Field::Project,
            "SEGMENT" => Field::Segment,
            "REFERENCE" => Field::Reference,
            "AUTHORS" | "CONSRTM" | "TITLE" | "JOURNAL" | "PUBMED" | "MEDLINE" | "REMARK" => {
                Field::ReferenceDetail
            }
            _ => return None,
        })
    }

    fn separator(self) -> &'static str {
        match self {
            Field::Comment => "\n",
            _ => " ",
        }
    }

    fn apply(self, record: &mut InsdcRecord, text: &str) {
        match self {
            Field::Definition => {
                record.description = Some(text.into());
                record.set_meta(keys::DEFINITION, text);
            }
            Field::Accession => {
                for acc in text.split_whitespace() {
                    record.push_list(keys::ACCESSION, acc);
                }
            }
            Field::Version => {
                let mut tokens = text.split_whitespace();
                if let Some(version) = tokens.next() {
                    record.set_meta(keys::VERSION, version);
                }
                if let Some(gi) = tokens.find_map(|t| t.strip_prefix("GI:")) {
                    record.set_meta(keys::VERSION_GI, gi);
                }
            }
            Field::Keywords => {
                for kw in text.split(';') {
                    let kw = kw.trim().trim_end_matches('.').trim_end();
                    if !kw.is_empty() {
                        record.push_list(keys::KEYWORDS, kw);
                    }
                }
            }
            Field::Source => record.set_meta(keys::SOURCE, text),
            Field::Organism => record.set_meta(keys::ORGANISM, text),
            Field::Comment => record.set_meta(keys::COMMENT, text),
            Field::Project => record.set_meta(keys::PROJECT, text),
            Field::Segment => record.set_meta(keys::SEGMENT, text),
            Field::Reference => record.push_list(keys::REFERENCE, text),
            Field::ReferenceDetail => record.append_list(keys::REFERENCE, text),
        }
    }
}

/// Split a line into its trimmed 12-column header and trimmed body.
fn split_header(line: &str) -> (&str, &str) {
    let cut = HEADER_WIDTH.min(line.len());
    match (line.get(..cut), line.get(cut..)) {
        (Some(head), Some(body)) => (head.trim(), body.trim()),
        _ => (line.trim(), ""),
    }
}

fn parse_locus(line: &str, source: &str, line_no: usize) -> BioResult<InsdcRecord> {
    if line.len() < LOCUS_MIN_LEN {
        return Err(BioError::parse(
            source,
            line_no,
            format!("LOCUS line too short ({} columns)", line.len()),
        ));
    }
    let field = |start: usize, end: usize| {
        line.get(start..end.min(line.len()))
            .map(str::trim)
            .unwrap_or("")
    };

    let name = field(12, 28);
    if name.is_empty() {
        return Err(BioError::parse(source, line_no, "LOCUS line has no name"));
    }
    let mut record = InsdcRecord::new(name);
    let fields = [
        (keys::LENGTH, field(29, 40)),
        (keys::STRANDEDNESS, field(44, 47).trim_end_matches('-')),
        (keys::MOLECULE_TYPE, field(47, 53)),
        (keys::TOPOLOGY, field(55, 63)),
        (keys::DIVISION, field(64, 67)),
        (keys::UPDATE_DATE, field(68, 79)),
    ];
    for (key, value) in fields {
        if !value.is_empty() {
            record.set_meta(key, value);
        }
    }
    Ok(record)
}

/// Group a FEATURES block into features.
///
/// Each entry is a line number and the line with its first five columns
/// removed, so a key starts in column 0 and qualifiers in column 16.
/// Location text continued on the lines before the first qualifier is
/// joined to the location. A non-blank line too short to reach the
/// qualifier column is a parse error.
pub fn extract_features<S: AsRef<str>>(
    lines: &[(usize, S)],
    source: &str,
) -> BioResult<Vec<Feature>> {
    let mut features = Vec::new();
    let mut current: Option<(String, String, Vec<String>)> = None;

    for (line_no, line) in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let (Some(head), Some(rest)) = (line.get(..QUALIFIER_INDENT), line.get(QUALIFIER_INDENT..))
        else {
            return Err(BioError::parse(
                source,
                *line_no,
                format!(
                    "feature line shorter than {} columns",
                    QUALIFIER_INDENT + FEATURE_INDENT - 1
                ),
            ));
        };
        let head = head.trim();

        if head.is_empty() {
            if let Some((_, location, qualifiers)) = current.as_mut() {
                let text = rest.trim();
                if qualifiers.is_empty() && !text.starts_with('/') {
                    location.push_str(text);
                } else {
                    qualifiers.push(rest.to_string());
                }
            }
            continue;
        }

        if let Some((key, location, qualifiers)) = current.take() {
            features.push(Feature::from_table_lines(key, location, &qualifiers));
        }
        let key = if is_feature_key(head) { head } else { KEY_UNKNOWN };
        current = Some((key.to_string(), rest.trim().to_string(), Vec::new()));
    }

    if let Some((key, location, qualifiers)) = current {
        features.push(Feature::from_table_lines(key, location, &qualifiers));
    }
    Ok(features)
}

/// Iterator over the records of a GenBank file.
///
/// A record that fails to parse is reported once as an error; reading then
/// resumes at the next `LOCUS` line.
pub struct GenBankRecords<R> {
    reader: R,
    source: Box<str>,
    line_no: usize,
    pending: Option<String>,
    current: Option<InsdcRecord>,
    open: Option<(Field, String)>,
    done: bool,
}

impl<R: BufRead> GenBankRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            source: "<reader>".into(),
            line_no: 0,
            pending: None,
            current: None,
            open: None,
            done: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<Box<str>>) -> Self {
        self.source = source.into();
        self
    }

    /// Line number of the most recently read line.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn read_line(&mut self) -> BioResult<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn close_field(&mut self) {
        if let (Some((field, text)), Some(record)) = (self.open.take(), self.current.as_mut()) {
            field.apply(record, &text);
        }
    }

    fn finish(&mut self) -> Option<InsdcRecord> {
        self.close_field();
        let record = self.current.take()?;
        debug!(
            "parsed GenBank record {} ({} features) from {}",
            record.name(),
            record.features().len(),
            self.source
        );
        Some(record)
    }

    fn read_features(&mut self) -> BioResult<()> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                continue;
            }
            if line.len() < FEATURE_INDENT || !line.starts_with(' ') {
                self.pending = Some(line);
                break;
            }
            if let Some(rest) = line.get(FEATURE_INDENT - 1..) {
                lines.push((self.line_no, rest.to_string()));
            }
        }
        let features = extract_features(&lines, &self.source).inspect_err(|_| {
            self.current = None;
            self.open = None;
        })?;
        if let Some(record) = self.current.as_mut() {
            record.set_features(features);
        }
        Ok(())
    }

    fn read_origin(&mut self) -> BioResult<()> {
        let mut data = String::new();
        while let Some(line) = self.read_line()? {
            if line.starts_with('L') || line.starts_with('/') {
                self.pending = Some(line);
                break;
            }
            if let Some(residues) = line.get(SEQUENCE_INDENT..) {
                push_seq_chars(&mut data, residues);
            }
        }
        if let Some(record) = self.current.as_mut() {
            let seq = match record.meta(keys::MOLECULE_TYPE) {
                Some("DNA") => Sequence::dna(&data),
                Some("AA") => Sequence::protein(&data),
                _ => Sequence::new(&data),
            };
            record.set_seq(seq);
        }
        Ok(())
    }

    fn advance(&mut self) -> BioResult<Option<InsdcRecord>> {
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                continue;
            }
            let (head, body) = split_header(&line);

            if self.current.is_none() {
                if head == "LOCUS" {
                    self.current = Some(parse_locus(&line, &self.source, self.line_no)?);
                }
                continue;
            }

            match head {
                "LOCUS" => {
                    self.pending = Some(line);
                    return Ok(self.finish());
                }
                "//" => return Ok(self.finish()),
                "FEATURES" => {
                    self.close_field();
                    self.read_features()?;
                }
                "ORIGIN" => {
                    self.close_field();
                    self.read_origin()?;
                }
                "" => {
                    if let Some((field, text)) = self.open.as_mut() {
                        text.push_str(field.separator());
                        text.push_str(body);
                    }
                }
                _ => {
                    self.close_field();
                    self.open = Field::from_header(head).map(|field| {
                        let text = match field {
                            Field::ReferenceDetail => format!("{head} {body}"),
                            _ => body.to_string(),
                        };
                        (field, text)
                    });
                }
            }
        }
        Ok(self.finish())
    }
}

impl<R: BufRead> Iterator for GenBankRecords<R> {
    type Item = BioResult<InsdcRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                if matches!(err, BioError::Io(_)) {
                    self.done = true;
                }
                Some(Err(err))
            }
        }
    }
}

pub fn genbank_records_from_reader<R: BufRead>(reader: R) -> GenBankRecords<R> {
    GenBankRecords::new(reader)
}

pub fn read_genbank_from_reader<R: BufRead>(reader: R) -> BioResult<Vec<InsdcRecord>> {
    genbank_records_from_reader(reader).collect()
}

pub fn read_genbank_from_path(path: impl AsRef<Path>) -> BioResult<Vec<InsdcRecord>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    GenBankRecords::new(reader)
        .with_source(source_name(path))
        .collect()
}

pub fn read_genbank_from_bytes(data: &[u8]) -> BioResult<Vec<InsdcRecord>> {
    read_genbank_from_reader(BufReader::new(Cursor::new(data)))
}

/// Read every record, skipping malformed ones when `on_error` is
/// [`OnError::Skip`]. I/O failures are always returned.
pub fn read_genbank_report<R: BufRead>(
    records: GenBankRecords<R>,
    on_error: OnError,
) -> BioResult<ReadReport<Vec<InsdcRecord>>> {
    let mut data = Vec::new();
    let mut skipped = Vec::new();
    for (idx, item) in records.enumerate() {
        match item {
            Ok(record) => data.push(record),
            Err(err @ BioError::Parse { .. }) if on_error == OnError::Skip => {
                warn!("skipping malformed GenBank record: {}", err);
                skipped.push(SkippedRecord::from_error(idx, &err));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(ReadReport { data, skipped })
}

pub fn read_genbank_report_from_path(
    path: impl AsRef<Path>,
    on_error: OnError,
) -> BioResult<ReadReport<Vec<InsdcRecord>>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    read_genbank_report(
        GenBankRecords::new(reader).with_source(source_name(path)),
        on_error,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::Alphabet;
    use crate::error::ErrorKind;
    use std::io::Write;

    const PUC19_MINI: &str = "\
LOCUS       pUC19-mini                60 bp    DNA     circular SYN 15-MAR-2012
DEFINITION  Cloning vector pUC19 fragment,
            synthetic.
ACCESSION   L09137 X02514
VERSION     L09137.2  GI:2440162
KEYWORDS    cloning vector; lacZ.
SOURCE      Cloning vector pUC19
  ORGANISM  Cloning vector pUC19
            other sequences; artificial sequences.
REFERENCE   1  (bases 1 to 60)
  AUTHORS   Yanisch-Perron,C., Vieira,J. and Messing,J.
  TITLE     Improved M13 phage cloning vectors
FEATURES             Location/Qualifiers
     source          1..60
                     /organism=\"Cloning vector pUC19\"
                     /mol_type=\"genomic DNA\"
     CDS             complement(10..30)
                     /gene=\"lacZ\"
                     /note=\"first\"
                     /note=\"second\"
                     /translation=\"MTMITPSLHACRSTLEDPRVPSSNSLAV
                     LQRRDWENPGVTQLNRLAAHPPFASWRNSEEARTDRPSQQLRSLNGEWRLMRY\"
     weird_key       join(40..45,
                     50..55)
                     /label=odd
BASE COUNT       13 a     17 c     19 g     11 t
ORIGIN
        1 tcgcgcgttt cggtgatgac ggtgaaaacc tctgacacat gcagctcccg gagacggtca
//
";

    const SECOND: &str = "\
LOCUS       second                    12 bp    mRNA    linear   PLN 01-JAN-2000
DEFINITION  Second record.
ORIGIN
        1 augcuuaagc ua
//
";

    #[test]
    fn minimal_record_parses_to_literals() {
        let records = read_genbank_from_bytes(PUC19_MINI.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.name(), "pUC19-mini");
        assert_eq!(
            rec.description(),
            Some("Cloning vector pUC19 fragment, synthetic.")
        );
        assert_eq!(rec.meta(keys::LENGTH), Some("60"));
        assert_eq!(rec.meta(keys::MOLECULE_TYPE), Some("DNA"));
        assert_eq!(rec.meta(keys::TOPOLOGY), Some("circular"));
        assert_eq!(rec.meta(keys::DIVISION), Some("SYN"));
        assert_eq!(rec.meta(keys::UPDATE_DATE), Some("15-MAR-2012"));
        assert_eq!(rec.meta(keys::STRANDEDNESS), None);

        let seq = rec.seq().unwrap();
        assert_eq!(seq.alphabet(), Alphabet::Dna);
        assert_eq!(
            seq.as_str(),
            "tcgcgcgtttcggtgatgacggtgaaaacctctgacacatgcagctcccggagacggtca"
        );

        let features = rec.features();
        assert_eq!(features.len(), 3);
        assert_eq!(features[1].key(), "CDS");
        assert_eq!(features[1].location(), "complement(10..30)");
        assert_eq!(features[1].qualifier("gene"), Some("\"lacZ\""));
        assert_eq!(
            features[1].qualifier("translation"),
            Some("\"MTMITPSLHACRSTLEDPRVPSSNSLAVLQRRDWENPGVTQLNRLAAHPPFASWRNSEEARTDRPSQQLRSLNGEWRLMRY\"")
        );
        assert_eq!(features[1].label(), "lacZ");
    }

    #[test]
    fn duplicate_notes_merge() {
        let records = read_genbank_from_bytes(PUC19_MINI.as_bytes()).unwrap();
        let cds = &records[0].features()[1];
        assert_eq!(cds.qualifier("note"), Some("\"first\", \"second\""));
    }

    #[test]
    fn unknown_key_and_last_feature_are_kept() {
        let records = read_genbank_from_bytes(PUC19_MINI.as_bytes()).unwrap();
        let rec = &records[0];
        let last = &rec.features()[2];
        assert_eq!(last.key(), KEY_UNKNOWN);
        assert_eq!(last.location(), "join(40..45,50..55)");
        assert_eq!(last.label(), "odd");
        let keys: Vec<&str> = rec.feature_keys().iter().map(|k| &**k).collect();
        assert_eq!(keys, vec!["source", "CDS", "unknown"]);
    }

    fn list<'a>(rec: &'a InsdcRecord, key: &str) -> Vec<&'a str> {
        rec.list(key).iter().map(|v| &**v).collect()
    }

    #[test]
    fn supplementary_headers() {
        let records = read_genbank_from_bytes(PUC19_MINI.as_bytes()).unwrap();
        let rec = &records[0];
        assert_eq!(list(rec, keys::ACCESSION), vec!["L09137", "X02514"]);
        assert_eq!(list(rec, keys::KEYWORDS), vec!["cloning vector", "lacZ"]);
        assert_eq!(rec.meta(keys::VERSION), Some("L09137.2"));
        assert_eq!(rec.meta(keys::VERSION_GI), Some("2440162"));
        assert_eq!(rec.meta(keys::SOURCE), Some("Cloning vector pUC19"));
        assert_eq!(
            rec.meta(keys::ORGANISM),
            Some("Cloning vector pUC19 other sequences; artificial sequences.")
        );
        assert_eq!(
            list(rec, keys::REFERENCE),
            vec![
                "1  (bases 1 to 60) AUTHORS Yanisch-Perron,C., Vieira,J. and Messing,J. \
                 TITLE Improved M13 phage cloning vectors"
            ]
        );
    }

    #[test]
    fn several_records_and_guessed_alphabet() {
        let text = format!("{PUC19_MINI}{SECOND}");
        let records = read_genbank_from_bytes(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name(), "second");
        assert_eq!(records[1].meta(keys::MOLECULE_TYPE), Some("mRNA"));
        let seq = records[1].seq().unwrap();
        assert_eq!(seq.as_str(), "augcuuaagcua");
        assert_eq!(seq.alphabet(), Alphabet::Rna);
    }

    #[test]
    fn record_without_terminator_is_flushed() {
        let text = PUC19_MINI.trim_end().trim_end_matches("//");
        let records = read_genbank_from_bytes(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq().unwrap().len(), 60);
    }

    #[test]
    fn short_locus_line_is_a_parse_error() {
        let text = format!("{PUC19_MINI}LOCUS       broken      5 bp\nORIGIN\n        1 acgta\n//\n");
        match read_genbank_from_bytes(text.as_bytes()).unwrap_err() {
            BioError::Parse { line, msg, .. } => {
                assert_eq!(line, 30);
                assert!(msg.contains("too short"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn lenient_reader_resumes_at_next_locus() {
        let text = format!(
            "{PUC19_MINI}LOCUS       broken      5 bp\nDEFINITION  lost.\nORIGIN\n        1 acgta\n//\n{SECOND}"
        );
        let records = genbank_records_from_reader(Cursor::new(text.as_bytes()));
        let report = read_genbank_report(records, OnError::Skip).unwrap();
        let names: Vec<&str> = report.data.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["pUC19-mini", "second"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 30);

        let records = genbank_records_from_reader(Cursor::new(text.as_bytes()));
        let err = read_genbank_report(records, OnError::Raise).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn read_from_path_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"LOCUS       x\n").unwrap();
        let err = read_genbank_from_path(file.path()).unwrap_err();
        let path = file.path().display().to_string();
        assert!(err.to_string().contains(&path));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SECOND.as_bytes()).unwrap();
        let report = read_genbank_report_from_path(file.path(), OnError::Raise).unwrap();
        assert_eq!(report.data.len(), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn feature_block_grouping() {
        let lines = [
            (10, "gene            100..200"),
            (11, "                /gene=\"abc\""),
            (12, "misc_thing      5..9"),
            (13, "  "),
        ];
        let features = extract_features(&lines, "t.gb").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].qualifier("gene"), Some("\"abc\""));
        assert_eq!(features[1].key(), KEY_UNKNOWN);
        assert_eq!(features[1].location(), "5..9");
    }

    #[test]
    fn short_feature_line_is_a_parse_error() {
        let lines = [
            (20, "gene            100..200"),
            (21, "                /gene=\"abc\""),
            (22, "CDS 5..9"),
            (23, "                /gene=\"xyz\""),
        ];
        let err = extract_features(&lines, "t.gb").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, BioError::Parse { line: 22, .. }));

        let text = "\
LOCUS       short-cds                 20 bp    DNA     linear   SYN 15-MAR-2012
FEATURES             Location/Qualifiers
     gene            1..20
                     /gene=\"abc\"
     CDS 5..9
ORIGIN
        1 acgtacgtac gtacgtacgt
//
";
        let err = read_genbank_from_bytes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, BioError::Parse { line: 5, .. }));

        // the broken record is dropped, not returned half-annotated
        let records = genbank_records_from_reader(Cursor::new(text.as_bytes()));
        let report = read_genbank_report(records, OnError::Skip).unwrap();
        assert!(report.data.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }
}
