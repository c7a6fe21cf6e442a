//! Restriction enzyme recognition and cutting.

use crate::error::{BioError, BioResult};
use crate::seq::{Feature, Sequence};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Where an enzyme cuts a sequence.
///
/// `index` is the 0-based cut position on the 5' strand (negative values
/// belong to the 3' strand) and `length` the signed distance to the cut on
/// the opposite strand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CuttingSite {
    pub index: i64,
    pub length: i64,
    pub enzyme: Box<str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overhang {
    FivePrime,
    Blunt,
    ThreePrime,
}

impl CuttingSite {
    pub fn overhang(&self) -> Overhang {
        match self.length {
            l if l > 0 => Overhang::FivePrime,
            0 => Overhang::Blunt,
            _ => Overhang::ThreePrime,
        }
    }

    /// Feature-table location of the cut: `a^b` for a blunt cut, else the
    /// 1-based span between the two strand cuts.
    pub fn location(&self) -> String {
        let other = self.index + self.length;
        if other == self.index {
            format!("{}^{}", self.index, self.index + 1)
        } else {
            let (lo, hi) = (self.index.min(other), self.index.max(other));
            format!("{}..{}", lo + 1, hi)
        }
    }
}

/// How ambiguity letters in a recognition site are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternMode {
    Nucleotide,
    AminoAcid,
}

/// Convert an IUPAC recognition site into regular-expression syntax.
///
/// Parenthesised repeat counts `(n,m)` become `{n,m}` before ambiguity
/// letters are expanded into character classes.
pub fn seq2regexp(site: &str, mode: PatternMode) -> String {
    let quantified = braces_for_repeats(&site.to_ascii_uppercase());

    let mut out = String::with_capacity(quantified.len() * 2);
    for ch in quantified.chars() {
        let class = match mode {
            PatternMode::Nucleotide => match ch {
                'R' => "[AG]",
                'Y' => "[CT]",
                'M' => "[AC]",
                'K' => "[GT]",
                'S' => "[CG]",
                'W' => "[AT]",
                'B' => "[CGT]",
                'D' => "[AGT]",
                'H' => "[ACT]",
                'V' => "[ACG]",
                'N' => "[ACGT]",
                _ => "",
            },
            PatternMode::AminoAcid => match ch {
                'B' => "[ND]",
                'Z' => "[QE]",
                'X' => "[ARNDCQEGHILKMFPSTWYV]",
                _ => "",
            },
        };
        if class.is_empty() {
            out.push(ch);
        } else {
            out.push_str(class);
        }
    }
    out
}

/// Rewrite `(n)`, `(n,)` and `(n,m)` as `{n}`, `{n,}` and `{n,m}`; other
/// parentheses are left alone.
fn braces_for_repeats(site: &str) -> String {
    let mut out = String::with_capacity(site.len());
    let mut rest = site;
    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let count = tail
            .find(')')
            .map(|close| &tail[..close])
            .filter(|inner| is_repeat_count(inner));
        match count {
            Some(inner) => {
                out.push('{');
                out.push_str(inner);
                out.push('}');
                rest = &tail[inner.len() + 1..];
            }
            None => {
                out.push('(');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_repeat_count(inner: &str) -> bool {
    let (lo, hi) = inner.split_once(',').unwrap_or((inner, ""));
    !lo.is_empty()
        && lo.bytes().all(|b| b.is_ascii_digit())
        && hi.bytes().all(|b| b.is_ascii_digit())
}

/// A compiled recognition site with its four cut offsets.
#[derive(Clone)]
pub struct EnzymePattern {
    name: Box<str>,
    site: Box<str>,
    regex: Regex,
    cuts: [i32; 4],
}

impl EnzymePattern {
    pub fn new(name: &str, site: &str, cuts: [i32; 4]) -> BioResult<Self> {
        let pattern = seq2regexp(site, PatternMode::Nucleotide);
        let regex = Regex::new(&pattern).map_err(|e| BioError::InvalidPattern {
            pattern,
            source: Box::new(e),
        })?;
        Ok(Self {
            name: name.into(),
            site: site.into(),
            regex,
            cuts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn cuts(&self) -> [i32; 4] {
        self.cuts
    }

    /// One site per non-overlapping match in the upper-cased sequence.
    pub fn find_sites(&self, seq: &Sequence) -> Vec<CuttingSite> {
        let upper = seq.as_str().to_ascii_uppercase();
        let [c1, c2, ..] = self.cuts;
        self.regex
            .find_iter(&upper)
            .map(|m| CuttingSite {
                index: m.start() as i64 + c1 as i64,
                length: (c2 - c1) as i64,
                enzyme: self.name.clone(),
            })
            .collect()
    }
}

impl fmt::Debug for EnzymePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnzymePattern")
            .field("name", &self.name)
            .field("site", &self.site)
            .field("regex", &self.regex.as_str())
            .field("cuts", &self.cuts)
            .finish()
    }
}

/// Read-only name to pattern map loaded from a REBASE `emboss_e` style file.
#[derive(Debug, Default)]
pub struct EnzymeDb {
    patterns: HashMap<Box<str>, EnzymePattern>,
}

impl EnzymeDb {
    pub fn load(path: impl AsRef<Path>) -> BioResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BioError::ResourceIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a database from `reader`; `source` names it in errors.
    ///
    /// Lines are `name site len ncuts blunt c1 c2 c3 c4`. When a name occurs
    /// more than once only its first pattern is kept.
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> BioResult<Self> {
        let resource = |line_no: usize, msg: String| BioError::Resource {
            path: source.to_string(),
            msg: format!("line {line_no}: {msg}"),
        };

        let mut patterns = HashMap::new();
        let mut duplicates = 0usize;
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| BioError::ResourceIo {
                path: source.to_string(),
                source: e,
            })?;
            if line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() <= 1 {
                continue;
            }
            if tokens.len() < 9 {
                return Err(resource(
                    i + 1,
                    format!("expected 9 fields, found {}", tokens.len()),
                ));
            }

            let name = tokens[0];
            if patterns.contains_key(name) {
                debug!("skipping additional pattern {} for {}", tokens[1], name);
                duplicates += 1;
                continue;
            }
            let mut cuts = [0i32; 4];
            for (cut, tok) in cuts.iter_mut().zip(&tokens[5..9]) {
                *cut = tok
                    .parse()
                    .map_err(|_| resource(i + 1, format!("bad cut offset '{tok}'")))?;
            }
            let pattern = EnzymePattern::new(name, tokens[1], cuts)
                .map_err(|e| resource(i + 1, e.to_string()))?;
            patterns.insert(name.into(), pattern);
        }

        info!(
            "loaded {} enzymes from {} ({} duplicate entries skipped)",
            patterns.len(),
            source,
            duplicates
        );
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Enzyme names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(|k| &**k).collect();
        names.sort_unstable();
        names
    }

    pub fn pattern(&self, name: &str) -> BioResult<&EnzymePattern> {
        self.patterns
            .get(name)
            .ok_or_else(|| BioError::UnknownEnzyme {
                name: name.to_string(),
            })
    }

    /// Cutting sites of one enzyme. An empty vector means the enzyme is
    /// known but does not cut.
    pub fn restrict(&self, seq: &Sequence, name: &str) -> BioResult<Vec<CuttingSite>> {
        Ok(self.pattern(name)?.find_sites(seq))
    }

    /// Cutting sites of several enzymes, ordered by index then enzyme.
    pub fn digest<S>(&self, seq: &Sequence, names: &[S]) -> BioResult<Vec<CuttingSite>>
    where
        S: AsRef<str> + Sync,
    {
        let per_enzyme: BioResult<Vec<Vec<CuttingSite>>> =
            par_map!(names, |name: &S| self.restrict(seq, name.as_ref()));
        Ok(sorted_sites(per_enzyme?))
    }

    /// Cutting sites of every enzyme in the database.
    pub fn digest_all(&self, seq: &Sequence) -> Vec<CuttingSite> {
        let patterns: Vec<&EnzymePattern> = self.patterns.values().collect();
        let per_enzyme: Vec<Vec<CuttingSite>> =
            par_map!(patterns, |pattern: &&EnzymePattern| pattern.find_sites(seq));
        sorted_sites(per_enzyme)
    }
}

fn sorted_sites(per_enzyme: Vec<Vec<CuttingSite>>) -> Vec<CuttingSite> {
    let mut sites: Vec<CuttingSite> = per_enzyme.into_iter().flatten().collect();
    sites.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.enzyme.cmp(&b.enzyme)));
    sites
}

/// Turn cutting sites into `restric_site` features.
pub fn sites_to_features(sites: &[CuttingSite]) -> Vec<Feature> {
    sites.iter().map(Feature::restriction_site).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Cursor, Write};

    const MINI_DB: &str = "\
# REBASE version 510                                              emboss_e.510
#
EcoRI\tGAATTC\t6\t2\t0\t1\t5\t5\t1
SmaI\tCCCGGG\t6\t2\t1\t3\t3\t3\t3
PstI\tCTGCAG\t6\t2\t0\t5\t1\t1\t5
BsiYI\tCCNNNNNNNGG\t11\t2\t0\t7\t4\t0\t0

TaqII\tGACCGA\t6\t2\t0\t17\t15\t0\t0
TaqII\tCACCCA\t6\t2\t0\t17\t15\t0\t0
";

    fn mini_db() -> EnzymeDb {
        EnzymeDb::from_reader(Cursor::new(MINI_DB), "mini").unwrap()
    }

    #[test]
    fn ecori_cuts_once() {
        let db = mini_db();
        let sites = db.restrict(&Sequence::dna("GGAATTCC"), "EcoRI").unwrap();
        assert_eq!(
            sites,
            vec![CuttingSite {
                index: 2,
                length: 4,
                enzyme: "EcoRI".into()
            }]
        );
        assert_eq!(sites[0].overhang(), Overhang::FivePrime);
        assert_eq!(sites[0].location(), "3..6");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let db = mini_db();
        let sites = db.restrict(&Sequence::dna("ttgaattcaagaattc"), "EcoRI").unwrap();
        let idx: Vec<i64> = sites.iter().map(|s| s.index).collect();
        assert_eq!(idx, vec![3, 11]);
    }

    #[test]
    fn unknown_enzyme_is_distinct_from_no_sites() {
        let db = mini_db();
        let seq = Sequence::dna("AAAAAAAA");
        assert!(db.restrict(&seq, "EcoRI").unwrap().is_empty());
        let err = db.restrict(&seq, "NotAnEnzyme").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn overhang_direction() {
        let db = mini_db();
        let smai = db.restrict(&Sequence::dna("AACCCGGGTT"), "SmaI").unwrap();
        assert_eq!(smai[0].overhang(), Overhang::Blunt);
        assert_eq!(smai[0].location(), "5^6");
        let psti = db.restrict(&Sequence::dna("ACTGCAGT"), "PstI").unwrap();
        assert_eq!(psti[0].index, 6);
        assert_eq!(psti[0].overhang(), Overhang::ThreePrime);
        assert_eq!(psti[0].location(), "3..6");
    }

    #[test]
    fn ambiguous_site_matches() {
        let db = mini_db();
        let sites = db.restrict(&Sequence::dna("ttCCAGTACTAGGtt"), "BsiYI").unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].index, 9);
    }

    #[test]
    fn first_duplicate_entry_wins() {
        let db = mini_db();
        assert_eq!(db.len(), 5);
        assert_eq!(db.pattern("TaqII").unwrap().site(), "GACCGA");
        assert_eq!(db.names()[0], "BsiYI");
    }

    #[test]
    fn digest_sorts_by_index() {
        let db = mini_db();
        let seq = Sequence::dna("CTGCAGAAGAATTCAACCCGGG");
        let sites = db.digest(&seq, &["SmaI", "EcoRI", "PstI"]).unwrap();
        let got: Vec<(&str, i64)> = sites.iter().map(|s| (&*s.enzyme, s.index)).collect();
        assert_eq!(got, vec![("PstI", 5), ("EcoRI", 9), ("SmaI", 19)]);
        assert!(db.digest(&seq, &["EcoRI", "Nope"]).is_err());
        assert_eq!(db.digest_all(&seq), sites);
    }

    #[test]
    fn sites_become_features() {
        let db = mini_db();
        let sites = db.restrict(&Sequence::dna("GGAATTCC"), "EcoRI").unwrap();
        let features = sites_to_features(&sites);
        assert_eq!(features[0].key(), "restric_site");
        assert_eq!(features[0].location(), "3..6");
        assert_eq!(features[0].label(), "EcoRI");
    }

    #[test]
    fn malformed_line_is_a_resource_error() {
        let text = "EcoRI\tGAATTC\t6\t2\t0\n";
        let err = EnzymeDb::from_reader(Cursor::new(text), "bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
        assert!(err.to_string().contains("line 1"));

        let text = "EcoRI\tGAATTC\t6\t2\t0\tone\t5\t5\t1\n";
        let err = EnzymeDb::from_reader(Cursor::new(text), "bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
    }

    #[test]
    fn load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINI_DB.as_bytes()).unwrap();
        let db = EnzymeDb::load(file.path()).unwrap();
        assert!(db.contains("EcoRI"));

        let err = EnzymeDb::load("/nonexistent/emboss_e.510").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
    }

    #[test]
    fn regexp_translation() {
        assert_eq!(seq2regexp("acwtman", PatternMode::Nucleotide), "AC[AT]T[AC]A[ACGT]");
        assert_eq!(seq2regexp("GCN(2,3)GC", PatternMode::Nucleotide), "GC[ACGT]{2,3}GC");
        assert_eq!(seq2regexp("N(4)", PatternMode::Nucleotide), "[ACGT]{4}");
        assert_eq!(braces_for_repeats("A(B)C(12,)"), "A(B)C{12,}");
        assert_eq!(seq2regexp("BZXR", PatternMode::AminoAcid), "[ND][QE][ARNDCQEGHILKMFPSTWYV]R");
    }
}
