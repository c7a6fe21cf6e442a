use crate::error::{BioError, BioResult};
use crate::restriction::CuttingSite;
use std::collections::HashMap;

pub type Qualifiers = HashMap<Box<str>, Box<str>>;

pub const KEY_UNKNOWN: &str = "unknown";
/// Key given to synthetic features built from restriction sites.
pub const KEY_RESTRICTION_SITE: &str = "restric_site";

/// Recognised INSDC feature-table keys.
pub const FEATURE_KEYS: &[&str] = &[
    "misc_difference", "conflict", "unsure", "old_sequence", "variation", "modified_base",
    "gene", "promoter", "CAAT_signal", "TATA_signal", "-35_signal", "-10_signal",
    "GC_signal", "RBS", "polyA_signal", "enhancer", "attenuator", "terminator",
    "rep_origin", "oriT", "prim_transcript", "misc_RNA", "precursor_RNA", "mRNA",
    "5'clip", "3'clip", "5'UTR", "3'UTR", "exon", "CDS", "sig_peptide",
    "transit_peptide", "mat_peptide", "intron", "polyA_site", "rRNA", "tRNA", "scRNA",
    "snRNA", "snoRNA", "C_region", "D_segment", "J_segment", "N_region", "S_region",
    "V_region", "V_segment", "repeat_region", "repeat_unit", "LTR", "satellite",
    "misc_binding", "primer_bind", "protein_bind", "iDNA", "stem_loop", "D-loop", "gap",
    "operon", "misc_feature", "misc_recomb", "misc_structure", "mobile_element",
    "ncRNA", "regulatory", "source", KEY_UNKNOWN,
];

/// Qualifiers searched, in order, for a display label.
const LABEL_QUALIFIERS: &[&str] = &[
    "label", "gene", "product", "locus_tag", "note", "db_xref", "protein_id",
];

pub fn is_feature_key(key: &str) -> bool {
    FEATURE_KEYS.contains(&key)
}

/// Explicit lookup of a feature key; parsing never calls this and folds
/// unrecognised keys into [`KEY_UNKNOWN`] instead.
pub fn feature_key(key: &str) -> BioResult<&'static str> {
    FEATURE_KEYS
        .iter()
        .copied()
        .find(|&k| k == key)
        .ok_or_else(|| BioError::UnknownFeatureKey {
            key: key.to_string(),
        })
}

/// Annotation attached to a sequence region.
///
/// The location is kept as written in the feature table; turning it into
/// coordinates is left to the consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feature {
    key: Box<str>,
    location: Box<str>,
    qualifiers: Qualifiers,
}

impl Feature {
    pub fn new(key: impl Into<Box<str>>, location: impl Into<Box<str>>) -> Self {
        Self {
            key: key.into(),
            location: location.into(),
            qualifiers: Qualifiers::new(),
        }
    }

    /// Build a feature from its qualifier block, one entry per table line
    /// with the 21-column indent already removed.
    pub fn from_table_lines<S: AsRef<str>>(
        key: impl Into<Box<str>>,
        location: impl Into<Box<str>>,
        lines: &[S],
    ) -> Self {
        let mut feature = Self::new(key, location);
        for (name, value) in parse_qualifiers(lines) {
            feature.add_qualifier(&name, &value);
        }
        feature
    }

    pub fn restriction_site(site: &CuttingSite) -> Self {
        let mut feature = Self::new(KEY_RESTRICTION_SITE, site.location());
        feature.add_qualifier("label", &site.enzyme);
        feature
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    pub fn qualifier(&self, name: &str) -> Option<&str> {
        self.qualifiers.get(name).map(|v| &**v)
    }

    /// Add a qualifier; a repeated name appends the value after `", "`.
    pub fn add_qualifier(&mut self, name: &str, value: &str) {
        match self.qualifiers.get_mut(name) {
            Some(existing) => {
                let merged = format!("{existing}, {value}");
                *existing = merged.into_boxed_str();
            }
            None => {
                self.qualifiers.insert(name.into(), value.into());
            }
        }
    }

    /// First of the label-like qualifiers with quotes removed, else the key.
    pub fn label(&self) -> &str {
        LABEL_QUALIFIERS
            .iter()
            .find_map(|name| self.qualifier(name))
            .map(|v| v.trim_matches('"'))
            .unwrap_or(&self.key)
    }
}

/// Split a qualifier block into `(name, value)` pairs in file order.
///
/// A `/name=value` line opens a qualifier, a bare `/name` has an empty value,
/// and other lines continue the open qualifier. Continuations are trimmed and
/// concatenated, so a quoted value spanning lines is joined up to its closing
/// quote. Quotes are kept.
pub fn parse_qualifiers<S: AsRef<str>>(lines: &[S]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut open: Option<(String, String)> = None;

    for line in lines {
        let line = line.as_ref().trim();
        if let Some(rest) = line.strip_prefix('/') {
            if let Some(done) = open.take() {
                out.push(done);
            }
            open = Some(match rest.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (rest.to_string(), String::new()),
            });
        } else if let Some((_, value)) = open.as_mut() {
            value.push_str(line);
        }
    }
    if let Some(done) = open {
        out.push(done);
    }
    out
}
