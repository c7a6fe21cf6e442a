use crate::seq::feature::Feature;
use crate::seq::sequence::Sequence;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Metadata keys filled by the GenBank reader.
pub mod keys {
    pub const LENGTH: &str = "locusSequenceLength";
    pub const STRANDEDNESS: &str = "locusNumberofStrands";
    pub const TOPOLOGY: &str = "locusTopology";
    pub const MOLECULE_TYPE: &str = "locusMoleculeType";
    pub const UPDATE_DATE: &str = "locusModificationDate";
    pub const DIVISION: &str = "locusGenBankDivision";
    pub const DEFINITION: &str = "DEFINITION";
    pub const VERSION: &str = "VERSION";
    pub const VERSION_GI: &str = "VERSION_GI";
    pub const PROJECT: &str = "PROJECT";
    pub const SEGMENT: &str = "SEGMENT";
    pub const SOURCE: &str = "SOURCE";
    pub const ORGANISM: &str = "ORGANISM";
    pub const COMMENT: &str = "COMMENT";

    // list-valued
    pub const KEYWORDS: &str = "KEYWORDS";
    pub const ACCESSION: &str = "ACCESSION";
    pub const REFERENCE: &str = "REFERENCE";
}

/// A sequence with an identifier and optional description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: Box<str>,
    pub desc: Option<Box<str>>,
    pub seq: Sequence,
}

impl SeqRecord {
    pub fn new(id: impl Into<Box<str>>, seq: Sequence) -> Self {
        Self {
            id: id.into(),
            desc: None,
            seq,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<Box<str>>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// The identifier, or the description when the identifier is empty.
    pub fn name(&self) -> &str {
        if self.id.is_empty() {
            self.desc.as_deref().unwrap_or("")
        } else {
            &self.id
        }
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn seq(&self) -> &Sequence {
        &self.seq
    }
}

/// Annotated record read from an INSDC flat file.
#[derive(Clone, Debug, Default)]
pub struct InsdcRecord {
    pub name: Box<str>,
    pub description: Option<Box<str>>,
    seq: Option<Sequence>,
    features: Vec<Feature>,
    feature_keys: OnceLock<Vec<Box<str>>>,
    meta: HashMap<Box<str>, Box<str>>,
    lists: HashMap<Box<str>, Vec<Box<str>>>,
}

impl InsdcRecord {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            self.description.as_deref().unwrap_or("")
        } else {
            &self.name
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn seq(&self) -> Option<&Sequence> {
        self.seq.as_ref()
    }

    pub fn set_seq(&mut self, seq: Sequence) {
        self.seq = Some(seq);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn set_features(&mut self, features: Vec<Feature>) {
        self.features = features;
        self.feature_keys = OnceLock::new();
    }

    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
        self.feature_keys = OnceLock::new();
    }

    /// Distinct feature keys in order of first appearance.
    pub fn feature_keys(&self) -> &[Box<str>] {
        self.feature_keys.get_or_init(|| {
            let mut keys: Vec<Box<str>> = Vec::new();
            for feature in &self.features {
                if !keys.iter().any(|k| &**k == feature.key()) {
                    keys.push(feature.key().into());
                }
            }
            keys
        })
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(|v| &**v)
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<Box<str>>) {
        self.meta.insert(key.into(), value.into());
    }

    pub fn list(&self, key: &str) -> &[Box<str>] {
        self.lists.get(key).map_or(&[][..], |v| v.as_slice())
    }

    pub fn push_list(&mut self, key: &str, value: impl Into<Box<str>>) {
        self.lists.entry(key.into()).or_default().push(value.into());
    }

    /// Extend the last entry of a list, starting one if the list is empty.
    pub(crate) fn append_list(&mut self, key: &str, more: &str) {
        let list = self.lists.entry(key.into()).or_default();
        match list.last_mut() {
            Some(last) => *last = format!("{last} {more}").into_boxed_str(),
            None => list.push(more.into()),
        }
    }

    pub fn to_seq_record(&self) -> Option<SeqRecord> {
        let seq = self.seq.clone()?;
        let mut record = SeqRecord::new(self.name.clone(), seq);
        record.desc = self.description.clone();
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_falls_back_to_description() {
        let rec = SeqRecord::new("", Sequence::dna("acgt")).with_desc("plasmid");
        assert_eq!(rec.name(), "plasmid");
        let mut insdc = InsdcRecord::new("");
        insdc.description = Some("pUC19".into());
        assert_eq!(insdc.name(), "pUC19");
    }

    #[test]
    fn feature_key_cache_is_invalidated() {
        let mut rec = InsdcRecord::new("X");
        rec.add_features([Feature::new("gene", "1..9"), Feature::new("CDS", "1..9")]);
        assert_eq!(rec.feature_keys().len(), 2);
        rec.add_features([Feature::new("gene", "20..30"), Feature::new("rep_origin", "40..50")]);
        let keys: Vec<&str> = rec.feature_keys().iter().map(|k| &**k).collect();
        assert_eq!(keys, vec!["gene", "CDS", "rep_origin"]);
    }

    #[test]
    fn clone_is_deep() {
        let mut rec = InsdcRecord::new("X");
        rec.add_features([Feature::new("gene", "1..9")]);
        rec.set_meta(keys::TOPOLOGY, "circular");
        let mut copy = rec.clone();
        copy.add_features([Feature::new("CDS", "1..9")]);
        copy.set_meta(keys::TOPOLOGY, "linear");
        assert_eq!(rec.features().len(), 1);
        assert_eq!(rec.meta(keys::TOPOLOGY), Some("circular"));
        assert_eq!(copy.feature_keys().len(), 2);
    }

    #[test]
    fn meta_and_lists() {
        let mut rec = InsdcRecord::new("X");
        rec.set_meta(keys::DEFINITION, "Cloning");
        rec.set_meta(keys::DEFINITION, "Cloning vector.");
        assert_eq!(rec.meta(keys::DEFINITION), Some("Cloning vector."));
        assert_eq!(rec.meta(keys::COMMENT), None);
        rec.push_list(keys::REFERENCE, "1  (bases 1 to 60)");
        rec.append_list(keys::REFERENCE, "AUTHORS   Norrander,J.");
        assert_eq!(
            &*rec.list(keys::REFERENCE)[0],
            "1  (bases 1 to 60) AUTHORS   Norrander,J."
        );
        rec.push_list(keys::KEYWORDS, "plasmid");
        assert_eq!(rec.list(keys::KEYWORDS).len(), 1);
        assert!(rec.list(keys::ACCESSION).is_empty());
    }
}
