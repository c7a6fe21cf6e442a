use std::io;
use thiserror::Error;

/// Coarse classification of a [`BioError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Resource,
    Parse,
    Lookup,
    InvalidCodon,
    NumericDomain,
    InvalidInput,
    Io,
}

#[derive(Debug, Error)]
pub enum BioError {
    #[error("reference resource {path}: {msg}")]
    Resource { path: String, msg: String },

    #[error("no {resource} configured")]
    NotConfigured { resource: &'static str },

    #[error("cannot read reference resource {path}: {source}")]
    ResourceIo {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error in {file} at line {line}: {msg}")]
    Parse {
        file: String,
        line: usize,
        msg: String,
    },

    #[error("unknown enzyme '{name}'")]
    UnknownEnzyme { name: String },

    #[error("unknown feature key '{key}'")]
    UnknownFeatureKey { key: String },

    #[error("unknown genetic code id {id}")]
    UnknownGeneticCode { id: u8 },

    #[error("invalid codon '{codon}' at position {pos}")]
    InvalidCodon { codon: String, pos: usize },

    #[error("{op} is undefined for {msg}")]
    NumericDomain { op: &'static str, msg: &'static str },

    #[error("invalid frame: {frame}")]
    InvalidFrame { frame: i16 },

    #[error("primer length {length} outside {min}..={max}")]
    InvalidPrimerLength { length: usize, min: usize, max: usize },

    #[error("sub-sequence out of range (start={start}, length={length}, seq_len={seq_len})")]
    InvalidRange {
        start: usize,
        length: isize,
        seq_len: usize,
    },

    #[error("invalid recognition pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("{path}: no reader for {format} files")]
    UnsupportedFormat { path: String, format: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl BioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BioError::Resource { .. }
            | BioError::NotConfigured { .. }
            | BioError::ResourceIo { .. }
            | BioError::Config { .. } => ErrorKind::Resource,
            BioError::Parse { .. } => ErrorKind::Parse,
            BioError::UnknownEnzyme { .. }
            | BioError::UnknownFeatureKey { .. }
            | BioError::UnknownGeneticCode { .. } => ErrorKind::Lookup,
            BioError::InvalidCodon { .. } => ErrorKind::InvalidCodon,
            BioError::NumericDomain { .. } => ErrorKind::NumericDomain,
            BioError::InvalidFrame { .. }
            | BioError::InvalidPrimerLength { .. }
            | BioError::InvalidRange { .. }
            | BioError::InvalidPattern { .. }
            | BioError::UnsupportedFormat { .. } => ErrorKind::InvalidInput,
            BioError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn parse(file: &str, line: usize, msg: impl Into<String>) -> Self {
        BioError::Parse {
            file: file.to_string(),
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn empty_sequence(op: &'static str) -> Self {
        BioError::NumericDomain {
            op,
            msg: "an empty sequence",
        }
    }
}

pub type BioResult<T> = Result<T, BioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let err = BioError::UnknownEnzyme {
            name: "Foo".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(BioError::empty_sequence("gc").kind(), ErrorKind::NumericDomain);
        assert_eq!(BioError::parse("x.gb", 3, "short").kind(), ErrorKind::Parse);
    }

    #[test]
    fn parse_error_message_has_context() {
        let err = BioError::parse("x.gb", 12, "LOCUS line too short");
        assert_eq!(
            err.to_string(),
            "parse error in x.gb at line 12: LOCUS line too short"
        );
    }
}
