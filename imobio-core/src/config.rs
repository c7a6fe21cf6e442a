use crate::error::{BioError, BioResult};
use crate::genetic_code::GeneticCode;
use crate::io::fasta::LINE_WIDTH;
use crate::seq::nucleotide::{DEFAULT_PRIMER_CONC, DEFAULT_SALT};
use crate::seq::NearestNeighborMethod;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the restriction enzyme database.
pub const ENZYME_DB_ENV: &str = "IMOBIO_ENZYME_DB";

/// Settings used to build an [`Engine`](crate::engine::Engine).
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// REBASE `emboss_e` style file; `None` starts with no enzymes.
    pub enzyme_db: Option<PathBuf>,
    /// Monovalent salt concentration in mol/L.
    pub salt: f64,
    /// Primer concentration in mol/L.
    pub primer_conc: f64,
    pub nn_method: NearestNeighborMethod,
    pub genetic_code: GeneticCode,
    pub fasta_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enzyme_db: None,
            salt: DEFAULT_SALT,
            primer_conc: DEFAULT_PRIMER_CONC,
            nn_method: NearestNeighborMethod::default(),
            genetic_code: GeneticCode::default(),
            fasta_width: LINE_WIDTH,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> BioResult<Self> {
        serde_json::from_str(json).map_err(|source| BioError::Config {
            path: "<string>".to_string(),
            source,
        })
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> BioResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BioError::ResourceIo {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| BioError::Config {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`; blank values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENZYME_DB_ENV).and_then(|v| non_empty(&v)) {
            debug!("enzyme database overridden by {ENZYME_DB_ENV}: {path}");
            self.enzyme_db = Some(PathBuf::from(path));
        }
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
