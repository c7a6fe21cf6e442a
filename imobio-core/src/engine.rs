//! Process-wide analysis context.
//!
//! An [`Engine`] owns the reference data that has to be loaded from disk
//! (the restriction enzyme database) together with the default reaction
//! conditions. Compiled-in tables such as genetic codes and substitution
//! matrices are reached directly through their modules.

use crate::config::EngineConfig;
use crate::error::{BioError, BioResult};
use crate::io::fasta;
use crate::restriction::{sites_to_features, CuttingSite, EnzymeDb};
use crate::seq::{InsdcRecord, SeqRecord, Sequence, Thermo};
use std::io::Write;
use tracing::info;

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    enzymes: Option<EnzymeDb>,
}

impl Engine {
    /// Load every reference resource named by `config`.
    ///
    /// Without an enzyme database the engine still starts, but the
    /// restriction operations fail with a resource error.
    pub fn new(config: EngineConfig) -> BioResult<Self> {
        let enzymes = config.enzyme_db.as_ref().map(EnzymeDb::load).transpose()?;
        info!(
            "engine ready: {} enzymes, {} code, {:?} thermodynamics",
            enzymes.as_ref().map_or(0, EnzymeDb::len),
            config.genetic_code,
            config.nn_method
        );
        Ok(Self { config, enzymes })
    }

    /// Build an engine around an already loaded enzyme database.
    pub fn with_enzymes(config: EngineConfig, enzymes: EnzymeDb) -> Self {
        Self {
            config,
            enzymes: Some(enzymes),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn enzymes(&self) -> BioResult<&EnzymeDb> {
        self.enzymes.as_ref().ok_or(BioError::NotConfigured {
            resource: "restriction enzyme database",
        })
    }

    /// Nearest-neighbour parameters for the configured method.
    pub fn thermo(&self, seq: &Sequence) -> BioResult<Thermo> {
        seq.thermo_prop(self.config.nn_method)
    }

    /// Melting temperature under the configured salt, primer concentration
    /// and nearest-neighbour method.
    pub fn melting_temp(&self, seq: &Sequence) -> BioResult<f64> {
        let nn = self.thermo(seq)?;
        seq.melting_temp(self.config.salt, self.config.primer_conc, Some(nn))
    }

    pub fn salt_adjust_tm(&self, seq: &Sequence) -> BioResult<f64> {
        seq.salt_adjust_tm(self.config.salt)
    }

    /// Translate with the configured genetic code.
    pub fn translate(&self, seq: &Sequence, frame: u8, alt_starts: bool) -> BioResult<Sequence> {
        seq.translate(frame, self.config.genetic_code, alt_starts)
    }

    pub fn restrict(&self, seq: &Sequence, enzyme: &str) -> BioResult<Vec<CuttingSite>> {
        self.enzymes()?.restrict(seq, enzyme)
    }

    pub fn digest<S: AsRef<str> + Sync>(
        &self,
        seq: &Sequence,
        enzymes: &[S],
    ) -> BioResult<Vec<CuttingSite>> {
        self.enzymes()?.digest(seq, enzymes)
    }

    /// Cuts made by every enzyme in the loaded database.
    pub fn digest_all(&self, seq: &Sequence) -> BioResult<Vec<CuttingSite>> {
        Ok(self.enzymes()?.digest_all(seq))
    }

    /// Add a `restric_site` feature to `record` for every cut made by
    /// `enzymes`. Returns the number of features added.
    pub fn annotate_sites<S: AsRef<str> + Sync>(
        &self,
        record: &mut InsdcRecord,
        enzymes: &[S],
    ) -> BioResult<usize> {
        self.enzymes()?;
        let Some(seq) = record.seq() else {
            return Ok(0);
        };
        let sites = self.digest(seq, enzymes)?;
        record.add_features(sites_to_features(&sites));
        Ok(sites.len())
    }

    /// Write FASTA wrapped at the configured width.
    pub fn write_fasta<'a, W, I>(&self, writer: &mut W, records: I) -> BioResult<()>
    where
        W: Write,
        I: IntoIterator<Item = &'a SeqRecord>,
    {
        fasta::write_fasta(writer, records, self.config.fasta_width)
    }
}
