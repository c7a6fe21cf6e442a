pub mod feature;
pub mod nucleotide;
pub mod primer;
pub mod protein;
pub mod record;
pub mod sequence;
pub mod thermo;

pub use feature::{Feature, Qualifiers};
pub use nucleotide::CodonCounts;
pub use primer::{Hairpin, Primer, PrimerRegion};
pub use protein::{amino_acid, AminoAcidInfo};
pub use record::{InsdcRecord, SeqRecord};
pub use sequence::Sequence;
pub use thermo::{NearestNeighborMethod, Thermo};
