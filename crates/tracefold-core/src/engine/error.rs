use thiserror::Error;

use super::config::ConfigError;
use crate::core::alignment::AlignmentError;
use crate::core::embedding::EmbeddingError;
use crate::core::io::traits::SerializeError;
use crate::core::libraries::LibraryError;
use crate::core::models::{AminoAcid, FeatureType, ReconstructionLevel};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Library error: {source}")]
    Library {
        #[from]
        source: LibraryError,
    },

    #[error("Alignment failed: {source}")]
    Alignment {
        #[from]
        source: AlignmentError,
    },

    #[error("Embedding failed: {source}")]
    Embedding {
        #[from]
        source: EmbeddingError,
    },

    #[error("Serializer refresh failed: {source}")]
    Serialize {
        #[from]
        source: SerializeError,
    },

    #[error(
        "Requested level {requested} does not lie above the current level {current}; \
         re-running or downgrading a reconstruction is not supported"
    )]
    LevelNotAboveCurrent {
        current: ReconstructionLevel,
        requested: ReconstructionLevel,
    },

    #[error("Level {0} cannot be reached by reconstruction; it is assigned on import only")]
    UnreachableLevel(ReconstructionLevel),

    #[error("No annotator registered for feature {}", .0.name())]
    UnknownFeature(FeatureType),

    #[error("Requirements of feature {} form a cycle", .0.name())]
    CyclicRequirements(FeatureType),

    #[error("Residue {residue_id} is missing atom {atom}")]
    MissingAtom { residue_id: usize, atom: &'static str },

    #[error("No rotamer available for amino acid {}", .0.three_letter())]
    MissingRotamer(AminoAcid),

    #[error("Precondition not met: {0}")]
    Precondition(String),
}
