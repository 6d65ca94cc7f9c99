use crate::core::models::Protein;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("Failed to refresh textual records: {0}")]
    Refresh(String),
}

/// Collaborator seam for the PDB text serializer.
///
/// The reconstruction pipeline calls `refresh` after a re-layout so each
/// atom's textual representation stays in sync with its coordinates and
/// serial. Text parsing/formatting itself is a collaborator concern and is
/// not implemented in this crate.
pub trait RecordSerializer {
    fn refresh(&self, protein: &mut Protein) -> Result<(), SerializeError>;
}
