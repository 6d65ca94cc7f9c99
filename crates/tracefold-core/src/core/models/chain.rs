use super::residue::Residue;

/// A chain: identifier plus its residues in N-to-C order. The residue order
/// is never rearranged by any algorithm in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }
}
