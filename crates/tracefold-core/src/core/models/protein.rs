use super::chain::Chain;
use super::feature::FeatureType;
use super::motif::Motif;
use super::residue::{AminoAcid, Residue};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use std::fmt;

/// Stage of structural completeness. The declaration order is the dependency
/// order: reaching level L requires every level below it, and the
/// reconstruction pipeline walks the levels one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ReconstructionLevel {
    /// Raw sequence, possibly with predicted features but no coordinates.
    #[default]
    None,
    /// C-alpha trace placed from a distance map.
    CAlpha,
    /// Backbone atoms placed.
    Backbone,
    /// Side-chain atoms placed.
    Sidechain,
    /// Coarse model refined by the annealing stage.
    Refined,
    /// Experimentally determined or externally validated coordinates. Only
    /// reachable by importing real coordinates, never by reconstruction.
    Validated,
}

impl ReconstructionLevel {
    pub const ALL: [ReconstructionLevel; 6] = [
        ReconstructionLevel::None,
        ReconstructionLevel::CAlpha,
        ReconstructionLevel::Backbone,
        ReconstructionLevel::Sidechain,
        ReconstructionLevel::Refined,
        ReconstructionLevel::Validated,
    ];

    /// The level directly below this one, if any.
    pub fn predecessor(&self) -> Option<ReconstructionLevel> {
        let ordinal = *self as usize;
        ordinal.checked_sub(1).map(|o| Self::ALL[o])
    }
}

impl fmt::Display for ReconstructionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconstructionLevel::None => "NONE",
            ReconstructionLevel::CAlpha => "CALPHA",
            ReconstructionLevel::Backbone => "BACKBONE",
            ReconstructionLevel::Sidechain => "SIDECHAIN",
            ReconstructionLevel::Refined => "REFINED",
            ReconstructionLevel::Validated => "VALIDATED",
        };
        f.write_str(name)
    }
}

/// Membrane placement: a slab defined by two plane anchor points spread along
/// a shared normal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Membrane {
    pub normal: Vector3<f64>,
    pub plane_point_a: Point3<f64>,
    pub plane_point_b: Point3<f64>,
}

impl Membrane {
    /// Signed distance of a point from the slab midplane, in units of the
    /// half-thickness along the normal; |value| <= 1 means inside the slab.
    pub fn relative_depth(&self, point: &Point3<f64>) -> f64 {
        let unit = self.normal.normalize();
        let mid = nalgebra::center(&self.plane_point_a, &self.plane_point_b);
        let half_thickness = (self.plane_point_a - self.plane_point_b).dot(&unit).abs() / 2.0;
        (point - mid).dot(&unit) / half_thickness
    }
}

/// The root of the ownership tree, owned exclusively by the pipeline invoking
/// it for the duration of a run.
///
/// Invariants: the reconstruction level only ever increases over the
/// protein's lifetime, and available features are added, never downgraded.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    pub chains: Vec<Chain>,
    pub available_features: HashSet<FeatureType>,
    reconstruction_level: ReconstructionLevel,
    pub membrane: Option<Membrane>,
    pub motifs: Vec<Motif>,
}

impl Protein {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a coordinate-free protein from one-letter sequences, one per
    /// chain. Residue ids run over the whole protein, residue numbers start
    /// at 1 per chain.
    pub fn from_sequences(sequences: &[(&str, &str)]) -> Self {
        let mut protein = Self::new();
        let mut residue_id = 0;
        for (chain_id, sequence) in sequences {
            let mut chain = Chain::new(chain_id);
            for (index, code) in sequence.chars().enumerate() {
                chain.residues.push(Residue::new(
                    AminoAcid::from_one_letter(code),
                    residue_id,
                    (index + 1) as isize,
                ));
                residue_id += 1;
            }
            protein.chains.push(chain);
        }
        protein
    }

    pub fn reconstruction_level(&self) -> ReconstructionLevel {
        self.reconstruction_level
    }

    /// Raises the reconstruction level. Lower or equal targets are ignored so
    /// the monotonicity invariant can never be violated through this path.
    pub fn promote_level(&mut self, level: ReconstructionLevel) {
        if level > self.reconstruction_level {
            self.reconstruction_level = level;
        }
    }

    /// Marks the structure as carrying imported, validated coordinates.
    pub fn mark_validated(&mut self) {
        self.reconstruction_level = ReconstructionLevel::Validated;
    }

    /// Number of residues over all chains.
    pub fn size(&self) -> usize {
        self.chains.iter().map(|c| c.residues.len()).sum()
    }

    /// All residues in document order (chain order, then N-to-C).
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.chains.iter().flat_map(|c| c.residues.iter())
    }

    pub fn residues_mut(&mut self) -> impl Iterator<Item = &mut Residue> {
        self.chains.iter_mut().flat_map(|c| c.residues.iter_mut())
    }

    pub fn atom_count(&self) -> usize {
        self.residues().map(|r| r.atoms().len()).sum()
    }

    /// Rewrites residue ids to the current document order. Called after chain
    /// layout changes; feature maps are untouched.
    pub fn reindex_residues(&mut self) {
        for (index, residue) in self.residues_mut().enumerate() {
            residue.residue_id = index;
        }
    }
}
