//! # Models Module
//!
//! The molecular data model: a strict ownership tree
//! `Protein -> Chain -> Residue -> Atom`, plus the closed enumerations that
//! drive both pipelines (reconstruction levels, feature types, secondary
//! structure classes, membrane topology, sequence motifs).
//!
//! Residue order within a chain is N-to-C and is never reordered; atom order
//! within a residue is the serialization order and is rewritten only by the
//! canonical sorter in [`crate::core::io`].

pub mod atom;
pub mod chain;
pub mod feature;
pub mod motif;
pub mod protein;
pub mod residue;

pub use atom::Atom;
pub use chain::Chain;
pub use feature::{FeatureType, MembraneTopology, SecondaryStructure, ValueKind};
pub use motif::{Motif, MotifDefinition};
pub use protein::{Membrane, Protein, ReconstructionLevel};
pub use residue::{AminoAcid, Residue};
