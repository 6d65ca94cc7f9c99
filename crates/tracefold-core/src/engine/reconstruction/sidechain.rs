//! Side-chain placement from the rotamer library.
//!
//! Each residue is described by the geometry of its surrounding C-alpha
//! window (two predecessors, itself, one successor); the best-matching
//! rotamer of the same amino acid supplies all side-chain heavy atoms in
//! the window's local frame. Glycine has no side chain and unknown residues
//! have no rotamers; both are skipped.

use nalgebra::Point3;
use tracing::debug;

use super::extend_trace;
use crate::core::geometry;
use crate::core::libraries::{RotamerLibrary, rotamer};
use crate::core::models::{AminoAcid, Atom, Protein};
use crate::engine::error::EngineError;

const MIN_CHAIN_LENGTH: usize = 3;

pub fn rebuild(protein: &mut Protein, library: &RotamerLibrary) -> Result<(), EngineError> {
    for chain_index in 0..protein.chains.len() {
        let trace = chain_trace(protein, chain_index)?;
        if trace.len() < MIN_CHAIN_LENGTH {
            debug!(
                chain = %protein.chains[chain_index].id,
                residues = trace.len(),
                "chain too short for a side-chain window, left untouched"
            );
            continue;
        }
        let extended = extend_trace(&trace, 2, 1);

        for index in 0..trace.len() {
            let amino_acid = protein.chains[chain_index].residues[index].amino_acid;
            if matches!(amino_acid, AminoAcid::Glycine | AminoAcid::Unknown) {
                continue;
            }

            // extended[index + 2] is the residue itself.
            let window = &extended[index..index + 4];
            let bins = rotamer::bin_descriptors(
                geometry::distance(&window[0], &window[2]),
                geometry::distance(&window[1], &window[3]),
                geometry::signed_distance14(&window[0], &window[1], &window[2], &window[3]),
            );
            let entry = library
                .lookup(amino_acid, bins)
                .ok_or(EngineError::MissingRotamer(amino_acid))?
                .clone();

            let rotation = geometry::local_frame(&window[1], &window[2], &window[3]);
            let translation = window[2].coords;
            let residue = &mut protein.chains[chain_index].residues[index];
            for (name, local) in &entry.atoms {
                residue.add_atom(Atom::new(
                    name,
                    geometry::rototranslate(local, &translation, &rotation),
                ));
            }
        }
    }
    Ok(())
}

fn chain_trace(protein: &Protein, chain_index: usize) -> Result<Vec<Point3<f64>>, EngineError> {
    protein.chains[chain_index]
        .residues
        .iter()
        .map(|residue| {
            residue
                .alpha_carbon()
                .map(|a| a.position)
                .ok_or(EngineError::MissingAtom {
                    residue_id: residue.residue_id,
                    atom: "CA",
                })
        })
        .collect()
}
