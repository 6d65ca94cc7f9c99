//! Backbone completion from a C-alpha trace.
//!
//! Every four consecutive alpha carbons form a quadrilateral whose
//! discretized geometry keys the lookup library; the stored local-frame
//! coordinates yield the carbonyl carbon and oxygen of the window's first
//! residue and the amide nitrogen of its second. Virtual anchors extend the
//! trace so terminal residues are covered by full windows too.

use nalgebra::Point3;

use super::extend_trace;
use crate::core::geometry;
use crate::core::libraries::{QuadrilateralLibrary, quadrilateral};
use crate::core::models::{Atom, Protein};
use crate::engine::error::EngineError;

/// A window needs one predecessor and two successors; shorter chains do not
/// produce a single full-rank lookup.
const MIN_CHAIN_LENGTH: usize = 4;

pub fn rebuild(
    protein: &mut Protein,
    library: &QuadrilateralLibrary,
) -> Result<(), EngineError> {
    for chain_index in 0..protein.chains.len() {
        let trace = chain_trace(protein, chain_index)?;
        if trace.len() < MIN_CHAIN_LENGTH {
            return Err(EngineError::Precondition(format!(
                "chain {} has {} residues; backbone reconstruction needs at least {}",
                protein.chains[chain_index].id,
                trace.len(),
                MIN_CHAIN_LENGTH
            )));
        }

        // One anchor in front covers the first residue, three at the back
        // cover the last window positions.
        let extended = extend_trace(&trace, 1, 3);
        for window in 0..=trace.len() {
            let quad = &extended[window..window + 4];
            let entry = library
                .lookup(window_index(quad))
                .ok_or_else(|| {
                    EngineError::Precondition("quadrilateral library is empty".to_string())
                })?
                .clone();

            let rotation = geometry::local_frame(&quad[0], &quad[1], &quad[2]);
            let translation = quad[1].coords;

            let residues = &mut protein.chains[chain_index].residues;
            // The window's first residue gains its carbonyl group, the
            // second its amide nitrogen; anchor positions fall outside the
            // chain and are skipped.
            if window >= 1 {
                let residue = &mut residues[window - 1];
                residue.add_atom(Atom::new(
                    "C",
                    geometry::rototranslate(&entry.carbon, &translation, &rotation),
                ));
                residue.add_atom(Atom::new(
                    "O",
                    geometry::rototranslate(&entry.oxygen, &translation, &rotation),
                ));
            }
            if window < trace.len() {
                residues[window].add_atom(Atom::new(
                    "N",
                    geometry::rototranslate(&entry.nitrogen, &translation, &rotation),
                ));
            }
        }
    }
    Ok(())
}

fn window_index(quad: &[Point3<f64>]) -> i64 {
    quadrilateral::bin_index(
        geometry::distance(&quad[0], &quad[2]),
        geometry::distance(&quad[1], &quad[3]),
        geometry::signed_distance14(&quad[0], &quad[1], &quad[2], &quad[3]),
    )
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
