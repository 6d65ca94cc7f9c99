use nalgebra::{DMatrix, Point3};

use crate::core::geometry;
use crate::core::models::Protein;
use crate::engine::error::EngineError;

/// Symmetric matrix of C-alpha distances over all residues in document
/// order. Every residue must carry an alpha carbon.
pub fn calpha_distance_map(protein: &Protein) -> Result<DMatrix<f64>, EngineError> {
    let positions: Vec<Point3<f64>> = protein
        .residues()
        .map(|residue| {
            residue
                .alpha_carbon()
                .map(|a| a.position)
                .ok_or(EngineError::MissingAtom {
                    residue_id: residue.residue_id,
                    atom: "CA",
                })
        })
        .collect::<Result<_, _>>()?;
    Ok(DMatrix::from_fn(positions.len(), positions.len(), |i, j| {
        geometry::distance(&positions[i], &positions[j])
    }))
}
