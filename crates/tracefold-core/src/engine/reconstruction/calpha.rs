use nalgebra::{DMatrix, Point3};

use crate::core::embedding;
use crate::core::models::{Atom, Protein};
use crate::engine::error::EngineError;

/// Builds a C-alpha trace by embedding the distance map into 3D space.
///
/// The map is validated against the protein before anything is mutated;
/// existing atoms are discarded only once the embedding succeeded.
pub fn rebuild(protein: &mut Protein, distances: &DMatrix<f64>) -> Result<(), EngineError> {
    if distances.nrows() != protein.size() {
        return Err(EngineError::Precondition(format!(
            "distance map covers {} residues, protein has {}",
            distances.nrows(),
            protein.size()
        )));
    }
    let coordinates = embedding::embed_default(distances)?;

    for (residue, point) in protein.residues_mut().zip(coordinates) {
        residue.clear_atoms();
        residue.add_atom(Atom::new(
            "CA",
            Point3::new(point[0], point[1], point[2]),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry;

    #[test]
    fn embedded_trace_reproduces_the_distance_map() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.8, 0.0, 0.0),
            Point3::new(5.1, 3.4, 0.2),
            Point3::new(7.7, 4.1, 2.9),
            Point3::new(10.6, 2.8, 1.5),
        ];
        let distances = DMatrix::from_fn(5, 5, |i, j| geometry::distance(&points[i], &points[j]));
        let mut protein = Protein::from_sequences(&[("A", "AGSVL")]);

        rebuild(&mut protein, &distances).unwrap();

        let rebuilt: Vec<Point3<f64>> = protein
            .residues()
            .map(|r| r.alpha_carbon().unwrap().position)
            .collect();
        for i in 0..5 {
            assert_eq!(protein.chains[0].residues[i].atoms().len(), 1);
            for j in 0..5 {
                let d = geometry::distance(&rebuilt[i], &rebuilt[j]);
                assert!((d - distances[(i, j)]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn a_wrongly_sized_map_leaves_the_protein_unchanged() {
        let mut protein = Protein::from_sequences(&[("A", "AGS")]);
        protein
            .residues_mut()
            .next()
            .unwrap()
            .add_atom(Atom::new("CA", Point3::origin()));

        let error = rebuild(&mut protein, &DMatrix::zeros(2, 2)).unwrap_err();

        assert!(matches!(error, EngineError::Precondition(_)));
        assert_eq!(protein.atom_count(), 1);
    }

    #[test]
    fn stale_atoms_are_dropped_during_the_rebuild() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.8, 0.0, 0.0),
            Point3::new(5.1, 3.4, 0.2),
        ];
        let distances = DMatrix::from_fn(3, 3, |i, j| geometry::distance(&points[i], &points[j]));
        let mut protein = Protein::from_sequences(&[("A", "AGS")]);
        for residue in protein.residues_mut() {
            residue.add_atom(Atom::new("N", Point3::new(9.0, 9.0, 9.0)));
            residue.add_atom(Atom::new("CA", Point3::new(9.5, 9.0, 9.0)));
        }

        rebuild(&mut protein, &distances).unwrap();

        for residue in protein.residues() {
            assert_eq!(residue.atoms().len(), 1);
            assert_eq!(residue.atoms()[0].name, "CA");
        }
    }
}
