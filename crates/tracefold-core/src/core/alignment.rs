use crate::core::models::{Protein, Residue};
use nalgebra::{DMatrix, Matrix3, Point3, Vector3};
use thiserror::Error;

/// The atom names used to represent residues when none are given explicitly.
pub const DEFAULT_ALIGNMENT_ATOM_NAMES: &[&str] = &["CA"];

#[derive(Debug, Error, PartialEq)]
pub enum AlignmentError {
    #[error("Fragment sizes do not match: reference has {reference} atoms, fragment has {fragment}")]
    SizeMismatch { reference: usize, fragment: usize },

    #[error("Cannot align empty atom sets")]
    EmptyInput,

    #[error("Degenerate atom configuration: {0}")]
    Degenerate(String),
}

/// Result of a rigid-body superposition: the untransformed input coordinates,
/// the optimal rototranslation and the RMSD it achieves. Immutable; the
/// inputs are never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub reference_atoms: Vec<Point3<f64>>,
    pub fragment_atoms: Vec<Point3<f64>>,
    pub rmsd: f64,
    pub translation: Vector3<f64>,
    pub rotation: Matrix3<f64>,
}

impl Alignment {
    /// Applies the alignment's rototranslation to a point, row-vector
    /// convention: `p' = p * R + t`.
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        transform(point, &self.translation, &self.rotation)
    }
}

/// Superimposes `fragment` onto `reference` (Kabsch), matching atoms by the
/// given name subset in residue order.
pub fn align_fragments(
    reference: &[Residue],
    fragment: &[Residue],
    atom_names: &[&str],
) -> Result<Alignment, AlignmentError> {
    let reference_atoms = extract_atoms(reference, atom_names);
    let fragment_atoms = extract_atoms(fragment, atom_names);
    align_atom_sets(reference_atoms, fragment_atoms)
}

/// Superimposes two equal-length ordered coordinate sets (Kabsch).
pub fn align_atom_sets(
    reference_atoms: Vec<Point3<f64>>,
    fragment_atoms: Vec<Point3<f64>>,
) -> Result<Alignment, AlignmentError> {
    if reference_atoms.len() != fragment_atoms.len() {
        return Err(AlignmentError::SizeMismatch {
            reference: reference_atoms.len(),
            fragment: fragment_atoms.len(),
        });
    }
    if reference_atoms.is_empty() {
        return Err(AlignmentError::EmptyInput);
    }

    let reference_centroid = centroid(&reference_atoms);
    let fragment_centroid = centroid(&fragment_atoms);

    // Cross-covariance of the centered sets, fragment rows times reference rows.
    let reference_matrix = wrap_centered(&reference_atoms, &reference_centroid);
    let fragment_matrix = wrap_centered(&fragment_atoms, &fragment_centroid);
    let covariance3 = fragment_matrix.transpose() * reference_matrix;
    let covariance = Matrix3::from_iterator(covariance3.iter().copied());

    let svd = covariance.svd(true, true);
    let u_t = svd
        .u
        .ok_or_else(|| AlignmentError::Degenerate("SVD produced no U factor".to_string()))?
        .transpose();
    let mut v_t = svd
        .v_t
        .ok_or_else(|| AlignmentError::Degenerate("SVD produced no V factor".to_string()))?;

    // R = (V * U^T)^T; an improper (mirrored) rotation is corrected by
    // negating the third row of V^T and recomputing.
    let mut rotation = (v_t.transpose() * u_t).transpose();
    if rotation.determinant() < 0.0 {
        for column in 0..3 {
            v_t[(2, column)] = -v_t[(2, column)];
        }
        rotation = (v_t.transpose() * u_t).transpose();
    }

    let translation =
        reference_centroid.coords - rotation.transpose() * fragment_centroid.coords;

    let rmsd = calculate_rmsd(&reference_atoms, &fragment_atoms, &translation, &rotation);
    if rmsd.is_nan() {
        return Err(AlignmentError::Degenerate(
            "RMSD evaluated to NaN".to_string(),
        ));
    }

    Ok(Alignment {
        reference_atoms,
        fragment_atoms,
        rmsd,
        translation,
        rotation,
    })
}

/// Applies a rototranslation to a point in the row-vector convention shared
/// with the lookup libraries.
pub fn transform(
    point: &Point3<f64>,
    translation: &Vector3<f64>,
    rotation: &Matrix3<f64>,
) -> Point3<f64> {
    Point3::from(rotation.transpose() * point.coords + translation)
}

/// Moves every atom of the protein by the given rototranslation.
pub fn transform_protein(
    protein: &mut Protein,
    translation: &Vector3<f64>,
    rotation: &Matrix3<f64>,
) {
    for residue in protein.residues_mut() {
        for atom in residue.atoms_mut() {
            atom.position = transform(&atom.position, translation, rotation);
        }
    }
}

/// RMSD of the original (untransformed) fragment against the reference after
/// applying the rototranslation. Using already-aligned atoms here would
/// silently report zero; callers must pass the initial coordinates.
fn calculate_rmsd(
    reference: &[Point3<f64>],
    fragment: &[Point3<f64>],
    translation: &Vector3<f64>,
    rotation: &Matrix3<f64>,
) -> f64 {
    let sum: f64 = reference
        .iter()
        .zip(fragment)
        .map(|(a, b)| (a - transform(b, translation, rotation)).norm_squared())
        .sum();
    (sum / reference.len() as f64).sqrt()
}

fn extract_atoms(residues: &[Residue], atom_names: &[&str]) -> Vec<Point3<f64>> {
    residues
        .iter()
        .flat_map(|r| r.atoms())
        .filter(|a| atom_names.contains(&a.name.as_str()))
        .map(|a| a.position)
        .collect()
}

fn centroid(atoms: &[Point3<f64>]) -> Point3<f64> {
    let sum = atoms
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / atoms.len() as f64)
}

fn wrap_centered(atoms: &[Point3<f64>], centroid: &Point3<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(atoms.len(), 3, |row, column| {
        atoms[row][column] - centroid[column]
    })
}
