//! Membrane slab placement and per-residue topology.
//!
//! A reduced, fully deterministic take on the ANVIL approach: the membrane
//! normal is the principal axis of the C-alpha cloud of buried residues
//! (burial judged by normalized accessible surface area, which is why this
//! feature requires it), and the slab is centered on their centroid with a
//! fixed thickness. Every residue is then classified by its relative depth
//! in the slab.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

use super::Annotator;
use crate::core::models::{FeatureType, Membrane, MembraneTopology, Protein};
use crate::engine::error::EngineError;

/// Half thickness of the hydrophobic slab, Angstrom.
pub const DEFAULT_HALF_THICKNESS: f64 = 15.0;
/// Residues with a normalized surface area below this count as buried.
const BURIED_FRACTION: f64 = 0.25;
/// Relative depths between 1 and this mark the interface transition band.
const TRANSITION_DEPTH: f64 = 1.2;

pub struct MembraneAnnotator {
    half_thickness: f64,
}

impl Default for MembraneAnnotator {
    fn default() -> Self {
        Self {
            half_thickness: DEFAULT_HALF_THICKNESS,
        }
    }
}

impl MembraneAnnotator {
    pub fn new(half_thickness: f64) -> Self {
        Self { half_thickness }
    }
}

impl Annotator for MembraneAnnotator {
    fn provides(&self) -> FeatureType {
        FeatureType::MembraneTopology
    }

    fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
        let traces = alpha_carbon_trace(protein)?;
        if traces.len() < 3 {
            return Err(EngineError::Precondition(
                "membrane placement needs at least three residues".to_string(),
            ));
        }

        // Anchor the slab on the buried core; fall back to the whole trace
        // for structures with uniformly exposed residues.
        let buried: Vec<Point3<f64>> = protein
            .residues()
            .zip(&traces)
            .filter(|(residue, _)| {
                residue
                    .feature_normalized(FeatureType::AccessibleSurfaceArea)
                    .is_some_and(|v| v < BURIED_FRACTION)
            })
            .map(|(_, position)| *position)
            .collect();
        let anchors = if buried.len() >= 3 { &buried } else { &traces };

        let center = centroid(anchors);
        let normal = principal_axis(anchors, &center);
        let membrane = Membrane {
            normal,
            plane_point_a: center + normal * self.half_thickness,
            plane_point_b: center - normal * self.half_thickness,
        };

        let topologies: Vec<MembraneTopology> = traces
            .iter()
            .map(|ca| classify(membrane.relative_depth(ca)))
            .collect();
        for (residue, topology) in protein.residues_mut().zip(topologies) {
            residue.features.insert(
                FeatureType::MembraneTopology,
                [topology.ordinal() as f64, 0.0],
            );
        }
        protein.membrane = Some(membrane);
        Ok(())
    }
}

fn classify(relative_depth: f64) -> MembraneTopology {
    let depth = relative_depth.abs();
    if depth <= 1.0 {
        MembraneTopology::Transmembrane
    } else if depth <= TRANSITION_DEPTH {
        MembraneTopology::Transition
    } else {
        MembraneTopology::NonTransmembrane
    }
}

fn alpha_carbon_trace(protein: &Protein) -> Result<Vec<Point3<f64>>, EngineError> {
    protein
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
        .collect()
}

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

/// Unit eigenvector of the covariance matrix with the largest eigenvalue,
/// ties broken by the lowest column index, sign fixed so the dominant
/// component is positive.
fn principal_axis(points: &[Point3<f64>], center: &Point3<f64>) -> Vector3<f64> {
    let mut covariance = Matrix3::zeros();
    for point in points {
        let centered = point - center;
        covariance += centered * centered.transpose();
    }
    covariance /= points.len() as f64;

    let SymmetricEigen {
        eigenvalues,
        eigenvectors,
    } = SymmetricEigen::new(covariance);
    let mut best = 0;
    for index in 1..3 {
        if eigenvalues[index] > eigenvalues[best] {
            best = index;
        }
    }
    let mut axis: Vector3<f64> = eigenvectors.column(best).into_owned().normalize();

    let dominant = (0..3).fold(0, |d, i| {
        if axis[i].abs() > axis[d].abs() { i } else { d }
    });
    if axis[dominant] < 0.0 {
        axis = -axis;
    }
    axis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Atom, Protein};

    /// Residues strung along the x axis; the principal axis is unambiguous.
    fn rod_protein(length: usize) -> Protein {
        let sequence = "A".repeat(length);
        let mut protein = Protein::from_sequences(&[("A", sequence.as_str())]);
        for (index, residue) in protein.residues_mut().enumerate() {
            residue.add_atom(Atom::new(
                "CA",
                Point3::new(index as f64 * 3.8, 0.1 * (index % 2) as f64, 0.0),
            ));
        }
        protein
    }

    #[test]
    fn the_slab_is_placed_along_the_principal_axis() {
        let mut protein = rod_protein(12);
        MembraneAnnotator::default().annotate(&mut protein).unwrap();

        let membrane = protein.membrane.as_ref().unwrap();
        assert!(membrane.normal.x.abs() > 0.99);
        let thickness = (membrane.plane_point_a - membrane.plane_point_b).norm();
        assert!((thickness - 2.0 * DEFAULT_HALF_THICKNESS).abs() < 1e-9);
    }

    #[test]
    fn residues_inside_the_slab_are_transmembrane() {
        let mut protein = rod_protein(12);
        MembraneAnnotator::default().annotate(&mut protein).unwrap();

        let membrane = protein.membrane.clone().unwrap();
        for residue in protein.residues() {
            let depth = membrane
                .relative_depth(&residue.alpha_carbon().unwrap().position)
                .abs();
            let topology = residue
                .feature_raw(FeatureType::MembraneTopology)
                .unwrap() as usize;
            if depth <= 1.0 {
                assert_eq!(topology, MembraneTopology::Transmembrane.ordinal());
            } else if depth > TRANSITION_DEPTH {
                assert_eq!(topology, MembraneTopology::NonTransmembrane.ordinal());
            }
        }
    }

    #[test]
    fn placement_is_deterministic() {
        let mut first = rod_protein(12);
        let mut second = rod_protein(12);
        MembraneAnnotator::default().annotate(&mut first).unwrap();
        MembraneAnnotator::default().annotate(&mut second).unwrap();
        assert_eq!(first.membrane, second.membrane);
    }

    #[test]
    fn tiny_structures_are_rejected() {
        let mut protein = rod_protein(2);
        let error = MembraneAnnotator::default()
            .annotate(&mut protein)
            .unwrap_err();
        assert!(matches!(error, EngineError::Precondition(_)));
    }
}
