//! Accessible surface area by the Shrake-Rupley rolling-probe method, with
//! the Chothia van der Waals radii. Hydrogens and synthetic atoms carry no
//! surface and are skipped.

use nalgebra::{Point3, Vector3};

use super::Annotator;
use crate::core::models::{AminoAcid, FeatureType, Protein};
use crate::engine::error::EngineError;

/// Water probe radius in Angstrom.
pub const DEFAULT_PROBE_RADIUS: f64 = 1.4;
/// Test points per atom sphere.
pub const DEFAULT_SPHERE_POINTS: usize = 960;

pub struct AccessibleSurfaceAreaAnnotator {
    probe_radius: f64,
    sphere_points: usize,
}

impl Default for AccessibleSurfaceAreaAnnotator {
    fn default() -> Self {
        Self {
            probe_radius: DEFAULT_PROBE_RADIUS,
            sphere_points: DEFAULT_SPHERE_POINTS,
        }
    }
}

impl AccessibleSurfaceAreaAnnotator {
    pub fn new(probe_radius: f64, sphere_points: usize) -> Self {
        Self {
            probe_radius,
            sphere_points,
        }
    }
}

const TRIGONAL_CARBON_VDW: f64 = 1.76;
const TETRAHEDRAL_CARBON_VDW: f64 = 1.87;
const TRIGONAL_NITROGEN_VDW: f64 = 1.65;
const TETRAHEDRAL_NITROGEN_VDW: f64 = 1.50;
const SULFUR_VDW: f64 = 1.85;
const OXYGEN_VDW: f64 = 1.40;
/// Fallback for elements outside the Chothia tables.
const DEFAULT_VDW: f64 = 1.80;

/// Chothia (1976) van der Waals radii, Angstrom. Carbon and nitrogen radii
/// depend on hybridization, so the atom name and residue type pick the
/// trigonal or tetrahedral value.
fn van_der_waals_radius(amino_acid: AminoAcid, atom_name: &str, element: &str) -> f64 {
    match element {
        "O" => OXYGEN_VDW,
        "S" => SULFUR_VDW,
        "N" => {
            if atom_name == "NZ" {
                TETRAHEDRAL_NITROGEN_VDW
            } else {
                TRIGONAL_NITROGEN_VDW
            }
        }
        "C" => carbon_radius(amino_acid, atom_name),
        _ => DEFAULT_VDW,
    }
}

fn carbon_radius(amino_acid: AminoAcid, atom_name: &str) -> f64 {
    match atom_name {
        "C" | "CE1" | "CE2" | "CE3" | "CH2" | "CZ" | "CZ2" | "CZ3" => TRIGONAL_CARBON_VDW,
        "CA" | "CB" | "CE" | "CG1" | "CG2" => TETRAHEDRAL_CARBON_VDW,
        _ => match amino_acid {
            AminoAcid::Phenylalanine
            | AminoAcid::Tryptophan
            | AminoAcid::Tyrosine
            | AminoAcid::Histidine
            | AminoAcid::AsparticAcid
            | AminoAcid::Asparagine => TRIGONAL_CARBON_VDW,
            AminoAcid::Glutamine | AminoAcid::GlutamicAcid => {
                if atom_name == "CD" {
                    TRIGONAL_CARBON_VDW
                } else {
                    TETRAHEDRAL_CARBON_VDW
                }
            }
            _ => TETRAHEDRAL_CARBON_VDW,
        },
    }
}

struct SurfaceAtom {
    residue_index: usize,
    position: Point3<f64>,
    /// Van der Waals radius extended by the probe.
    radius: f64,
}

impl Annotator for AccessibleSurfaceAreaAnnotator {
    fn provides(&self) -> FeatureType {
        FeatureType::AccessibleSurfaceArea
    }

    fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
        let atoms = self.collect_atoms(protein);
        let sphere = unit_sphere(self.sphere_points);

        let mut areas = vec![0.0; protein.size()];
        for (index, atom) in atoms.iter().enumerate() {
            let neighbors: Vec<&SurfaceAtom> = atoms
                .iter()
                .enumerate()
                .filter(|(other, candidate)| {
                    *other != index
                        && (candidate.position - atom.position).norm()
                            < candidate.radius + atom.radius
                })
                .map(|(_, candidate)| candidate)
                .collect();

            let accessible = sphere
                .iter()
                .filter(|direction| {
                    let test = atom.position + **direction * atom.radius;
                    neighbors
                        .iter()
                        .all(|n| (test - n.position).norm() >= n.radius)
                })
                .count();

            let fraction = accessible as f64 / sphere.len() as f64;
            areas[atom.residue_index] +=
                fraction * 4.0 * std::f64::consts::PI * atom.radius * atom.radius;
        }

        for (residue, area) in protein.residues_mut().zip(areas) {
            residue
                .features
                .insert(FeatureType::AccessibleSurfaceArea, [area, 0.0]);
        }
        Ok(())
    }
}

impl AccessibleSurfaceAreaAnnotator {
    fn collect_atoms(&self, protein: &Protein) -> Vec<SurfaceAtom> {
        protein
            .residues()
            .enumerate()
            .flat_map(|(residue_index, residue)| {
                residue
                    .atoms()
                    .iter()
                    .filter(|a| !a.is_hydrogen() && !a.is_synthetic())
                    .map(move |a| SurfaceAtom {
                        residue_index,
                        position: a.position,
                        radius: van_der_waals_radius(residue.amino_acid, &a.name, &a.element)
                            + self.probe_radius,
                    })
            })
            .collect()
    }
}

/// Evenly distributed directions on the unit sphere (golden-section spiral).
fn unit_sphere(count: usize) -> Vec<Vector3<f64>> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..count)
        .map(|index| {
            let y = 1.0 - 2.0 * (index as f64 + 0.5) / count as f64;
            let radius = (1.0 - y * y).sqrt();
            let angle = golden_angle * index as f64;
            Vector3::new(radius * angle.cos(), y, radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Atom, Protein};

    #[test]
    fn sphere_points_lie_on_the_unit_sphere() {
        for direction in unit_sphere(DEFAULT_SPHERE_POINTS) {
            assert!((direction.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn radii_follow_the_hybridization_of_the_atom() {
        // Backbone carbonyl carbon is trigonal, the alpha carbon tetrahedral.
        assert_eq!(van_der_waals_radius(AminoAcid::Alanine, "C", "C"), 1.76);
        assert_eq!(van_der_waals_radius(AminoAcid::Alanine, "CA", "C"), 1.87);
        // Ring carbons are trigonal, aliphatic side chains tetrahedral.
        assert_eq!(van_der_waals_radius(AminoAcid::Phenylalanine, "CD1", "C"), 1.76);
        assert_eq!(van_der_waals_radius(AminoAcid::Leucine, "CD1", "C"), 1.87);
        // Glutamate's carboxyl carbon is trigonal, its CG tetrahedral.
        assert_eq!(van_der_waals_radius(AminoAcid::GlutamicAcid, "CD", "C"), 1.76);
        assert_eq!(van_der_waals_radius(AminoAcid::GlutamicAcid, "CG", "C"), 1.87);
        // Lysine's terminal amine is the one tetrahedral nitrogen.
        assert_eq!(van_der_waals_radius(AminoAcid::Lysine, "NZ", "N"), 1.50);
        assert_eq!(van_der_waals_radius(AminoAcid::Lysine, "N", "N"), 1.65);
        assert_eq!(van_der_waals_radius(AminoAcid::Methionine, "SD", "S"), 1.85);
        assert_eq!(van_der_waals_radius(AminoAcid::Serine, "OG", "O"), 1.40);
    }

    #[test]
    fn an_isolated_atom_is_fully_exposed() {
        let mut protein = Protein::from_sequences(&[("A", "G")]);
        protein
            .residues_mut()
            .next()
            .unwrap()
            .add_atom(Atom::new("CA", Point3::origin()));

        AccessibleSurfaceAreaAnnotator::default()
            .annotate(&mut protein)
            .unwrap();

        let radius =
            van_der_waals_radius(AminoAcid::Glycine, "CA", "C") + DEFAULT_PROBE_RADIUS;
        let expected = 4.0 * std::f64::consts::PI * radius * radius;
        let area = protein
            .residues()
            .next()
            .unwrap()
            .feature_raw(FeatureType::AccessibleSurfaceArea)
            .unwrap();
        assert!((area - expected).abs() < 1e-9);
    }

    #[test]
    fn a_buried_atom_has_no_accessible_surface() {
        // Central atom caged by six close neighbors on the axes.
        let mut protein = Protein::from_sequences(&[("A", "GG")]);
        protein.chains[0].residues[0].add_atom(Atom::new("CA", Point3::origin()));
        let cage = &mut protein.chains[0].residues[1];
        for (index, offset) in [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, -1.0),
        ]
        .into_iter()
        .enumerate()
        {
            let mut atom = Atom::new("C", Point3::origin() + offset * 1.2);
            atom.name = format!("C{index}");
            cage.add_atom(atom);
        }

        AccessibleSurfaceAreaAnnotator::default()
            .annotate(&mut protein)
            .unwrap();

        let center_area = protein
            .residues()
            .next()
            .unwrap()
            .feature_raw(FeatureType::AccessibleSurfaceArea)
            .unwrap();
        assert!(center_area < 1.0);
    }

    #[test]
    fn hydrogens_are_excluded_from_the_surface() {
        let mut protein = Protein::from_sequences(&[("A", "G")]);
        let residue = protein.residues_mut().next().unwrap();
        residue.add_atom(Atom::new("CA", Point3::origin()));
        let bare = {
            let mut bare = protein.clone();
            AccessibleSurfaceAreaAnnotator::default()
                .annotate(&mut bare)
                .unwrap();
            bare.residues()
                .next()
                .unwrap()
                .feature_raw(FeatureType::AccessibleSurfaceArea)
                .unwrap()
        };

        protein
            .residues_mut()
            .next()
            .unwrap()
            .add_atom(Atom::new("HA", Point3::new(1.1, 0.0, 0.0)));
        AccessibleSurfaceAreaAnnotator::default()
            .annotate(&mut protein)
            .unwrap();
        let with_hydrogen = protein
            .residues()
            .next()
            .unwrap()
            .feature_raw(FeatureType::AccessibleSurfaceArea)
            .unwrap();

        assert!((bare - with_hydrogen).abs() < 1e-12);
    }
}
