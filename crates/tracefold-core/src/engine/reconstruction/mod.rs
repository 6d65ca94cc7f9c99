//! Level-driven structure reconstruction.
//!
//! A protein sits at a [`ReconstructionLevel`]; the pipeline raises it one
//! step at a time, recursively building every level below the requested one
//! first. Each step either completes, or the protein is restored to its
//! state before the call. After a successful run the atom layout is
//! renumbered and an attached serializer, if any, is refreshed.

pub mod backbone;
pub mod calpha;
pub mod distance_map;
pub mod refine;
pub mod sidechain;

use nalgebra::{DMatrix, Point3};
use tracing::{debug, info};

use super::config::{PipelineConfig, RefinementConfig};
use super::error::EngineError;
use crate::core::io::sorter::renumber_atoms;
use crate::core::io::traits::RecordSerializer;
use crate::core::libraries::{QuadrilateralLibrary, RotamerLibrary};
use crate::core::models::{Protein, ReconstructionLevel};

pub struct ReconstructionPipeline {
    quadrilaterals: QuadrilateralLibrary,
    rotamers: RotamerLibrary,
    refinement: RefinementConfig,
    serializer: Option<Box<dyn RecordSerializer>>,
}

impl ReconstructionPipeline {
    /// Loads both libraries from the configured paths.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, EngineError> {
        let quadrilaterals = QuadrilateralLibrary::load(&config.quadrilateral_library_path)?;
        let rotamers = RotamerLibrary::load(&config.rotamer_library_path)?;
        info!(
            quadrilaterals = quadrilaterals.len(),
            rotamers = rotamers.len(),
            "reconstruction libraries loaded"
        );
        Ok(Self {
            quadrilaterals,
            rotamers,
            refinement: config.refinement.clone(),
            serializer: None,
        })
    }

    pub fn with_libraries(
        quadrilaterals: QuadrilateralLibrary,
        rotamers: RotamerLibrary,
    ) -> Self {
        Self {
            quadrilaterals,
            rotamers,
            refinement: RefinementConfig::default(),
            serializer: None,
        }
    }

    /// Attaches a serializer whose textual records are refreshed after every
    /// successful reconstruction.
    pub fn set_serializer(&mut self, serializer: Box<dyn RecordSerializer>) {
        self.serializer = Some(serializer);
    }

    /// Raises the protein to the target level; all levels between the
    /// current one and the target are built along the way.
    pub fn reconstruct(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
    ) -> Result<(), EngineError> {
        self.run(protein, target, None)
    }

    /// Raises the protein to [`ReconstructionLevel::Refined`], the highest
    /// level reconstruction can reach on its own.
    pub fn reconstruct_default(&self, protein: &mut Protein) -> Result<(), EngineError> {
        self.reconstruct(protein, ReconstructionLevel::Refined)
    }

    /// Like [`ReconstructionPipeline::reconstruct`], additionally providing
    /// the inter-residue distance map a C-alpha trace is embedded from.
    pub fn reconstruct_from_distance_map(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
        distances: &DMatrix<f64>,
    ) -> Result<(), EngineError> {
        self.run(protein, target, Some(distances))
    }

    fn run(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
        distances: Option<&DMatrix<f64>>,
    ) -> Result<(), EngineError> {
        if matches!(
            target,
            ReconstructionLevel::None | ReconstructionLevel::Validated
        ) {
            return Err(EngineError::UnreachableLevel(target));
        }
        let current = protein.reconstruction_level();
        if target <= current {
            return Err(EngineError::LevelNotAboveCurrent {
                current,
                requested: target,
            });
        }

        let snapshot = protein.clone();
        let result = self.build(protein, target, distances).and_then(|()| {
            renumber_atoms(protein);
            match &self.serializer {
                Some(serializer) => serializer.refresh(protein).map_err(EngineError::from),
                None => Ok(()),
            }
        });
        if result.is_err() {
            *protein = snapshot;
        }
        result
    }

    fn build(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
        distances: Option<&DMatrix<f64>>,
    ) -> Result<(), EngineError> {
        if let Some(predecessor) = target.predecessor() {
            if predecessor != ReconstructionLevel::None
                && protein.reconstruction_level() < predecessor
            {
                self.build(protein, predecessor, distances)?;
            }
        }

        debug!(level = %target, "building reconstruction level");
        match target {
            ReconstructionLevel::CAlpha => {
                let distances = distances.ok_or_else(|| {
                    EngineError::Precondition(
                        "building a C-alpha trace requires a distance map".to_string(),
                    )
                })?;
                calpha::rebuild(protein, distances)?;
            }
            ReconstructionLevel::Backbone => backbone::rebuild(protein, &self.quadrilaterals)?,
            ReconstructionLevel::Sidechain => sidechain::rebuild(protein, &self.rotamers)?,
            ReconstructionLevel::Refined => refine::refine(protein, &self.refinement)?,
            ReconstructionLevel::None | ReconstructionLevel::Validated => {
                return Err(EngineError::UnreachableLevel(target));
            }
        }
        protein.promote_level(target);
        Ok(())
    }
}

/// Extends a C-alpha trace with virtual anchor points on both ends so every
/// residue sits inside a full lookup window. Each anchor continues the trace
/// by a parallelogram step: it repeats the preceding inter-residue vector,
/// keeping spacing realistic without being collinear.
pub(crate) fn extend_trace(
    trace: &[Point3<f64>],
    front: usize,
    back: usize,
) -> Vec<Point3<f64>> {
    let mut extended = Vec::with_capacity(trace.len() + front + back);
    extended.extend_from_slice(trace);
    for _ in 0..front {
        let anchor = extended[0] + (extended[1] - extended[2]);
        extended.insert(0, anchor);
    }
    for _ in 0..back {
        let last = extended.len() - 1;
        let anchor = extended[last] + (extended[last - 1] - extended[last - 2]);
        extended.push(anchor);
    }
    extended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry;
    use crate::core::libraries::LibraryError;
    use crate::core::models::{Atom, Protein};
    use std::path::Path;

    fn shipped_pipeline() -> ReconstructionPipeline {
        let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let quadrilaterals =
            QuadrilateralLibrary::load(&base.join("quadrilaterals.dat")).unwrap();
        let rotamers = RotamerLibrary::load(&base.join("rotamers.csv")).unwrap();
        ReconstructionPipeline::with_libraries(quadrilaterals, rotamers)
    }

    /// C-alpha trace of a ten residue ideal alpha helix.
    const HELIX_CA: [[f64; 3]; 10] = [
        [1.458, 0.000, 0.000],
        [1.899, 0.981, -3.649],
        [0.364, 4.408, -3.041],
        [2.704, 5.075, -0.117],
        [5.761, 4.194, -2.202],
        [4.709, 6.576, -4.976],
        [4.276, 9.446, -2.516],
        [7.751, 8.893, -1.070],
        [9.336, 8.966, -4.527],
        [7.629, 12.257, -5.376],
    ];

    fn helix_distance_map() -> DMatrix<f64> {
        DMatrix::from_fn(10, 10, |i, j| {
            let a = Point3::new(HELIX_CA[i][0], HELIX_CA[i][1], HELIX_CA[i][2]);
            let b = Point3::new(HELIX_CA[j][0], HELIX_CA[j][1], HELIX_CA[j][2]);
            geometry::distance(&a, &b)
        })
    }

    #[test]
    fn requesting_the_current_level_is_an_error() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);
        protein.promote_level(ReconstructionLevel::CAlpha);

        let error = pipeline
            .reconstruct(&mut protein, ReconstructionLevel::CAlpha)
            .unwrap_err();
        assert!(matches!(error, EngineError::LevelNotAboveCurrent { .. }));
    }

    #[test]
    fn requesting_a_lower_level_is_an_error() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);
        protein.promote_level(ReconstructionLevel::Sidechain);

        let error = pipeline
            .reconstruct(&mut protein, ReconstructionLevel::Backbone)
            .unwrap_err();
        assert!(matches!(
            error,
            EngineError::LevelNotAboveCurrent {
                current: ReconstructionLevel::Sidechain,
                requested: ReconstructionLevel::Backbone
            }
        ));
    }

    #[test]
    fn the_validated_level_cannot_be_built() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);

        let error = pipeline
            .reconstruct(&mut protein, ReconstructionLevel::Validated)
            .unwrap_err();
        assert!(matches!(
            error,
            EngineError::UnreachableLevel(ReconstructionLevel::Validated)
        ));
    }

    #[test]
    fn a_full_rebuild_descends_through_every_level() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);
        let distances = helix_distance_map();

        pipeline
            .reconstruct_from_distance_map(
                &mut protein,
                ReconstructionLevel::Sidechain,
                &distances,
            )
            .unwrap();

        assert_eq!(
            protein.reconstruction_level(),
            ReconstructionLevel::Sidechain
        );
        for residue in protein.residues() {
            for name in ["N", "CA", "C", "O", "CB"] {
                assert!(
                    residue.atom(name).is_some(),
                    "residue {} lacks {name}",
                    residue.residue_id
                );
            }
        }
        let serials: Vec<i32> = protein
            .residues()
            .flat_map(|r| r.atoms().iter().map(|a| a.serial))
            .collect();
        assert_eq!(
            serials,
            (1..=protein.atom_count() as i32).collect::<Vec<i32>>()
        );
    }

    #[test]
    fn the_default_target_is_the_refined_level() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);
        for (index, residue) in protein.residues_mut().enumerate() {
            residue.add_atom(Atom::new(
                "CA",
                Point3::new(
                    HELIX_CA[index][0],
                    HELIX_CA[index][1],
                    HELIX_CA[index][2],
                ),
            ));
        }
        protein.promote_level(ReconstructionLevel::CAlpha);

        pipeline.reconstruct_default(&mut protein).unwrap();

        assert_eq!(
            protein.reconstruction_level(),
            ReconstructionLevel::Refined
        );
        for residue in protein.residues() {
            for name in ["N", "CA", "C", "O", "CB"] {
                assert!(residue.atom(name).is_some());
            }
        }
    }

    #[test]
    fn a_failing_step_leaves_the_protein_untouched() {
        let pipeline = ReconstructionPipeline::with_libraries(
            QuadrilateralLibrary::default(),
            RotamerLibrary::default(),
        );
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);
        for (index, residue) in protein.residues_mut().enumerate() {
            residue.add_atom(Atom::new(
                "CA",
                Point3::new(
                    HELIX_CA[index][0],
                    HELIX_CA[index][1],
                    HELIX_CA[index][2],
                ),
            ));
        }
        protein.promote_level(ReconstructionLevel::CAlpha);
        let before = protein.clone();

        let error = pipeline
            .reconstruct(&mut protein, ReconstructionLevel::Backbone)
            .unwrap_err();
        assert!(matches!(error, EngineError::Precondition(_)));
        assert_eq!(protein.atom_count(), before.atom_count());
        assert_eq!(
            protein.reconstruction_level(),
            ReconstructionLevel::CAlpha
        );
    }

    #[test]
    fn building_calpha_without_a_distance_map_is_rejected() {
        let pipeline = shipped_pipeline();
        let mut protein = Protein::from_sequences(&[("A", "SVLSVLSVLS")]);

        let error = pipeline
            .reconstruct(&mut protein, ReconstructionLevel::CAlpha)
            .unwrap_err();
        assert!(matches!(error, EngineError::Precondition(_)));
    }

    #[test]
    fn trace_extension_keeps_realistic_spacing() {
        let trace: Vec<Point3<f64>> = HELIX_CA
            .iter()
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        let extended = extend_trace(&trace, 2, 3);

        assert_eq!(extended.len(), trace.len() + 5);
        for pair in extended.windows(2) {
            let spacing = geometry::distance(&pair[0], &pair[1]);
            assert!((2.0..6.0).contains(&spacing), "spacing {spacing}");
        }
    }

    #[test]
    fn loading_from_config_reports_missing_files() {
        let config = PipelineConfig {
            quadrilateral_library_path: "/nonexistent/quadrilaterals.dat".into(),
            rotamer_library_path: "/nonexistent/rotamers.csv".into(),
            refinement: RefinementConfig::default(),
        };
        let Err(error) = ReconstructionPipeline::from_config(&config) else {
            panic!("loading from missing library files must fail");
        };
        assert!(matches!(
            error,
            EngineError::Library {
                source: LibraryError::Io { .. }
            }
        ));
    }
}
