//! Per-residue feature annotation.
//!
//! Annotators compute one feature each and declare nothing about ordering;
//! the engine resolves the static requirement graph recursively, applies a
//! baseline to residues an annotator left untouched, rewrites the normalized
//! slot of every value, and records availability on the protein so repeated
//! requests are no-ops.

pub mod exposure;
pub mod membrane;
pub mod motifs;
pub mod secondary;

use std::collections::HashMap;

use tracing::debug;

use super::error::EngineError;
use crate::core::models::{FeatureType, Protein};

/// A single-feature computation over a whole protein.
///
/// Implementations write raw values into residue feature maps and may leave
/// residues out; the engine fills those with the baseline value afterwards.
/// The normalized slot is engine-owned and overwritten after every run.
pub trait Annotator {
    fn provides(&self) -> FeatureType;
    fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError>;
}

/// Raw value given to residues an annotator did not assign.
const BASELINE: f64 = 0.0;

#[derive(Default)]
pub struct FeatureEngine {
    annotators: HashMap<FeatureType, Box<dyn Annotator>>,
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with all built-in annotators registered.
    pub fn with_default_annotators() -> Self {
        let mut engine = Self::new();
        // The built-in requirement graph is acyclic, so these cannot fail.
        let _ = engine.register(Box::new(secondary::SecondaryStructureAnnotator));
        let _ = engine.register(Box::new(exposure::AccessibleSurfaceAreaAnnotator::default()));
        let _ = engine.register(Box::new(motifs::SequenceMotifAnnotator));
        let _ = engine.register(Box::new(membrane::MembraneAnnotator::default()));
        engine
    }

    /// Registers an annotator, verifying that the requirement chain of the
    /// feature it provides terminates.
    pub fn register(&mut self, annotator: Box<dyn Annotator>) -> Result<(), EngineError> {
        let feature = annotator.provides();
        let mut visited = Vec::new();
        check_requirement_cycle(feature, &mut visited)?;
        self.annotators.insert(feature, annotator);
        Ok(())
    }

    /// Computes a feature and, recursively, everything it requires. Features
    /// already available on the protein are not recomputed.
    pub fn annotate(
        &self,
        protein: &mut Protein,
        feature: FeatureType,
    ) -> Result<(), EngineError> {
        if protein.available_features.contains(&feature) {
            return Ok(());
        }
        for requirement in feature.requirements() {
            self.annotate(protein, *requirement)?;
        }

        let annotator = self
            .annotators
            .get(&feature)
            .ok_or(EngineError::UnknownFeature(feature))?;
        annotator.annotate(protein)?;

        apply_baseline(protein, feature);
        normalize(protein, feature);
        protein.available_features.insert(feature);
        debug!(feature = feature.name(), "feature computed");
        Ok(())
    }

    /// Computes every registered feature, resolving requirements as needed.
    pub fn annotate_all(&self, protein: &mut Protein) -> Result<(), EngineError> {
        for feature in FeatureType::ALL {
            if self.annotators.contains_key(&feature) {
                self.annotate(protein, feature)?;
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, feature: FeatureType) -> bool {
        self.annotators.contains_key(&feature)
    }
}

fn check_requirement_cycle(
    feature: FeatureType,
    visited: &mut Vec<FeatureType>,
) -> Result<(), EngineError> {
    if visited.contains(&feature) {
        return Err(EngineError::CyclicRequirements(feature));
    }
    visited.push(feature);
    for requirement in feature.requirements() {
        check_requirement_cycle(*requirement, visited)?;
    }
    visited.pop();
    Ok(())
}

fn apply_baseline(protein: &mut Protein, feature: FeatureType) {
    for residue in protein.residues_mut() {
        residue
            .features
            .entry(feature)
            .or_insert([BASELINE, BASELINE]);
    }
}

/// Rewrites the normalized slot of every residue's value to [0, 1] by
/// min-max scaling the raw values over the protein; class ordinals are
/// scaled like any other raw value. Degenerate spans normalize to zero.
fn normalize(protein: &mut Protein, feature: FeatureType) {
    let min = protein
        .residues()
        .filter_map(|r| r.feature_raw(feature))
        .fold(f64::INFINITY, f64::min);
    let max = protein
        .residues()
        .filter_map(|r| r.feature_raw(feature))
        .fold(f64::NEG_INFINITY, f64::max);
    for residue in protein.residues_mut() {
        if let Some(value) = residue.features.get_mut(&feature) {
            let normalized = (value[0] - min) / (max - min);
            value[1] = if normalized.is_nan() { 0.0 } else { normalized };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SecondaryStructure;

    struct CountingAnnotator {
        feature: FeatureType,
        calls: std::cell::Cell<usize>,
    }

    impl Annotator for CountingAnnotator {
        fn provides(&self) -> FeatureType {
            self.feature
        }

        fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
            self.calls.set(self.calls.get() + 1);
            for (index, residue) in protein.residues_mut().enumerate() {
                residue.features.insert(self.feature, [index as f64, 0.0]);
            }
            Ok(())
        }
    }

    fn counting(feature: FeatureType) -> Box<CountingAnnotator> {
        Box::new(CountingAnnotator {
            feature,
            calls: std::cell::Cell::new(0),
        })
    }

    #[test]
    fn unknown_features_are_rejected() {
        let engine = FeatureEngine::new();
        let mut protein = Protein::from_sequences(&[("A", "AG")]);
        let result = engine.annotate(&mut protein, FeatureType::SecondaryStructure);
        assert!(matches!(result, Err(EngineError::UnknownFeature(_))));
    }

    #[test]
    fn requirements_are_computed_before_the_requested_feature() {
        let mut engine = FeatureEngine::new();
        engine
            .register(counting(FeatureType::AccessibleSurfaceArea))
            .unwrap();
        engine.register(counting(FeatureType::MembraneTopology)).unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AGS")]);

        engine
            .annotate(&mut protein, FeatureType::MembraneTopology)
            .unwrap();

        assert!(
            protein
                .available_features
                .contains(&FeatureType::AccessibleSurfaceArea)
        );
        assert!(
            protein
                .available_features
                .contains(&FeatureType::MembraneTopology)
        );
    }

    #[test]
    fn available_features_are_not_recomputed() {
        struct RunStampAnnotator {
            calls: std::cell::Cell<usize>,
        }
        impl Annotator for RunStampAnnotator {
            fn provides(&self) -> FeatureType {
                FeatureType::AccessibleSurfaceArea
            }
            fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
                self.calls.set(self.calls.get() + 1);
                let stamp = self.calls.get() as f64;
                for residue in protein.residues_mut() {
                    residue
                        .features
                        .insert(FeatureType::AccessibleSurfaceArea, [stamp, 0.0]);
                }
                Ok(())
            }
        }
        let mut engine = FeatureEngine::new();
        engine
            .register(Box::new(RunStampAnnotator {
                calls: std::cell::Cell::new(0),
            }))
            .unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AGS")]);

        engine
            .annotate(&mut protein, FeatureType::AccessibleSurfaceArea)
            .unwrap();
        engine
            .annotate(&mut protein, FeatureType::AccessibleSurfaceArea)
            .unwrap();

        // A second run would have stamped 2.0 into every residue.
        for residue in protein.residues() {
            assert_eq!(
                residue.feature_raw(FeatureType::AccessibleSurfaceArea),
                Some(1.0)
            );
        }
    }

    #[test]
    fn continuous_values_are_min_max_scaled() {
        let mut engine = FeatureEngine::new();
        engine
            .register(counting(FeatureType::AccessibleSurfaceArea))
            .unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AGSV")]);

        engine
            .annotate(&mut protein, FeatureType::AccessibleSurfaceArea)
            .unwrap();

        let normalized: Vec<f64> = protein
            .residues()
            .map(|r| {
                r.feature_normalized(FeatureType::AccessibleSurfaceArea)
                    .unwrap()
            })
            .collect();
        assert_eq!(normalized, vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn degenerate_continuous_spans_normalize_to_zero() {
        struct ConstantAnnotator;
        impl Annotator for ConstantAnnotator {
            fn provides(&self) -> FeatureType {
                FeatureType::AccessibleSurfaceArea
            }
            fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
                for residue in protein.residues_mut() {
                    residue
                        .features
                        .insert(FeatureType::AccessibleSurfaceArea, [5.0, 0.0]);
                }
                Ok(())
            }
        }
        let mut engine = FeatureEngine::new();
        engine.register(Box::new(ConstantAnnotator)).unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AG")]);

        engine
            .annotate(&mut protein, FeatureType::AccessibleSurfaceArea)
            .unwrap();

        for residue in protein.residues() {
            assert_eq!(
                residue.feature_normalized(FeatureType::AccessibleSurfaceArea),
                Some(0.0)
            );
        }
    }

    #[test]
    fn class_ordinals_are_min_max_scaled_over_the_protein() {
        // Coil (0) and Extended (6): the largest assigned ordinal maps to
        // 1.0, not to its fraction of the class count.
        struct StrandAnnotator;
        impl Annotator for StrandAnnotator {
            fn provides(&self) -> FeatureType {
                FeatureType::SecondaryStructure
            }
            fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
                for (index, residue) in protein.residues_mut().enumerate() {
                    let class = if index == 0 {
                        SecondaryStructure::Coil
                    } else {
                        SecondaryStructure::Extended
                    };
                    residue.features.insert(
                        FeatureType::SecondaryStructure,
                        [class.ordinal() as f64, 0.0],
                    );
                }
                Ok(())
            }
        }
        let mut engine = FeatureEngine::new();
        engine.register(Box::new(StrandAnnotator)).unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AG")]);

        engine
            .annotate(&mut protein, FeatureType::SecondaryStructure)
            .unwrap();

        let normalized: Vec<f64> = protein
            .residues()
            .map(|r| r.feature_normalized(FeatureType::SecondaryStructure).unwrap())
            .collect();
        assert_eq!(normalized, vec![0.0, 1.0]);
    }

    #[test]
    fn unassigned_residues_receive_the_baseline() {
        struct PartialAnnotator;
        impl Annotator for PartialAnnotator {
            fn provides(&self) -> FeatureType {
                FeatureType::AccessibleSurfaceArea
            }
            fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
                if let Some(residue) = protein.residues_mut().next() {
                    residue
                        .features
                        .insert(FeatureType::AccessibleSurfaceArea, [10.0, 0.0]);
                }
                Ok(())
            }
        }
        let mut engine = FeatureEngine::new();
        engine.register(Box::new(PartialAnnotator)).unwrap();
        let mut protein = Protein::from_sequences(&[("A", "AG")]);

        engine
            .annotate(&mut protein, FeatureType::AccessibleSurfaceArea)
            .unwrap();

        let raw: Vec<Option<f64>> = protein
            .residues()
            .map(|r| r.feature_raw(FeatureType::AccessibleSurfaceArea))
            .collect();
        assert_eq!(raw, vec![Some(10.0), Some(0.0)]);
    }
}
