use nalgebra::DMatrix;
use tracing::{info, instrument};

use crate::core::models::{FeatureType, Protein, ReconstructionLevel};
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::features::FeatureEngine;
use crate::engine::reconstruction::{ReconstructionPipeline, distance_map};

/// Facade over the modeling stack: owns the loaded libraries, the default
/// annotator set and the reconstruction pipeline.
pub struct Modeler {
    pipeline: ReconstructionPipeline,
    features: FeatureEngine,
}

impl Modeler {
    /// Loads all resources named by the configuration.
    #[instrument(skip_all, name = "modeler_setup")]
    pub fn from_config(config: &PipelineConfig) -> Result<Self, EngineError> {
        info!("loading reconstruction libraries and annotators");
        Ok(Self {
            pipeline: ReconstructionPipeline::from_config(config)?,
            features: FeatureEngine::with_default_annotators(),
        })
    }

    pub fn with_components(pipeline: ReconstructionPipeline, features: FeatureEngine) -> Self {
        Self { pipeline, features }
    }

    /// Computes one feature, resolving its requirements first.
    #[instrument(skip_all, name = "annotation_workflow", fields(feature = feature.name()))]
    pub fn annotate(
        &self,
        protein: &mut Protein,
        feature: FeatureType,
    ) -> Result<(), EngineError> {
        self.features.annotate(protein, feature)
    }

    /// Computes every feature with a registered annotator.
    #[instrument(skip_all, name = "annotation_workflow")]
    pub fn annotate_all(&self, protein: &mut Protein) -> Result<(), EngineError> {
        self.features.annotate_all(protein)
    }

    /// Raises the protein to the target reconstruction level, starting from
    /// whatever coordinates it already carries.
    #[instrument(skip_all, name = "reconstruction_workflow", fields(level = %target))]
    pub fn rebuild(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
    ) -> Result<(), EngineError> {
        info!(
            current = %protein.reconstruction_level(),
            "starting reconstruction"
        );
        self.pipeline.reconstruct(protein, target)
    }

    /// Rebuilds up to the refined model, the default target.
    #[instrument(skip_all, name = "reconstruction_workflow")]
    pub fn rebuild_default(&self, protein: &mut Protein) -> Result<(), EngineError> {
        self.pipeline.reconstruct_default(protein)
    }

    /// Rebuilds from a bare inter-residue distance map, e.g. one produced by
    /// a contact prediction method.
    #[instrument(skip_all, name = "reconstruction_workflow", fields(level = %target))]
    pub fn rebuild_from_distance_map(
        &self,
        protein: &mut Protein,
        target: ReconstructionLevel,
        distances: &DMatrix<f64>,
    ) -> Result<(), EngineError> {
        self.pipeline
            .reconstruct_from_distance_map(protein, target, distances)
    }

    /// Distance map of the protein's current C-alpha trace.
    pub fn distance_map(&self, protein: &Protein) -> Result<DMatrix<f64>, EngineError> {
        distance_map::calpha_distance_map(protein)
    }

    pub fn features(&self) -> &FeatureEngine {
        &self.features
    }

    pub fn pipeline(&self) -> &ReconstructionPipeline {
        &self.pipeline
    }
}
