use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Cooling curve for the refinement stage, mapping elapsed progress in
/// [0, 1] to a temperature fraction in [1, 0].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoolingSchedule {
    #[default]
    Linear,
    Sigmoid,
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    pub steps: usize,
    pub start_temperature: f64,
    pub end_temperature: f64,
    pub schedule: CoolingSchedule,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            start_temperature: 1000.0,
            end_temperature: 0.0,
            schedule: CoolingSchedule::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub quadrilateral_library_path: PathBuf,
    pub rotamer_library_path: PathBuf,
    pub refinement: RefinementConfig,
}

impl PipelineConfig {
    /// Loads a configuration from a TOML file with `quadrilateral_library`
    /// and `rotamer_library` path keys and an optional `[refinement]` table.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let display_path = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: display_path.clone(),
            source: e,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: display_path,
            source: e,
        })?;

        PipelineConfigBuilder::new()
            .quadrilateral_library_path(file.quadrilateral_library)
            .rotamer_library_path(file.rotamer_library)
            .refinement(file.refinement)
            .build()
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    quadrilateral_library: PathBuf,
    rotamer_library: PathBuf,
    #[serde(default)]
    refinement: RefinementConfig,
}

#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    quadrilateral_library_path: Option<PathBuf>,
    rotamer_library_path: Option<PathBuf>,
    refinement: Option<RefinementConfig>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quadrilateral_library_path(mut self, path: PathBuf) -> Self {
        self.quadrilateral_library_path = Some(path);
        self
    }

    pub fn rotamer_library_path(mut self, path: PathBuf) -> Self {
        self.rotamer_library_path = Some(path);
        self
    }

    pub fn refinement(mut self, refinement: RefinementConfig) -> Self {
        self.refinement = Some(refinement);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        Ok(PipelineConfig {
            quadrilateral_library_path: self
                .quadrilateral_library_path
                .ok_or(ConfigError::MissingParameter("quadrilateral_library_path"))?,
            rotamer_library_path: self
                .rotamer_library_path
                .ok_or(ConfigError::MissingParameter("rotamer_library_path"))?,
            refinement: self.refinement.unwrap_or_default(),
        })
    }
}
