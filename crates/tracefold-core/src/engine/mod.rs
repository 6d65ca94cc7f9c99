//! Orchestration layer: the feature annotation engine and the level-driven
//! reconstruction pipeline, wired together from a [`config::PipelineConfig`].

pub mod config;
pub mod error;
pub mod features;
pub mod reconstruction;

pub use error::EngineError;
