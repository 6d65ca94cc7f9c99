//! High-level entry points tying the feature engine and the reconstruction
//! pipeline together.

pub mod modeling;

pub use modeling::Modeler;
