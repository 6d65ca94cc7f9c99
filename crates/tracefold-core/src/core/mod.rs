//! # Core Module
//!
//! Fundamental building blocks for protein structure reconstruction and
//! annotation: the molecular data model, pure geometric and numerical
//! algorithms, and the static lookup libraries the reconstruction algorithms
//! draw fragments from.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Protein/Chain/Residue/Atom
//!   ownership tree plus per-residue feature maps
//! - **Geometry Kernel** ([`geometry`]) - Pure vector/matrix primitives shared
//!   by every algorithm above it
//! - **Rigid-Body Alignment** ([`alignment`]) - Kabsch superposition via SVD
//! - **Distance-Geometry Embedding** ([`embedding`]) - Classical
//!   multidimensional scaling
//! - **Lookup Libraries** ([`libraries`]) - Immutable backbone-quadrilateral
//!   and side-chain-rotamer tables with binned geometric hashing
//! - **Canonical Ordering** ([`io`]) - Atom sorting/serial assignment and the
//!   serializer collaborator seam

pub mod alignment;
pub mod embedding;
pub mod geometry;
pub mod io;
pub mod libraries;
pub mod models;
