//! # Tracefold Core Library
//!
//! A library for protein structure reconstruction and per-residue feature
//! annotation. Starting from as little as a pairwise distance map, it rebuilds
//! progressively denser 3D coordinates (C-alpha trace, backbone, side chains,
//! refined model) and annotates structures with derived properties such as
//! secondary structure, solvent exposure, sequence motifs and membrane topology.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Protein` and its
//!   ownership tree), pure geometry and numerical algorithms (Kabsch alignment,
//!   distance-geometry embedding), and the immutable fragment/rotamer lookup
//!   libraries.
//!
//! - **[`engine`]: The Logic Core.** The two recursive, dependency-resolving
//!   pipelines: the feature computation engine (pluggable annotators behind a
//!   static requirement graph) and the reconstruction pipeline (a state machine
//!   over ordered reconstruction levels).
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It loads the static libraries, wires both pipelines together and provides
//!   a simple entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
