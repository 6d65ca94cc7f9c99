//! # IO Module
//!
//! Canonical atom ordering and serial assignment, plus the trait seam towards
//! the text serializer collaborator. This crate never parses or renders PDB
//! records itself; it only guarantees that atoms are laid out and numbered
//! canonically before a serializer sees them.

pub mod rules;
pub mod sorter;
pub mod traits;
