//! Refinement pass over a fully built structure.
//!
//! Runs a simulated-annealing style cooling loop over the configured
//! schedule. The current move set is empty, so the pass is a deterministic
//! audit: it walks the schedule, tracks the steric clash count and reports
//! it, leaving coordinates untouched.

use tracing::{debug, info};

use crate::core::geometry;
use crate::core::models::Protein;
use crate::engine::config::{CoolingSchedule, RefinementConfig};
use crate::engine::error::EngineError;

/// Steepness of the sigmoid cooling curve.
const SIGMOID_STEEPNESS: f64 = 3.5;
/// Decay rate of the exponential cooling curve.
const EXPONENTIAL_RATE: f64 = 5.0;
/// Heavy atoms of different residues closer than this clash, Angstrom.
const CLASH_DISTANCE: f64 = 2.0;

/// Temperature after a fraction `progress` in [0, 1] of the schedule.
pub fn temperature(config: &RefinementConfig, progress: f64) -> f64 {
    let cooled = match config.schedule {
        CoolingSchedule::Linear => progress,
        CoolingSchedule::Sigmoid => {
            1.0 / (1.0 + (-SIGMOID_STEEPNESS * (2.0 * progress - 1.0)).exp())
        }
        CoolingSchedule::Exponential => 1.0 - (-EXPONENTIAL_RATE * progress).exp(),
    };
    config.start_temperature + (config.end_temperature - config.start_temperature) * cooled
}

pub fn refine(protein: &mut Protein, config: &RefinementConfig) -> Result<(), EngineError> {
    let clashes = clash_count(protein);
    info!(clashes, steps = config.steps, "refinement pass starting");

    for step in 0..config.steps {
        let progress = if config.steps > 1 {
            step as f64 / (config.steps - 1) as f64
        } else {
            1.0
        };
        let current = temperature(config, progress);
        debug!(step, temperature = current, "cooling step");
    }

    info!(clashes = clash_count(protein), "refinement pass finished");
    Ok(())
}

/// Number of heavy-atom pairs from different residues in steric contact.
fn clash_count(protein: &Protein) -> usize {
    let atoms: Vec<(usize, nalgebra::Point3<f64>)> = protein
        .residues()
        .flat_map(|residue| {
            residue
                .atoms()
                .iter()
                .filter(|a| !a.is_hydrogen())
                .map(|a| (residue.residue_id, a.position))
        })
        .collect();

    let mut clashes = 0;
    for (first, (residue_a, position_a)) in atoms.iter().enumerate() {
        for (residue_b, position_b) in atoms.iter().skip(first + 1) {
            if residue_a != residue_b
                && geometry::distance(position_a, position_b) < CLASH_DISTANCE
            {
                clashes += 1;
            }
        }
    }
    clashes
}
