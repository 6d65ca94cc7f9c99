//! Sequence motif detection.
//!
//! Motifs are defined by their terminal amino acids and span length; the
//! annotator scans every chain, records matched spans on the protein and
//! marks the covered residues. When membrane topology has already been
//! computed, each motif is stamped with the topology of its span.

use super::Annotator;
use crate::core::models::{
    FeatureType, MembraneTopology, Motif, MotifDefinition, Protein,
};
use crate::engine::error::EngineError;

pub struct SequenceMotifAnnotator;

impl Annotator for SequenceMotifAnnotator {
    fn provides(&self) -> FeatureType {
        FeatureType::MotifAnnotation
    }

    fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
        let mut motifs = Vec::new();
        for chain in &protein.chains {
            let sequence: Vec<char> = chain
                .residues
                .iter()
                .map(|r| r.amino_acid.one_letter())
                .collect();
            for definition in MotifDefinition::ALL {
                // length() is the start-to-end separation; the motif spans
                // one residue more.
                let span = definition.length() + 1;
                if sequence.len() < span {
                    continue;
                }
                for start in 0..=sequence.len() - span {
                    let end = start + definition.length();
                    if sequence[start] != definition.start_amino_acid()
                        || sequence[end] != definition.end_amino_acid()
                    {
                        continue;
                    }
                    motifs.push(Motif {
                        definition,
                        sequence: sequence[start..=end].iter().collect(),
                        start_residue_id: chain.residues[start].residue_id,
                        end_residue_id: chain.residues[end].residue_id,
                        topology: span_topology(chain.residues[start..=end].iter()),
                    });
                }
            }
        }

        // First matching definition wins for residues covered by overlapping
        // motifs; classes are definition ordinals shifted by one, zero being
        // the no-motif baseline.
        for motif in &motifs {
            let class = definition_class(motif.definition);
            for residue in protein.residues_mut() {
                if residue.residue_id >= motif.start_residue_id
                    && residue.residue_id <= motif.end_residue_id
                {
                    residue
                        .features
                        .entry(FeatureType::MotifAnnotation)
                        .or_insert([class as f64, 0.0]);
                }
            }
        }
        protein.motifs = motifs;
        Ok(())
    }
}

fn definition_class(definition: MotifDefinition) -> usize {
    MotifDefinition::ALL
        .iter()
        .position(|d| *d == definition)
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// Topology of a residue span: the shared class if the span is uniform,
/// otherwise Transition for spans crossing a membrane boundary. Unknown when
/// topology was never computed.
fn span_topology<'a, I>(residues: I) -> MembraneTopology
where
    I: Iterator<Item = &'a crate::core::models::Residue>,
{
    let mut classes = residues.map(|r| {
        r.feature_raw(FeatureType::MembraneTopology)
            .map(|raw| raw as usize)
    });
    let Some(Some(first)) = classes.next() else {
        return MembraneTopology::Unknown;
    };
    if classes.all(|c| c == Some(first)) {
        match first {
            1 => MembraneTopology::NonTransmembrane,
            2 => MembraneTopology::Transition,
            3 => MembraneTopology::Transmembrane,
            _ => MembraneTopology::Unknown,
        }
    } else {
        MembraneTopology::Transition
    }
}
