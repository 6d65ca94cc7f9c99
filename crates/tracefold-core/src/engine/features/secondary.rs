//! Secondary structure assignment after Kabsch & Sander.
//!
//! Hydrogen bonds are detected with the electrostatic DSSP energy model on
//! backbone N, C and O atoms plus an amide hydrogen synthesized from the
//! preceding carbonyl when the structure carries none. Each amide and each
//! carbonyl keeps only its two lowest-energy partners (bifurcated bonds).
//! Turn, helix, bridge and bend patterns are derived from the bond set;
//! competing assignments are resolved through the [`SecondaryStructure`]
//! ranking.

use nalgebra::Point3;

use super::Annotator;
use crate::core::geometry;
use crate::core::models::{AminoAcid, Atom, FeatureType, Protein, SecondaryStructure};
use crate::engine::error::EngineError;

/// C-alpha gate: pairs further apart than this cannot be hydrogen bonded.
const CONTACT_CUTOFF_SQUARED: f64 = 81.0;
/// Atoms closer than this are in contact; the bond saturates.
const MIN_ATOM_DISTANCE: f64 = 0.5;
/// Electrostatic coupling constant, cal/mol * A.
const COUPLING_CONSTANT: f64 = -27_888.0;
/// Strongest representable bond energy, cal/mol.
const SATURATED_ENERGY: f64 = -9_900.0;
/// Energies below this count as hydrogen bonds, cal/mol.
const BOND_THRESHOLD: f64 = -500.0;
/// An N to preceding C distance above this is a chain break.
const MAX_PEPTIDE_BOND_LENGTH: f64 = 2.5;
/// Bend window: the C-alpha trace must kink by more than this, in degrees.
const MIN_BEND_ANGLE: f64 = 70.0;
const MAX_BEND_ANGLE: f64 = 359.99;

pub struct SecondaryStructureAnnotator;

/// Backbone geometry of one residue, indexed in document order.
struct Backbone {
    chain: usize,
    amino_acid: AminoAcid,
    n: Point3<f64>,
    ca: Point3<f64>,
    c: Point3<f64>,
    o: Point3<f64>,
    /// Amide hydrogen; `None` at chain starts, after chain breaks and on
    /// proline, whose nitrogen carries no hydrogen.
    h: Option<Point3<f64>>,
}

impl Annotator for SecondaryStructureAnnotator {
    fn provides(&self) -> FeatureType {
        FeatureType::SecondaryStructure
    }

    fn annotate(&self, protein: &mut Protein) -> Result<(), EngineError> {
        let mut backbones = collect_backbones(protein)?;
        synthesize_hydrogens(&mut backbones);
        store_synthetic_hydrogens(protein, &backbones);

        let n = backbones.len();
        let bonds = hydrogen_bonds(&backbones);
        let mut assigned = vec![SecondaryStructure::Coil; n];

        assign_bends(&backbones, &mut assigned);
        assign_turns_and_helices(&backbones, &bonds, &mut assigned);
        assign_bridges(&backbones, &bonds, &mut assigned);

        for (residue, class) in protein.residues_mut().zip(assigned) {
            residue.features.insert(
                FeatureType::SecondaryStructure,
                [class.ordinal() as f64, 0.0],
            );
        }

        // The synthesized hydrogens were scoring geometry only.
        for residue in protein.residues_mut() {
            residue.remove_atoms_by(Atom::is_synthetic);
        }
        Ok(())
    }
}

fn collect_backbones(protein: &Protein) -> Result<Vec<Backbone>, EngineError> {
    let mut backbones = Vec::with_capacity(protein.size());
    for (chain_index, chain) in protein.chains.iter().enumerate() {
        for residue in &chain.residues {
            let position = |name: &'static str| {
                residue
                    .atom(name)
                    .map(|a| a.position)
                    .ok_or(EngineError::MissingAtom {
                        residue_id: residue.residue_id,
                        atom: name,
                    })
            };
            backbones.push(Backbone {
                chain: chain_index,
                amino_acid: residue.amino_acid,
                n: position("N")?,
                ca: position("CA")?,
                c: position("C")?,
                o: position("O")?,
                h: residue.atom("H").map(|a| a.position),
            });
        }
    }
    Ok(backbones)
}

/// Places a virtual amide hydrogen on every residue that has a bonded
/// predecessor and no experimental hydrogen: along the predecessor's C=O
/// direction, one Angstrom from the nitrogen. Proline never receives one.
fn synthesize_hydrogens(backbones: &mut [Backbone]) {
    for index in 1..backbones.len() {
        if backbones[index].h.is_some() || backbones[index].amino_acid == AminoAcid::Proline {
            continue;
        }
        let previous = &backbones[index - 1];
        if previous.chain != backbones[index].chain
            || geometry::distance(&backbones[index].n, &previous.c) > MAX_PEPTIDE_BOND_LENGTH
        {
            continue;
        }
        let carbonyl = previous.c - previous.o;
        backbones[index].h = Some(backbones[index].n + carbonyl / carbonyl.norm());
    }
}

/// Records the synthesized hydrogens on the protein as synthetic atoms while
/// the assignment runs; [`SecondaryStructureAnnotator::annotate`] removes
/// them again before it returns.
fn store_synthetic_hydrogens(protein: &mut Protein, backbones: &[Backbone]) {
    for (residue, backbone) in protein.residues_mut().zip(backbones) {
        if let Some(h) = backbone.h {
            if residue.atom("H").is_none() {
                residue.add_atom(Atom::synthetic("H", h));
            }
        }
    }
}

/// The two lowest-energy bond partners of one residue side. Weaker
/// candidates are evicted, so every amide donates and every carbonyl accepts
/// at most two (bifurcated) hydrogen bonds.
#[derive(Clone, Copy, Default)]
struct BondSlots {
    slots: [(f64, Option<usize>); 2],
}

impl BondSlots {
    fn offer(&mut self, energy: f64, partner: usize) {
        if energy < self.slots[0].0 {
            self.slots[1] = self.slots[0];
            self.slots[0] = (energy, Some(partner));
        } else if energy < self.slots[1].0 {
            self.slots[1] = (energy, Some(partner));
        }
    }

    fn holds(&self, partner: usize) -> bool {
        self.slots
            .iter()
            .any(|&(energy, p)| p == Some(partner) && energy < BOND_THRESHOLD)
    }
}

/// `bonds[i][j]` is true when the carbonyl of residue i accepts the amide
/// hydrogen of residue j: the pair must survive in the carbonyl's donor
/// slots or in the amide's acceptor slots, below the bond threshold.
///
/// Proline never donates, and the donor directly following its acceptor is
/// excluded; the covalent peptide geometry would always pass the energy
/// test.
fn hydrogen_bonds(backbones: &[Backbone]) -> Vec<Vec<bool>> {
    let n = backbones.len();
    let mut donors_of = vec![BondSlots::default(); n];
    let mut acceptors_of = vec![BondSlots::default(); n];
    for acceptor in 0..n {
        for donor in 0..n {
            if donor == acceptor
                || (donor == acceptor + 1 && backbones[donor].chain == backbones[acceptor].chain)
                || backbones[donor].amino_acid == AminoAcid::Proline
            {
                continue;
            }
            let Some(energy) = bond_energy(&backbones[acceptor], &backbones[donor]) else {
                continue;
            };
            donors_of[acceptor].offer(energy, donor);
            acceptors_of[donor].offer(energy, acceptor);
        }
    }

    let mut bonds = vec![vec![false; n]; n];
    for acceptor in 0..n {
        for donor in 0..n {
            if donors_of[acceptor].holds(donor) || acceptors_of[donor].holds(acceptor) {
                bonds[acceptor][donor] = true;
            }
        }
    }
    bonds
}

fn bond_energy(acceptor: &Backbone, donor: &Backbone) -> Option<f64> {
    let h = donor.h?;
    if geometry::distance_squared(&acceptor.ca, &donor.ca) >= CONTACT_CUTOFF_SQUARED {
        return None;
    }
    let distance_ho = geometry::distance(&acceptor.o, &h);
    let distance_hc = geometry::distance(&acceptor.c, &h);
    let distance_nc = geometry::distance(&acceptor.c, &donor.n);
    let distance_no = geometry::distance(&acceptor.o, &donor.n);

    if distance_ho < MIN_ATOM_DISTANCE
        || distance_hc < MIN_ATOM_DISTANCE
        || distance_nc < MIN_ATOM_DISTANCE
        || distance_no < MIN_ATOM_DISTANCE
    {
        return Some(SATURATED_ENERGY);
    }
    let raw = COUPLING_CONSTANT / distance_ho - COUPLING_CONSTANT / distance_hc
        + COUPLING_CONSTANT / distance_nc
        - COUPLING_CONSTANT / distance_no;
    Some(raw.max(SATURATED_ENERGY))
}

/// Raises the assignment of a residue; lower-ranked candidates never
/// overwrite a higher-ranked one.
fn assign(assigned: &mut [SecondaryStructure], index: usize, candidate: SecondaryStructure) {
    if candidate > assigned[index] {
        assigned[index] = candidate;
    }
}

fn assign_bends(backbones: &[Backbone], assigned: &mut [SecondaryStructure]) {
    for index in 2..backbones.len().saturating_sub(2) {
        // All four peptide bonds of the window must be intact.
        let connected = (index - 2..index + 2).all(|k| {
            backbones[k].chain == backbones[k + 1].chain
                && geometry::distance(&backbones[k].c, &backbones[k + 1].n)
                    <= MAX_PEPTIDE_BOND_LENGTH
        });
        if !connected {
            continue;
        }
        let incoming = backbones[index].ca - backbones[index - 2].ca;
        let outgoing = backbones[index + 2].ca - backbones[index].ca;
        let angle = geometry::angle_degrees(&incoming, &outgoing);
        if angle > MIN_BEND_ANGLE && angle < MAX_BEND_ANGLE {
            assign(assigned, index, SecondaryStructure::Bend);
        }
    }
}

/// An n-turn at residue i is a hydrogen bond from the carbonyl of i to the
/// amide of i+n. Two consecutive n-turns make a helix over residues
/// i..i+n-1; a lone n-turn leaves its covered interior residues as Turn.
fn assign_turns_and_helices(
    backbones: &[Backbone],
    bonds: &[Vec<bool>],
    assigned: &mut [SecondaryStructure],
) {
    let n = backbones.len();
    for (span, helix_class) in [
        (3, SecondaryStructure::ThreeTenHelix),
        (4, SecondaryStructure::AlphaHelix),
        (5, SecondaryStructure::PiHelix),
    ] {
        let turn_at = |i: usize| {
            i + span < n
                && backbones[i].chain == backbones[i + span].chain
                && bonds[i][i + span]
        };
        for i in 0..n {
            if !turn_at(i) {
                continue;
            }
            for covered in i + 1..i + span {
                assign(assigned, covered, SecondaryStructure::Turn);
            }
            if i > 0 && turn_at(i - 1) {
                for member in i..i + span {
                    assign(assigned, member, helix_class);
                }
            }
        }
    }
}

/// One run of consecutive beta bridges. The first strand ascends from `from`
/// to `to`; the second strand starts at `second_from` and ascends (parallel)
/// or descends (antiparallel) to `second_to`.
struct Ladder {
    from: usize,
    to: usize,
    second_from: usize,
    second_to: usize,
    parallel: bool,
    connected_to: Option<usize>,
}

/// A bridge pairs residues i and j through the DSSP parallel or antiparallel
/// bond patterns. Consecutive bridges form ladders; ladders joined by a beta
/// bulge form one strand. Multi-rung or bulge-linked ladders are Extended,
/// isolated rungs stay single Bridge residues.
fn assign_bridges(
    backbones: &[Backbone],
    bonds: &[Vec<bool>],
    assigned: &mut [SecondaryStructure],
) {
    let n = backbones.len();
    let interior = |i: usize| {
        i > 0 && i + 1 < n
            && backbones[i - 1].chain == backbones[i].chain
            && backbones[i + 1].chain == backbones[i].chain
    };

    let mut bridges: Vec<(usize, usize, bool)> = Vec::new();
    for i in 0..n {
        for j in i + 3..n {
            if !interior(i) || !interior(j) {
                continue;
            }
            let parallel = (bonds[i - 1][j] && bonds[j][i + 1])
                || (bonds[j - 1][i] && bonds[i][j + 1]);
            let antiparallel = (bonds[i][j] && bonds[j][i])
                || (bonds[i - 1][j + 1] && bonds[j - 1][i + 1]);
            if parallel || antiparallel {
                bridges.push((i, j, parallel));
            }
        }
    }

    let mut ladders: Vec<Ladder> = Vec::new();
    'bridges: for (i, j, parallel) in bridges {
        for ladder in ladders.iter_mut() {
            let extends = ladder.parallel == parallel
                && i == ladder.to + 1
                && ((parallel && j == ladder.second_to + 1)
                    || (!parallel && ladder.second_to > 0 && j == ladder.second_to - 1));
            if extends {
                ladder.to = i;
                ladder.second_to = j;
                continue 'bridges;
            }
        }
        ladders.push(Ladder {
            from: i,
            to: i,
            second_from: j,
            second_to: j,
            parallel,
            connected_to: None,
        });
    }

    connect_ladders(&mut ladders);

    for ladder in &ladders {
        let class = if ladder.to > ladder.from {
            SecondaryStructure::Extended
        } else {
            SecondaryStructure::Bridge
        };
        for (step, i) in (ladder.from..=ladder.to).enumerate() {
            let j = if ladder.parallel {
                ladder.second_from + step
            } else {
                ladder.second_from - step
            };
            assign(assigned, i, class);
            assign(assigned, j, class);
        }
    }

    // A bulge-linked pair is one strand: everything between the two ladders
    // on both strands is Extended, the bulge residues included.
    for first in 0..ladders.len() {
        let Some(second) = ladders[first].connected_to else {
            continue;
        };
        let (near, far) = (&ladders[first], &ladders[second]);
        for i in near.from..=far.to {
            assign(assigned, i, SecondaryStructure::Extended);
        }
        let span = if near.parallel {
            near.second_from..=far.second_to
        } else {
            far.second_to..=near.second_from
        };
        for j in span {
            assign(assigned, j, SecondaryStructure::Extended);
        }
    }
}

fn connect_ladders(ladders: &mut [Ladder]) {
    for first in 0..ladders.len() {
        for second in first..ladders.len() {
            if ladders[second].connected_to.is_none()
                && has_bulge(&ladders[first], &ladders[second])
            {
                ladders[first].connected_to = Some(second);
            }
        }
    }
}

/// A beta bulge links two ladders of the same type separated by at most one
/// extra residue on one strand and at most four on the other.
fn has_bulge(first: &Ladder, second: &Ladder) -> bool {
    if first.parallel != second.parallel
        || first.to >= second.from
        || second.from - first.to >= 6
    {
        return false;
    }
    let close = second.from - first.to < 3;
    if first.parallel {
        second.second_from > first.second_to && {
            let lateral = second.second_from - first.second_to;
            (lateral < 6 && close) || lateral < 3
        }
    } else {
        first.second_from > second.second_to && {
            let lateral = first.second_from - second.second_to;
            (lateral < 6 && close) || lateral < 3
        }
    }
}
