use super::rules::atom_order_weight;
use crate::core::models::Protein;
use std::cmp::Ordering;

/// Re-lays-out every residue's atoms in canonical order and assigns fresh
/// serial numbers starting at 1, walking chains and residues in document
/// order. Synthetic atoms are dropped; they must never survive a re-layout.
///
/// Called by the reconstruction pipeline whenever atoms were added or
/// replaced, before the structure is handed to a serializer.
pub fn renumber_atoms(protein: &mut Protein) {
    let mut serial = 1;
    for residue in protein.residues_mut() {
        residue.remove_atoms_by(|a| a.is_synthetic());
        residue
            .atoms_mut()
            .sort_by(|a, b| compare_atom_names(&a.name, &b.name));
        for atom in residue.atoms_mut() {
            atom.serial = serial;
            serial += 1;
        }
    }
}

fn compare_atom_names(name_a: &str, name_b: &str) -> Ordering {
    match atom_order_weight(name_a).cmp(&atom_order_weight(name_b)) {
        // Ties (both unknown) fall back to the name so the layout stays stable.
        Ordering::Equal => name_a.trim().cmp(name_b.trim()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Atom, Protein};
    use nalgebra::Point3;

    fn protein_with_shuffled_atoms() -> Protein {
        let mut protein = Protein::from_sequences(&[("A", "AS")]);
        let residue_atoms: [&[&str]; 2] = [&["CB", "O", "CA", "N", "C"], &["OG", "N", "CB", "CA"]];
        for (residue, names) in protein.residues_mut().zip(residue_atoms) {
            for name in names {
                residue.add_atom(Atom::new(name, Point3::origin()));
            }
        }
        protein
    }

    #[test]
    fn atoms_are_sorted_backbone_first_within_each_residue() {
        let mut protein = protein_with_shuffled_atoms();
        renumber_atoms(&mut protein);

        let first: Vec<&str> = protein.chains[0].residues[0]
            .atoms()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(first, vec!["N", "CA", "C", "O", "CB"]);
    }

    #[test]
    fn serials_run_consecutively_across_residues() {
        let mut protein = protein_with_shuffled_atoms();
        renumber_atoms(&mut protein);

        let serials: Vec<i32> = protein
            .residues()
            .flat_map(|r| r.atoms().iter().map(|a| a.serial))
            .collect();
        assert_eq!(serials, (1..=9).collect::<Vec<i32>>());
    }

    #[test]
    fn synthetic_atoms_do_not_survive_renumbering() {
        let mut protein = protein_with_shuffled_atoms();
        protein
            .chains[0]
            .residues[0]
            .add_atom(Atom::synthetic("H", Point3::origin()));
        renumber_atoms(&mut protein);

        assert!(protein.residues().all(|r| r.atom("H").is_none()));
    }
}
