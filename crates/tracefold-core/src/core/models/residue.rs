use super::atom::Atom;
use super::feature::FeatureType;
use std::collections::HashMap;
use std::str::FromStr;

/// The twenty canonical amino acids plus an unknown sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    GlutamicAcid,
    Glutamine,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
    /// Non-standard or unresolved residue identity.
    Unknown,
}

impl AminoAcid {
    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::GlutamicAcid => "GLU",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Histidine => "HIS",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Lysine => "LYS",
            AminoAcid::Methionine => "MET",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Proline => "PRO",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
            AminoAcid::Valine => "VAL",
            AminoAcid::Unknown => "UNK",
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Arginine => 'R',
            AminoAcid::Asparagine => 'N',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::Cysteine => 'C',
            AminoAcid::GlutamicAcid => 'E',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Glycine => 'G',
            AminoAcid::Histidine => 'H',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Lysine => 'K',
            AminoAcid::Methionine => 'M',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Proline => 'P',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Valine => 'V',
            AminoAcid::Unknown => 'X',
        }
    }

    pub fn from_one_letter(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'A' => AminoAcid::Alanine,
            'R' => AminoAcid::Arginine,
            'N' => AminoAcid::Asparagine,
            'D' => AminoAcid::AsparticAcid,
            'C' => AminoAcid::Cysteine,
            'E' => AminoAcid::GlutamicAcid,
            'Q' => AminoAcid::Glutamine,
            'G' => AminoAcid::Glycine,
            'H' => AminoAcid::Histidine,
            'I' => AminoAcid::Isoleucine,
            'L' => AminoAcid::Leucine,
            'K' => AminoAcid::Lysine,
            'M' => AminoAcid::Methionine,
            'F' => AminoAcid::Phenylalanine,
            'P' => AminoAcid::Proline,
            'S' => AminoAcid::Serine,
            'T' => AminoAcid::Threonine,
            'W' => AminoAcid::Tryptophan,
            'Y' => AminoAcid::Tyrosine,
            'V' => AminoAcid::Valine,
            _ => AminoAcid::Unknown,
        }
    }

    /// Heavy side-chain atom names beyond the backbone, in placement order.
    /// The lengths of these slices double as the per-amino-acid atom counts of
    /// the rotamer library records.
    pub fn sidechain_atom_names(&self) -> &'static [&'static str] {
        match self {
            AminoAcid::Glycine | AminoAcid::Unknown => &[],
            AminoAcid::Alanine => &["CB"],
            AminoAcid::Serine => &["CB", "OG"],
            AminoAcid::Cysteine => &["CB", "SG"],
            AminoAcid::Valine => &["CB", "CG1", "CG2"],
            AminoAcid::Threonine => &["CB", "OG1", "CG2"],
            AminoAcid::Isoleucine => &["CB", "CG1", "CG2", "CD1"],
            AminoAcid::Proline => &["CB", "CG", "CD"],
            AminoAcid::Methionine => &["CB", "CG", "SD", "CE"],
            AminoAcid::AsparticAcid => &["CB", "CG", "OD1", "OD2"],
            AminoAcid::Asparagine => &["CB", "CG", "OD1", "ND2"],
            AminoAcid::Leucine => &["CB", "CG", "CD1", "CD2"],
            AminoAcid::Lysine => &["CB", "CG", "CD", "CE", "NZ"],
            AminoAcid::GlutamicAcid => &["CB", "CG", "CD", "OE1", "OE2"],
            AminoAcid::Glutamine => &["CB", "CG", "CD", "OE1", "NE2"],
            AminoAcid::Arginine => &["CB", "CG", "CD", "NE", "CZ", "NH1", "NH2"],
            AminoAcid::Histidine => &["CB", "CG", "ND1", "CD2", "CE1", "NE2"],
            AminoAcid::Phenylalanine => &["CB", "CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
            AminoAcid::Tyrosine => &["CB", "CG", "CD1", "CD2", "CE1", "CE2", "CZ", "OH"],
            AminoAcid::Tryptophan => &[
                "CB", "CG", "CD1", "CD2", "NE1", "CE2", "CE3", "CZ2", "CZ3", "CH2",
            ],
        }
    }
}

impl FromStr for AminoAcid {
    type Err = ();

    /// Parses a 3-letter code; unknown codes map to the sentinel rather than
    /// an error, matching how parsed structures carry non-standard residues.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "ALA" => AminoAcid::Alanine,
            "ARG" => AminoAcid::Arginine,
            "ASN" => AminoAcid::Asparagine,
            "ASP" => AminoAcid::AsparticAcid,
            "CYS" => AminoAcid::Cysteine,
            "GLU" => AminoAcid::GlutamicAcid,
            "GLN" => AminoAcid::Glutamine,
            "GLY" => AminoAcid::Glycine,
            "HIS" => AminoAcid::Histidine,
            "ILE" => AminoAcid::Isoleucine,
            "LEU" => AminoAcid::Leucine,
            "LYS" => AminoAcid::Lysine,
            "MET" => AminoAcid::Methionine,
            "PHE" => AminoAcid::Phenylalanine,
            "PRO" => AminoAcid::Proline,
            "SER" => AminoAcid::Serine,
            "THR" => AminoAcid::Threonine,
            "TRP" => AminoAcid::Tryptophan,
            "TYR" => AminoAcid::Tyrosine,
            "VAL" => AminoAcid::Valine,
            _ => AminoAcid::Unknown,
        })
    }
}

/// A residue: amino-acid identity, ordered atoms and the per-residue feature
/// map written by the feature computation engine.
///
/// Invariant: at most one atom per distinct name. Atom order is the
/// serialization order.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub amino_acid: AminoAcid,
    atoms: Vec<Atom>,
    /// Feature values as `[raw, normalized]` pairs; the normalized slot is
    /// rewritten to [0, 1] by the engine after every annotator run.
    pub features: HashMap<FeatureType, [f64; 2]>,
    /// Running index over the whole protein, unique per chain layout.
    pub residue_id: usize,
    /// Residue number as found in the source structure.
    pub residue_number: isize,
}

impl Residue {
    pub fn new(amino_acid: AminoAcid, residue_id: usize, residue_number: isize) -> Self {
        Self {
            amino_acid,
            atoms: Vec::new(),
            features: HashMap::new(),
            residue_id,
            residue_number,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atom_mut(&mut self, name: &str) -> Option<&mut Atom> {
        self.atoms.iter_mut().find(|a| a.name == name)
    }

    /// Adds an atom, replacing any existing atom of the same name in place so
    /// the one-atom-per-name invariant holds.
    pub fn add_atom(&mut self, atom: Atom) {
        match self.atoms.iter_mut().find(|a| a.name == atom.name) {
            Some(existing) => *existing = atom,
            None => self.atoms.push(atom),
        }
    }

    pub fn remove_atoms_by<F: Fn(&Atom) -> bool>(&mut self, predicate: F) {
        self.atoms.retain(|a| !predicate(a));
    }

    pub fn clear_atoms(&mut self) {
        self.atoms.clear();
    }

    pub fn alpha_carbon(&self) -> Option<&Atom> {
        self.atom("CA")
    }

    /// Raw feature value, if the feature was computed.
    pub fn feature_raw(&self, feature: FeatureType) -> Option<f64> {
        self.features.get(&feature).map(|v| v[0])
    }

    /// Normalized feature value in [0, 1], if the feature was computed.
    pub fn feature_normalized(&self, feature: FeatureType) -> Option<f64> {
        self.features.get(&feature).map(|v| v[1])
    }
}
