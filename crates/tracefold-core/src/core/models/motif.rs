use super::feature::MembraneTopology;

/// The defined sequence motifs, named by start amino acid, end amino acid and
/// the sequence separation between them (e.g. GG4: glycine, glycine, four
/// positions apart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum MotifDefinition {
    GG4,
    GL3,
    GG7,
    AG7,
    GA7,
    AG4,
    AS4,
    AL6,
    PG9,
    GA4,
    SG4,
    AA7,
    AG5,
    LF8,
    AA3,
    PG5,
    PG6,
    IL4,
    GS5,
    VL4,
    PG10,
    LY6,
    LF10,
    SA6,
    LG5,
    SA3,
    GS4,
    IV4,
    GY8,
    LF9,
    VF8,
    VG6,
    GN4,
}

impl MotifDefinition {
    pub const ALL: [MotifDefinition; 33] = [
        MotifDefinition::GG4,
        MotifDefinition::GL3,
        MotifDefinition::GG7,
        MotifDefinition::AG7,
        MotifDefinition::GA7,
        MotifDefinition::AG4,
        MotifDefinition::AS4,
        MotifDefinition::AL6,
        MotifDefinition::PG9,
        MotifDefinition::GA4,
        MotifDefinition::SG4,
        MotifDefinition::AA7,
        MotifDefinition::AG5,
        MotifDefinition::LF8,
        MotifDefinition::AA3,
        MotifDefinition::PG5,
        MotifDefinition::PG6,
        MotifDefinition::IL4,
        MotifDefinition::GS5,
        MotifDefinition::VL4,
        MotifDefinition::PG10,
        MotifDefinition::LY6,
        MotifDefinition::LF10,
        MotifDefinition::SA6,
        MotifDefinition::LG5,
        MotifDefinition::SA3,
        MotifDefinition::GS4,
        MotifDefinition::IV4,
        MotifDefinition::GY8,
        MotifDefinition::LF9,
        MotifDefinition::VF8,
        MotifDefinition::VG6,
        MotifDefinition::GN4,
    ];

    fn name(&self) -> &'static str {
        match self {
            MotifDefinition::GG4 => "GG4",
            MotifDefinition::GL3 => "GL3",
            MotifDefinition::GG7 => "GG7",
            MotifDefinition::AG7 => "AG7",
            MotifDefinition::GA7 => "GA7",
            MotifDefinition::AG4 => "AG4",
            MotifDefinition::AS4 => "AS4",
            MotifDefinition::AL6 => "AL6",
            MotifDefinition::PG9 => "PG9",
            MotifDefinition::GA4 => "GA4",
            MotifDefinition::SG4 => "SG4",
            MotifDefinition::AA7 => "AA7",
            MotifDefinition::AG5 => "AG5",
            MotifDefinition::LF8 => "LF8",
            MotifDefinition::AA3 => "AA3",
            MotifDefinition::PG5 => "PG5",
            MotifDefinition::PG6 => "PG6",
            MotifDefinition::IL4 => "IL4",
            MotifDefinition::GS5 => "GS5",
            MotifDefinition::VL4 => "VL4",
            MotifDefinition::PG10 => "PG10",
            MotifDefinition::LY6 => "LY6",
            MotifDefinition::LF10 => "LF10",
            MotifDefinition::SA6 => "SA6",
            MotifDefinition::LG5 => "LG5",
            MotifDefinition::SA3 => "SA3",
            MotifDefinition::GS4 => "GS4",
            MotifDefinition::IV4 => "IV4",
            MotifDefinition::GY8 => "GY8",
            MotifDefinition::LF9 => "LF9",
            MotifDefinition::VF8 => "VF8",
            MotifDefinition::VG6 => "VG6",
            MotifDefinition::GN4 => "GN4",
        }
    }

    /// One-letter code of the motif's first residue.
    pub fn start_amino_acid(&self) -> char {
        self.name().as_bytes()[0] as char
    }

    /// One-letter code of the motif's last residue.
    pub fn end_amino_acid(&self) -> char {
        self.name().as_bytes()[1] as char
    }

    /// Sequence separation between start and end residue; the motif spans
    /// `length() + 1` residues.
    pub fn length(&self) -> usize {
        self.name()[2..].parse().expect("motif names end in digits")
    }
}

/// A sequence motif found in a chain, with its topology class when membrane
/// topology information was available at annotation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub definition: MotifDefinition,
    /// One-letter sequence covered by the motif, start to end inclusive.
    pub sequence: String,
    pub start_residue_id: usize,
    pub end_residue_id: usize,
    pub topology: MembraneTopology,
}
