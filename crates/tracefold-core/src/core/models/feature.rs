use super::motif::MotifDefinition;

/// Value domain of a feature, carried as data rather than a side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Arbitrary non-negative magnitudes (e.g. surface area in A^2).
    Continuous,
    /// Enum-backed classes; the raw value is the class ordinal.
    Discrete { cardinality: usize },
}

/// The annotatable per-residue properties.
///
/// Each variant declares the features it requires as input; the resulting
/// requirement graph is static and acyclic, which the feature engine verifies
/// once at registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    MotifAnnotation,
    SecondaryStructure,
    AccessibleSurfaceArea,
    MembraneTopology,
}

impl FeatureType {
    pub const ALL: [FeatureType; 4] = [
        FeatureType::MotifAnnotation,
        FeatureType::SecondaryStructure,
        FeatureType::AccessibleSurfaceArea,
        FeatureType::MembraneTopology,
    ];

    /// Features that must be available before this one can be computed.
    pub fn requirements(&self) -> &'static [FeatureType] {
        match self {
            FeatureType::MembraneTopology => &[FeatureType::AccessibleSurfaceArea],
            _ => &[],
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            // Class 0 means "no motif"; the definitions start at ordinal 1.
            FeatureType::MotifAnnotation => ValueKind::Discrete {
                cardinality: MotifDefinition::ALL.len() + 1,
            },
            FeatureType::SecondaryStructure => ValueKind::Discrete {
                cardinality: SecondaryStructure::ALL.len(),
            },
            FeatureType::AccessibleSurfaceArea => ValueKind::Continuous,
            FeatureType::MembraneTopology => ValueKind::Discrete { cardinality: 4 },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureType::MotifAnnotation => "MOTIF_ANNOTATION",
            FeatureType::SecondaryStructure => "SECONDARY_STRUCTURE",
            FeatureType::AccessibleSurfaceArea => "ACCESSIBLE_SURFACE_AREA",
            FeatureType::MembraneTopology => "MEMBRANE_TOPOLOGY",
        }
    }
}

/// Secondary structure classes in DSSP preference order: when assignments
/// compete for a residue, the later declaration wins. The derived `Ord`
/// therefore IS the tie-break rule and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecondaryStructure {
    Coil,
    Bend,
    Turn,
    PiHelix,
    ThreeTenHelix,
    Bridge,
    Extended,
    AlphaHelix,
}

impl SecondaryStructure {
    pub const ALL: [SecondaryStructure; 8] = [
        SecondaryStructure::Coil,
        SecondaryStructure::Bend,
        SecondaryStructure::Turn,
        SecondaryStructure::PiHelix,
        SecondaryStructure::ThreeTenHelix,
        SecondaryStructure::Bridge,
        SecondaryStructure::Extended,
        SecondaryStructure::AlphaHelix,
    ];

    pub fn is_helix(&self) -> bool {
        matches!(
            self,
            SecondaryStructure::PiHelix
                | SecondaryStructure::ThreeTenHelix
                | SecondaryStructure::AlphaHelix
        )
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }
}

/// Membrane topology classes assigned by the membrane annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MembraneTopology {
    #[default]
    Unknown,
    NonTransmembrane,
    Transition,
    Transmembrane,
}

impl MembraneTopology {
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_graph_is_acyclic() {
        // Walk every requirement chain; with four types a depth > 4 means a cycle.
        fn depth(feature: FeatureType, budget: usize) -> usize {
            assert!(budget > 0, "cycle in feature requirements");
            feature
                .requirements()
                .iter()
                .map(|r| 1 + depth(*r, budget - 1))
                .max()
                .unwrap_or(0)
        }
        for feature in FeatureType::ALL {
            assert!(depth(feature, FeatureType::ALL.len()) < FeatureType::ALL.len());
        }
    }

    #[test]
    fn membrane_topology_requires_surface_area() {
        assert_eq!(
            FeatureType::MembraneTopology.requirements(),
            &[FeatureType::AccessibleSurfaceArea]
        );
    }

    #[test]
    fn secondary_structure_ranking_follows_declaration_order() {
        assert!(SecondaryStructure::AlphaHelix > SecondaryStructure::Extended);
        assert!(SecondaryStructure::Extended > SecondaryStructure::Bridge);
        assert!(SecondaryStructure::ThreeTenHelix > SecondaryStructure::PiHelix);
        assert!(SecondaryStructure::Coil < SecondaryStructure::Bend);
    }

    #[test]
    fn helix_predicate_covers_all_three_helix_types() {
        assert!(SecondaryStructure::AlphaHelix.is_helix());
        assert!(SecondaryStructure::ThreeTenHelix.is_helix());
        assert!(SecondaryStructure::PiHelix.is_helix());
        assert!(!SecondaryStructure::Extended.is_helix());
        assert!(!SecondaryStructure::Turn.is_helix());
    }

    #[test]
    fn ordinals_round_trip_through_the_class_table() {
        for (index, class) in SecondaryStructure::ALL.iter().enumerate() {
            assert_eq!(class.ordinal(), index);
            assert_eq!(SecondaryStructure::from_ordinal(index), Some(*class));
        }
        assert_eq!(SecondaryStructure::from_ordinal(99), None);
    }
}
