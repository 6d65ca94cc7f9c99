use nalgebra::Point3;

/// Serial value marking atoms that exist only for the duration of an
/// algorithm (e.g. virtual backbone hydrogens synthesized for hydrogen-bond
/// detection). They are stripped before results are handed back and never
/// survive a serial reassignment.
pub const SYNTHETIC_SERIAL: i32 = i32::MIN;

/// A single atom, owned by exactly one [`super::Residue`].
///
/// Serial numbers are only meaningful after a canonical re-layout; they are
/// reassigned whenever a reconstruction step adds or replaces atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol (e.g. "C", "N", "O").
    pub element: String,
    /// PDB-style atom name (e.g. "CA", "OG1").
    pub name: String,
    /// Position in Angstroms.
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub temperature_factor: f64,
    /// PDB serial number; [`SYNTHETIC_SERIAL`] for transient atoms.
    pub serial: i32,
}

impl Atom {
    /// Creates an atom with neutral bookkeeping fields. The element symbol is
    /// derived from the leading alphabetic character of the name.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        let element = name
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_string())
            .unwrap_or_default();
        Self {
            element,
            name: name.to_string(),
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
            serial: 0,
        }
    }

    pub fn synthetic(name: &str, position: Point3<f64>) -> Self {
        Self {
            serial: SYNTHETIC_SERIAL,
            ..Self::new(name, position)
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.serial == SYNTHETIC_SERIAL
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == "H" || self.element == "D"
    }
}
