use super::LibraryError;
use crate::core::models::AminoAcid;
use nalgebra::Point3;
use serde::Deserialize;
use std::path::Path;

/// Width of a distance bin in Angstrom.
pub const BIN_SIZE: f64 = 0.3;
/// Offset and inclusive upper bin for the two 1-3 distances.
pub const D13_OFFSET: f64 = 4.6;
pub const D13_MAX_BIN: i64 = 9;
/// Offset and inclusive upper bin for the signed 1-4 distance.
pub const D14_OFFSET: f64 = 11.0;
pub const D14_MAX_BIN: i64 = 73;

/// Weight of the 1-4 bin in the lookup metric; backbone handedness matters
/// less than the two bend descriptors.
const D14_WEIGHT: f64 = 0.2;

/// One side-chain conformation: every side-chain heavy atom of one amino
/// acid in the local frame of its C-alpha window, keyed by the window's
/// discretized geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotamer {
    pub amino_acid: AminoAcid,
    pub bins: [i64; 3],
    pub atoms: Vec<(String, Point3<f64>)>,
}

/// Side-chain rotamer table.
///
/// Entries are scanned in file order; [`RotamerLibrary::lookup`] returns the
/// same-amino-acid entry with the smallest weighted Manhattan distance over
/// the three bin descriptors, first match winning ties.
#[derive(Debug, Clone, Default)]
pub struct RotamerLibrary {
    rotamers: Vec<Rotamer>,
}

/// Clamped bin descriptors for a C-alpha window: the two 1-3 distances and
/// the signed 1-4 distance. Out-of-range geometry saturates at the edge bins
/// so every finite window maps to a valid descriptor.
pub fn bin_descriptors(d13a: f64, d13b: f64, d14: f64) -> [i64; 3] {
    [
        (((d13a - D13_OFFSET) / BIN_SIZE) as i64).clamp(0, D13_MAX_BIN),
        (((d13b - D13_OFFSET) / BIN_SIZE) as i64).clamp(0, D13_MAX_BIN),
        (((d14 + D14_OFFSET) / BIN_SIZE) as i64).clamp(0, D14_MAX_BIN),
    ]
}

#[derive(Debug, Deserialize)]
struct RotamerRecord {
    amino_acid: char,
    rotamer: u32,
    bin13a: i64,
    bin13b: i64,
    bin14: i64,
    atom: String,
    x: f64,
    y: f64,
    z: f64,
}

impl RotamerLibrary {
    pub fn from_rotamers<I>(rotamers: I) -> Self
    where
        I: IntoIterator<Item = Rotamer>,
    {
        Self {
            rotamers: rotamers.into_iter().collect(),
        }
    }

    /// Loads a CSV table with one atom per record; consecutive records with
    /// the same amino acid and rotamer id form one conformation.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let display_path = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| LibraryError::Csv {
            path: display_path.clone(),
            source: e,
        })?;

        let mut rotamers: Vec<Rotamer> = Vec::new();
        let mut current_key: Option<(char, u32)> = None;
        for (record_index, result) in reader.deserialize::<RotamerRecord>().enumerate() {
            let record = result.map_err(|e| LibraryError::Csv {
                path: display_path.clone(),
                source: e,
            })?;
            validate_record(&record).map_err(|reason| LibraryError::Parse {
                path: display_path.clone(),
                line: record_index + 2,
                reason,
            })?;

            let key = (record.amino_acid, record.rotamer);
            if current_key != Some(key) {
                current_key = Some(key);
                rotamers.push(Rotamer {
                    amino_acid: AminoAcid::from_one_letter(record.amino_acid),
                    bins: [record.bin13a, record.bin13b, record.bin14],
                    atoms: Vec::new(),
                });
            }
            // current_key was just set, so the vector is non-empty here.
            if let Some(rotamer) = rotamers.last_mut() {
                rotamer
                    .atoms
                    .push((record.atom, Point3::new(record.x, record.y, record.z)));
            }
        }

        if rotamers.is_empty() {
            return Err(LibraryError::Empty { path: display_path });
        }
        Ok(Self { rotamers })
    }

    pub fn len(&self) -> usize {
        self.rotamers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotamers.is_empty()
    }

    /// Best-matching rotamer for the amino acid and bin descriptors, by
    /// weighted Manhattan distance over the bins. `None` only when the
    /// library holds no conformation for this amino acid at all.
    pub fn lookup(&self, amino_acid: AminoAcid, bins: [i64; 3]) -> Option<&Rotamer> {
        let mut best: Option<(f64, &Rotamer)> = None;
        for rotamer in &self.rotamers {
            if rotamer.amino_acid != amino_acid {
                continue;
            }
            let distance = (rotamer.bins[0] - bins[0]).abs() as f64
                + (rotamer.bins[1] - bins[1]).abs() as f64
                + D14_WEIGHT * (rotamer.bins[2] - bins[2]).abs() as f64;
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, rotamer));
            }
        }
        best.map(|(_, rotamer)| rotamer)
    }
}

fn validate_record(record: &RotamerRecord) -> Result<(), String> {
    let amino_acid = AminoAcid::from_one_letter(record.amino_acid);
    if amino_acid == AminoAcid::Unknown {
        return Err(format!("unknown amino acid code '{}'", record.amino_acid));
    }
    if !(0..=D13_MAX_BIN).contains(&record.bin13a) || !(0..=D13_MAX_BIN).contains(&record.bin13b) {
        return Err(format!(
            "1-3 bins ({}, {}) out of range 0..={D13_MAX_BIN}",
            record.bin13a, record.bin13b
        ));
    }
    if !(0..=D14_MAX_BIN).contains(&record.bin14) {
        return Err(format!(
            "1-4 bin {} out of range 0..={D14_MAX_BIN}",
            record.bin14
        ));
    }
    Ok(())
}
