use super::LibraryError;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::path::Path;

/// Width of a distance bin in Angstrom.
pub const BIN_SIZE: f64 = 0.2;
/// Smallest representable distance; shorter distances land in bin zero.
pub const BIN_OFFSET: f64 = 3.0;
/// Upper bound of the valid index range (inclusive).
pub const MAX_INDEX: i64 = 107_221;

/// Added to the index when the C-alpha quadrilateral is left-handed, so
/// mirrored geometries never share a bin with their right-handed twins.
const MIRROR_FLAG: i64 = 65_536;

/// Composite-index deltas of the bins surrounding a given bin, in probe
/// order. The first populated one wins; only then comes the exhaustive
/// fallback scan.
const NEIGHBOR_OFFSETS: [i64; 26] = [
    1, 32, 1024, 33, 31, 1025, 1023, 1056, 992, 1057, 1055, 993, 991, 2, 128, 2048, 130, 126,
    2050, 2046, 2176, 1920, 2178, 2174, 1922, 1918,
];

/// Backbone completion for one C-alpha quadrilateral: the carbonyl carbon
/// and oxygen of the window's second residue's predecessor peptide bond, the
/// amide nitrogen and the beta carbon of the second residue itself, all in
/// the window's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadrilateralEntry {
    pub carbon: Point3<f64>,
    pub oxygen: Point3<f64>,
    pub nitrogen: Point3<f64>,
    pub beta_carbon: Point3<f64>,
}

/// Lookup table from discretized C-alpha window geometry to backbone atom
/// placements.
///
/// The composite bin index packs three 5-bit distance bins (`d13`, `d24`,
/// `|d14|`) plus a handedness flag. Entries are kept in a sorted map so the
/// exhaustive fallback scan is deterministic.
#[derive(Debug, Clone, Default)]
pub struct QuadrilateralLibrary {
    entries: BTreeMap<i64, QuadrilateralEntry>,
}

/// Composite bin index for a C-alpha window described by its two 1-3
/// distances and the signed 1-4 distance. A negative `d14` marks a
/// left-handed window and sets the mirror flag.
pub fn bin_index(d13: f64, d24: f64, d14: f64) -> i64 {
    let i = ((d13 - BIN_OFFSET) / BIN_SIZE) as i64;
    let j = ((d24 - BIN_OFFSET) / BIN_SIZE) as i64;
    let (k, flag) = if d14 > 0.0 {
        (((d14 - BIN_OFFSET) / BIN_SIZE) as i64, 0)
    } else {
        (((-d14 - BIN_OFFSET) / BIN_SIZE) as i64, MIRROR_FLAG)
    };
    let mut index = flag + i;
    if k > 0 {
        index += (j << 5) + (k << 10);
    }
    index
}

/// Euclidean distance between two composite indices in bin units, measured
/// on the unpacked 5-bit fields. The mirror flag survives in the high bits
/// of the third field, keeping mirrored bins far from unmirrored ones.
fn bin_distance(a: i64, b: i64) -> f64 {
    let di = ((a & 0x1f) - (b & 0x1f)) as f64;
    let dj = (((a >> 5) & 0x1f) - ((b >> 5) & 0x1f)) as f64;
    let dk = ((a >> 10) - (b >> 10)) as f64;
    (di * di + dj * dj + dk * dk).sqrt()
}

impl QuadrilateralLibrary {
    /// Builds a library from pre-binned entries; later duplicates of an
    /// index are ignored.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, QuadrilateralEntry)>,
    {
        let mut map = BTreeMap::new();
        for (index, entry) in entries {
            map.entry(index).or_insert(entry);
        }
        Self { entries: map }
    }

    /// Loads a whitespace-delimited table: one entry per line, the composite
    /// index followed by twelve coordinates (C, O, N, CB as x y z triples).
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let display_path = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| LibraryError::Io {
            path: display_path.clone(),
            source: e,
        })?;

        let mut entries = BTreeMap::new();
        for (line_index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (index, entry) = parse_line(line).map_err(|reason| LibraryError::Parse {
                path: display_path.clone(),
                line: line_index + 1,
                reason,
            })?;
            entries.insert(index, entry);
        }

        if entries.is_empty() {
            return Err(LibraryError::Empty { path: display_path });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for the given composite index, or `None` for an unpopulated bin.
    pub fn entry(&self, index: i64) -> Option<&QuadrilateralEntry> {
        self.entries.get(&index)
    }

    /// Populated entry for a composite index: the exact bin if populated,
    /// otherwise the first populated bin of the surrounding neighborhood in
    /// [`NEIGHBOR_OFFSETS`] probe order, otherwise the populated bin with
    /// the smallest bin distance over the whole library (smallest index on
    /// ties). `None` only for an empty library.
    pub fn lookup(&self, index: i64) -> Option<&QuadrilateralEntry> {
        if let Some(entry) = self.entries.get(&index) {
            return Some(entry);
        }

        for offset in NEIGHBOR_OFFSETS {
            for candidate in [index + offset, index - offset] {
                if (0..=MAX_INDEX).contains(&candidate) {
                    if let Some(entry) = self.entries.get(&candidate) {
                        return Some(entry);
                    }
                }
            }
        }

        self.entries
            .iter()
            .min_by(|(a, _), (b, _)| {
                bin_distance(index, **a)
                    .partial_cmp(&bin_distance(index, **b))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.cmp(b))
            })
            .map(|(_, entry)| entry)
    }
}

fn parse_line(line: &str) -> Result<(i64, QuadrilateralEntry), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 13 {
        return Err(format!("expected 13 fields, found {}", fields.len()));
    }

    let index: i64 = fields[0]
        .parse()
        .map_err(|_| format!("invalid bin index '{}'", fields[0]))?;
    if !(0..=MAX_INDEX).contains(&index) {
        return Err(format!("bin index {index} out of range 0..={MAX_INDEX}"));
    }

    let mut coordinates = [0.0; 12];
    for (slot, field) in coordinates.iter_mut().zip(&fields[1..]) {
        *slot = field
            .parse()
            .map_err(|_| format!("invalid coordinate '{field}'"))?;
    }

    let point = |base: usize| Point3::new(coordinates[base], coordinates[base + 1], coordinates[base + 2]);
    Ok((
        index,
        QuadrilateralEntry {
            carbon: point(0),
            oxygen: point(3),
            nitrogen: point(6),
            beta_carbon: point(9),
        },
    ))
}
