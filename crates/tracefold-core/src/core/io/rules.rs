use phf::{Map, phf_map};

/// Canonical within-residue atom order: backbone (N, CA, C, O) first, then
/// side-chain atoms walking outward from CB. Unlisted names sort last.
pub static ATOM_ORDER_WEIGHTS: Map<&'static str, i32> = phf_map! {
    "N" => 10,
    "H" => 15, "H1" => 16, "H2" => 17, "H3" => 18,
    "CA" => 20,
    "HA" => 25, "HA2" => 26, "HA3" => 27,
    "C" => 30,
    "O" => 40, "OXT" => 45,
    "CB" => 110,
    "HB" => 115, "HB1" => 116, "HB2" => 117, "HB3" => 118,
    "CG" => 210, "CG1" => 220, "CG2" => 230, "OG" => 240, "OG1" => 250, "SG" => 260,
    "CD" => 310, "CD1" => 320, "CD2" => 330, "ND1" => 340, "ND2" => 350,
    "OD1" => 360, "OD2" => 370, "SD" => 380,
    "CE" => 410, "CE1" => 420, "CE2" => 430, "CE3" => 440,
    "NE" => 450, "NE1" => 460, "NE2" => 470, "OE1" => 480, "OE2" => 490,
    "CZ" => 510, "CZ2" => 520, "CZ3" => 530, "NZ" => 540,
    "CH2" => 610, "NH1" => 620, "NH2" => 630, "OH" => 640,
};

pub fn atom_order_weight(name: &str) -> i32 {
    ATOM_ORDER_WEIGHTS
        .get(name.trim())
        .copied()
        .unwrap_or(i32::MAX)
}
