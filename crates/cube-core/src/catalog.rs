//! Algorithm catalog.
//!
//! Named solving cases grouped into families. OLL and PLL carry the full
//! canonical tables; the extended families (COLL, ZBLL, OLLCP, WV) are
//! synthesized by composing edge-oriented OLL cases with permutation cases,
//! so every catalog sequence is a genuine solving sequence built from
//! verified primitives.

use serde::{Deserialize, Serialize};

use crate::moves::{MoveError, MoveSeq};

/// Algorithm family. Families overlap in the states they address; the phase
/// detector decides which are applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    #[serde(rename = "OLL")]
    Oll,
    #[serde(rename = "PLL")]
    Pll,
    #[serde(rename = "COLL")]
    Coll,
    #[serde(rename = "ZBLL")]
    Zbll,
    #[serde(rename = "OLLCP")]
    Ollcp,
    #[serde(rename = "F2L")]
    F2l,
    #[serde(rename = "WV")]
    Wv,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::Oll,
        Family::Pll,
        Family::Coll,
        Family::Zbll,
        Family::Ollcp,
        Family::F2l,
        Family::Wv,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Family::Oll => "OLL",
            Family::Pll => "PLL",
            Family::Coll => "COLL",
            Family::Zbll => "ZBLL",
            Family::Ollcp => "OLLCP",
            Family::F2l => "F2L",
            Family::Wv => "WV",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A named case with its canonical solving sequence. Synthesized families
/// carry the subset they were branched from (the corner-pattern letter for
/// COLL/ZBLL/WV, the source OLL number for OLLCP).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmCase {
    pub family: Family,
    pub name: String,
    pub subset: Option<String>,
    pub solution: MoveSeq,
}

// ==================== Canonical tables ====================

/// Orientation of the last layer: 57 numbered cases plus the two common
/// aliases for 26/27.
const OLL_ALGS: [(&str, &str); 59] = [
    ("OLL 1", "R U2 R2 F R F' U2 R' F R F'"),
    ("OLL 2", "F R U R' U' F' f R U R' U' f'"),
    ("OLL 3", "f R U R' U' f' U' F R U R' U' F'"),
    ("OLL 4", "f R U R' U' f' U F R U R' U' F'"),
    ("OLL 5", "r' U2 R U R' U r"),
    ("OLL 6", "r U2 R' U' R U' r'"),
    ("OLL 7", "r U R' U R U2 r'"),
    ("OLL 8", "r' U' R U' R' U2 r"),
    ("OLL 9", "R U R' U' R' F R2 U R' U' F'"),
    ("OLL 10", "R U R' U R' F R F' R U2 R'"),
    ("OLL 11", "r U R' U R' F R F' R U2 r'"),
    ("OLL 12", "M' R' U' R U' R' U2 R U' R r'"),
    ("OLL 13", "F U R U' R2 F' R U R U' R'"),
    ("OLL 14", "R' F R U R' F' R F U' F'"),
    ("OLL 15", "r' U' r R' U' R U r' U r"),
    ("OLL 16", "r U r' R U R' U' r U' r'"),
    ("OLL 17", "R U R' U R' F R F' U2 R' F R F'"),
    ("OLL 18", "r U R' U R U2 r2 U' R U' R' U2 r"),
    ("OLL 19", "M U R U R' U' M' R' F R F'"),
    ("OLL 20", "M U R U R' U' M2 U R U' r'"),
    ("OLL 21", "R U2 R' U' R U R' U' R U' R'"),
    ("OLL 22", "R U2 R2 U' R2 U' R2 U2 R"),
    ("OLL 23", "R2 D' R U2 R' D R U2 R"),
    ("OLL 24", "r U R' U' r' F R F'"),
    ("OLL 25", "F' r U R' U' r' F R"),
    ("OLL 26", "R U2 R' U' R U' R'"),
    ("OLL 27", "R U R' U R U2 R'"),
    ("OLL 28", "r U R' U' r' R U R U' R'"),
    ("OLL 29", "R U R' U' R U' R' F' U' F R U R'"),
    ("OLL 30", "F R' F R2 U' R' U' R U R' F2"),
    ("OLL 31", "R' U' F U R U' R' F' R"),
    ("OLL 32", "L U F' U' L' U L F L'"),
    ("OLL 33", "R U R' U' R' F R F'"),
    ("OLL 34", "R U R2 U' R' F R U R U' F'"),
    ("OLL 35", "R U2 R2 F R F' R U2 R'"),
    ("OLL 36", "L' U' L U' L' U L U L F' L' F"),
    ("OLL 37", "F R U' R' U' R U R' F'"),
    ("OLL 38", "R U R' U R U' R' U' R' F R F'"),
    ("OLL 39", "L F' L' U' L U F U' L'"),
    ("OLL 40", "R' F R U R' U' F' U R"),
    ("OLL 41", "R U R' U R U2 R' F R U R' U' F'"),
    ("OLL 42", "R' U' R U' R' U2 R F R U R' U' F'"),
    ("OLL 43", "F' U' L' U L F"),
    ("OLL 44", "F U R U' R' F'"),
    ("OLL 45", "F R U R' U' F'"),
    ("OLL 46", "R' U' R' F R F' U R"),
    ("OLL 47", "R' U' R' F R F' R' F R F' U R"),
    ("OLL 48", "F R U R' U' R U R' U' F'"),
    ("OLL 49", "r U' r2 U r2 U r2 U' r"),
    ("OLL 50", "r' U r2 U' r2 U' r2 U r'"),
    ("OLL 51", "f R U R' U' R U R' U' f'"),
    ("OLL 52", "R' F' U' F U' R U R' U R"),
    ("OLL 53", "r' U' R U' R' U R U' R' U2 r"),
    ("OLL 54", "r U R' U R U' R' U R U2 r'"),
    ("OLL 55", "R U2 R2 U' R U' R' U2 F R F'"),
    ("OLL 56", "r U r' U R U' R' U R U' R' r U' r'"),
    ("OLL 57", "R U R' U' M' U R U' r'"),
    ("Sune", "R U R' U R U2 R'"),
    ("Anti-Sune", "R U2 R' U' R U' R'"),
];

/// Permutation of the last layer: 21 cases including the empty `Solved`
/// case, which lets a bare top-face correction count as a match.
const PLL_ALGS: [(&str, &str); 21] = [
    ("T-Perm", "R U R' U' R' F R2 U' R' U' R U R' F'"),
    ("J-Perm (a)", "x R2 F R F' R U2 r' U r U2 x'"),
    ("J-Perm (b)", "R U R' F' R U R' U' R' F R2 U' R'"),
    ("F-Perm", "R' U' F' R U R' U' R' F R2 U' R' U' R U R' U R"),
    ("R-Perm (a)", "R U' R' U' R U R D R' U' R D' R' U2 R'"),
    ("R-Perm (b)", "R' U2 R U2 R' F R U R' U' R' F' R2"),
    ("Y-Perm", "F R U' R' U' R U R' F' R U R' U' R' F R F'"),
    ("V-Perm", "R' U R' U' y R' F' R2 U' R' U R' F R F"),
    ("N-Perm (a)", "R U R' U R U R' F' R U R' U' R' F R2 U' R' U2 R U' R'"),
    ("N-Perm (b)", "R' U R U' R' F' U' F R U R' F R' F' R U' R"),
    ("U-Perm (a)", "R2 U R U R' U' R' U' R' U R'"),
    ("U-Perm (b)", "R' U R' U' R' U' R' U R U R2"),
    ("Z-Perm", "M2 U M2 U M' U2 M2 U2 M' U2"),
    ("H-Perm", "M2 U M2 U2 M2 U M2"),
    ("A-Perm (a)", "x R' U R' D2 R U' R' D2 R2 x'"),
    ("A-Perm (b)", "x R2 D2 R U R' D2 R U' R x'"),
    ("G-Perm (a)", "R2 U R' U R' U' R U' R2 D U' R' U R D'"),
    ("G-Perm (b)", "R' U' R U D' R2 U R' U R U' R U' R2 D"),
    ("G-Perm (c)", "R2 U' R U' R U R' U R2 D' U R U' R' D"),
    ("G-Perm (d)", "R U R' U' D R2 U' R U' R' U R' U R2 D'"),
    ("Solved", ""),
];

/// The seven OLL cases with all last-layer edges already oriented, by their
/// conventional corner-pattern letter. These seed the COLL/ZBLL/WV families.
const EDGE_ORIENTED_BASES: [(&str, &str); 7] = [
    ("H", "R U2 R' U' R U R' U' R U' R'"),
    ("Pi", "R U2 R2 U' R2 U' R2 U2 R"),
    ("U", "R2 D' R U2 R' D R U2 R"),
    ("T", "r U R' U' r' F R F'"),
    ("L", "F' r U R' U' r' F R"),
    ("AS", "R U2 R' U' R U' R'"),
    ("S", "R U R' U R U2 R'"),
];

/// Basic first-two-layers pair insertions.
const F2L_ALGS: [(&str, &str); 6] = [
    ("F2L 1", "U R U' R'"),
    ("F2L 2", "U' F' U F"),
    ("F2L 3", "F' U' F"),
    ("F2L 4", "R U R'"),
    ("F2L 5", "U' R U R' U R U R'"),
    ("F2L 6", "U' R U' R' U R U R'"),
];

/// Corner-permutation tails used to branch the orientation bases into full
/// COLL/OLLCP cases.
const CORNER_PERMS: [&str; 3] = [
    "",
    "x R' U R' D2 R U' R' D2 R2 x'",
    "x R2 D2 R U R' D2 R U' R x'",
];

// ==================== Construction ====================

fn from_table(family: Family, table: &[(&str, &str)]) -> Result<Vec<AlgorithmCase>, MoveError> {
    table
        .iter()
        .map(|&(name, alg)| {
            Ok(AlgorithmCase {
                family,
                name: name.to_string(),
                subset: None,
                solution: MoveSeq::parse(alg)?,
            })
        })
        .collect()
}

fn coll_cases() -> Result<Vec<AlgorithmCase>, MoveError> {
    let mut cases = Vec::new();
    for (set, base) in EDGE_ORIENTED_BASES {
        let base = MoveSeq::parse(base)?;
        for (i, perm) in CORNER_PERMS.iter().enumerate() {
            cases.push(AlgorithmCase {
                family: Family::Coll,
                name: format!("COLL {set} {}", i + 1),
                subset: Some(set.to_string()),
                solution: base.then(&MoveSeq::parse(perm)?),
            });
        }
    }
    Ok(cases)
}

fn zbll_cases() -> Result<Vec<AlgorithmCase>, MoveError> {
    let mut cases = Vec::new();
    for (set, base) in EDGE_ORIENTED_BASES {
        let base = MoveSeq::parse(base)?;
        for (i, (_, pll)) in PLL_ALGS.iter().enumerate() {
            cases.push(AlgorithmCase {
                family: Family::Zbll,
                name: format!("ZBLL {set} {}", i + 1),
                subset: Some(set.to_string()),
                solution: base.then(&MoveSeq::parse(pll)?),
            });
        }
    }
    Ok(cases)
}

fn ollcp_cases() -> Result<Vec<AlgorithmCase>, MoveError> {
    let mut cases = Vec::new();
    for (name, alg) in OLL_ALGS {
        // The aliases duplicate OLL 26/27; skip them here.
        let Some(number) = name.strip_prefix("OLL ") else {
            continue;
        };
        let base = MoveSeq::parse(alg)?;
        for (i, perm) in CORNER_PERMS.iter().enumerate() {
            cases.push(AlgorithmCase {
                family: Family::Ollcp,
                name: format!("OLLCP {number}-{}", i + 1),
                subset: Some(number.to_string()),
                solution: base.then(&MoveSeq::parse(perm)?),
            });
        }
    }
    Ok(cases)
}

fn wv_cases() -> Result<Vec<AlgorithmCase>, MoveError> {
    let insert = MoveSeq::parse("R U R'")?;
    let mut cases = vec![AlgorithmCase {
        family: Family::Wv,
        name: "WV 1".to_string(),
        subset: None,
        solution: insert.clone(),
    }];
    for (i, (set, base)) in EDGE_ORIENTED_BASES.iter().enumerate() {
        cases.push(AlgorithmCase {
            family: Family::Wv,
            name: format!("WV {}", i + 2),
            subset: Some(set.to_string()),
            solution: insert.then(&MoveSeq::parse(base)?),
        });
    }
    Ok(cases)
}

/// All cases of one family. Built on demand; callers cache the expanded
/// lookup tables, not the raw catalog.
pub fn cases(family: Family) -> Result<Vec<AlgorithmCase>, MoveError> {
    match family {
        Family::Oll => from_table(Family::Oll, &OLL_ALGS),
        Family::Pll => from_table(Family::Pll, &PLL_ALGS),
        Family::Coll => coll_cases(),
        Family::Zbll => zbll_cases(),
        Family::Ollcp => ollcp_cases(),
        Family::F2l => from_table(Family::F2l, &F2L_ALGS),
        Family::Wv => wv_cases(),
    }
}

/// Look up one case by name across all families.
pub fn case_by_name(name: &str) -> Result<Option<AlgorithmCase>, MoveError> {
    for family in Family::ALL {
        if let Some(case) = cases(family)?.into_iter().find(|c| c.name == name) {
            return Ok(Some(case));
        }
    }
    Ok(None)
}
