//! Symmetry expander.
//!
//! A catalog case stores a solving sequence. The scrambled state it
//! addresses is the inverse of that sequence applied to a solved cube.
//! Because an observer may hold the cube in any of 24 whole-cube
//! orientations and the top layer may sit in any of 4 positions, every case
//! expands into an orbit of 24 × 4 = 96 concrete states. Each orbit member
//! carries the correction to apply before the solving sequence.

use crate::moves::{MoveError, MoveSeq};
use crate::state::CubeState;

/// Rotation sequences reaching each of the six faces-on-top positions.
const TOP_ROTATIONS: [&str; 6] = ["", "x2", "x'", "x", "z'", "z"];

/// Spins around the vertical axis, applied after the top rotation.
const Y_SPINS: [&str; 4] = ["", "y", "y2", "y'"];

/// Top-layer pre-turn and the correction undoing it, as (turn, correction).
const AUF_TURNS: [(&str, &str); 4] = [("", ""), ("U", "U'"), ("U2", "U2"), ("U'", "U")];

/// One concrete scrambled state in a case's orbit, with the move sequence
/// to apply before the case's solving sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitMember {
    pub state: CubeState,
    pub correction: MoveSeq,
}

/// The 24 whole-cube orientation sequences.
pub fn orientations() -> Result<Vec<MoveSeq>, MoveError> {
    let mut out = Vec::with_capacity(24);
    for top in TOP_ROTATIONS {
        for spin in Y_SPINS {
            let notation = format!("{top} {spin}");
            out.push(MoveSeq::parse(notation.trim())?);
        }
    }
    Ok(out)
}

/// The 4 top-layer adjustments as (turn, correction) sequence pairs.
pub fn auf_variants() -> Result<Vec<(MoveSeq, MoveSeq)>, MoveError> {
    AUF_TURNS
        .iter()
        .map(|&(turn, correction)| Ok((MoveSeq::parse(turn)?, MoveSeq::parse(correction)?)))
        .collect()
}

/// Expand one solving sequence into its full 96-member orbit. For every
/// member, `state → correction → solution` ends solved.
pub fn expand_case(solution: &MoveSeq) -> Result<Vec<OrbitMember>, MoveError> {
    let scramble = solution.inverse();
    let mut members = Vec::with_capacity(96);
    for orientation in orientations()? {
        let scrambled = CubeState::solved()
            .apply_seq(&orientation)
            .apply_seq(&scramble);
        for (turn, correction) in auf_variants()? {
            members.push(OrbitMember {
                state: scrambled.apply_seq(&turn),
                correction,
            });
        }
    }
    Ok(members)
}
