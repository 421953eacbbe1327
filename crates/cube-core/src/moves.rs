//! Move engine.
//!
//! Base quarter-turns are fixed 4-cycle permutations over global facelet
//! indices. Everything else is compositional: counter-clockwise is three
//! clockwise applications, a double turn is two, wide turns are a face turn
//! plus the adjacent slice, and whole-cube rotations are built from face and
//! slice turns. No composite carries its own permutation table.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::state::{CubeState, Face};

/// Error raised by the move grammar. Unknown tokens are rejected outright;
/// there are no silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("unknown move token `{0}`")]
    UnknownMove(String),
}

/// Middle-layer slice turns. `M` follows `L`, `E` follows `D`, `S` follows `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    M,
    E,
    S,
}

/// Whole-cube rotation axes. `x` follows `R`, `y` follows `U`, `z` follows `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The base of a move token, before the turn suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Face(Face),
    Slice(Slice),
    Wide(Face),
    Rotation(Axis),
}

/// Turn amount: a quarter turn clockwise, a half turn, or a quarter turn
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    Half,
    Counter,
}

impl Turn {
    fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::Counter,
            Turn::Half => Turn::Half,
            Turn::Counter => Turn::Clockwise,
        }
    }

    /// Number of clockwise quarter-turn applications.
    fn repetitions(self) -> usize {
        match self {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::Counter => 3,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::Counter => "'",
        }
    }
}

/// A single parsed move token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub kind: MoveKind,
    pub turn: Turn,
}

impl Move {
    /// Parse one token of standard notation: a base from
    /// `U D F B L R M S E u d f b l r x y z` with an optional `'` or `2`
    /// suffix.
    pub fn parse(token: &str) -> Result<Move, MoveError> {
        let (base, turn) = if let Some(stripped) = token.strip_suffix('\'') {
            (stripped, Turn::Counter)
        } else if let Some(stripped) = token.strip_suffix('2') {
            (stripped, Turn::Half)
        } else {
            (token, Turn::Clockwise)
        };
        let kind = match base {
            "U" => MoveKind::Face(Face::Up),
            "D" => MoveKind::Face(Face::Down),
            "F" => MoveKind::Face(Face::Front),
            "B" => MoveKind::Face(Face::Back),
            "L" => MoveKind::Face(Face::Left),
            "R" => MoveKind::Face(Face::Right),
            "M" => MoveKind::Slice(Slice::M),
            "E" => MoveKind::Slice(Slice::E),
            "S" => MoveKind::Slice(Slice::S),
            "u" => MoveKind::Wide(Face::Up),
            "d" => MoveKind::Wide(Face::Down),
            "f" => MoveKind::Wide(Face::Front),
            "b" => MoveKind::Wide(Face::Back),
            "l" => MoveKind::Wide(Face::Left),
            "r" => MoveKind::Wide(Face::Right),
            "x" => MoveKind::Rotation(Axis::X),
            "y" => MoveKind::Rotation(Axis::Y),
            "z" => MoveKind::Rotation(Axis::Z),
            _ => return Err(MoveError::UnknownMove(token.to_string())),
        };
        Ok(Move { kind, turn })
    }

    /// The move undoing this one.
    pub fn inverse(self) -> Move {
        Move {
            kind: self.kind,
            turn: self.turn.inverse(),
        }
    }

    fn base_str(self) -> &'static str {
        match self.kind {
            MoveKind::Face(Face::Up) => "U",
            MoveKind::Face(Face::Down) => "D",
            MoveKind::Face(Face::Front) => "F",
            MoveKind::Face(Face::Back) => "B",
            MoveKind::Face(Face::Left) => "L",
            MoveKind::Face(Face::Right) => "R",
            MoveKind::Slice(Slice::M) => "M",
            MoveKind::Slice(Slice::E) => "E",
            MoveKind::Slice(Slice::S) => "S",
            MoveKind::Wide(Face::Up) => "u",
            MoveKind::Wide(Face::Down) => "d",
            MoveKind::Wide(Face::Front) => "f",
            MoveKind::Wide(Face::Back) => "b",
            MoveKind::Wide(Face::Left) => "l",
            MoveKind::Wide(Face::Right) => "r",
            MoveKind::Rotation(Axis::X) => "x",
            MoveKind::Rotation(Axis::Y) => "y",
            MoveKind::Rotation(Axis::Z) => "z",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base_str(), self.turn.suffix())
    }
}

/// A whitespace-separated sequence of moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MoveSeq(Vec<Move>);

impl MoveSeq {
    pub fn new(moves: Vec<Move>) -> MoveSeq {
        MoveSeq(moves)
    }

    pub fn empty() -> MoveSeq {
        MoveSeq(Vec::new())
    }

    /// Parse a whitespace-separated sequence of tokens. The empty string is
    /// the empty sequence.
    pub fn parse(notation: &str) -> Result<MoveSeq, MoveError> {
        notation
            .split_whitespace()
            .map(Move::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(MoveSeq)
    }

    /// The sequence undoing this one: reversed order, each move inverted.
    pub fn inverse(&self) -> MoveSeq {
        MoveSeq(self.0.iter().rev().map(|m| m.inverse()).collect())
    }

    /// This sequence followed by `other`.
    pub fn then(&self, other: &MoveSeq) -> MoveSeq {
        let mut moves = self.0.clone();
        moves.extend_from_slice(&other.0);
        MoveSeq(moves)
    }

    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for MoveSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

// Sequences serialize as their notation string so solve paths stay readable
// in JSON output.
impl Serialize for MoveSeq {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MoveSeq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<MoveSeq, D::Error> {
        let s = String::deserialize(deserializer)?;
        MoveSeq::parse(&s).map_err(D::Error::custom)
    }
}

// ==================== Permutation tables ====================
//
// Each table lists 4-cycles over global facelet indices for one clockwise
// quarter turn, in the convention new[cycle[i+1]] = old[cycle[i]].

const fn fi(face: usize, pos: usize) -> usize {
    face * 9 + pos
}

// Face indices in global order.
const U: usize = 0;
const D: usize = 1;
const F: usize = 2;
const B: usize = 3;
const L: usize = 4;
const R: usize = 5;

const fn own_face(face: usize) -> [[usize; 4]; 2] {
    [
        [fi(face, 0), fi(face, 2), fi(face, 8), fi(face, 6)],
        [fi(face, 1), fi(face, 5), fi(face, 7), fi(face, 3)],
    ]
}

const U_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(U),
    [
        [fi(F, 0), fi(L, 0), fi(B, 0), fi(R, 0)],
        [fi(F, 1), fi(L, 1), fi(B, 1), fi(R, 1)],
        [fi(F, 2), fi(L, 2), fi(B, 2), fi(R, 2)],
    ],
);

const D_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(D),
    [
        [fi(F, 6), fi(R, 6), fi(B, 6), fi(L, 6)],
        [fi(F, 7), fi(R, 7), fi(B, 7), fi(L, 7)],
        [fi(F, 8), fi(R, 8), fi(B, 8), fi(L, 8)],
    ],
);

const F_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(F),
    [
        [fi(U, 6), fi(R, 0), fi(D, 2), fi(L, 8)],
        [fi(U, 7), fi(R, 3), fi(D, 1), fi(L, 5)],
        [fi(U, 8), fi(R, 6), fi(D, 0), fi(L, 2)],
    ],
);

const B_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(B),
    [
        [fi(U, 0), fi(L, 6), fi(D, 8), fi(R, 2)],
        [fi(U, 1), fi(L, 3), fi(D, 7), fi(R, 5)],
        [fi(U, 2), fi(L, 0), fi(D, 6), fi(R, 8)],
    ],
);

const L_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(L),
    [
        [fi(U, 0), fi(F, 0), fi(D, 0), fi(B, 8)],
        [fi(U, 3), fi(F, 3), fi(D, 3), fi(B, 5)],
        [fi(U, 6), fi(F, 6), fi(D, 6), fi(B, 2)],
    ],
);

const R_CYCLES: ([[usize; 4]; 2], [[usize; 4]; 3]) = (
    own_face(R),
    [
        [fi(U, 2), fi(B, 6), fi(D, 2), fi(F, 2)],
        [fi(U, 5), fi(B, 3), fi(D, 5), fi(F, 5)],
        [fi(U, 8), fi(B, 0), fi(D, 8), fi(F, 8)],
    ],
);

// Slices have no own-face rotation.
const M_CYCLES: [[usize; 4]; 3] = [
    [fi(U, 1), fi(F, 1), fi(D, 1), fi(B, 7)],
    [fi(U, 4), fi(F, 4), fi(D, 4), fi(B, 4)],
    [fi(U, 7), fi(F, 7), fi(D, 7), fi(B, 1)],
];

const E_CYCLES: [[usize; 4]; 3] = [
    [fi(F, 3), fi(R, 3), fi(B, 3), fi(L, 3)],
    [fi(F, 4), fi(R, 4), fi(B, 4), fi(L, 4)],
    [fi(F, 5), fi(R, 5), fi(B, 5), fi(L, 5)],
];

const S_CYCLES: [[usize; 4]; 3] = [
    [fi(U, 3), fi(R, 1), fi(D, 5), fi(L, 7)],
    [fi(U, 4), fi(R, 4), fi(D, 4), fi(L, 4)],
    [fi(U, 5), fi(R, 7), fi(D, 3), fi(L, 1)],
];

fn face_cycles(face: Face) -> &'static ([[usize; 4]; 2], [[usize; 4]; 3]) {
    match face {
        Face::Up => &U_CYCLES,
        Face::Down => &D_CYCLES,
        Face::Front => &F_CYCLES,
        Face::Back => &B_CYCLES,
        Face::Left => &L_CYCLES,
        Face::Right => &R_CYCLES,
    }
}

fn slice_cycles(slice: Slice) -> &'static [[usize; 4]; 3] {
    match slice {
        Slice::M => &M_CYCLES,
        Slice::E => &E_CYCLES,
        Slice::S => &S_CYCLES,
    }
}

/// The slice accompanying a wide turn, with the direction it turns when the
/// wide turn is clockwise.
fn wide_partner(face: Face) -> (Slice, Turn) {
    match face {
        Face::Right => (Slice::M, Turn::Counter),
        Face::Left => (Slice::M, Turn::Clockwise),
        Face::Up => (Slice::E, Turn::Counter),
        Face::Down => (Slice::E, Turn::Clockwise),
        Face::Front => (Slice::S, Turn::Clockwise),
        Face::Back => (Slice::S, Turn::Counter),
    }
}

// ==================== Application ====================

impl CubeState {
    fn permute(&self, cycles: &[[usize; 4]]) -> CubeState {
        let mut out = self.clone();
        let dst = out.facelets_mut();
        for cycle in cycles {
            for i in 0..4 {
                dst[cycle[(i + 1) % 4]] = self.facelets()[cycle[i]];
            }
        }
        out
    }

    fn apply_clockwise(&self, kind: MoveKind) -> CubeState {
        match kind {
            MoveKind::Face(face) => {
                let (own, sides) = face_cycles(face);
                self.permute(own).permute(sides)
            }
            MoveKind::Slice(slice) => self.permute(slice_cycles(slice)),
            MoveKind::Wide(face) => {
                let (slice, turn) = wide_partner(face);
                self.apply_clockwise(MoveKind::Face(face)).apply(Move {
                    kind: MoveKind::Slice(slice),
                    turn,
                })
            }
            MoveKind::Rotation(axis) => match axis {
                // x = R M' L'
                Axis::X => self
                    .apply_clockwise(MoveKind::Face(Face::Right))
                    .apply(Move {
                        kind: MoveKind::Slice(Slice::M),
                        turn: Turn::Counter,
                    })
                    .apply(Move {
                        kind: MoveKind::Face(Face::Left),
                        turn: Turn::Counter,
                    }),
                // y = U E' D'
                Axis::Y => self
                    .apply_clockwise(MoveKind::Face(Face::Up))
                    .apply(Move {
                        kind: MoveKind::Slice(Slice::E),
                        turn: Turn::Counter,
                    })
                    .apply(Move {
                        kind: MoveKind::Face(Face::Down),
                        turn: Turn::Counter,
                    }),
                // z = F S B'
                Axis::Z => self
                    .apply_clockwise(MoveKind::Face(Face::Front))
                    .apply(Move {
                        kind: MoveKind::Slice(Slice::S),
                        turn: Turn::Clockwise,
                    })
                    .apply(Move {
                        kind: MoveKind::Face(Face::Back),
                        turn: Turn::Counter,
                    }),
            },
        }
    }

    /// Apply one move, returning the new state.
    pub fn apply(&self, mv: Move) -> CubeState {
        let mut state = self.clone();
        for _ in 0..mv.turn.repetitions() {
            state = state.apply_clockwise(mv.kind);
        }
        state
    }

    /// Apply a full sequence left to right.
    pub fn apply_seq(&self, seq: &MoveSeq) -> CubeState {
        seq.moves().iter().fold(self.clone(), |s, &m| s.apply(m))
    }

    /// Parse and apply a notation string.
    pub fn apply_notation(&self, notation: &str) -> Result<CubeState, MoveError> {
        Ok(self.apply_seq(&MoveSeq::parse(notation)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Color;
    use proptest::prelude::*;

    const ALL_TOKENS: [&str; 18] = [
        "U", "D", "F", "B", "L", "R", "M", "E", "S", "u", "d", "f", "b", "l", "r", "x", "y", "z",
    ];

    fn solved() -> CubeState {
        CubeState::solved()
    }

    fn apply(state: &CubeState, notation: &str) -> CubeState {
        state.apply_notation(notation).unwrap()
    }

    fn changed_facelets(a: &CubeState, b: &CubeState) -> usize {
        a.facelets()
            .iter()
            .zip(b.facelets().iter())
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn four_quarter_turns_restore_every_token() {
        for token in ALL_TOKENS {
            let mut state = solved();
            for _ in 0..4 {
                state = apply(&state, token);
            }
            assert_eq!(state, solved(), "{token}");
        }
    }

    #[test]
    fn two_half_turns_restore_every_token() {
        for token in ALL_TOKENS {
            let notation = format!("{token}2 {token}2");
            assert_eq!(apply(&solved(), &notation), solved(), "{token}");
        }
    }

    #[test]
    fn counter_turn_undoes_clockwise_turn() {
        for token in ALL_TOKENS {
            let notation = format!("{token} {token}'");
            assert_eq!(apply(&solved(), &notation), solved(), "{token}");
        }
    }

    #[test]
    fn face_turn_changes_at_most_21_facelets() {
        for token in ["U", "D", "F", "B", "L", "R"] {
            let turned = apply(&solved(), token);
            // From solved, own-face stickers keep their color; only the 12
            // adjacent facelets show.
            assert!(changed_facelets(&solved(), &turned) <= 21, "{token}");
            let scrambled = apply(&solved(), "R U F' L D2 B");
            let turned = apply(&scrambled, token);
            assert!(changed_facelets(&scrambled, &turned) <= 21, "{token}");
        }
    }

    #[test]
    fn slice_turn_changes_exactly_12_facelets_from_solved() {
        // From solved, every permuted sticker lands on a different color.
        for token in ["M", "E", "S"] {
            let turned = apply(&solved(), token);
            assert_eq!(changed_facelets(&solved(), &turned), 12, "{token}");
        }
        // On a scrambled cube permuted stickers can coincide in color, so
        // the visible change is bounded by the 12 permuted positions.
        let scrambled = apply(&solved(), "R U F' L D2 B");
        for token in ["M", "E", "S"] {
            let turned = apply(&scrambled, token);
            assert!(changed_facelets(&scrambled, &turned) <= 12, "{token}");
        }
    }

    #[test]
    fn opposite_face_untouched_by_face_turn() {
        let scrambled = apply(&solved(), "R U F' L D2 B");
        for (token, opposite) in [
            ("R", Face::Left),
            ("L", Face::Right),
            ("U", Face::Down),
            ("D", Face::Up),
            ("F", Face::Back),
            ("B", Face::Front),
        ] {
            let turned = apply(&scrambled, token);
            assert_eq!(turned.face(opposite), scrambled.face(opposite), "{token}");
        }
    }

    #[test]
    fn wide_turns_match_their_composition() {
        let scrambled = apply(&solved(), "R U F' L D2 B");
        for (wide, composed) in [
            ("r", "R M'"),
            ("l", "L M"),
            ("u", "U E'"),
            ("d", "D E"),
            ("f", "F S"),
            ("b", "B S'"),
        ] {
            assert_eq!(
                apply(&scrambled, wide),
                apply(&scrambled, composed),
                "{wide}"
            );
        }
    }

    #[test]
    fn rotations_match_their_composition() {
        let scrambled = apply(&solved(), "R U F' L D2 B");
        for (rotation, composed) in [("x", "R M' L'"), ("y", "U E' D'"), ("z", "F S B'")] {
            assert_eq!(
                apply(&scrambled, rotation),
                apply(&scrambled, composed),
                "{rotation}"
            );
        }
    }

    #[test]
    fn rotations_keep_cube_solved() {
        for notation in ["x", "y", "z", "x2 y'", "z' y2 x"] {
            assert!(apply(&solved(), notation).is_solved(), "{notation}");
        }
    }

    #[test]
    fn sune_has_order_six() {
        let mut state = solved();
        for _ in 0..6 {
            state = apply(&state, "R U R' U R U2 R'");
        }
        assert_eq!(state, solved());
        // ...and fewer repetitions do not restore it.
        let once = apply(&solved(), "R U R' U R U2 R'");
        assert_ne!(once, solved());
    }

    #[test]
    fn sexy_move_has_order_six() {
        let mut state = solved();
        for _ in 0..6 {
            state = apply(&state, "R U R' U'");
        }
        assert_eq!(state, solved());
    }

    #[test]
    fn t_perm_is_an_involution() {
        let t = "R U R' U' R' F R2 U' R' U' R U R' F'";
        let once = apply(&solved(), t);
        assert!(!once.is_solved());
        assert!(apply(&once, t).is_solved());
    }

    #[test]
    fn h_perm_is_an_involution() {
        let h = "M2 U M2 U2 M2 U M2";
        let once = apply(&solved(), h);
        assert!(!once.is_solved());
        assert!(apply(&once, h).is_solved());
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        for bad in ["Q", "R3", "Uw", "R2'", ""] {
            if bad.is_empty() {
                // empty string parses as the empty sequence, not a token
                assert!(MoveSeq::parse(bad).unwrap().is_empty());
            } else {
                assert_eq!(
                    Move::parse(bad),
                    Err(MoveError::UnknownMove(bad.to_string()))
                );
            }
        }
    }

    #[test]
    fn notation_roundtrips_through_display() {
        let notation = "R U2 R' U' M E2 S' r l' u d2 f b' x y2 z'";
        let seq = MoveSeq::parse(notation).unwrap();
        assert_eq!(seq.to_string(), notation);
        assert_eq!(MoveSeq::parse(&seq.to_string()).unwrap(), seq);
    }

    #[test]
    fn inverse_reverses_and_inverts() {
        let seq = MoveSeq::parse("R U2 F'").unwrap();
        assert_eq!(seq.inverse().to_string(), "F U2 R'");
    }

    fn arb_move() -> impl Strategy<Value = String> {
        (0..ALL_TOKENS.len(), 0..3usize)
            .prop_map(|(base, turn)| format!("{}{}", ALL_TOKENS[base], ["", "2", "'"][turn]))
    }

    proptest! {
        #[test]
        fn random_sequence_then_inverse_restores(tokens in prop::collection::vec(arb_move(), 0..20)) {
            let seq = MoveSeq::parse(&tokens.join(" ")).unwrap();
            let state = solved().apply_seq(&seq).apply_seq(&seq.inverse());
            prop_assert_eq!(state, solved());
        }

        #[test]
        fn random_sequence_preserves_color_counts(tokens in prop::collection::vec(arb_move(), 0..20)) {
            let seq = MoveSeq::parse(&tokens.join(" ")).unwrap();
            let state = solved().apply_seq(&seq);
            for color in Color::ALL {
                let count = state.facelets().iter().filter(|&&c| c == color).count();
                prop_assert_eq!(count, 9);
            }
        }
    }
}
