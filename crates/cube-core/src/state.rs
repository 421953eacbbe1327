//! Facelet state model.
//!
//! A cube state is 54 facelets: 6 faces × 9 positions, row-major per face.
//! States are immutable values; the move engine returns new states rather
//! than mutating in place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total number of facelets.
pub const FACELET_COUNT: usize = 54;

/// Facelets per face.
pub const FACE_SIZE: usize = 9;

/// Sticker color. One-letter codes follow the standard Western scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Orange,
    Red,
}

impl Color {
    /// All six colors, in face order (U, D, F, B, L, R on a solved cube).
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Orange,
        Color::Red,
    ];

    /// One-letter color code.
    pub fn code(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Red => 'R',
        }
    }

    /// Parse a one-letter color code.
    pub fn from_code(c: char) -> Result<Color, StateError> {
        match c {
            'W' => Ok(Color::White),
            'Y' => Ok(Color::Yellow),
            'G' => Ok(Color::Green),
            'B' => Ok(Color::Blue),
            'O' => Ok(Color::Orange),
            'R' => Ok(Color::Red),
            other => Err(StateError::InvalidColorCode(other)),
        }
    }

    /// The color on the opposite face of a solved cube.
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Yellow,
            Color::Yellow => Color::White,
            Color::Green => Color::Blue,
            Color::Blue => Color::Green,
            Color::Orange => Color::Red,
            Color::Red => Color::Orange,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Cube face. The index order (U, D, F, B, L, R) fixes the global facelet
/// numbering: `face as usize * 9 + position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Up,
    Down,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
    ];

    /// Color of this face on a solved cube.
    pub fn solved_color(&self) -> Color {
        Color::ALL[*self as usize]
    }
}

/// Errors raised when constructing states or observations from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid color code `{0}`")]
    InvalidColorCode(char),
    #[error("expected exactly 9 facelets of {color:?}, got {count}")]
    BadColorCount { color: Color, count: usize },
    #[error("expected 54 facelets, got {0}")]
    BadStateLength(usize),
    #[error("expected 15 or 27 observed facelets, got {0}")]
    BadObservationLength(usize),
}

/// Global facelet indices of the 15-facelet observation window:
/// the full top face, the front face top row, and the right face top row.
pub const WINDOW_15: [usize; 15] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, // U
    18, 19, 20, // F top row
    45, 46, 47, // R top row
];

/// Global facelet indices of the 27-facelet observation window:
/// the full U, F, and R faces.
pub const WINDOW_27: [usize; 27] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, // U
    18, 19, 20, 21, 22, 23, 24, 25, 26, // F
    45, 46, 47, 48, 49, 50, 51, 52, 53, // R
];

/// Complete 54-facelet cube configuration.
///
/// Invariant: exactly 9 facelets of each color. The checked constructor
/// enforces it for external input; the move engine preserves it because
/// moves are permutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubeState {
    facelets: [Color; FACELET_COUNT],
}

impl CubeState {
    /// The solved state: every face uniform in its own color.
    pub fn solved() -> CubeState {
        let mut facelets = [Color::White; FACELET_COUNT];
        for face in Face::ALL {
            for pos in 0..FACE_SIZE {
                facelets[face as usize * FACE_SIZE + pos] = face.solved_color();
            }
        }
        CubeState { facelets }
    }

    /// Build a state from 54 colors in global index order (U, D, F, B, L, R),
    /// rejecting any input that violates the 9-of-each-color invariant.
    pub fn from_colors(colors: &[Color]) -> Result<CubeState, StateError> {
        if colors.len() != FACELET_COUNT {
            return Err(StateError::BadStateLength(colors.len()));
        }
        for color in Color::ALL {
            let count = colors.iter().filter(|&&c| c == color).count();
            if count != FACE_SIZE {
                return Err(StateError::BadColorCount { color, count });
            }
        }
        let mut facelets = [Color::White; FACELET_COUNT];
        facelets.copy_from_slice(colors);
        Ok(CubeState { facelets })
    }

    /// Parse a 54-character color-code string in global index order.
    pub fn from_codes(codes: &str) -> Result<CubeState, StateError> {
        let colors: Vec<Color> = codes
            .chars()
            .map(Color::from_code)
            .collect::<Result<_, _>>()?;
        CubeState::from_colors(&colors)
    }

    /// Color at a (face, position) address.
    pub fn facelet(&self, face: Face, pos: usize) -> Color {
        self.facelets[face as usize * FACE_SIZE + pos]
    }

    /// The 9 colors of one face, row-major.
    pub fn face(&self, face: Face) -> &[Color] {
        let start = face as usize * FACE_SIZE;
        &self.facelets[start..start + FACE_SIZE]
    }

    /// All 54 facelets in global index order.
    pub fn facelets(&self) -> &[Color; FACELET_COUNT] {
        &self.facelets
    }

    pub(crate) fn facelets_mut(&mut self) -> &mut [Color; FACELET_COUNT] {
        &mut self.facelets
    }

    /// True when every face is uniform. Orientation-agnostic: a solved cube
    /// rotated as a whole still counts as solved.
    pub fn is_solved(&self) -> bool {
        Face::ALL
            .iter()
            .all(|&f| self.face(f).iter().all(|&c| c == self.facelet(f, 4)))
    }

    /// The 15-facelet observation window (U face + F top row + R top row).
    pub fn window15(&self) -> [Color; 15] {
        let mut out = [Color::White; 15];
        for (i, &idx) in WINDOW_15.iter().enumerate() {
            out[i] = self.facelets[idx];
        }
        out
    }

    /// The 27-facelet observation window (U, F, and R faces).
    pub fn window27(&self) -> [Color; 27] {
        let mut out = [Color::White; 27];
        for (i, &idx) in WINDOW_27.iter().enumerate() {
            out[i] = self.facelets[idx];
        }
        out
    }

    /// Flat 54-character color-code string, for golden-test comparison.
    pub fn color_codes(&self) -> String {
        self.facelets.iter().map(|c| c.code()).collect()
    }
}

impl std::fmt::Display for CubeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color_codes())
    }
}

/// A partial observation of the cube: 15 or 27 facelets projected through
/// the fixed window, typically supplied by an external vision front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    colors: Vec<Color>,
}

impl Observation {
    /// Build an observation from ordered window colors (length 15 or 27).
    pub fn from_colors(colors: Vec<Color>) -> Result<Observation, StateError> {
        match colors.len() {
            15 | 27 => Ok(Observation { colors }),
            n => Err(StateError::BadObservationLength(n)),
        }
    }

    /// Parse an observation from a color-code string (length 15 or 27).
    pub fn from_codes(codes: &str) -> Result<Observation, StateError> {
        let colors: Vec<Color> = codes
            .chars()
            .map(Color::from_code)
            .collect::<Result<_, _>>()?;
        Observation::from_colors(colors)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// True for the 27-facelet extended window.
    pub fn is_extended(&self) -> bool {
        self.colors.len() == 27
    }

    /// The 15-facelet lookup window. For a 27-facelet observation this is
    /// the U face plus the top rows of F and R.
    pub fn window15(&self) -> [Color; 15] {
        let mut out = [Color::White; 15];
        if self.colors.len() == 15 {
            out.copy_from_slice(&self.colors);
        } else {
            out[..9].copy_from_slice(&self.colors[..9]);
            out[9..12].copy_from_slice(&self.colors[9..12]);
            out[12..15].copy_from_slice(&self.colors[18..21]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_state_has_nine_of_each_color() {
        let state = CubeState::solved();
        for color in Color::ALL {
            let count = state.facelets().iter().filter(|&&c| c == color).count();
            assert_eq!(count, 9, "{color:?}");
        }
        assert!(state.is_solved());
    }

    #[test]
    fn window15_of_solved_state() {
        let w = CubeState::solved().window15();
        assert!(w[..9].iter().all(|&c| c == Color::White));
        assert!(w[9..12].iter().all(|&c| c == Color::Green));
        assert!(w[12..15].iter().all(|&c| c == Color::Red));
    }

    #[test]
    fn window27_of_solved_state() {
        let w = CubeState::solved().window27();
        assert!(w[..9].iter().all(|&c| c == Color::White));
        assert!(w[9..18].iter().all(|&c| c == Color::Green));
        assert!(w[18..27].iter().all(|&c| c == Color::Red));
    }

    #[test]
    fn from_colors_rejects_bad_multiset() {
        let mut colors = CubeState::solved().facelets().to_vec();
        colors[0] = Color::Green; // ten greens, eight whites
        let err = CubeState::from_colors(&colors).unwrap_err();
        assert!(matches!(err, StateError::BadColorCount { .. }));
    }

    #[test]
    fn code_string_roundtrip() {
        let state = CubeState::solved();
        let codes = state.color_codes();
        assert_eq!(codes.len(), 54);
        assert_eq!(CubeState::from_codes(&codes).unwrap(), state);
    }

    #[test]
    fn color_opposites_are_involutive() {
        for color in Color::ALL {
            assert_eq!(color.opposite().opposite(), color);
            assert_ne!(color.opposite(), color);
        }
    }

    #[test]
    fn observation_lengths() {
        assert!(Observation::from_codes("WWWWWWWWWGGGRRR").is_ok());
        assert!(Observation::from_codes("WWWWWWWWWGGGGGGGGGRRRRRRRRR").is_ok());
        assert!(matches!(
            Observation::from_codes("WWW"),
            Err(StateError::BadObservationLength(3))
        ));
        assert!(matches!(
            Observation::from_codes("WWWWWWWWWGGGRRX"),
            Err(StateError::InvalidColorCode('X'))
        ));
    }

    #[test]
    fn extended_observation_projects_to_lookup_window() {
        let state = CubeState::solved();
        let obs = Observation::from_colors(state.window27().to_vec()).unwrap();
        assert!(obs.is_extended());
        assert_eq!(obs.window15(), state.window15());
    }
}
