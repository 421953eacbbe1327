//! Phase detector.
//!
//! Classifies how far a cube is from solved, either from the 15-facelet
//! observation window or from a full state. Checks run most-solved first
//! and short-circuit. Malformed input degrades to a low-confidence
//! `Unknown` result with diagnostics; detection never errors.

use serde::{Deserialize, Serialize};

use crate::catalog::Family;
use crate::state::{Color, CubeState, Face, Observation};

/// Solving phase, ordered least-solved to most-solved so that phase
/// comparisons express progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "first-two-layers-partial")]
    F2lPartial,
    #[serde(rename = "first-two-layers-last-pair")]
    F2lLastPair,
    #[serde(rename = "orient-last-layer")]
    OrientLastLayer,
    #[serde(rename = "last-layer-edges-oriented")]
    LastLayerEdgesOriented,
    #[serde(rename = "permute-last-layer")]
    PermuteLastLayer,
    #[serde(rename = "solved")]
    Solved,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Unknown => "unknown",
            Phase::F2lPartial => "first-two-layers-partial",
            Phase::F2lLastPair => "first-two-layers-last-pair",
            Phase::OrientLastLayer => "orient-last-layer",
            Phase::LastLayerEdgesOriented => "last-layer-edges-oriented",
            Phase::PermuteLastLayer => "permute-last-layer",
            Phase::Solved => "solved",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Detection outcome: the phase, the algorithm families worth querying,
/// a confidence score, and human-readable diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase: Phase,
    pub families: Vec<Family>,
    pub confidence: f32,
    pub diagnostics: Vec<String>,
}

impl PhaseResult {
    fn new(phase: Phase, families: Vec<Family>, confidence: f32) -> PhaseResult {
        PhaseResult {
            phase,
            families,
            confidence,
            diagnostics: Vec::new(),
        }
    }

    fn with_diagnostic(mut self, diagnostic: String) -> PhaseResult {
        self.diagnostics.push(diagnostic);
        self
    }
}

// ==================== Full-state predicates ====================

/// First two layers solved: bottom face uniform and the lower two rows of
/// every side face match that side's center.
pub fn is_f2l_solved(state: &CubeState) -> bool {
    let down = state.facelet(Face::Down, 4);
    if state.face(Face::Down).iter().any(|&c| c != down) {
        return false;
    }
    [Face::Front, Face::Back, Face::Left, Face::Right]
        .iter()
        .all(|&f| {
            let center = state.facelet(f, 4);
            (3..9).all(|pos| state.facelet(f, pos) == center)
        })
}

/// All four last-layer edges show the top-center color.
pub fn is_ll_edges_oriented(state: &CubeState) -> bool {
    let top = state.facelet(Face::Up, 4);
    [1, 3, 5, 7].iter().all(|&pos| state.facelet(Face::Up, pos) == top)
}

/// Bottom cross solved: the four bottom edges match the bottom center and
/// their side stickers match each side's center.
pub fn is_cross_solved(state: &CubeState) -> bool {
    let down = state.facelet(Face::Down, 4);
    if [1, 3, 5, 7].iter().any(|&pos| state.facelet(Face::Down, pos) != down) {
        return false;
    }
    [Face::Front, Face::Right, Face::Back, Face::Left]
        .iter()
        .all(|&f| state.facelet(f, 7) == state.facelet(f, 4))
}

/// Number of solved corner-edge slots (0..=4).
pub fn solved_f2l_pairs(state: &CubeState) -> usize {
    let down = state.facelet(Face::Down, 4);
    let center = |f: Face| state.facelet(f, 4);
    let slots: [(&[(Face, usize)], usize); 4] = [
        // (side facelets that must match their center, bottom corner position)
        (
            &[
                (Face::Front, 5),
                (Face::Front, 8),
                (Face::Right, 3),
                (Face::Right, 6),
            ],
            2,
        ),
        (
            &[
                (Face::Front, 3),
                (Face::Front, 6),
                (Face::Left, 5),
                (Face::Left, 8),
            ],
            0,
        ),
        (
            &[
                (Face::Left, 3),
                (Face::Left, 6),
                (Face::Back, 5),
                (Face::Back, 8),
            ],
            6,
        ),
        (
            &[
                (Face::Right, 5),
                (Face::Right, 8),
                (Face::Back, 3),
                (Face::Back, 6),
            ],
            8,
        ),
    ];
    slots
        .iter()
        .filter(|(side, corner)| {
            side.iter().all(|&(f, pos)| state.facelet(f, pos) == center(f))
                && state.facelet(Face::Down, *corner) == down
        })
        .count()
}

// ==================== Detector ====================

/// Phase classifier. Stateless; detection is a pure function of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseDetector;

impl PhaseDetector {
    pub fn new() -> PhaseDetector {
        PhaseDetector
    }

    /// Classify a 15-facelet window: the top face plus the top rows of the
    /// front and right faces. Any other length yields `Unknown`.
    pub fn detect_window(&self, window: &[Color]) -> PhaseResult {
        if window.len() != 15 {
            return PhaseResult::new(Phase::Unknown, Vec::new(), 0.0).with_diagnostic(format!(
                "expected 15 window facelets, got {}",
                window.len()
            ));
        }
        let top_center = window[4];
        let bottom = top_center.opposite();
        if window.contains(&bottom) {
            // Bottom-layer stickers showing on top means the first two
            // layers are disrupted.
            return PhaseResult::new(Phase::F2lPartial, vec![Family::F2l], 0.7)
                .with_diagnostic(format!("bottom color {bottom} visible in window"));
        }
        let top_matching = window[..9].iter().filter(|&&c| c == top_center).count();
        if top_matching == 9 {
            let front = &window[9..12];
            let right = &window[12..15];
            let front_uniform = front.iter().all(|&c| c == front[0]);
            let right_uniform = right.iter().all(|&c| c == right[0]);
            let distinct =
                front[0] != right[0] && front[0] != top_center && right[0] != top_center;
            if front_uniform && right_uniform && distinct {
                return PhaseResult::new(Phase::Solved, Vec::new(), 0.9);
            }
            return PhaseResult::new(Phase::PermuteLastLayer, vec![Family::Pll], 0.95);
        }
        let edges_matching = [1, 3, 5, 7]
            .iter()
            .filter(|&&pos| window[pos] == top_center)
            .count();
        if edges_matching == 4 {
            return PhaseResult::new(
                Phase::LastLayerEdgesOriented,
                vec![Family::Coll, Family::Zbll],
                0.9,
            );
        }
        PhaseResult::new(Phase::OrientLastLayer, vec![Family::Oll, Family::Ollcp], 0.9)
    }

    /// Classify an observation via its 15-facelet lookup window.
    pub fn detect_observation(&self, observation: &Observation) -> PhaseResult {
        self.detect_window(&observation.window15())
    }

    /// Classify a full state with exact predicates.
    pub fn detect_state(&self, state: &CubeState) -> PhaseResult {
        if state.is_solved() {
            return PhaseResult::new(Phase::Solved, Vec::new(), 1.0);
        }
        if is_f2l_solved(state) {
            let top = state.facelet(Face::Up, 4);
            if state.face(Face::Up).iter().all(|&c| c == top) {
                return PhaseResult::new(Phase::PermuteLastLayer, vec![Family::Pll], 1.0);
            }
            if is_ll_edges_oriented(state) {
                return PhaseResult::new(
                    Phase::LastLayerEdgesOriented,
                    vec![Family::Coll, Family::Zbll],
                    1.0,
                );
            }
            return PhaseResult::new(
                Phase::OrientLastLayer,
                vec![Family::Oll, Family::Ollcp],
                1.0,
            );
        }
        if is_cross_solved(state) {
            let pairs = solved_f2l_pairs(state);
            if pairs == 3 {
                return PhaseResult::new(
                    Phase::F2lLastPair,
                    vec![Family::F2l, Family::Wv],
                    0.9,
                )
                .with_diagnostic("three corner-edge pairs solved".to_string());
            }
            return PhaseResult::new(Phase::F2lPartial, vec![Family::F2l], 0.9)
                .with_diagnostic(format!("{pairs} corner-edge pairs solved"));
        }
        PhaseResult::new(Phase::F2lPartial, vec![Family::F2l], 0.8)
            .with_diagnostic("bottom cross unsolved".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveSeq;

    fn detector() -> PhaseDetector {
        PhaseDetector::new()
    }

    fn scrambled_by_inverse(notation: &str) -> CubeState {
        let seq = MoveSeq::parse(notation).unwrap();
        CubeState::solved().apply_seq(&seq.inverse())
    }

    #[test]
    fn phases_order_by_progress() {
        assert!(Phase::Solved > Phase::PermuteLastLayer);
        assert!(Phase::PermuteLastLayer > Phase::LastLayerEdgesOriented);
        assert!(Phase::LastLayerEdgesOriented > Phase::OrientLastLayer);
        assert!(Phase::OrientLastLayer > Phase::F2lLastPair);
        assert!(Phase::F2lLastPair > Phase::F2lPartial);
        assert!(Phase::F2lPartial > Phase::Unknown);
    }

    #[test]
    fn full_state_solved() {
        let result = detector().detect_state(&CubeState::solved());
        assert_eq!(result.phase, Phase::Solved);
        assert!(result.families.is_empty());
    }

    #[test]
    fn full_state_permute_last_layer() {
        let state = scrambled_by_inverse("R U R' U' R' F R2 U' R' U' R U R' F'");
        let result = detector().detect_state(&state);
        assert_eq!(result.phase, Phase::PermuteLastLayer);
        assert_eq!(result.families, vec![Family::Pll]);
    }

    #[test]
    fn full_state_edges_oriented() {
        let state = scrambled_by_inverse("R U R' U R U2 R'");
        let result = detector().detect_state(&state);
        assert_eq!(result.phase, Phase::LastLayerEdgesOriented);
        assert_eq!(result.families, vec![Family::Coll, Family::Zbll]);
    }

    #[test]
    fn full_state_orient_last_layer() {
        let state = scrambled_by_inverse("F R U R' U' F'");
        let result = detector().detect_state(&state);
        assert_eq!(result.phase, Phase::OrientLastLayer);
        assert_eq!(result.families, vec![Family::Oll, Family::Ollcp]);
    }

    #[test]
    fn full_state_last_pair() {
        let state = scrambled_by_inverse("R U R'");
        let result = detector().detect_state(&state);
        assert_eq!(result.phase, Phase::F2lLastPair);
        assert_eq!(result.families, vec![Family::F2l, Family::Wv]);
    }

    #[test]
    fn full_state_deep_scramble_is_partial() {
        let state = CubeState::solved().apply_notation("R U F' L D2 B").unwrap();
        let result = detector().detect_state(&state);
        assert_eq!(result.phase, Phase::F2lPartial);
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn window_solved() {
        let result = detector().detect_window(&CubeState::solved().window15());
        assert_eq!(result.phase, Phase::Solved);
    }

    #[test]
    fn window_permute_last_layer() {
        let state = scrambled_by_inverse("R U R' U' R' F R2 U' R' U' R U R' F'");
        let result = detector().detect_window(&state.window15());
        assert_eq!(result.phase, Phase::PermuteLastLayer);
    }

    #[test]
    fn window_edges_oriented() {
        let state = scrambled_by_inverse("R U R' U R U2 R'");
        let result = detector().detect_window(&state.window15());
        assert_eq!(result.phase, Phase::LastLayerEdgesOriented);
    }

    #[test]
    fn window_with_bottom_color_means_broken_f2l() {
        let state = CubeState::solved().apply_notation("R2").unwrap();
        let result = detector().detect_window(&state.window15());
        assert_eq!(result.phase, Phase::F2lPartial);
        assert!((result.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_window_degrades_to_unknown() {
        let result = detector().detect_window(&[Color::White; 3]);
        assert_eq!(result.phase, Phase::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn cross_and_pair_predicates_on_solved_state() {
        let solved = CubeState::solved();
        assert!(is_f2l_solved(&solved));
        assert!(is_cross_solved(&solved));
        assert!(is_ll_edges_oriented(&solved));
        assert_eq!(solved_f2l_pairs(&solved), 4);
    }

    #[test]
    fn extracting_one_pair_leaves_three() {
        let state = scrambled_by_inverse("R U R'");
        assert!(is_cross_solved(&state));
        assert_eq!(solved_f2l_pairs(&state), 3);
        assert!(!is_f2l_solved(&state));
    }
}
