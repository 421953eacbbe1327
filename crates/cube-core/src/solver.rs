//! Multi-path solver.
//!
//! Detects the phase, queries every applicable lookup table (exact first,
//! nearest only when exact finds nothing), simulates each candidate against
//! the full state, and recurses on partial progress. Every emitted path is
//! re-verified end to end before ranking; paths are deduplicated by their
//! concatenated notation and sorted shortest-first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Family;
use crate::moves::MoveSeq;
use crate::phase::{Phase, PhaseDetector};
use crate::resolver::{LookupTable, LookupTables, TableEntry};
use crate::state::{CubeState, Observation};

/// Search budget and ranking knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of ranked paths to return.
    pub max_paths: usize,
    /// Maximum number of chained case applications per path.
    pub max_depth: usize,
    /// Window mismatch tolerance for nearest-match lookups; 0 disables them.
    pub nearest_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            max_paths: 5,
            max_depth: 3,
            nearest_threshold: 6,
        }
    }
}

impl SolverConfig {
    /// Exact lookups only. Useful when the observation is trusted and the
    /// nearest-match scan is unwanted.
    pub fn exact_only() -> SolverConfig {
        SolverConfig {
            nearest_threshold: 0,
            ..SolverConfig::default()
        }
    }
}

/// One case application within a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStep {
    pub family: Family,
    pub case_name: String,
    #[serde(rename = "move_notation")]
    pub moves: MoveSeq,
    pub move_count: usize,
    pub phase_before: Phase,
    pub phase_after: Phase,
}

/// An ordered, verified sequence of case applications ending solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvePath {
    pub description: String,
    pub total_moves: usize,
    pub steps: Vec<SolveStep>,
}

impl SolvePath {
    fn from_steps(steps: Vec<SolveStep>) -> SolvePath {
        let total_moves = steps.iter().map(|s| s.move_count).sum();
        let description = steps
            .iter()
            .map(|s| s.case_name.as_str())
            .collect::<Vec<_>>()
            .join(" → ");
        SolvePath {
            description,
            total_moves,
            steps,
        }
    }

    fn notation(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.moves.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Bound on candidate full states gathered from nearest-match lookups when
/// an observed window matches nothing exactly.
const MAX_CANDIDATE_SOURCES: usize = 8;

/// Phased multi-path search over a shared table set. Stateless beyond the
/// borrowed tables; safe to call concurrently.
pub struct Solver<'a> {
    tables: &'a LookupTables,
    detector: PhaseDetector,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    pub fn new(tables: &'a LookupTables) -> Solver<'a> {
        Solver::with_config(tables, SolverConfig::default())
    }

    pub fn with_config(tables: &'a LookupTables, config: SolverConfig) -> Solver<'a> {
        Solver {
            tables,
            detector: PhaseDetector::new(),
            config,
        }
    }

    /// Solve a fully known state. Returns ranked, verified paths; an empty
    /// vector when the state is already solved or nothing matches.
    pub fn solve_state(&self, state: &CubeState) -> Vec<SolvePath> {
        let phase = self.detector.detect_state(state).phase;
        if matches!(phase, Phase::Solved | Phase::Unknown) {
            return Vec::new();
        }
        let found = self.search(state, phase, 0);
        tracing::debug!(phase = %phase, candidates = found.len(), "search finished");
        self.finalize(state, found)
    }

    /// Solve from a partial observation. Candidate full states are
    /// reconstructed from matching table entries, then each is solved.
    pub fn solve_observation(&self, observation: &Observation) -> Vec<SolvePath> {
        let result = self.detector.detect_observation(observation);
        if matches!(result.phase, Phase::Solved | Phase::Unknown) {
            return Vec::new();
        }
        let window = observation.window15();
        let tables = self.tables_for(result.phase);

        let mut sources: Vec<&CubeState> = Vec::new();
        for table in &tables {
            for entry in table.lookup_exact(&window) {
                if self.extended_window_matches(observation, entry)
                    && !sources.contains(&&entry.source)
                {
                    sources.push(&entry.source);
                }
            }
        }
        if sources.is_empty() {
            // Nearest matches can fan out widely; bound the candidates.
            'nearest: for table in &tables {
                for (_, entry) in table.lookup_nearest(&window, self.config.nearest_threshold) {
                    if !sources.contains(&&entry.source) {
                        sources.push(&entry.source);
                        if sources.len() >= MAX_CANDIDATE_SOURCES {
                            break 'nearest;
                        }
                    }
                }
            }
        }

        let mut paths = Vec::new();
        for source in sources {
            paths.extend(self.solve_state(source));
        }
        rank(&mut paths, self.config.max_paths);
        paths
    }

    /// The extra facelets of a 27-window observation must agree with the
    /// entry's stored source; this filters collision buckets.
    fn extended_window_matches(&self, observation: &Observation, entry: &TableEntry) -> bool {
        !observation.is_extended() || entry.source.window27() == *observation.colors()
    }

    fn tables_for(&self, phase: Phase) -> Vec<&LookupTable> {
        let families: &[Family] = match phase {
            Phase::PermuteLastLayer => &[Family::Pll],
            Phase::LastLayerEdgesOriented => &[Family::Coll, Family::Zbll, Family::Oll],
            Phase::OrientLastLayer => &[Family::Oll, Family::Ollcp],
            Phase::F2lLastPair => &[Family::F2l, Family::Wv],
            Phase::F2lPartial => &[Family::F2l],
            Phase::Solved | Phase::Unknown => &[],
        };
        let mut out: Vec<&LookupTable> = families
            .iter()
            .filter_map(|&f| self.tables.family(f))
            .collect();
        if matches!(
            phase,
            Phase::OrientLastLayer | Phase::LastLayerEdgesOriented
        ) {
            if let Some(combined) = self.tables.combined() {
                out.push(combined);
            }
        }
        out
    }

    fn search(&self, state: &CubeState, phase: Phase, depth: usize) -> Vec<SolvePath> {
        if depth >= self.config.max_depth {
            return Vec::new();
        }
        let window = state.window15();
        let mut out = Vec::new();
        for table in self.tables_for(phase) {
            let exact = table.lookup_exact(&window);
            let candidates: Vec<&TableEntry> = if exact.is_empty() {
                table
                    .lookup_nearest(&window, self.config.nearest_threshold)
                    .into_iter()
                    .map(|(_, entry)| entry)
                    .collect()
            } else {
                exact.iter().collect()
            };
            for entry in candidates {
                let Some((steps, end, end_phase)) = self.simulate(state, phase, entry) else {
                    continue;
                };
                if end_phase == Phase::Solved {
                    out.push(SolvePath::from_steps(steps));
                    continue;
                }
                // Strict phase progress precludes cycling through sideways
                // states.
                if end_phase > phase {
                    for tail in self.search(&end, end_phase, depth + 1) {
                        let mut chained = steps.clone();
                        chained.extend(tail.steps);
                        out.push(SolvePath::from_steps(chained));
                    }
                }
            }
        }
        out
    }

    /// Apply one entry (correction folded into its first step) against the
    /// full state, recording the phase across each step. `None` when the
    /// entry contributes no moves.
    fn simulate(
        &self,
        state: &CubeState,
        phase: Phase,
        entry: &TableEntry,
    ) -> Option<(Vec<SolveStep>, CubeState, Phase)> {
        let mut current = state.clone();
        let mut current_phase = phase;
        let mut steps = Vec::with_capacity(entry.steps.len());
        for (i, case) in entry.steps.iter().enumerate() {
            let moves = if i == 0 {
                entry.correction.then(&case.moves)
            } else {
                case.moves.clone()
            };
            if moves.is_empty() {
                continue;
            }
            let next = current.apply_seq(&moves);
            let next_phase = self.detector.detect_state(&next).phase;
            steps.push(SolveStep {
                family: case.family,
                case_name: case.case_name.clone(),
                move_count: moves.len(),
                moves,
                phase_before: current_phase,
                phase_after: next_phase,
            });
            current = next;
            current_phase = next_phase;
        }
        if steps.is_empty() {
            return None;
        }
        Some((steps, current, current_phase))
    }

    /// Drop anything that does not replay to solved from the original state,
    /// then dedupe and rank.
    fn finalize(&self, origin: &CubeState, mut paths: Vec<SolvePath>) -> Vec<SolvePath> {
        paths.retain(|path| {
            let end = path
                .steps
                .iter()
                .fold(origin.clone(), |s, step| s.apply_seq(&step.moves));
            end.is_solved()
        });
        rank(&mut paths, self.config.max_paths);
        paths
    }
}

fn rank(paths: &mut Vec<SolvePath>, max_paths: usize) {
    let mut seen = HashSet::new();
    paths.retain(|path| seen.insert(path.notation()));
    paths.sort_by(|a, b| {
        a.total_moves
            .cmp(&b.total_moves)
            .then_with(|| a.description.cmp(&b.description))
    });
    paths.truncate(max_paths);
}
