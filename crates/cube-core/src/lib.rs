//! Core engine for 3×3×3 cube analysis: facelet state simulation,
//! symmetry-expanded case lookup, phase detection, and multi-path solving.
//!
//! The pipeline, bottom to top:
//!
//! - [`state`]: the 54-facelet state model and observation windows.
//! - [`moves`]: standard-notation parsing and permutation-based application.
//! - [`catalog`]: named solving cases grouped into algorithm families.
//! - [`symmetry`]: expansion of each case into its orientation × top-layer
//!   orbit.
//! - [`resolver`]: reverse lookup tables from window patterns to cases.
//! - [`phase`]: classification of how far a state is from solved.
//! - [`solver`]: phased search producing ranked, verified solving paths.
//!
//! ```
//! use cube_core::{CubeState, Family, LookupTables, MoveSeq, Solver};
//!
//! # fn main() -> Result<(), cube_core::MoveError> {
//! let tables = LookupTables::build(&[Family::Pll], false)?;
//! let solver = Solver::new(&tables);
//!
//! // Scramble with the inverse of a known solving sequence...
//! let t_perm = MoveSeq::parse("R U R' U' R' F R2 U' R' U' R U R' F'")?;
//! let state = CubeState::solved().apply_seq(&t_perm.inverse());
//!
//! // ...and get it back, verified and ranked.
//! let paths = solver.solve_state(&state);
//! assert_eq!(paths[0].steps[0].case_name, "T-Perm");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod moves;
pub mod phase;
pub mod resolver;
pub mod solver;
pub mod state;
pub mod symmetry;

pub use catalog::{AlgorithmCase, Family};
pub use moves::{Move, MoveError, MoveSeq};
pub use phase::{Phase, PhaseDetector, PhaseResult};
pub use resolver::{LookupTable, LookupTables, TableEntry};
pub use solver::{SolvePath, SolveStep, Solver, SolverConfig};
pub use state::{Color, CubeState, Face, Observation, StateError};
