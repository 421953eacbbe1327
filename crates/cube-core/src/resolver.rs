//! State resolver: reverse lookup tables from observed window patterns to
//! the catalog cases addressing them.
//!
//! Build: every case's 96-member symmetry orbit is projected through the
//! 15-facelet window; each distinct (pattern, steps, correction, source)
//! becomes one entry. Distinct full states sharing a window pattern land in
//! the same bucket; collisions are preserved, never overwritten. Tables are
//! built once, in parallel per family, then shared immutably.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::catalog::{self, Family};
use crate::moves::{MoveError, MoveSeq};
use crate::state::{Color, CubeState};
use crate::symmetry;

/// One case application inside a table entry. Combined-table entries carry
/// two steps (orientation case, then permutation case); family tables one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStep {
    pub family: Family,
    pub case_name: String,
    pub moves: MoveSeq,
}

/// One resolvable scrambled state: the steps solving it, the pre-correction,
/// the window pattern it shows, and the full source state it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub steps: Vec<CaseStep>,
    pub correction: MoveSeq,
    pub pattern: [Color; 15],
    pub source: CubeState,
}

/// A reverse lookup table over 15-facelet window patterns.
#[derive(Debug)]
pub struct LookupTable {
    label: String,
    buckets: HashMap<[Color; 15], Vec<TableEntry>>,
    entry_count: usize,
}

impl LookupTable {
    fn build(label: &str, composites: &[Vec<CaseStep>]) -> Result<LookupTable, MoveError> {
        let expanded: Vec<Vec<TableEntry>> = composites
            .par_iter()
            .map(|steps| {
                let solution = steps
                    .iter()
                    .fold(MoveSeq::empty(), |acc, s| acc.then(&s.moves));
                let members = symmetry::expand_case(&solution)?;
                Ok(members
                    .into_iter()
                    .map(|m| TableEntry {
                        steps: steps.clone(),
                        correction: m.correction,
                        pattern: m.state.window15(),
                        source: m.state,
                    })
                    .collect())
            })
            .collect::<Result<_, MoveError>>()?;

        let mut buckets: HashMap<[Color; 15], Vec<TableEntry>> = HashMap::new();
        let mut entry_count = 0;
        for entry in expanded.into_iter().flatten() {
            let bucket = buckets.entry(entry.pattern).or_default();
            if !bucket.contains(&entry) {
                bucket.push(entry);
                entry_count += 1;
            }
        }
        tracing::debug!(
            table = label,
            entries = entry_count,
            buckets = buckets.len(),
            "built lookup table"
        );
        Ok(LookupTable {
            label: label.to_string(),
            buckets,
            entry_count,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// All entries whose pattern equals the window exactly.
    pub fn lookup_exact(&self, window: &[Color; 15]) -> &[TableEntry] {
        self.buckets.get(window).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries within `max_distance` window facelet mismatches, nearest
    /// first. A zero threshold disables the scan entirely.
    pub fn lookup_nearest(
        &self,
        window: &[Color; 15],
        max_distance: usize,
    ) -> Vec<(usize, &TableEntry)> {
        if max_distance == 0 {
            return Vec::new();
        }
        let mut hits: Vec<(usize, &TableEntry)> = Vec::new();
        for (pattern, bucket) in &self.buckets {
            let distance = hamming(pattern, window);
            if distance <= max_distance {
                hits.extend(bucket.iter().map(|e| (distance, e)));
            }
        }
        hits.sort_by_key(|&(distance, _)| distance);
        hits
    }
}

fn hamming(a: &[Color; 15], b: &[Color; 15]) -> usize {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}

/// The full table set: one table per requested family, plus the optional
/// derived combined table of OLL×PLL two-step cases. Built once; immutable
/// and lock-free to share afterwards.
#[derive(Debug)]
pub struct LookupTables {
    tables: HashMap<Family, LookupTable>,
    combined: Option<LookupTable>,
}

impl LookupTables {
    /// Build tables for the given families, in parallel. `with_combined`
    /// additionally derives the two-step OLL→PLL table.
    pub fn build(families: &[Family], with_combined: bool) -> Result<LookupTables, MoveError> {
        let (tables, combined) = rayon::join(
            || -> Result<HashMap<Family, LookupTable>, MoveError> {
                families
                    .par_iter()
                    .map(|&family| {
                        let composites: Vec<Vec<CaseStep>> = catalog::cases(family)?
                            .into_iter()
                            .map(|case| {
                                vec![CaseStep {
                                    family,
                                    case_name: case.name,
                                    moves: case.solution,
                                }]
                            })
                            .collect();
                        Ok((family, LookupTable::build(family.label(), &composites)?))
                    })
                    .collect()
            },
            || -> Result<Option<LookupTable>, MoveError> {
                if !with_combined {
                    return Ok(None);
                }
                Ok(Some(build_combined()?))
            },
        );
        let tables = tables?;
        let combined = combined?;
        tracing::info!(
            families = tables.len(),
            entries = tables.values().map(LookupTable::len).sum::<usize>()
                + combined.as_ref().map(LookupTable::len).unwrap_or(0),
            combined = combined.is_some(),
            "lookup tables ready"
        );
        Ok(LookupTables { tables, combined })
    }

    /// Every family plus the combined table.
    pub fn build_default() -> Result<LookupTables, MoveError> {
        LookupTables::build(&Family::ALL, true)
    }

    pub fn family(&self, family: Family) -> Option<&LookupTable> {
        self.tables.get(&family)
    }

    pub fn combined(&self) -> Option<&LookupTable> {
        self.combined.as_ref()
    }
}

/// The derived OLL→PLL view: every orientation case paired with every
/// permutation case, composed into a two-step case and expanded through the
/// same orbit path as the family tables.
fn build_combined() -> Result<LookupTable, MoveError> {
    let oll = catalog::cases(Family::Oll)?;
    let pll = catalog::cases(Family::Pll)?;
    let mut composites = Vec::with_capacity(oll.len() * pll.len());
    for o in &oll {
        for p in &pll {
            let mut steps = vec![CaseStep {
                family: Family::Oll,
                case_name: o.name.clone(),
                moves: o.solution.clone(),
            }];
            if !p.solution.is_empty() {
                steps.push(CaseStep {
                    family: Family::Pll,
                    case_name: p.name.clone(),
                    moves: p.solution.clone(),
                });
            }
            composites.push(steps);
        }
    }
    LookupTable::build("OLL+PLL", &composites)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pll_tables() -> LookupTables {
        LookupTables::build(&[Family::Pll], false).unwrap()
    }

    fn scrambled_by_inverse(notation: &str) -> CubeState {
        let seq = MoveSeq::parse(notation).unwrap();
        CubeState::solved().apply_seq(&seq.inverse())
    }

    #[test]
    fn exact_lookup_finds_the_scrambled_case() {
        let tables = pll_tables();
        let table = tables.family(Family::Pll).unwrap();
        let state = scrambled_by_inverse("R U R' U' R' F R2 U' R' U' R U R' F'");
        let entries = table.lookup_exact(&state.window15());
        assert!(entries
            .iter()
            .any(|e| e.steps.len() == 1 && e.steps[0].case_name == "T-Perm"));
    }

    #[test]
    fn every_entry_solves_its_source_state() {
        // One canonical family and one synthesized family, so the composed
        // solving sequences go through the same check.
        let tables = LookupTables::build(&[Family::Pll, Family::Coll], false).unwrap();
        for family in [Family::Pll, Family::Coll] {
            let table = tables.family(family).unwrap();
            assert!(!table.is_empty());
            for bucket in table.buckets.values() {
                for entry in bucket {
                    let mut state = entry.source.apply_seq(&entry.correction);
                    for step in &entry.steps {
                        state = state.apply_seq(&step.moves);
                    }
                    assert!(state.is_solved(), "{:?}", entry.steps[0].case_name);
                }
            }
        }
    }

    #[test]
    fn top_turned_solved_state_resolves_to_a_bare_correction() {
        let tables = pll_tables();
        let table = tables.family(Family::Pll).unwrap();
        let state = CubeState::solved().apply_notation("U").unwrap();
        let entries = table.lookup_exact(&state.window15());
        assert!(entries.iter().any(|e| {
            e.steps[0].case_name == "Solved" && e.correction == MoveSeq::parse("U'").unwrap()
        }));
    }

    #[test]
    fn nearest_lookup_tolerates_a_perturbed_window() {
        let tables = pll_tables();
        let table = tables.family(Family::Pll).unwrap();
        let state = scrambled_by_inverse("R U R' U' R' F R2 U' R' U' R U R' F'");
        let mut window = state.window15();
        window[9] = window[9].opposite();
        let hits = table.lookup_nearest(&window, 2);
        assert!(hits
            .iter()
            .any(|(d, e)| *d <= 1 && e.steps[0].case_name == "T-Perm"));
    }

    #[test]
    fn zero_threshold_disables_the_nearest_scan() {
        let tables = pll_tables();
        let table = tables.family(Family::Pll).unwrap();
        let window = CubeState::solved().window15();
        assert!(table.lookup_nearest(&window, 0).is_empty());
    }

    #[test]
    fn combined_table_resolves_a_two_phase_scramble() {
        let tables = LookupTables::build(&[], true).unwrap();
        let table = tables.combined().unwrap();
        // Sune followed by a T-Perm, scrambled by the inverse of the pair.
        let state =
            scrambled_by_inverse("R U R' U R U2 R' R U R' U' R' F R2 U' R' U' R U R' F'");
        let entries = table.lookup_exact(&state.window15());
        assert!(entries.iter().any(|e| {
            e.steps.len() == 2
                && e.steps[0].case_name == "OLL 27"
                && e.steps[1].case_name == "T-Perm"
        }));
    }

    #[test]
    fn collision_buckets_keep_every_entry() {
        let tables = pll_tables();
        let table = tables.family(Family::Pll).unwrap();
        let multi = table.buckets.values().filter(|b| b.len() > 1).count();
        assert!(multi > 0, "expected at least one multi-entry bucket");
        assert_eq!(
            table.len(),
            table.buckets.values().map(Vec::len).sum::<usize>()
        );
    }
}
