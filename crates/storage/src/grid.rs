// SPDX-License-Identifier: MIT

//! Spatial grid: a mapping from cell key to the set of vehicle ids filed
//! under that cell.
//!
//! The grid never stores vehicle data directly, only ids — resolving a
//! vehicle's current fields always goes back through the world table. This
//! keeps the grid from holding a copy of vehicle data that could drift out
//! of sync with the table.

use std::collections::{HashMap, HashSet};

use fleethub_core::CellKey;

#[derive(Debug, Default)]
pub struct SpatialGrid {
    cells: HashMap<CellKey, HashSet<String>>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: CellKey, id: &str) {
        self.cells.entry(cell).or_default().insert(id.to_string());
    }

    /// Remove `id` from `cell`. Drops the cell entry entirely once empty so
    /// that invariant I2 (no cell set names a vanished key) holds without a
    /// separate sweep.
    pub fn remove(&mut self, cell: CellKey, id: &str) {
        if let Some(set) = self.cells.get_mut(&cell) {
            set.remove(id);
            if set.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Move `id` from `old_cell` to `new_cell` as a single logical step.
    pub fn move_cell(&mut self, old_cell: CellKey, new_cell: CellKey, id: &str) {
        if old_cell == new_cell {
            return;
        }
        self.remove(old_cell, id);
        self.insert(new_cell, id);
    }

    /// All vehicle ids in the inclusive cell rectangle
    /// `[cx_lo, cx_hi] x [cy_lo, cy_hi]`.
    pub fn ids_in_rect(&self, lo: CellKey, hi: CellKey) -> Vec<String> {
        let (cx_lo, cy_lo) = lo;
        let (cx_hi, cy_hi) = hi;
        let mut out = Vec::new();
        for cx in cx_lo..=cx_hi {
            for cy in cy_lo..=cy_hi {
                if let Some(set) = self.cells.get(&(cx, cy)) {
                    out.extend(set.iter().cloned());
                }
            }
        }
        out
    }

    /// True if `id` is filed under exactly `cell` and no other cell.
    /// Used by property tests to check invariant I1 directly.
    #[cfg(test)]
    pub(crate) fn is_exclusively_in(&self, cell: CellKey, id: &str) -> bool {
        let here = self.cells.get(&cell).is_some_and(|s| s.contains(id));
        let elsewhere = self.cells.iter().any(|(c, s)| *c != cell && s.contains(id));
        here && !elsewhere
    }

    /// Ensure `id` is filed under exactly `correct_cell`, removing it from
    /// any other cell it is incorrectly present in and inserting it into
    /// `correct_cell` if it was missing there. Returns `true` if a repair
    /// was made. Under normal operation every mutation goes through
    /// `insert`/`remove`/`move_cell` under the world store's single lock, so
    /// this should never find anything to do in practice — it exists as the
    /// best-effort repair path for an internal-invariant violation.
    pub(crate) fn repair(&mut self, correct_cell: CellKey, id: &str) -> bool {
        let mut repaired = false;
        let wrong_cells: Vec<CellKey> = self
            .cells
            .iter()
            .filter(|(c, s)| **c != correct_cell && s.contains(id))
            .map(|(c, _)| *c)
            .collect();
        for cell in wrong_cells {
            self.remove(cell, id);
            repaired = true;
        }
        if !self.cells.get(&correct_cell).is_some_and(|s| s.contains(id)) {
            self.insert(correct_cell, id);
            repaired = true;
        }
        repaired
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
