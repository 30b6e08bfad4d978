// SPDX-License-Identifier: MIT

//! The world store: vehicle table + spatial grid behind one mutex.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use fleethub_core::{cell_of, CellKey, CoreError, Vehicle};

use crate::grid::SpatialGrid;

struct Inner {
    vehicles: HashMap<String, Vehicle>,
    grid: SpatialGrid,
}

/// Shared handle to the world's vehicle table and spatial index.
///
/// Cloning a `WorldStore` clones the `Arc` handle, not the data — all
/// clones observe the same underlying table. The listener supervisor owns
/// one and hands a clone to every producer handler, viewer session, and
/// the reaper, rather than reaching for a module-level global.
#[derive(Clone)]
pub struct WorldStore {
    inner: Arc<Mutex<Inner>>,
    cell_size: f64,
}

impl WorldStore {
    pub fn new(cell_size: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { vehicles: HashMap::new(), grid: SpatialGrid::new() })),
            cell_size,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_of(&self, lat: f64, lng: f64) -> CellKey {
        cell_of(lat, lng, self.cell_size)
    }

    /// Insert or update a vehicle, moving it between grid cells if its
    /// position crossed a cell boundary. Atomic with respect to concurrent
    /// `query_cells`/`snapshot_all` callers: the whole operation runs under
    /// one lock acquisition.
    pub fn upsert(&self, id: &str, lat: f64, lng: f64, route: &str, now: u64) {
        let new_cell = cell_of(lat, lng, self.cell_size);
        let mut inner = self.inner.lock();
        match inner.vehicles.get_mut(id) {
            Some(existing) => {
                let old_cell = existing.grid_cell;
                existing.lat = lat;
                existing.lng = lng;
                existing.route = route.to_string();
                existing.last_seen = now;
                if new_cell != old_cell {
                    existing.grid_cell = new_cell;
                    inner.grid.move_cell(old_cell, new_cell, id);
                }
            }
            None => {
                let vehicle = Vehicle::new(id.to_string(), lat, lng, route.to_string(), now, self.cell_size);
                inner.grid.insert(vehicle.grid_cell, id);
                inner.vehicles.insert(id.to_string(), vehicle);
            }
        }
    }

    /// Remove a vehicle from the table and its current cell. Returns
    /// `false` if the id was already absent (idempotent).
    pub fn evict(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.vehicles.remove(id) {
            Some(vehicle) => {
                inner.grid.remove(vehicle.grid_cell, id);
                true
            }
            None => false,
        }
    }

    /// Every vehicle present in any cell of the inclusive rectangle
    /// `[lo, hi]`. Each returned `Vehicle` is a self-consistent snapshot of
    /// `(lat, lng, route)` cloned while the lock is held.
    pub fn query_cells(&self, lo: CellKey, hi: CellKey) -> Vec<Vehicle> {
        let inner = self.inner.lock();
        inner
            .grid
            .ids_in_rect(lo, hi)
            .into_iter()
            .filter_map(|id| inner.vehicles.get(&id).cloned())
            .collect()
    }

    /// All vehicles currently in the table. Used only in the
    /// unset-viewport branch of the viewer sender, which sends every
    /// vehicle rather than filtering by position.
    pub fn snapshot_all(&self) -> Vec<Vehicle> {
        self.inner.lock().vehicles.values().cloned().collect()
    }

    /// Evict every vehicle whose `last_seen` is older than `staleness_secs`
    /// relative to `now` (both in seconds since the same epoch). Returns the
    /// evicted ids, for logging by the caller. Scans and collects stale ids
    /// first, then evicts in one pass, so the staleness check always sees a
    /// consistent `now`.
    pub fn reap(&self, now: u64, staleness_secs: u64) -> Vec<String> {
        let mut inner = self.inner.lock();
        let stale: Vec<String> = inner
            .vehicles
            .iter()
            .filter(|(_, v)| now.saturating_sub(v.last_seen) > staleness_secs)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            if let Some(vehicle) = inner.vehicles.remove(id) {
                inner.grid.remove(vehicle.grid_cell, id);
            }
        }
        stale
    }

    /// Scan the table for any vehicle whose grid membership disagrees with
    /// its own `grid_cell`, repair the grid in place, and log one warning
    /// per repair. Such a state is a bug (every mutation path keeps the
    /// table and grid in lockstep under the same lock acquisition), not a
    /// user-visible failure, so this repairs and continues rather than
    /// panicking. The reaper calls this on its regular sweep as a cheap
    /// self-healing pass; returns the violations found, for callers that
    /// want to log or count them further.
    pub fn audit_and_repair(&self) -> Vec<CoreError> {
        let mut inner = self.inner.lock();
        let cells: Vec<(String, CellKey)> =
            inner.vehicles.iter().map(|(id, v)| (id.clone(), v.grid_cell)).collect();
        let mut violations = Vec::new();
        for (id, cell) in cells {
            if inner.grid.repair(cell, &id) {
                warn!(id = %id, cell = ?cell, "repaired grid-cell inconsistency for vehicle");
                violations.push(CoreError::GridInconsistency { id, cell });
            }
        }
        violations
    }

    pub fn len(&self) -> usize {
        self.inner.lock().vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every vehicle in the table is filed under exactly the
    /// cell its own `grid_cell` names and no other. Used by property tests;
    /// cheap enough to call after every operation in a test loop but not
    /// meant for the hot path.
    #[cfg(test)]
    pub fn check_grid_consistency(&self) -> bool {
        let inner = self.inner.lock();
        inner.vehicles.iter().all(|(id, v)| inner.grid.is_exclusively_in(v.grid_cell, id))
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
