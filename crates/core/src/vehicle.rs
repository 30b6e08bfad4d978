// SPDX-License-Identifier: MIT

//! Vehicle data model and spatial-grid cell math.

use serde::{Deserialize, Serialize};

/// A grid cell key: `(cx, cy)`, the floored lat/lng divided by the grid's
/// configured cell size.
pub type CellKey = (i64, i64);

/// Compute the cell a position falls into for a given cell size.
///
/// Uses `f64::floor` rather than truncating `as i64` so that negative
/// latitudes/longitudes round toward negative infinity (e.g.
/// `cell_of(-0.05, 0.0, 0.1)` lands in cell `-1`, not `0`).
pub fn cell_of(lat: f64, lng: f64, cell_size: f64) -> CellKey {
    let cx = (lat / cell_size).floor() as i64;
    let cy = (lng / cell_size).floor() as i64;
    (cx, cy)
}

/// A tracked vehicle ("bus" in the wire protocol).
///
/// Lifecycle: created on the first producer message bearing an unknown
/// `id`; mutated in place by subsequent messages for that `id`; destroyed
/// by the zombie reaper once `now - last_seen > STALENESS_SECONDS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub route: String,
    /// Seconds since an arbitrary but fixed epoch (wall-clock via `Clock::epoch_ms`,
    /// scaled to seconds). Used only for staleness comparisons, never displayed.
    pub last_seen: u64,
    /// The cell this vehicle is currently filed under in the spatial grid.
    /// Must always equal `cell_of(lat, lng, cell_size)` for the grid's
    /// configured cell size.
    pub grid_cell: CellKey,
}

impl Vehicle {
    pub fn new(id: String, lat: f64, lng: f64, route: String, last_seen: u64, cell_size: f64) -> Self {
        let grid_cell = cell_of(lat, lng, cell_size);
        Self { id, lat, lng, route, last_seen, grid_cell }
    }
}
