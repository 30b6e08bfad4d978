// SPDX-License-Identifier: MIT

//! Viewer viewport: the rectangular region of interest a browser client
//! declares over its WebSocket connection.

use serde::{Deserialize, Serialize};

use crate::vehicle::{cell_of, CellKey};

/// The rectangular region of interest declared by a viewer.
///
/// Carries an explicit `present` flag instead of treating an all-zero
/// viewport as "unset" — a viewport at `(0.0, 0.0)` is a legitimate
/// geographic rectangle (e.g. off the coast of west Africa) and must not
/// be mistaken for "no viewport received yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub south_lat: f64,
    pub north_lat: f64,
    pub west_lng: f64,
    pub east_lng: f64,
    pub present: bool,
}

impl Default for Viewport {
    /// The unset viewport: no bounds have been received yet.
    fn default() -> Self {
        Self { south_lat: 0.0, north_lat: 0.0, west_lng: 0.0, east_lng: 0.0, present: false }
    }
}

impl Viewport {
    pub fn new(south_lat: f64, north_lat: f64, west_lng: f64, east_lng: f64) -> Self {
        Self { south_lat, north_lat, west_lng, east_lng, present: true }
    }

    /// Exact bounds check, used to defeat cell-boundary over-approximation
    /// after a cell-range query.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.south_lat <= lat && lat <= self.north_lat && self.west_lng <= lng && lng <= self.east_lng
    }

    /// The inclusive cell rectangle covering this viewport, for `query_cells`.
    pub fn cell_bounds(&self, cell_size: f64) -> (CellKey, CellKey) {
        let lo = cell_of(self.south_lat, self.west_lng, cell_size);
        let hi = cell_of(self.north_lat, self.east_lng, cell_size);
        (lo, hi)
    }
}
