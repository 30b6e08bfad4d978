// SPDX-License-Identifier: MIT

//! fleethub-storage: the in-memory world store and its spatial grid index.
//!
//! This is the only shared mutable state in the fleet hub. A single
//! `parking_lot::Mutex` guards the vehicle table and the grid together, so
//! every externally observable state transition is atomic with respect to
//! concurrent upserts, evictions, and range queries — keeping a vehicle
//! filed under exactly the cell its own `grid_cell` names without needing
//! per-cell locking, which would be deadlock-prone for cell-to-cell moves.

mod grid;
mod world;

pub use grid::SpatialGrid;
pub use world::WorldStore;
