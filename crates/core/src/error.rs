// SPDX-License-Identifier: MIT

//! Invariant-violation errors surfaced by the storage layer.
//!
//! An internal-invariant violation (a vehicle missing from the cell its own
//! `grid_cell` points at) is a bug, not a user-visible failure: callers log
//! it and best-effort repair rather than propagating it to a producer or
//! viewer connection.

use thiserror::Error;

use crate::vehicle::CellKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("vehicle {id:?} missing from cell {cell:?} indicated by its own grid_cell")]
    GridInconsistency { id: String, cell: CellKey },
}
