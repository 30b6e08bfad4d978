// SPDX-License-Identifier: MIT

//! fleethub-core: domain types shared by the fleet hub storage and daemon crates.
//!
//! This crate has no I/O of its own. It defines the vehicle/viewport data
//! model, the spatial-grid cell math, the clock abstraction used for
//! testable staleness handling, and the small set of invariant-violation
//! errors that can surface from the storage layer.

pub mod clock;
pub mod error;
pub mod vehicle;
pub mod viewport;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::CoreError;
pub use vehicle::{cell_of, CellKey, Vehicle};
pub use viewport::Viewport;

/// Default grid cell size in degrees (lat/lng units).
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.1;

/// Default staleness threshold in seconds before a vehicle becomes a zombie.
pub const DEFAULT_STALENESS_SECS: u64 = 10;

/// Default interval in seconds between zombie-reaper sweeps.
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 5;

/// Default interval in milliseconds between viewer snapshot pushes.
pub const DEFAULT_PUSH_INTERVAL_MS: u64 = 1000;
