// SPDX-License-Identifier: MIT

//! Wire protocol for both endpoints: JSON text frames over WebSocket.
//! Plain JSON composes with any viewer decoder without needing to also
//! control the front end.

mod producer;
mod viewer;

pub use producer::{parse_producer_frame, ProducerFrame};
pub use viewer::{parse_viewer_bounds, BusEntry, SnapshotFrame};
