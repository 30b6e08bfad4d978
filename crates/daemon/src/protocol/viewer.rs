// SPDX-License-Identifier: MIT

//! Viewer-facing frames: inbound `newBounds`, outbound `Buses` snapshots.

use serde::{Deserialize, Serialize};

use fleethub_core::Viewport;

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct BoundsData {
    #[serde(rename = "southWest")]
    south_west: LatLng,
    #[serde(rename = "northEast")]
    north_east: LatLng,
}

#[derive(Debug, Deserialize)]
struct RawViewerFrame {
    #[serde(rename = "msgType")]
    msg_type: Option<String>,
    data: Option<BoundsData>,
}

/// Parse one inbound viewer text frame looking for a well-formed
/// `newBounds` message.
///
/// Malformed frames and unrecognized `msgType`s are ignored silently —
/// there is no error path here, only `Some(viewport)` for a well-formed
/// bounds update or `None` for anything else (bad JSON, missing fields,
/// unknown `msgType`).
pub fn parse_viewer_bounds(text: &str) -> Option<Viewport> {
    let raw: RawViewerFrame = serde_json::from_str(text).ok()?;
    if raw.msg_type.as_deref() != Some("newBounds") {
        return None;
    }
    let data = raw.data?;
    Some(Viewport::new(
        data.south_west.lat,
        data.north_east.lat,
        data.south_west.lng,
        data.north_east.lng,
    ))
}

/// One vehicle entry in an outbound `Buses` snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BusEntry {
    #[serde(rename = "busId")]
    pub bus_id: String,
    pub lat: f64,
    pub lng: f64,
    pub route: String,
}

/// The outbound snapshot frame: `{"msgType":"Buses","buses":[...]}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapshotFrame {
    #[serde(rename = "msgType")]
    pub msg_type: &'static str,
    pub buses: Vec<BusEntry>,
}

impl SnapshotFrame {
    pub fn new(buses: Vec<BusEntry>) -> Self {
        Self { msg_type: "Buses", buses }
    }
}
