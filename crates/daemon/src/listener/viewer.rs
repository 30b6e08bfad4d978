// SPDX-License-Identifier: MIT

//! Viewer session: a pair of sibling tasks — a reader that
//! applies `newBounds` updates and a sender that pushes snapshots at a
//! fixed cadence. When either task finishes, the session ends and its
//! sibling is cancelled, matching the structured-concurrency "scope"
//! described in the design notes.

use std::sync::Arc;

use futures_util::stream::SplitStream;
use parking_lot::Mutex;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use fleethub_core::Viewport;
use fleethub_storage::WorldStore;

use crate::config::Config;
use crate::protocol::{parse_viewer_bounds, BusEntry, SnapshotFrame};

/// Run one viewer session to completion.
pub async fn run_session(
    stream: TcpStream,
    world: WorldStore,
    config: Arc<Config>,
    cancel: CancellationToken,
) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!(error = %e, "viewer handshake failed");
            return;
        }
    };
    let (write, read) = ws.split();
    let viewport: Arc<Mutex<Viewport>> = Arc::new(Mutex::new(Viewport::default()));

    let reader = read_bounds(read, Arc::clone(&viewport));
    let sender = send_snapshots(write, world, Arc::clone(&viewport), config);

    // Racing the two siblings: whichever finishes first (socket closed,
    // send error) ends the session and drops the other, which is the
    // session's cancellation semantics. `cancel` lets the listener
    // supervisor tear every session down from the outside too.
    tokio::select! {
        _ = reader => {}
        _ = sender => {}
        _ = cancel.cancelled() => {}
    }
}

/// Reader task: applies well-formed `newBounds` frames to the shared
/// viewport as one atomic replacement. Malformed frames and unknown
/// `msgType`s are ignored — this task simply keeps looping.
async fn read_bounds(mut read: SplitStream<WebSocketStream<TcpStream>>, viewport: Arc<Mutex<Viewport>>) {
    while let Some(message) = read.next().await {
        let message = match message {
            Ok(m) => m,
            Err(_) => return,
        };
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => return,
            _ => continue,
        };
        if let Some(new_viewport) = parse_viewer_bounds(&text) {
            *viewport.lock() = new_viewport;
        }
    }
}

/// Sender task: every `push_interval`, computes and sends exactly one
/// snapshot. The interval tick is itself the suspension point so a
/// disconnect or session cancellation is observed promptly rather than
/// after a full interval.
async fn send_snapshots(
    mut write: futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>,
    world: WorldStore,
    viewport: Arc<Mutex<Viewport>>,
    config: Arc<Config>,
) {
    let mut ticker = tokio::time::interval(config.push_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let current = *viewport.lock();
        let buses = visible_buses(&world, &current);
        let frame = SnapshotFrame::new(buses);

        let Ok(payload) = serde_json::to_string(&frame) else {
            continue;
        };
        if write.send(Message::Text(payload.into())).await.is_err() {
            return;
        }
    }
}

/// Compute the vehicles visible to one viewport. Unset viewports get
/// every vehicle in the world — every browser client starts out seeing
/// the whole fleet until it reports bounds.
fn visible_buses(world: &WorldStore, viewport: &Viewport) -> Vec<BusEntry> {
    if !viewport.present {
        return world
            .snapshot_all()
            .into_iter()
            .map(|v| BusEntry { bus_id: v.id, lat: v.lat, lng: v.lng, route: v.route })
            .collect();
    }

    let (lo, hi) = viewport.cell_bounds(world.cell_size());
    world
        .query_cells(lo, hi)
        .into_iter()
        .filter(|v| viewport.contains(v.lat, v.lng))
        .map(|v| BusEntry { bus_id: v.id, lat: v.lat, lng: v.lng, route: v.route })
        .collect()
}
