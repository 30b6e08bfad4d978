// SPDX-License-Identifier: MIT

//! Producer gateway: one instance per accepted producer socket.

use futures_util::StreamExt;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use fleethub_storage::WorldStore;

use crate::clock::epoch_secs;
use crate::error::FrameError;
use crate::protocol::parse_producer_frame;

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed frame: {0}")]
    Malformed(#[from] FrameError),
}

/// Run the producer gateway for one connection until the peer closes it, a
/// frame fails to parse, or a frame fails schema validation. On any exit
/// path, the connection is simply dropped — no world-store mutation happens
/// on the way out.
pub async fn handle_connection(stream: TcpStream, world: WorldStore) -> Result<(), ProducerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (_write, mut read) = futures_util::StreamExt::split(ws);

    while let Some(message) = read.next().await {
        let message = match message {
            Ok(m) => m,
            Err(_) => break, // connection-closed: release the connection, no mutation
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            Message::Binary(_) => return Err(FrameError::InvalidJson.into()),
            _ => continue, // ping/pong/raw frames: not a data frame, keep reading
        };

        match parse_producer_frame(&text) {
            Ok(Some(frame)) => {
                world.upsert(&frame.bus_id, frame.lat, frame.lng, &frame.route, epoch_secs());
            }
            Ok(None) => {
                debug!("skipped producer frame with missing/empty busId");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
