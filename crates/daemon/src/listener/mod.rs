// SPDX-License-Identifier: MIT

//! Listener supervisor: binds the two listening ports and spawns
//! the reaper; roots all work so that cancelling it tears down every
//! descendant cooperatively.

mod producer;
mod viewer;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use fleethub_storage::WorldStore;

use crate::config::Config;
use crate::error::BindError;
use crate::reaper;

/// Bind both endpoints, then run until `cancel` fires.
///
/// Producer and viewer connections are each handled in their own spawned
/// task — a failure in one viewer session never disturbs any other session
/// or the reaper — each connection runs in its own task.
pub async fn run(config: Config, world: WorldStore, cancel: CancellationToken) -> Result<(), BindError> {
    let bus_listener = TcpListener::bind(config.bus_addr)
        .await
        .map_err(|source| BindError::Producer { addr: config.bus_addr, source })?;
    let browser_listener = TcpListener::bind(config.browser_addr)
        .await
        .map_err(|source| BindError::Viewer { addr: config.browser_addr, source })?;

    info!(bus_addr = %config.bus_addr, browser_addr = %config.browser_addr, "fleet hub listening");

    let config = Arc::new(config);

    tokio::spawn(reaper::run(
        world.clone(),
        config.staleness_secs,
        config.reap_interval,
        cancel.clone(),
    ));

    loop {
        tokio::select! {
            accepted = bus_listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let world = world.clone();
                        tokio::spawn(async move {
                            if let Err(e) = producer::handle_connection(stream, world).await {
                                error!(%addr, error = %e, "producer connection ended");
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "bus accept error"),
                }
            }
            accepted = browser_listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let world = world.clone();
                        let config = Arc::clone(&config);
                        let session_cancel = cancel.child_token();
                        tokio::spawn(async move {
                            viewer::run_session(stream, world, config, session_cancel).await;
                            info!(%addr, "viewer session ended");
                        });
                    }
                    Err(e) => error!(error = %e, "browser accept error"),
                }
            }
            _ = cancel.cancelled() => {
                info!("listener supervisor cancelled, draining");
                return Ok(());
            }
        }
    }
}
