// SPDX-License-Identifier: MIT

//! fleethub-daemon: the dual-endpoint WebSocket hub binary and its
//! supporting modules (config, wire protocol, listener supervisor, zombie
//! reaper).

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod clock;
pub mod config;
pub mod env;
pub mod error;
pub mod listener;
pub mod protocol;
pub mod reaper;

use tokio_util::sync::CancellationToken;
use tracing::error;

use fleethub_storage::WorldStore;

use crate::config::Config;
use crate::error::BindError;

/// Build a fresh world store sized by the resolved config and run the
/// listener supervisor until `cancel` fires.
pub async fn run(config: Config, cancel: CancellationToken) -> Result<(), BindError> {
    let world = WorldStore::new(config.cell_size_deg);
    let result = listener::run(config, world, cancel).await;
    if let Err(ref e) = result {
        error!(error = %e, "fatal bind failure");
    }
    result
}
