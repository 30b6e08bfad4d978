// SPDX-License-Identifier: MIT

//! Zombie reaper: a single background task that periodically
//! evicts vehicles whose last update is older than the staleness threshold.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use fleethub_storage::WorldStore;

use crate::clock::epoch_secs;

/// Run the reaper loop until `cancel` fires. Each tick is a suspension
/// point; racing it against `cancel.cancelled()` keeps shutdown prompt
/// rather than waiting out a full `reap_interval`.
pub async fn run(world: WorldStore, staleness_secs: u64, reap_interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(reap_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = cancel.cancelled() => {
                debug!("reaper cancelled");
                return;
            }
        }

        let now = epoch_secs();
        let evicted = world.reap(now, staleness_secs);
        if !evicted.is_empty() {
            info!(count = evicted.len(), ids = ?evicted, "reaped zombie vehicles");
        }

        // Cheap self-healing pass: every real mutation keeps the grid and
        // table in lockstep, so this should never find anything, but an
        // internal-invariant violation is a bug to repair and log, not a
        // reason to take the connection or the process down.
        world.audit_and_repair();
    }
}
