// SPDX-License-Identifier: MIT

//! Wall-clock time in whole seconds, as used for `Vehicle::last_seen` and
//! the reaper's staleness comparisons. Built on the `Clock` abstraction
//! carried over from the corpus's clock module so tests can swap in a
//! `FakeClock` rather than sleeping real seconds.

use fleethub_core::{Clock, SystemClock};

/// Seconds since the Unix epoch, using the process-wide system clock.
pub fn epoch_secs() -> u64 {
    SystemClock.epoch_ms() / 1000
}

/// Seconds since the Unix epoch, using a caller-supplied clock (tests).
pub fn epoch_secs_with(clock: &impl Clock) -> u64 {
    clock.epoch_ms() / 1000
}
