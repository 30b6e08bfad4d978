// SPDX-License-Identifier: MIT

//! Error types for the fleet hub daemon.

use std::net::SocketAddr;
use thiserror::Error;

/// Fatal startup failure: the daemon cannot bind one of its two listening
/// ports. This aborts the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("failed to bind producer endpoint on {addr}: {source}")]
    Producer { addr: SocketAddr, #[source] source: std::io::Error },

    #[error("failed to bind viewer endpoint on {addr}: {source}")]
    Viewer { addr: SocketAddr, #[source] source: std::io::Error },
}

/// A malformed or unexpected frame on either endpoint.
///
/// Producer-side, this terminates the one connection. Viewer-side,
/// malformed frames are logged and dropped; this type is never propagated
/// to terminate a viewer session on its own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame was not valid JSON")]
    InvalidJson,

    #[error("field `{0}` missing or wrong type")]
    SchemaMismatch(&'static str),
}
