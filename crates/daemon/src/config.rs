// SPDX-License-Identifier: MIT

//! CLI surface and runtime configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

/// Real-time geospatial fan-out hub for a fleet of moving vehicles.
#[derive(Debug, Parser)]
#[command(name = "fleethubd", version, about)]
pub struct Cli {
    /// Port the producer (bus) WebSocket endpoint listens on.
    #[arg(long = "bus-port", default_value_t = 8080)]
    pub bus_port: u16,

    /// Port the viewer (browser) WebSocket endpoint listens on.
    #[arg(long = "browser-port", default_value_t = 8000)]
    pub browser_port: u16,

    /// Raise the log level. Repeatable: `-v` for debug, `-vv` for trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved configuration for one run of the daemon.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub bus_addr: SocketAddr,
    pub browser_addr: SocketAddr,
    pub cell_size_deg: f64,
    pub staleness_secs: u64,
    pub reap_interval: std::time::Duration,
    pub push_interval: std::time::Duration,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let loopback = IpAddr::V4(Ipv4Addr::LOCALHOST);
        Self {
            bus_addr: SocketAddr::new(loopback, cli.bus_port),
            browser_addr: SocketAddr::new(loopback, cli.browser_port),
            cell_size_deg: crate::env::cell_size_deg(),
            staleness_secs: crate::env::staleness_secs(),
            reap_interval: crate::env::reap_interval(),
            push_interval: crate::env::push_interval(),
        }
    }
}

/// Map a verbosity count to a default `tracing` filter directive.
/// Honors `RUST_LOG` when set, same precedence the corpus uses elsewhere.
pub fn log_filter(verbose: u8) -> String {
    if std::env::var("RUST_LOG").is_ok() {
        return std::env::var("RUST_LOG").unwrap_or_default();
    }
    match verbose {
        0 => "info".to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
