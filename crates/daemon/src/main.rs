// SPDX-License-Identifier: MIT

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleethub_daemon::config::{log_filter, Cli, Config};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(cli.verbose)))
        .init();

    let config = Config::from_cli(&cli);
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received interrupt, shutting down");
            signal_cancel.cancel();
        }
    });

    match fleethub_daemon::run(config, cancel).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("fleethubd: {e}");
            std::process::exit(1);
        }
    }
}
