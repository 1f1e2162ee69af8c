//! Binary entrypoint for the editor bridge.
use std::process;

use bridge_engine::{Bridge, Services};
use bridge_server::Server;
use clap::Parser;
use tracing::{error, info, warn};

/// Command-line and environment configuration.
mod cli;

use crate::cli::Cli;

fn main() {
    // Values from `./.env` feed the `CURSOR_*` flags; real env vars win.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_path = cli.log_path();
    let _log_guard = match logging::init(&cli.log.spec(), &log_path) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to open log file {}: {}", log_path.display(), e);
            process::exit(1);
        }
    };

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring .env: {}", e),
    }

    let settings = cli.settings();
    let bridge = Bridge::new(settings, Services::platform());
    let caps = bridge.capabilities();
    info!("Capabilities: {}", caps);
    if !(caps.windows && caps.keys) {
        warn!("Window or key automation unavailable; requests will open files but not paste");
    }
    info!(
        "Editor: {} (window match '{}'), message file: {}",
        bridge.settings().executable,
        bridge.settings().title_match,
        bridge.settings().message_path.display()
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let server = Server::new(bridge).with_host(cli.host).with_port(cli.port);
    if let Err(e) = runtime.block_on(server.run()) {
        error!("{}", e);
        process::exit(1);
    }
}
