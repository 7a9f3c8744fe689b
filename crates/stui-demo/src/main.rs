#![forbid(unsafe_code)]

//! stui demo binary entry point.

use std::net::SocketAddr;

use stui_demo::{app, cli};
use stui_runtime::{Server, ServerConfig, ShutdownHandle};
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    if json {
        stui_core::logging::init_json("info");
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

/// Stop the accept loop on SIGINT / SIGTERM.
#[cfg(unix)]
fn watch_signals(handle: ShutdownHandle) {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(signals) => signals,
        Err(e) => {
            tracing::warn!(error = %e, "signal handling unavailable");
            return;
        }
    };
    let spawned = std::thread::Builder::new()
        .name("stui-signals".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::warn!(signal, "termination signal received, shutting down");
                handle.shutdown();
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "signal handling unavailable");
    }
}

#[cfg(not(unix))]
fn watch_signals(_handle: ShutdownHandle) {}

fn main() {
    let opts = cli::Opts::parse();
    init_logging(opts.log_json);

    let config = ServerConfig::default()
        .with_bind_addr(SocketAddr::new(opts.bind, opts.port))
        .with_max_sessions(opts.max_sessions);
    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    watch_signals(server.shutdown_handle());

    if let Err(e) = server.serve(app::build) {
        tracing::error!(error = %e, "server error");
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
    tracing::info!("server stopped");
}
