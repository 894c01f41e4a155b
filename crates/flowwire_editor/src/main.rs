// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flowwire Editor - headless driver for the flowwire dataflow graph
//!
//! Loads a RON config, builds the demo scene, wires an extra connection
//! through the pointer state machine and logs the resulting graph.
//!
//! Usage: `flowwire_editor [CONFIG | --init]`. Without an argument,
//! `flowwire.ron` in the working directory is used if present; `--init`
//! writes the default config there first.

mod config;
mod scene;
mod session;

use config::{EditorConfig, CONFIG_FILE_NAME};
use session::{EditorError, EditorSession};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<EditorConfig, EditorError> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) if arg == "--init" => {
            let config = EditorConfig::default();
            config.save(Path::new(CONFIG_FILE_NAME))?;
            return Ok(config);
        }
        Some(arg) => PathBuf::from(arg),
        None if Path::new(CONFIG_FILE_NAME).exists() => PathBuf::from(CONFIG_FILE_NAME),
        None => return Ok(EditorConfig::default()),
    };
    Ok(EditorConfig::load(&path)?)
}

fn run(config: EditorConfig) -> Result<(), EditorError> {
    let mut session = EditorSession::new(config);
    session.run_demo()?;
    let graph = session.graph();
    tracing::info!(
        graph = %graph.name,
        nodes = graph.node_count(),
        sockets = graph.socket_count(),
        connections = graph.connection_count(),
        "session finished"
    );
    Ok(())
}

fn main() {
    let config = load_config();

    // RUST_LOG wins over the configured filter
    let filter = match &config {
        Ok(config) => config.log_filter.clone(),
        Err(_) => EditorConfig::default().log_filter,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Flowwire Editor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.and_then(run) {
        tracing::error!("Editor failed: {e}");
        std::process::exit(1);
    }
}
