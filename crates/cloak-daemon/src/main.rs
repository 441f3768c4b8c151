//! cloakd — hide-list daemon.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use cloak_config::logging::{init_logging, LogLevel};
use cloak_daemon::server;
use cloak_daemon::support::PropertySupport;
use cloak_engine::{EngineConfig, HideEngine, ProcfsReaper};
use cloak_store::HideStore;

#[derive(Parser)]
#[command(name = "cloakd")]
#[command(version, about = "Hide-list daemon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon (default)
    Start,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LogLevel::Info);

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => start_daemon().await?,
    }
    Ok(())
}

async fn start_daemon() -> Result<()> {
    let config = cloak_config::config().clone();
    info!(socket = %config.daemon.socket.display(), "starting cloakd");

    let store = HideStore::open(&config.storage.database)?;

    let engine_cfg = EngineConfig {
        package_registry: config.platform.package_registry.clone(),
        app_data_dir: config.platform.app_data_dir.clone(),
        proc_root: config.platform.proc_root.clone(),
        manager_package: config.platform.manager_package.clone(),
        sdk_level: config.platform.sdk_level,
        max_prefix_len: config.matching.max_prefix_len,
    };
    let reaper = ProcfsReaper::new(&config.platform.proc_root);
    let engine = Arc::new(HideEngine::new(
        engine_cfg,
        store,
        Box::new(reaper),
        Arc::new(PropertySupport),
    ));

    // Replay a persisted enable from before the last daemon restart
    if let Err(e) = engine.auto_start(true) {
        warn!(error = %e, "auto-start replay failed");
    }

    let result = server::run_listener(config.daemon.socket.clone(), Arc::clone(&engine)).await;

    info!("shutting down");
    result
}
