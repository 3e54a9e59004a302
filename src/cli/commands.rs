use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::app::build_router;
use crate::config::AppConfig;
use crate::hot_reload::{watch_routes, SharedRouter};
use crate::logging::init_logging;
use crate::server::{AppService, HttpServer, ServerHandle};

/// Command-line interface for Enzovu
#[derive(Parser)]
#[command(name = "enzovu")]
#[command(about = "Enzovu application server", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the application
    Serve {
        /// Address and port to bind (defaults to APP_HOST:APP_PORT)
        #[arg(long)]
        addr: Option<String>,

        /// Rebuild the routes whenever this file or directory changes
        #[arg(long)]
        watch: Option<PathBuf>,
    },
    /// Print the route table and exit
    Routes,
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - Logging cannot be initialised
/// - A route pattern is malformed
/// - The watcher cannot be installed
/// - The server cannot bind its address
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run(cli, AppConfig::from_env())
}

/// Execute an already-parsed command against `config`.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Routes => {
            let router = build_router(&config).context("Failed to build routes")?;
            router.dump_routes();
            Ok(())
        }
        Commands::Serve { addr, watch } => serve(config, addr, watch),
    }
}

fn serve(config: AppConfig, addr: Option<String>, watch: Option<PathBuf>) -> Result<()> {
    init_logging(&config.log_config())?;
    may::config().set_stack_size(config.stack_size);

    let router = build_router(&config).context("Failed to build routes")?;
    info!(
        app = %config.name,
        environment = %config.environment,
        routes_count = router.len(),
        stack_size = config.stack_size,
        "Routes registered"
    );

    let shared = SharedRouter::new(router);
    let _watcher = match watch {
        Some(path) => {
            let rebuild_config = config.clone();
            let watcher = watch_routes(&path, shared.clone(), move || {
                build_router(&rebuild_config).context("Failed to rebuild routes")
            })
            .with_context(|| format!("Failed to watch {}", path.display()))?;
            Some(watcher)
        }
        None => None,
    };

    let addr = addr.unwrap_or_else(|| config.bind_address());
    let handle = HttpServer(AppService::new(shared))
        .start(addr.as_str())
        .with_context(|| format!("Failed to bind {addr}"))?;
    handle.wait_ready().context("Server did not become ready")?;

    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("Server coroutine panicked: {e:?}"))
}
