//! wvguard host
//!
//! Serves the license action endpoint and the plugin listing for one guarded
//! plugin, with license keys kept in a local SQLite options file.
//!
//! Usage:
//!   wvguard-host --plugin-file wp-content/plugins/demo/demo.php --port 8080

use std::{path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wvguard_host::{build_router, read_plugin_version, HostState, LifecycleEvent};
use wvguard_license::{IntegrationConfig, LicenseClient, LicenseStore};
use wvguard_storage::SqliteOptions;

#[derive(Parser, Debug)]
#[command(name = "wvguard-host")]
#[command(about = "License guard host for a single plugin")]
struct Args {
    /// Main file of the guarded plugin, inside its plugin directory
    #[arg(long)]
    plugin_file: PathBuf,

    /// Plugin version (defaults to the Version header of the plugin file)
    #[arg(long)]
    plugin_version: Option<String>,

    /// Licensing API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Domain reported to the licensing server (defaults to the hostname)
    #[arg(long)]
    domain: Option<String>,

    /// SQLite file holding the options table
    #[arg(long, default_value = "wvguard-options.db")]
    db: PathBuf,

    /// HTTP port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let version = match args.plugin_version {
        Some(version) => version,
        None => read_plugin_version(&args.plugin_file)?,
    };

    let mut builder = IntegrationConfig::builder(args.plugin_file.to_string_lossy(), version);
    if let Some(url) = args.api_url {
        builder = builder.api_base_url(url);
    }
    let config = builder.build().context("Invalid plugin configuration")?;

    let domain = match args.domain {
        Some(domain) => domain,
        None => hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string()),
    };

    let options = SqliteOptions::open(&args.db)
        .with_context(|| format!("Failed to open options database {:?}", args.db))?;
    let store = LicenseStore::new(Arc::new(options));
    let client = LicenseClient::new(&config, &domain).context("Failed to create license client")?;

    info!(plugin = %config.plugin_id(), %domain, "wvguard host starting");
    let state = Arc::new(HostState::new(config, store, client));

    if let Err(e) = state.on_lifecycle(LifecycleEvent::Bootstrap).await {
        warn!("License affordances stay disabled until the next lifecycle check: {}", e);
    }

    match state.controller().update_metadata_url() {
        Ok(url) => debug!("Update metadata URL prepared for {}", url.host_str().unwrap_or("-")),
        Err(e) => warn!("Failed to build update metadata URL: {}", e),
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;
    info!("HTTP endpoint listening on port {}", args.port);

    axum::serve(listener, build_router(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
