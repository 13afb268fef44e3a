// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Launch records dashboard binary.
//!
//! Loads the dataset (downloading it on first run) and serves the dashboard.

// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use launch_dashboard::dataset::{DEFAULT_DATA_FILE, DEFAULT_DATA_URL};
use launch_dashboard::{load_dataset, run_server, DashboardContext, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "launch-dashboard")]
#[command(about = "Interactive launch records dashboard with web frontend")]
#[command(version)]
struct Args {
    /// Local launch records CSV (downloaded from --data-url if absent)
    #[arg(long, env = "LAUNCH_DASHBOARD_DATA", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Fallback URL for the dataset
    #[arg(long, env = "LAUNCH_DASHBOARD_DATA_URL", default_value = DEFAULT_DATA_URL)]
    data_url: String,

    /// Address to bind the web server to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for web server
    #[arg(short, long, default_value = "8050")]
    port: u16,

    /// Don't open browser automatically
    #[arg(long)]
    no_browser: bool,

    /// Timeout for the dataset download in seconds
    #[arg(long, default_value = "30")]
    download_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing - RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!(
        data = %args.data.display(),
        host = %args.host,
        port = args.port,
        "Starting launch-dashboard"
    );

    if let Err(e) = run(args).await {
        tracing::error!("launch-dashboard failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let (table, _) = load_dataset(
        &args.data,
        &args.data_url,
        Duration::from_secs(args.download_timeout_secs),
    )
    .await
    .with_context(|| {
        format!(
            "Failed to load launch records from {} (fallback {})",
            args.data.display(),
            args.data_url
        )
    })?;

    let ctx = DashboardContext::new(table);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        open_browser: !args.no_browser,
    };
    run_server(ctx, config).await
}
