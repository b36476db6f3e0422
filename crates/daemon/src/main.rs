//! gcs-mock - in-memory Cloud Storage JSON API for integration tests
//!
//! Serves bucket creation, object upload, download and listing from memory,
//! optionally seeded from a YAML manifest before the listener starts.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use gcs_mock_daemon::{spawn_service, ServiceConfig};

/// In-memory Cloud Storage mock server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// YAML manifest of buckets and files to preload
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        Self {
            listen_addr: SocketAddr::new(args.host, args.port),
            manifest_path: args.manifest,
            log_level: args.log_level,
            log_dir: args.log_dir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from(Args::parse());

    // a failed preload or bind ends the process with a non-zero exit code
    spawn_service(&config).await?;
    Ok(())
}
