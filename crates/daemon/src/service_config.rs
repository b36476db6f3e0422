use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the storage API to listen on
    pub listen_addr: SocketAddr,

    // data configuration
    /// manifest describing buckets and files to preload,
    ///  if not set the server starts with an empty store
    pub manifest_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080),
            manifest_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
