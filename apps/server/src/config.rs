use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use fabricscope_core::constants::DEFAULT_PAGE_SIZE;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Capture to serve; without one the dashboard shows no data
    pub snapshot_path: Option<PathBuf>,
    /// Category catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    pub page_size: usize,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            snapshot_path: None,
            catalog_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .context("Invalid FS_LISTEN_ADDR")?;
        let snapshot_path = non_empty_var("FS_SNAPSHOT_PATH").map(PathBuf::from);
        let catalog_path = non_empty_var("FS_CATALOG_PATH").map(PathBuf::from);
        let page_size: usize = std::env::var("FS_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let cors_allow = std::env::var("FS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("FS_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Ok(Self {
            listen_addr,
            snapshot_path,
            catalog_path,
            page_size,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
