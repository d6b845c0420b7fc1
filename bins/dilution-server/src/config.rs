//! Server configuration loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    /// Address to bind the HTTP server.
    pub bind_addr: SocketAddr,
    /// Path to the fixed reference dataset.
    pub reference_path: PathBuf,
    /// Path to the tracer reference data.
    pub tracer_path: PathBuf,
    /// Path to the persisted custom dataset.
    pub custom_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("DILUTION_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("DILUTION_BIND_ADDR must be a host:port address")?;

        let reference_path = std::env::var("DILUTION_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/dilution_data.json"));

        let tracer_path = std::env::var("DILUTION_TRACER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/tracer_info.json"));

        let custom_path = std::env::var("DILUTION_CUSTOM_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/custom_data.json"));

        Ok(Config {
            bind_addr,
            reference_path,
            tracer_path,
            custom_path,
        })
    }
}
