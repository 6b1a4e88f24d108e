//! `agrocast serve <service>`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use agrocast_api::{Service, ServiceConfig};

/// `serve` arguments. Flags override the matching environment variables.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// storage, collector, ml, gateway or visualization.
    pub service: Service,

    /// Listen port (env `PORT`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Parameter layout JSON for the collector (env `AGROCAST_CONFIG`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory with `districts.json` and region tables (env `AGROCAST_DATA_DIR`).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Model JSON for the ML service (env `MODEL_PATH`).
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Also write logs to `<log_dir>/<service>.log`.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl ServeArgs {
    /// Environment configuration with the flags applied.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::from_env(self.service)
            .with_context(|| format!("reading {} configuration", self.service))?;
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.config {
            config.layout_path = path.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(path) = &self.model {
            config.model_path = path.clone();
        }
        Ok(config)
    }
}

/// Run the service on a multi-threaded runtime until Ctrl-C.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let config = args.service_config()?;
    tracing::debug!(?config, "service configuration");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime
        .block_on(agrocast_api::serve(config))
        .with_context(|| format!("{} service failed", args.service))?;
    Ok(0)
}
