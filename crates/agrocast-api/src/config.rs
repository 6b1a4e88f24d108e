//! # Service Configuration
//!
//! Which service to run and where it finds its inputs. Values come from the
//! environment and may be overridden by the CLI.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use agrocast_client::ServiceUrls;

/// The agrocast services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Region tables over HTTP.
    Storage,
    /// Series slicing and model input preparation.
    Collector,
    /// Yield model and regression.
    Ml,
    /// Scenario orchestration.
    Gateway,
    /// Browser-facing select and scenario proxy.
    Visualization,
}

impl Service {
    /// Every service, in start-up order.
    pub const ALL: [Service; 5] = [
        Service::Storage,
        Service::Collector,
        Service::Ml,
        Service::Gateway,
        Service::Visualization,
    ];

    /// Service name as used on the command line and in log files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Collector => "collector",
            Self::Ml => "ml",
            Self::Gateway => "gateway",
            Self::Visualization => "visualization",
        }
    }

    /// Port the service listens on unless told otherwise.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Storage => 8000,
            Self::Collector => 8001,
            Self::Ml => 8002,
            Self::Gateway => 8003,
            Self::Visualization => 8050,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|svc| svc.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Service::ALL.iter().map(|s| s.name()).collect();
                format!("unknown service '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Runtime configuration of one service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Which service.
    pub service: Service,
    /// Listen port.
    pub port: u16,
    /// Directory with `districts.json` and the region CSV tables (storage).
    pub data_dir: PathBuf,
    /// Parameter layout JSON (collector). Absent file means the built-in layout.
    pub layout_path: PathBuf,
    /// Model JSON (ml).
    pub model_path: PathBuf,
    /// Upstream service addresses.
    pub urls: ServiceUrls,
}

impl ServiceConfig {
    /// Load from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: the service's standard port)
    /// - `AGROCAST_DATA_DIR` (default: `source`)
    /// - `AGROCAST_CONFIG` (default: `config.json`)
    /// - `MODEL_PATH` (default: `models/model.json`)
    /// - plus the upstream URLs read by [`ServiceUrls::from_env`]
    pub fn from_env(service: Service) -> Result<Self, agrocast_client::ConfigError> {
        Ok(Self {
            service,
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| service.default_port()),
            data_dir: env_path("AGROCAST_DATA_DIR", "source"),
            layout_path: env_path("AGROCAST_CONFIG", "config.json"),
            model_path: env_path("MODEL_PATH", "models/model.json"),
            urls: ServiceUrls::from_env()?,
        })
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_round_trip() {
        for svc in Service::ALL {
            assert_eq!(svc.name().parse::<Service>().unwrap(), svc);
        }
        assert!("webmaster".parse::<Service>().is_err());
    }

    #[test]
    fn default_ports() {
        assert_eq!(Service::Storage.default_port(), 8000);
        assert_eq!(Service::Gateway.default_port(), 8003);
        assert_eq!(Service::Visualization.default_port(), 8050);
    }

    #[test]
    fn env_path_default() {
        assert_eq!(
            env_path("AGROCAST_NONEXISTENT_PATH_VAR_17", "source"),
            PathBuf::from("source")
        );
    }
}
