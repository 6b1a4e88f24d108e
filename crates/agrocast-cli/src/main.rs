//! # agrocast CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use agrocast_cli::catalog::{run_districts, run_regions, DistrictsArgs};
use agrocast_cli::deploy::{run_deploy, DeployArgs};
use agrocast_cli::logging;
use agrocast_cli::serve::{run_serve, ServeArgs};

/// agrocast: crop yield analytics services.
#[derive(Parser, Debug)]
#[command(name = "agrocast", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one HTTP service.
    Serve(ServeArgs),

    /// Start, stop or restart the docker compose deployment.
    Deploy(DeployArgs),

    /// List regions of the built-in table.
    Regions,

    /// List districts of a region, or of every region.
    Districts(DistrictsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = match &cli.command {
        Commands::Serve(args) => logging::init(
            cli.verbose,
            "info",
            args.log_json,
            args.log_dir.as_deref().map(|dir| (dir, args.service.name())),
        ),
        _ => logging::init(cli.verbose, "warn", false, None),
    };
    let _log_guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("agrocast: {e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args),
        Commands::Deploy(args) => run_deploy(args),
        Commands::Regions => run_regions(),
        Commands::Districts(args) => run_districts(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrocast_api::Service;
    use agrocast_cli::deploy::DeployTarget;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "agrocast",
            "serve",
            "storage",
            "--port",
            "9000",
            "--data-dir",
            "/srv/source",
            "--log-dir",
            "logs",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.service, Service::Storage);
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.data_dir, Some(PathBuf::from("/srv/source")));
        assert_eq!(args.log_dir, Some(PathBuf::from("logs")));
        assert!(!args.log_json);

        let config = args.service_config().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/srv/source"));
    }

    #[test]
    fn cli_parse_serve_rejects_unknown_service() {
        assert!(Cli::try_parse_from(["agrocast", "serve", "webmaster"]).is_err());
    }

    #[test]
    fn cli_parse_deploy_targets() {
        for (name, target) in [
            ("help", DeployTarget::Help),
            ("start", DeployTarget::Start),
            ("stop", DeployTarget::Stop),
            ("restart", DeployTarget::Restart),
        ] {
            let cli = Cli::try_parse_from(["agrocast", "deploy", name]).unwrap();
            let Commands::Deploy(args) = cli.command else {
                panic!("expected deploy");
            };
            assert_eq!(args.target, target);
            assert_eq!(args.compose_file, PathBuf::from("docker-compose.yml"));
        }
    }

    #[test]
    fn cli_parse_deploy_defaults_to_help() {
        let cli = Cli::try_parse_from(["agrocast", "deploy"]).unwrap();
        let Commands::Deploy(args) = cli.command else {
            panic!("expected deploy");
        };
        assert_eq!(args.target, DeployTarget::Help);
    }

    #[test]
    fn cli_parse_deploy_compose_file() {
        let cli = Cli::try_parse_from([
            "agrocast",
            "deploy",
            "start",
            "--compose-file",
            "deploy/compose.prod.yml",
        ])
        .unwrap();
        let Commands::Deploy(args) = cli.command else {
            panic!("expected deploy");
        };
        assert_eq!(args.compose_file, PathBuf::from("deploy/compose.prod.yml"));
    }

    #[test]
    fn cli_parse_deploy_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["agrocast", "deploy", "nuke"]).is_err());
    }

    #[test]
    fn cli_parse_districts() {
        let cli = Cli::try_parse_from(["agrocast", "districts", "Тамбовская область", "--json"]).unwrap();
        let Commands::Districts(args) = cli.command else {
            panic!("expected districts");
        };
        assert_eq!(args.region.as_deref(), Some("Тамбовская область"));
        assert!(args.json);
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["agrocast", "regions"]).unwrap();
        assert_eq!(cli.verbose, 0);
        let cli = Cli::try_parse_from(["agrocast", "-vv", "regions"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["agrocast", "regions", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["agrocast"]).is_err());
    }
}
