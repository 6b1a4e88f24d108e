//! # Deployment Wrapper
//!
//! `agrocast deploy <target>` runs `docker compose` against the compose
//! file. Each target is one or two compose invocations:
//!
//! | Target | Invocations |
//! |--------|-------------|
//! | `help` | none, prints the targets |
//! | `start` | `up -d --build` |
//! | `stop` | `down` |
//! | `restart` | `down`, then `up -d --build` if `down` succeeded |
//!
//! The exit status of the last invocation becomes the command's exit
//! status, unchanged.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

/// Default compose file.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Exit code reported when compose was killed by a signal.
const SIGNALLED_EXIT_CODE: u8 = 1;

/// `deploy` arguments.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// What to do.
    #[arg(value_enum, default_value_t = DeployTarget::Help)]
    pub target: DeployTarget,

    /// Compose file to pass to `docker compose -f`.
    #[arg(long, default_value = DEFAULT_COMPOSE_FILE)]
    pub compose_file: PathBuf,

    /// Compose launcher.
    #[arg(long, default_value = "docker", hide = true)]
    pub docker: OsString,
}

/// Deployment targets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    /// List the targets.
    Help,
    /// Build and start every service in the background.
    Start,
    /// Stop and remove every service.
    Stop,
    /// Stop, then start.
    Restart,
}

/// One `docker compose` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStep {
    /// `up -d --build`
    Up,
    /// `down`
    Down,
}

impl ComposeStep {
    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Up => &["up", "-d", "--build"],
            Self::Down => &["down"],
        }
    }
}

impl DeployTarget {
    /// Compose steps the target runs, in order.
    pub fn steps(self) -> &'static [ComposeStep] {
        match self {
            Self::Help => &[],
            Self::Start => &[ComposeStep::Up],
            Self::Stop => &[ComposeStep::Down],
            Self::Restart => &[ComposeStep::Down, ComposeStep::Up],
        }
    }
}

fn print_help() {
    println!("Available targets:");
    for target in DeployTarget::value_variants() {
        if let Some(pv) = target.to_possible_value() {
            let about = pv.get_help().map(|h| h.to_string()).unwrap_or_default();
            println!("  {:<8} {about}", pv.get_name());
        }
    }
}

/// Execute the deploy subcommand.
pub fn run_deploy(args: &DeployArgs) -> Result<u8> {
    if args.target == DeployTarget::Help {
        print_help();
        return Ok(0);
    }

    let mut code = 0;
    for step in args.target.steps() {
        code = compose(args, *step)?;
        if code != 0 {
            tracing::warn!(?step, code, "compose step failed, stopping");
            break;
        }
    }
    Ok(code)
}

fn compose(args: &DeployArgs, step: ComposeStep) -> Result<u8> {
    let mut cmd = Command::new(&args.docker);
    cmd.arg("compose").arg("-f").arg(&args.compose_file).args(step.args());
    tracing::info!(?cmd, "running");

    let status = cmd
        .status()
        .with_context(|| format!("failed to launch {}", args.docker.to_string_lossy()))?;
    Ok(match status.code() {
        Some(code) => u8::try_from(code).unwrap_or(SIGNALLED_EXIT_CODE),
        None => SIGNALLED_EXIT_CODE,
    })
}
