//! # agrocast-cli: Command-Line Tool for agrocast
//!
//! Provides the `agrocast` binary.
//!
//! ## Subcommands
//!
//! - `agrocast serve <service>` runs one HTTP service.
//! - `agrocast deploy <target>` drives the docker compose deployment.
//! - `agrocast regions` / `agrocast districts [REGION]` print the built-in
//!   region table.
//!
//! ```bash
//! agrocast serve storage --data-dir source --port 8000
//! agrocast deploy restart --compose-file docker-compose.yml
//! agrocast districts "Тамбовская область"
//! ```

pub mod catalog;
pub mod deploy;
pub mod logging;
pub mod serve;
