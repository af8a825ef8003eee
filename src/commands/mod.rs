//! Command-line interface for maven-bridge
//!
//! - **get**: resolve one repository path through the [`Repository`](crate::repository::Repository)
//!   and print what a client would receive
//! - **init**: write a default configuration file
//! - **serve**: answer repository requests over HTTP
//! - **validate**: load a configuration file and check its values
//!
//! Commands write through a [`Host`] so they can be driven from tests.

mod common;
mod get;
mod host;
mod init;
mod run;
mod serve;
mod validate;

pub use common::{LogLevel, init_logging};
pub use get::{GetArgs, get_artifact};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use serve::{ServeArgs, serve_repository};
pub use validate::validate_config;
