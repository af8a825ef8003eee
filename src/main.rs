//! Presents Hangar and Modrinth projects as a Maven repository.
//!
//! # Usage
//!
//! Serve the repository to Maven and Gradle clients:
//!
//! ```bash
//! maven-bridge serve --bind 0.0.0.0:8000
//! ```
//!
//! and point the build at `http://localhost:8000/repository/`.
//!
//! Print the version listing of a Modrinth project built for Fabric:
//!
//! ```bash
//! maven-bridge get com/modrinth/fabric/fabric-api/maven-metadata.xml
//! ```
//!
//! Print the POM of a Hangar plugin version, or only its headers:
//!
//! ```bash
//! maven-bridge get io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.pom
//! maven-bridge get --head io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.pom
//! ```
//!
//! JAR paths print the upstream download location a repository client would be redirected to.
//!
//! # Configuration
//!
//! Settings are read from `bridge.toml`, `bridge.yml`, `bridge.yaml` or `bridge.json` in the
//! current directory, or from the file given with `--config`. Run `maven-bridge init` to write
//! the defaults, and `maven-bridge validate` to check a file.
//!
//! Any setting can be overridden from the environment with the `MC_MAVEN_BRIDGE__` prefix and
//! `__` between sections, for example `MC_MAVEN_BRIDGE__HANGAR__API_BASE_URL`.
//!
//! # Logging
//!
//! Diagnostics go to stderr at the level given with `--log-level`; `RUST_LOG` overrides it.

use maven_bridge::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host writing to the real stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
