use super::Host;
use crate::Result;
use crate::config::Config;
use camino::Utf8Path;
use std::io::Write;

pub fn validate_config<H: Host>(host: &mut H, config_path: Option<&Utf8Path>) -> Result<()> {
    match Config::load(Utf8Path::new("."), config_path) {
        Ok(_) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using the configuration found in the current directory, or the defaults");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
