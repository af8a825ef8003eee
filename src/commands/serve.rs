use super::Host;
use crate::Result;
use crate::config::Config;
use crate::repository::Repository;
use crate::server;
use camino::Utf8Path;
use clap::Parser;
use core::net::SocketAddr;
use ohno::IntoAppError;
use std::io::Write;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address and port to listen on
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,
}

/// Serve the repository over HTTP until the process is interrupted.
pub async fn serve_repository<H: Host>(host: &mut H, config_path: Option<&Utf8Path>, args: &ServeArgs) -> Result<()> {
    let config = Config::load(Utf8Path::new("."), config_path)?;
    let repository = Repository::from_config(&config)?;

    let listener = TcpListener::bind(args.bind)
        .await
        .into_app_err_with(|| format!("listening on {}", args.bind))?;
    let addr = listener.local_addr().into_app_err("reading the listening address")?;
    let _ = writeln!(host.output(), "Maven repository available at http://{addr}/repository/");

    server::serve(listener, repository, server::shutdown_signal()).await
}
