use super::Host;
use crate::Result;
use crate::config::Config;
use crate::repository::{Method, Repository, RepositoryResponse};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Repository path, such as `com/modrinth/fabric/fabric-api/maven-metadata.xml`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Print only the headers a HEAD request would return
    #[arg(long)]
    pub head: bool,
}

/// Answer one repository request and print the result.
///
/// Documents go to the output as-is, redirects print their target, and HEAD requests print
/// headers. Error responses are reported on the error stream and exit with status 1.
pub async fn get_artifact<H: Host>(host: &mut H, config_path: Option<&Utf8PathBuf>, args: &GetArgs) -> Result<()> {
    let config = Config::load(Utf8Path::new("."), config_path.map(Utf8PathBuf::as_path))?;
    let repository = Repository::from_config(&config)?;

    let method = if args.head { Method::Head } else { Method::Get };
    let response = repository.handle(method, &args.path).await;

    match &response {
        RepositoryResponse::Document { body, .. } => {
            let _ = writeln!(host.output(), "{body}");
        }
        RepositoryResponse::Headers { .. } => {
            let mut out = host.output();
            for (name, value) in response.headers() {
                let _ = writeln!(out, "{name}: {value}");
            }
        }
        RepositoryResponse::Redirect { location, .. } => {
            let _ = writeln!(host.output(), "{location}");
        }
        RepositoryResponse::NotFound(_)
        | RepositoryResponse::BadRequest(_)
        | RepositoryResponse::MethodNotAllowed
        | RepositoryResponse::UpstreamFailure(_) => {
            let detail = response.detail().unwrap_or_default();
            let _ = writeln!(host.error(), "{} {detail}", response.status());
            host.exit(1);
        }
    }

    Ok(())
}
