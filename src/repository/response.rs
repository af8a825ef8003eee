use core::time::Duration;
use std::sync::Arc;

/// Outcome of a repository request, ready to be put on the wire by whatever serves it.
#[derive(Debug, Clone)]
pub enum RepositoryResponse {
    /// A generated document.
    Document {
        content_type: &'static str,
        body: String,
        max_age: Duration,
    },

    /// Headers only, in answer to a HEAD request.
    Headers {
        content_type: &'static str,
        content_length: usize,
        last_modified: Option<String>,
        max_age: Duration,
    },

    /// The artifact lives upstream at `location`.
    Redirect { location: String, max_age: Duration },

    NotFound(String),

    /// The request can never succeed as made, for example a file name that does not match its coordinate.
    BadRequest(String),

    /// The path exists but does not answer this method.
    MethodNotAllowed,

    /// The upstream failed or answered with something that could not be used.
    UpstreamFailure(Arc<ohno::AppError>),
}

impl RepositoryResponse {
    /// HTTP status code for this response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Document { .. } | Self::Headers { .. } => 200,
            Self::Redirect { .. } => 307,
            Self::NotFound(_) => 404,
            Self::BadRequest(_) => 400,
            Self::MethodNotAllowed => 405,
            Self::UpstreamFailure(_) => 502,
        }
    }

    /// Response headers, in the order they should be sent.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Document {
                content_type,
                body,
                max_age,
            } => vec![
                ("Content-Type", (*content_type).to_string()),
                ("Content-Length", body.len().to_string()),
                ("Cache-Control", cache_control(*max_age)),
            ],
            Self::Headers {
                content_type,
                content_length,
                last_modified,
                max_age,
            } => {
                let mut headers = vec![
                    ("Content-Type", (*content_type).to_string()),
                    ("Content-Length", content_length.to_string()),
                ];
                if let Some(last_modified) = last_modified {
                    headers.push(("Last-Modified", last_modified.clone()));
                }
                headers.push(("Cache-Control", cache_control(*max_age)));
                headers
            }
            Self::Redirect { location, max_age } => vec![("Location", location.clone()), ("Cache-Control", cache_control(*max_age))],
            Self::MethodNotAllowed => vec![("Allow", "GET".to_string())],
            Self::NotFound(_) | Self::BadRequest(_) | Self::UpstreamFailure(_) => Vec::new(),
        }
    }

    /// Human-readable detail for error responses.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::NotFound(detail) | Self::BadRequest(detail) => Some(detail.clone()),
            Self::MethodNotAllowed => Some("method not allowed".to_string()),
            Self::UpstreamFailure(e) => Some(format!("{e:#}")),
            Self::Document { .. } | Self::Headers { .. } | Self::Redirect { .. } => None,
        }
    }
}

/// `Cache-Control` value letting clients and proxies keep a response for `max_age`.
#[must_use]
pub fn cache_control(max_age: Duration) -> String {
    format!("public, max-age={}", max_age.as_secs())
}
