use std::fmt;
use std::time::Duration;

use camino::Utf8PathBuf;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::AnnotationError;
use crate::fs_util;

/// A reference document, either published remotely or already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Remote(String),
    Local(Utf8PathBuf),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Remote(url) => write!(f, "{url}"),
            Resource::Local(path) => write!(f, "{path}"),
        }
    }
}

impl Resource {
    /// Uses the local file when one is given, the URL otherwise.
    pub fn from_override(url: &str, local: Option<Utf8PathBuf>) -> Self {
        match local {
            Some(path) => Resource::Local(path),
            None => Resource::Remote(url.to_string()),
        }
    }
}

/// Supplies raw reference text. Failures are fatal to the run and never retried here.
pub trait DataSource: Send + Sync {
    fn fetch_text(&self, resource: &Resource) -> Result<String, AnnotationError>;
}

#[derive(Clone)]
pub struct HttpDataSource {
    client: Client,
    timeout: Duration,
}

impl HttpDataSource {
    pub fn new(timeout: Duration) -> Result<Self, AnnotationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-as/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AnnotationError::InvalidConfig(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| AnnotationError::SourceFetch {
                resource: "http client".to_string(),
                message: err.to_string(),
            })?;
        Ok(Self { client, timeout })
    }

    fn get_text(&self, url: &str) -> Result<String, AnnotationError> {
        let fetch_error = |err: reqwest::Error| AnnotationError::SourceFetch {
            resource: url.to_string(),
            message: if err.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                err.to_string()
            },
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "request failed".to_string());
            return Err(AnnotationError::SourceStatus {
                resource: url.to_string(),
                status,
                message,
            });
        }
        response.text().map_err(fetch_error)
    }
}

impl DataSource for HttpDataSource {
    fn fetch_text(&self, resource: &Resource) -> Result<String, AnnotationError> {
        match resource {
            Resource::Remote(url) => {
                tracing::debug!(%url, "downloading");
                self.get_text(url)
            }
            Resource::Local(path) => fs_util::read_text(path),
        }
    }
}

/// Reads local files only; remote resources are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDataSource;

impl DataSource for OfflineDataSource {
    fn fetch_text(&self, resource: &Resource) -> Result<String, AnnotationError> {
        match resource {
            Resource::Local(path) => fs_util::read_text(path),
            Resource::Remote(url) => Err(AnnotationError::SourceFetch {
                resource: url.clone(),
                message: "network access disabled (--offline)".to_string(),
            }),
        }
    }
}
