//! Loading transit data sets from disk or over HTTP.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::error::LoadError;
use super::records::TransitData;

/// Request timeout for remote data sets.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a data set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document served over HTTP(S).
    Url(String),
}

impl DataSource {
    /// Interpret a location string: `http://` and `https://` prefixes mean a
    /// URL, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Read and parse the data set.
    pub async fn load(&self, http: &reqwest::Client) -> Result<TransitData, LoadError> {
        match self {
            DataSource::File(path) => read_file(path),
            DataSource::Url(url) => fetch(http, url).await,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Build the HTTP client used for remote data sets.
pub fn http_client() -> Result<reqwest::Client, LoadError> {
    Ok(reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?)
}

/// Read a data set from a JSON file.
pub fn read_file(path: &Path) -> Result<TransitData, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "read data file");
    TransitData::from_json(&contents)
}

/// Fetch a data set from a URL.
pub async fn fetch(http: &reqwest::Client, url: &str) -> Result<TransitData, LoadError> {
    let response = http.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!(url, bytes = body.len(), "fetched data set");
    TransitData::from_json(&body)
}
