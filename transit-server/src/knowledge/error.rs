//! Knowledge base error and warning types.

use std::fmt;
use std::path::PathBuf;

use crate::domain::{ConnectionId, StationId};

/// Errors that can occur while loading a transit data set.
///
/// Loading is all-or-nothing: any of these leaves the previous knowledge
/// base (or the unloaded state) in place.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Data file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data was not valid JSON or didn't match the record layout
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("fetching {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Data set contains no stations
    #[error("data set contains no stations")]
    Empty,

    /// A station record failed validation
    #[error("invalid station '{id}': {reason}")]
    InvalidStation { id: String, reason: String },

    /// Two stations share an id
    #[error("duplicate station id {0}")]
    DuplicateStation(StationId),

    /// A connection record failed validation
    #[error("invalid connection {connection}: {reason}")]
    InvalidConnection { connection: String, reason: String },

    /// Two connections share an (origin, destination, line) key
    #[error("duplicate connection {0}")]
    DuplicateConnection(ConnectionId),

    /// A connection refers to a station that isn't in the data set
    #[error("connection {connection} refers to unknown station {station}")]
    UnknownStation { connection: String, station: String },
}

/// A rule entry that was skipped while loading.
///
/// Warnings never stop a load or a query; they are logged and returned to
/// callers alongside every search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWarning {
    /// Position of the entry in the source rule list.
    pub index: usize,
    /// The declared rule type, if one could be read.
    pub kind: Option<String>,
    pub reason: String,
}

impl RuleWarning {
    pub fn new(index: usize, kind: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "rule #{} ({kind}) skipped: {}", self.index, self.reason),
            None => write!(f, "rule #{} skipped: {}", self.index, self.reason),
        }
    }
}
