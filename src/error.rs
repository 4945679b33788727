//! Error type shared by the fetch, materialize and resolve layers

use std::fmt::Display;
use std::path::PathBuf;

/// Everything that can go wrong while locating, downloading or extracting a
/// repository archive.
///
/// - [`CloneError::AlreadyExists`]: a destination file or directory is already present
/// - [`CloneError::NotADirectory`]: an expected directory is missing or is a file
/// - [`CloneError::UnknownSite`]: a site identifier matches no template
/// - [`CloneError::ArchiveIntegrity`]: the archive layout cannot be trusted
/// - [`CloneError::ExtractionIncomplete`]: an expected directory is missing after extraction
/// - [`CloneError::Network`]: the transport failed or the server refused the request
/// - [`CloneError::InvalidName`]: a repository name is not a single path component
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("unknown site: {0}")]
    UnknownSite(String),

    #[error("archive integrity error: {0}")]
    ArchiveIntegrity(String),

    #[error("extraction incomplete: {} is missing", .0.display())]
    ExtractionIncomplete(PathBuf),

    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("invalid repository name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CloneError {
    pub fn network(url: &str, reason: impl Display) -> Self {
        Self::Network { url: url.to_string(), reason: reason.to_string() }
    }
}

impl From<zip::result::ZipError> for CloneError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::ArchiveIntegrity(other.to_string()),
        }
    }
}

pub type Result<T, E = CloneError> = std::result::Result<T, E>;
