//! Archive fetching
//!
//! Downloads a single resource to disk. The destination is created with
//! create-new semantics and is removed again if anything fails before the
//! body has been fully written.

use crate::error::{CloneError, Result};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

pub mod transport;

pub use transport::{HttpTransport, Transport};

/// Download `url` to `destination`, returning the path written.
///
/// - `None` saves into the current working directory.
/// - An existing directory gets the URL's last path segment appended.
/// - Anything else is used as the file path as-is.
///
/// Never overwrites: an occupied destination fails with
/// [`CloneError::AlreadyExists`] and the existing file is left untouched.
pub fn fetch(transport: &dyn Transport, url: &str, destination: Option<&Path>) -> Result<PathBuf> {
    let target = match destination {
        Some(dest) if !dest.is_dir() => dest.to_path_buf(),
        Some(dir) => dir.join(required_file_name(url)?),
        None => std::env::current_dir()?.join(required_file_name(url)?),
    };

    let file = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(CloneError::AlreadyExists(target));
        }
        Err(err) => return Err(err.into()),
    };
    // Removed on drop unless kept.
    let scratch = TempPath::from_path(target);

    let mut writer = BufWriter::new(file);
    let bytes = transport.download(url, &mut writer)?;
    writer.flush()?;
    drop(writer);

    tracing::debug!("Fetched {} bytes from {} into {}", bytes, url, scratch.display());
    scratch.keep().map_err(|err| CloneError::Io(err.error))
}

/// Last path segment of a URL, ignoring query string and fragment.
pub fn archive_file_name(url: &str) -> Option<&str> {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    let trimmed = &url[..end];
    let path = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => trimmed,
    };
    path.rsplit('/').next().filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

fn required_file_name(url: &str) -> Result<&str> {
    archive_file_name(url).ok_or_else(|| CloneError::network(url, "URL has no file name"))
}
