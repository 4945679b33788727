//! Clone orchestration: template lookup, materialization and final rename

use crate::error::{CloneError, Result};
use crate::fetch::Transport;
use crate::materialize::materialize;
use crate::resolve::SiteTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Download `user`'s `repo` from `site` into `parent/repo`.
///
/// `parent` defaults to the current directory. Fails with
/// [`CloneError::AlreadyExists`] before touching the network when
/// `parent/repo` is already present. A successful probe does not guarantee
/// this succeeds: the archive may disappear or change in between.
pub fn clone_repo(
    transport: &dyn Transport,
    table: &SiteTable,
    repo: &str,
    user: &str,
    site: &str,
    parent: Option<&Path>,
) -> Result<PathBuf> {
    validate_repo_name(repo)?;
    let parent = resolve_parent(parent)?;

    let destination = parent.join(repo);
    if destination.exists() {
        return Err(CloneError::AlreadyExists(destination));
    }

    let url = table.url_for(repo, user, site)?;
    tracing::info!("Downloading {url}");
    let extracted = materialize(transport, &url, &parent)?;

    if let Err(err) = fs::rename(&extracted, &destination) {
        if let Err(cleanup) = fs::remove_dir_all(&extracted) {
            tracing::warn!("Failed removing {}: {}", extracted.display(), cleanup);
        }
        return Err(err.into());
    }

    if !destination.is_dir() {
        return Err(CloneError::ExtractionIncomplete(destination));
    }
    tracing::info!("Extracted {} into {}", url, destination.display());
    Ok(destination)
}

fn resolve_parent(parent: Option<&Path>) -> Result<PathBuf> {
    match parent {
        None => Ok(std::env::current_dir()?),
        Some(dir) if dir.is_dir() => Ok(dir.to_path_buf()),
        Some(other) => Err(CloneError::NotADirectory(other.to_path_buf())),
    }
}

fn validate_repo_name(repo: &str) -> Result<()> {
    if repo.is_empty() || repo == "." || repo == ".." || repo.contains(['/', '\\']) {
        return Err(CloneError::InvalidName(repo.to_string()));
    }
    Ok(())
}
