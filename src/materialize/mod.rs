//! Repository materialization
//!
//! Turns an archive URL into an extracted directory under a parent folder.
//! Extraction happens in a hidden staging directory next to the final
//! location, so a failure part-way through never leaves a half-populated
//! tree where the repository should be.

use crate::error::{CloneError, Result};
use crate::fetch::{fetch, Transport};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use zip::ZipArchive;

pub mod layout;

pub use layout::find_root_entry;

const STAGING_PREFIX: &str = ".clone-";

/// Download the archive at `url` into `parent` and extract it there.
///
/// Returns the path of the archive's top-level directory, still under the
/// name the archive gave it. The downloaded file is removed on every path.
pub fn materialize(transport: &dyn Transport, url: &str, parent: &Path) -> Result<PathBuf> {
    if !parent.is_dir() {
        return Err(CloneError::NotADirectory(parent.to_path_buf()));
    }

    let archive = TempPath::from_path(fetch(transport, url, Some(parent))?);
    extract_archive(&archive, parent)
}

/// Extract a local zip into `parent`, returning its top-level directory.
pub fn extract_archive(archive_path: &Path, parent: &Path) -> Result<PathBuf> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let names = entry_names(&mut archive)?;

    let root = find_root_entry(names.iter().map(String::as_str))?.trim_end_matches('/').to_string();
    let target = parent.join(&root);
    if target.exists() {
        return Err(CloneError::AlreadyExists(target));
    }

    let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir_in(parent)?;
    tracing::debug!(
        "Extracting {} entries from {} via {}",
        names.len(),
        archive_path.display(),
        staging.path().display()
    );
    archive.extract(staging.path())?;

    let staged_root = staging.path().join(&root);
    if !staged_root.is_dir() {
        return Err(CloneError::ExtractionIncomplete(target));
    }

    let prefix = format!("{root}/");
    let stray = names.iter().filter(|name| !name.starts_with(&prefix)).count();
    if stray > 0 {
        tracing::debug!("Discarding {stray} entries outside {prefix}");
    }

    if target.exists() {
        return Err(CloneError::AlreadyExists(target));
    }
    fs::rename(&staged_root, &target)?;

    if !target.is_dir() {
        return Err(CloneError::ExtractionIncomplete(target));
    }
    Ok(target)
}

fn entry_names(archive: &mut ZipArchive<File>) -> Result<Vec<String>> {
    (0..archive.len())
        .map(|index| -> Result<String> { Ok(archive.by_index_raw(index)?.name().to_string()) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{repo_archive, zip_with_entries, MockTransport};
    use tempfile::TempDir;

    const URL: &str = "https://example.test/alice/widget/archive/master.zip";

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("ls")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn extracts_root_and_removes_archive() {
        let tmp = TempDir::new().expect("tmp");
        let transport = MockTransport::new().with_resource(URL, repo_archive("widget"));

        let root = materialize(&transport, URL, tmp.path()).expect("materialize");
        assert_eq!(root, tmp.path().join("widget-master"));
        assert!(root.join("README.md").is_file());
        assert!(root.join("src").join("main.rs").is_file());
        assert_eq!(names_in(tmp.path()), vec!["widget-master".to_string()]);
    }

    #[test]
    fn missing_parent_is_not_a_directory() {
        let tmp = TempDir::new().expect("tmp");
        let transport = MockTransport::new().with_resource(URL, repo_archive("widget"));

        let err = materialize(&transport, URL, &tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CloneError::NotADirectory(_)));
    }

    #[test]
    fn absolute_entry_fails_and_leaves_nothing() {
        let tmp = TempDir::new().expect("tmp");
        let body = zip_with_entries(&["widget-master/", "/tmp/escaped"]);
        let transport = MockTransport::new().with_resource(URL, body);

        let err = materialize(&transport, URL, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("absolute path in archive"));
        assert!(names_in(tmp.path()).is_empty());
    }

    #[test]
    fn archive_without_root_marker_fails() {
        let tmp = TempDir::new().expect("tmp");
        let body = zip_with_entries(&["README.md"]);
        let transport = MockTransport::new().with_resource(URL, body);

        let err = materialize(&transport, URL, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("archive is empty/malformed"));
        assert!(names_in(tmp.path()).is_empty());
    }

    #[test]
    fn empty_archive_fails() {
        let tmp = TempDir::new().expect("tmp");
        let transport = MockTransport::new().with_resource(URL, zip_with_entries(&[]));

        let err = materialize(&transport, URL, tmp.path()).unwrap_err();
        assert!(matches!(err, CloneError::ArchiveIntegrity(_)));
    }

    #[test]
    fn corrupt_archive_is_an_integrity_error() {
        let tmp = TempDir::new().expect("tmp");
        let transport = MockTransport::new().with_resource(URL, b"not a zip".to_vec());

        let err = materialize(&transport, URL, tmp.path()).unwrap_err();
        assert!(matches!(err, CloneError::ArchiveIntegrity(_)));
        assert!(names_in(tmp.path()).is_empty());
    }

    #[test]
    fn existing_root_is_never_merged() {
        let tmp = TempDir::new().expect("tmp");
        let existing = tmp.path().join("widget-master");
        fs::create_dir(&existing).expect("mkdir");
        fs::write(existing.join("keep.txt"), b"mine").expect("write");
        let transport = MockTransport::new().with_resource(URL, repo_archive("widget"));

        let err = materialize(&transport, URL, tmp.path()).unwrap_err();
        assert!(matches!(err, CloneError::AlreadyExists(ref p) if *p == existing));
        assert_eq!(names_in(&existing), vec!["keep.txt".to_string()]);
        assert_eq!(names_in(tmp.path()), vec!["widget-master".to_string()]);
    }

    #[test]
    fn entries_outside_root_are_discarded() {
        let tmp = TempDir::new().expect("tmp");
        let body = zip_with_entries(&["widget-master/", "widget-master/a.txt", "stray.txt"]);
        let transport = MockTransport::new().with_resource(URL, body);

        let root = materialize(&transport, URL, tmp.path()).expect("materialize");
        assert!(root.join("a.txt").is_file());
        assert_eq!(names_in(tmp.path()), vec!["widget-master".to_string()]);
    }
}
