//! Archive layout checks
//!
//! Hosting sites package the default branch as a zip with a single folder at
//! the top (`widget-master/`, `alice-widget-0a1b2c3d/`, ...). The folder is
//! recognised by its directory marker: an entry with exactly one `/`, at the
//! end. This is a packaging convention rather than a property of the zip
//! format, so every assumption about it lives here.

use crate::error::{CloneError, Result};

/// Find the top-level directory entry, validating every entry on the way.
///
/// Fails when any entry is absolute or climbs out with `..`, and when no
/// directory marker of the form `name/` is present. The first marker wins.
pub fn find_root_entry<'a, I>(names: I) -> Result<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root = None;
    for name in names {
        if is_absolute(name) {
            return Err(CloneError::ArchiveIntegrity(format!("absolute path in archive: {name:?}")));
        }
        if name.split(['/', '\\']).any(|part| part == "..") {
            return Err(CloneError::ArchiveIntegrity(format!(
                "path traversal in archive: {name:?}"
            )));
        }
        if root.is_none() && is_root_marker(name) {
            root = Some(name);
        }
    }
    root.ok_or_else(|| CloneError::ArchiveIntegrity("archive is empty/malformed".to_string()))
}

/// `name/` and nothing else.
pub fn is_root_marker(name: &str) -> bool {
    name.len() > 1 && name.ends_with('/') && name.matches('/').count() == 1
}

fn is_absolute(name: &str) -> bool {
    let bytes = name.as_bytes();
    name.is_empty()
        || name.starts_with('/')
        || name.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}
