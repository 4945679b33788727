//! In-memory transports and archive fixtures for unit tests

use crate::error::{CloneError, Result};
use crate::fetch::Transport;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Serves fixed bodies by exact URL and records every probe.
#[derive(Default)]
pub struct MockTransport {
    resources: HashMap<String, Vec<u8>>,
    pub probed: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, url: &str, body: Vec<u8>) -> Self {
        self.resources.insert(url.to_string(), body);
        self
    }
}

impl Transport for MockTransport {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let body = self.resources.get(url).ok_or_else(|| CloneError::network(url, "404"))?;
        sink.write_all(body)?;
        Ok(body.len() as u64)
    }

    fn probe(&self, url: &str) -> Result<()> {
        self.probed.borrow_mut().push(url.to_string());
        if self.resources.contains_key(url) {
            Ok(())
        } else {
            Err(CloneError::network(url, "404"))
        }
    }
}

/// Writes part of a body and then drops the connection.
pub struct FailingTransport {
    pub written: Vec<u8>,
}

impl Transport for FailingTransport {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        sink.write_all(&self.written)?;
        sink.flush()?;
        Err(CloneError::network(url, "connection reset"))
    }

    fn probe(&self, url: &str) -> Result<()> {
        Err(CloneError::network(url, "connection reset"))
    }
}

/// Build a zip whose entries appear in the given order. Names ending in `/`
/// become directory entries; everything else is a file holding its own name.
pub fn zip_with_entries(names: &[&str]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for name in names {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add dir");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(name.as_bytes()).expect("write file");
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A GitHub-style archive: `{repo}-master/` with a README and one source file.
pub fn repo_archive(repo: &str) -> Vec<u8> {
    let root = format!("{repo}-master/");
    let readme = format!("{root}README.md");
    let src = format!("{root}src/");
    let main = format!("{root}src/main.rs");
    zip_with_entries(&[&root, &readme, &src, &main])
}
