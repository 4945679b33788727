//! clone: Download a repository's default branch without installing git
//!
//! Probes the known hosting sites for an archive of the requested repository,
//! downloads the first one found and extracts it under the repository name.

use anyhow::Result;
use std::process::ExitCode;

mod cli;

fn main() -> Result<ExitCode> {
    cli::run()
}
