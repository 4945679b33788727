//! clone: fetch repositories from hosting sites without a git client
//!
//! Repositories are located by probing archive URLs built from a table of
//! site templates, then downloaded as a zip, extracted and renamed to the
//! plain repository name.

pub mod cloner;
pub mod config;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod materialize;
pub mod resolve;

#[cfg(test)]
mod testing;

pub use cloner::clone_repo;
pub use driver::{Driver, Invocation, Outcome, USAGE};
pub use error::{CloneError, Result};
pub use fetch::{fetch, HttpTransport, Transport};
pub use materialize::materialize;
pub use resolve::{search, Candidate, IdentitySnapshot, Names, SiteTable};
