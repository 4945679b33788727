//! Top-level driver: positional arguments in, one reported outcome out

use crate::cloner::clone_repo;
use crate::error::{CloneError, Result};
use crate::fetch::Transport;
use crate::resolve::{search, Names, SiteTable};
use std::io::Write;
use std::path::PathBuf;

pub const USAGE: &str = "Usage:\n    clone REPO [USER] [SITE]";

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub repo: String,
    pub user: Option<String>,
    pub site: Option<String>,
}

impl Invocation {
    /// `repo`, `repo user` or `repo user site`. Any other arity is a usage error.
    pub fn from_positional(args: &[String]) -> Option<Self> {
        match args {
            [repo] => Some(Self { repo: repo.clone(), user: None, site: None }),
            [repo, user] => Some(Self { repo: repo.clone(), user: Some(user.clone()), site: None }),
            [repo, user, site] => Some(Self {
                repo: repo.clone(),
                user: Some(user.clone()),
                site: Some(site.clone()),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cloned { repo: String, path: PathBuf },
    NotFound { repo: String },
    Listed { count: usize },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Cloned { .. } => true,
            Outcome::NotFound { .. } => false,
            Outcome::Listed { count } => *count > 0,
        }
    }
}

pub struct Driver<'a> {
    transport: &'a dyn Transport,
    sites: &'a SiteTable,
    parent: Option<PathBuf>,
    list_only: bool,
}

impl<'a> Driver<'a> {
    pub fn new(transport: &'a dyn Transport, sites: &'a SiteTable) -> Self {
        Self { transport, sites, parent: None, list_only: false }
    }

    pub fn parent(mut self, parent: Option<PathBuf>) -> Self {
        self.parent = parent;
        self
    }

    pub fn list_only(mut self, list_only: bool) -> Self {
        self.list_only = list_only;
        self
    }

    /// Search for the repository and clone the first hit, reporting to `out`.
    ///
    /// Only "not found" is folded into the outcome; every other failure is
    /// returned as an error.
    pub fn drive(&self, invocation: &Invocation, out: &mut dyn Write) -> Result<Outcome> {
        if let Some(parent) = self.parent.as_deref().filter(|parent| !parent.is_dir()) {
            return Err(CloneError::NotADirectory(parent.to_path_buf()));
        }

        let users = invocation.user.clone().map(Names::from);
        let sites = invocation.site.clone().map(Names::from);
        let mut candidates =
            search(self.transport, self.sites, invocation.repo.as_str(), users, sites)?;

        if self.list_only {
            let mut count = 0;
            for candidate in candidates {
                writeln!(out, "{} {} {}", candidate.site, candidate.user, candidate.repo)?;
                count += 1;
            }
            if count == 0 {
                writeln!(out, "Repo {} not found.", invocation.repo)?;
            }
            return Ok(Outcome::Listed { count });
        }

        let Some(candidate) = candidates.next() else {
            writeln!(out, "Repo {} not found.", invocation.repo)?;
            return Ok(Outcome::NotFound { repo: invocation.repo.clone() });
        };

        let path = clone_repo(
            self.transport,
            self.sites,
            &candidate.repo,
            &candidate.user,
            &candidate.site,
            self.parent.as_deref(),
        )?;
        writeln!(out, "Repo {} cloned to {}.", candidate.repo, path.display())?;
        Ok(Outcome::Cloned { repo: candidate.repo, path })
    }
}
