//! Speculative search across sites and users

use super::sites::SiteTable;
use super::users::{default_users, IdentitySnapshot};
use crate::error::Result;
use crate::fetch::Transport;

/// A (repo, user, site) triple whose archive answered a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub repo: String,
    pub user: String,
    pub site: String,
}

/// One or more names. A bare string converts to a single-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Names(pub Vec<String>);

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Names(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Names(vec![name])
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Names(names)
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        Names(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Names(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Lazy iterator over candidates that pass their probe.
///
/// Probes are issued one at a time as the iterator is advanced, site-major,
/// then by user, then by repo. Failed probes are skipped.
pub struct Search<'a> {
    transport: &'a dyn Transport,
    pending: std::vec::IntoIter<(Candidate, String)>,
}

impl Iterator for Search<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for (candidate, url) in self.pending.by_ref() {
            match self.transport.probe(&url) {
                Ok(()) => {
                    tracing::debug!("Found {}/{} on {}", candidate.user, candidate.repo, candidate.site);
                    return Some(candidate);
                }
                Err(err) => tracing::debug!("Skipping {url}: {err}"),
            }
        }
        None
    }
}

/// Plan a search over every site × user × repo combination.
///
/// `users: None` falls back to [`default_users`] of the current process and
/// `sites: None` to every site in `table`. Site names are resolved up front,
/// so an unknown site fails here before anything is probed.
pub fn search<'a>(
    transport: &'a dyn Transport,
    table: &SiteTable,
    repos: impl Into<Names>,
    users: Option<Names>,
    sites: Option<Names>,
) -> Result<Search<'a>> {
    let repos = repos.into().0;
    let users = users.map_or_else(|| default_users(&IdentitySnapshot::capture()), |names| names.0);
    let sites = sites.map_or_else(|| table.ids().map(str::to_string).collect(), |names| names.0);

    let mut pending = Vec::with_capacity(sites.len() * users.len() * repos.len());
    for site in &sites {
        let template = table.resolve(site)?;
        for user in &users {
            for repo in &repos {
                let candidate =
                    Candidate { repo: repo.clone(), user: user.clone(), site: template.id.clone() };
                pending.push((candidate, template.render(user, repo)));
            }
        }
    }
    tracing::debug!("Planned {} probes", pending.len());

    Ok(Search { transport, pending: pending.into_iter() })
}
