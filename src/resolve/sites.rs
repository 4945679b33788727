//! Hosting site URL templates

use crate::error::{CloneError, Result};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Built-in sites, in search order.
pub const BUILTIN_SITES: &[(&str, &str)] = &[
    ("bitbucket", "https://bitbucket.org/{user}/{repo}/get/master.zip"),
    ("github", "https://github.com/{user}/{repo}/archive/master.zip"),
];

static BUILTIN: Lazy<SiteTable> = Lazy::new(|| SiteTable {
    entries: BUILTIN_SITES
        .iter()
        .map(|(id, pattern)| SiteTemplate { id: id.to_string(), pattern: pattern.to_string() })
        .collect(),
});

/// Archive URL pattern for one site, with `{user}` and `{repo}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTemplate {
    pub id: String,
    pub pattern: String,
}

impl SiteTemplate {
    pub fn render(&self, user: &str, repo: &str) -> String {
        self.pattern.replace("{user}", user).replace("{repo}", repo)
    }
}

/// Ordered, immutable set of site templates keyed by lowercase identifier.
#[derive(Debug, Clone)]
pub struct SiteTable {
    entries: Vec<SiteTemplate>,
}

impl SiteTable {
    pub fn builtin() -> &'static SiteTable {
        &BUILTIN
    }

    /// Built-in sites followed by `extra`. Extra entries cannot replace a
    /// built-in site and must carry both placeholders; offenders are skipped.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> SiteTable {
        let mut table = SiteTable::builtin().clone();
        for (id, pattern) in extra {
            let id = id.trim().to_lowercase();
            if id.is_empty() {
                tracing::warn!("Ignoring site template with an empty name");
            } else if table.get(&id).is_some() {
                tracing::warn!("Ignoring site template '{id}': already defined");
            } else if !pattern.contains("{user}") || !pattern.contains("{repo}") {
                tracing::warn!("Ignoring site template '{id}': needs {{user}} and {{repo}}");
            } else {
                table.entries.push(SiteTemplate { id, pattern: pattern.clone() });
            }
        }
        table
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&SiteTemplate> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Case-insensitive lookup. A name with a dotted suffix (`github.com`,
    /// `GitHub.x`) is retried without the last suffix before giving up.
    pub fn resolve(&self, site: &str) -> Result<&SiteTemplate> {
        let lowered = site.to_lowercase();
        if let Some(entry) = self.get(&lowered) {
            return Ok(entry);
        }
        strip_suffix(&lowered)
            .and_then(|base| self.get(base))
            .ok_or_else(|| CloneError::UnknownSite(site.to_string()))
    }

    pub fn url_for(&self, repo: &str, user: &str, site: &str) -> Result<String> {
        Ok(self.resolve(site)?.render(user, repo))
    }
}

/// Everything before the last `.`, ignoring leading dots.
fn strip_suffix(name: &str) -> Option<&str> {
    let leading = name.len() - name.trim_start_matches('.').len();
    let dot = name[leading..].rfind('.')? + leading;
    Some(&name[..dot])
}
