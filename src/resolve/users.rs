//! Default user names derived from the local environment

use std::collections::HashSet;
use std::path::PathBuf;

/// Identity facts about the running process, gathered once.
///
/// Every field is optional: a source that is unavailable or fails while
/// being queried is simply left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySnapshot {
    pub effective_user: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub user_var: Option<String>,
    pub username_var: Option<String>,
    pub login_name: Option<String>,
}

impl IdentitySnapshot {
    pub fn capture() -> Self {
        Self {
            effective_user: effective_user_name(),
            home_dir: dirs::home_dir(),
            user_var: env_var("USER"),
            username_var: env_var("USERNAME"),
            login_name: login_name(),
        }
    }
}

/// Plausible account names, in priority order, without case-insensitive
/// duplicates. Never fails; may be empty.
pub fn default_users(snapshot: &IdentitySnapshot) -> Vec<String> {
    let home_name = snapshot
        .home_dir
        .as_ref()
        .and_then(|home| home.file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string);

    let candidates = [
        snapshot.effective_user.clone(),
        home_name,
        snapshot.user_var.clone(),
        snapshot.username_var.clone(),
        snapshot.login_name.clone(),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(unix)]
fn effective_user_name() -> Option<String> {
    use nix::unistd::{geteuid, User};

    match User::from_uid(geteuid()) {
        Ok(user) => user.map(|user| user.name),
        Err(err) => {
            tracing::debug!("Effective user lookup failed: {err}");
            None
        }
    }
}

#[cfg(not(unix))]
fn effective_user_name() -> Option<String> {
    env_var("USERNAME").or_else(|| env_var("USER"))
}

#[cfg(unix)]
fn login_name() -> Option<String> {
    // SAFETY: getlogin returns either null or a pointer to a NUL-terminated
    // string in static storage, which is copied out before returning.
    unsafe {
        let ptr = libc::getlogin();
        if ptr.is_null() {
            return None;
        }
        std::ffi::CStr::from_ptr(ptr).to_str().ok().map(str::to_string)
    }
}

#[cfg(not(unix))]
fn login_name() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_yields_nothing() {
        assert!(default_users(&IdentitySnapshot::default()).is_empty());
    }

    #[test]
    fn order_follows_sources() {
        let snapshot = IdentitySnapshot {
            effective_user: Some("root".to_string()),
            home_dir: Some(PathBuf::from("/home/alice")),
            user_var: Some("bob".to_string()),
            username_var: Some("carol".to_string()),
            login_name: Some("dave".to_string()),
        };
        assert_eq!(default_users(&snapshot), vec!["root", "alice", "bob", "carol", "dave"]);
    }

    #[test]
    fn duplicates_are_dropped_case_insensitively() {
        let snapshot = IdentitySnapshot {
            effective_user: Some("Alice".to_string()),
            home_dir: Some(PathBuf::from("/home/alice")),
            user_var: Some("ALICE".to_string()),
            username_var: Some("  ".to_string()),
            login_name: Some("bob".to_string()),
        };
        assert_eq!(default_users(&snapshot), vec!["Alice", "bob"]);
    }

    #[test]
    fn root_home_contributes_nothing() {
        let snapshot =
            IdentitySnapshot { home_dir: Some(PathBuf::from("/")), ..Default::default() };
        assert!(default_users(&snapshot).is_empty());
    }

    #[test]
    fn capture_never_panics() {
        let snapshot = IdentitySnapshot::capture();
        let users = default_users(&snapshot);
        let lowered: HashSet<String> = users.iter().map(|u| u.to_lowercase()).collect();
        assert_eq!(lowered.len(), users.len());
    }
}
