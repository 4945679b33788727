//! Candidate resolution: site templates, default users and existence search

pub mod search;
pub mod sites;
pub mod users;

pub use search::{search, Candidate, Names, Search};
pub use sites::{SiteTable, SiteTemplate, BUILTIN_SITES};
pub use users::{default_users, IdentitySnapshot};
