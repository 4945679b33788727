//! Configuration loading
//!
//! Settings come from an optional config file; command-line flags are
//! applied on top by the CLI (CLI > File > Defaults).

pub mod loader;

pub use loader::{default_config_dir, load_config, Config};
