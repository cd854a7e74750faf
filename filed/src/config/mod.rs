// (c) 2024 Ross Younger
//! # 📖 Configuration management
//!
//! filed obtains run-time configuration from the following sources, in order:
//! 1. Command-line options
//! 2. Environment variables, named `FILED_` followed by the field name in upper case
//!    (e.g. `FILED_PORT`, `FILED_MAX_CONNECTIONS`)
//! 3. Hard-wired defaults
//!
//! Each option may be given in more than one place, but only the first match is used.
//!
//! Run `filed --show-config` to see the configuration that would be used, and where each value came from.
//!
//! ## Options
//!
//! See [`Configuration`] for the full list.
//!
//! | Field | Default | Meaning |
//! |---|---|---|
//! | `port` | 27015 | TCP port to listen on |
//! | `address` | 0.0.0.0 | Local address to listen on |
//! | `root` | _(the directory containing the executable)_ | Directory to serve files from |
//! | `max_connections` | 0 _(unlimited)_ | Sessions served at once |
//! | `time_format` | local | Log timestamp format: `local`, `utc` or `rfc3339` |
//! | `log_file` | _(none)_ | Also log to this file |
//!
//! Logging verbosity is not part of the configuration; use `--debug`, `--quiet` or `RUST_LOG`.

mod errors;
pub use errors::ConfigFileError;

mod structure;
pub use structure::Configuration;
pub(crate) use structure::ConfigurationOverrides;

mod sysdefault;
use sysdefault::SystemDefault;

mod manager;
pub use manager::Manager;

mod prettyprint;
pub use prettyprint::DisplayAdapter;

/// Prefix of the environment variables we read configuration from
pub const ENV_PREFIX: &str = "FILED_";
