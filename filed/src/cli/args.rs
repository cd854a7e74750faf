//! Command-line arguments
// (c) 2024 Ross Younger

use std::ffi::OsString;

use clap::{CommandFactory as _, FromArgMatches as _, Parser};

use super::styles::CLAP_STYLES;
use crate::config::{ConfigurationOverrides, Manager};

/// Serves files over TCP. A client sends a filename and receives the file's contents
/// (or an error message) in reply, as many times as it likes on the same connection.
#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    infer_long_args(true),
    help_expected(true),
    max_term_width(120)
)]
pub(crate) struct CliArgs {
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=filed=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Output"), display_order(0))]
    pub(crate) debug: bool,

    /// Quiet mode: reports only errors
    #[arg(short, long, action, conflicts_with("debug"), help_heading("Output"))]
    pub(crate) quiet: bool,

    /// Outputs the configuration, then exits.
    ///
    /// The output shows where each value came from: the command line, the environment or the defaults.
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub(crate) show_config: bool,

    /// Configuration options
    #[command(flatten)]
    pub(crate) config: ConfigurationOverrides,
}

impl CliArgs {
    /// Parses arguments, with our styling applied
    pub(crate) fn custom_parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::command().styles(CLAP_STYLES);
        let mut matches = cli.try_get_matches_from(args)?;
        Self::from_arg_matches_mut(&mut matches)
    }
}

impl From<&CliArgs> for Manager {
    /// Merges the environment, then the command line, over the system defaults
    fn from(args: &CliArgs) -> Self {
        let mut mgr = Manager::standard();
        mgr.merge_provider(args.config.clone());
        mgr.apply_system_default();
        mgr
    }
}
