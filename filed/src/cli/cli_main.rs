//! Main CLI for filed
// (c) 2024 Ross Younger

use std::ffi::OsString;
use std::process::ExitCode;

use super::args::CliArgs;
use crate::{
    cli::styles::{configure_colours, error, use_colours},
    config::{Configuration, Manager},
    util::{ConsoleTraceType, setup_tracing, trace_level},
};

use anyhow::{Context, Result};

/// Main CLI entrypoint
///
/// Call this from `main`, passing the arguments to use.
/// Normally you will call `cli(std::env::args_os())` but you can pass in alternate arguments for CLI testing.
///
/// In server mode this starts a multi-threaded tokio runtime and does not return until interrupted.
#[must_use]
pub fn cli<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli_inner(args)
        .inspect_err(|e| {
            if crate::util::tracing_is_initialised() {
                tracing::error!("{e:#}");
            } else {
                anstream::eprintln!("{ERROR}Error:{ERROR:#} {e:#}", ERROR = error());
            }
        })
        .map_or(ExitCode::FAILURE, |()| ExitCode::SUCCESS)
}

/// Inner CLI logic
fn cli_inner<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    configure_colours();
    let Some(args) = parse_args(args)? else {
        return Ok(()); // help/version shown; exit
    };

    let manager = Manager::from(&args);
    if args.show_config {
        println!("{}", show_config_data(&manager));
        let _ = manager.validate_configuration()?;
        return Ok(());
    }

    let config = manager.validate_configuration()?;
    setup_tracing(
        trace_level(args.debug, args.quiet),
        ConsoleTraceType::Standard,
        config.log_file(),
        config.time_format,
        use_colours(),
    )?;
    run_server(&config)
}

fn parse_args<I, T>(args: I) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
    match CliArgs::custom_parse(args) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), DisplayHelp | DisplayVersion) => {
            let message = e.render();
            if use_colours() {
                println!("{}", message.ansi());
            } else {
                println!("{message}");
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn show_config_data(manager: &Manager) -> String {
    format!(
        "Server configuration:\n{}",
        manager.to_display_adapter::<Configuration>()
    )
}

// MODE HANDLERS ///////////////////////////////////////////////////////////

#[tokio::main]
async fn run_server(config: &Configuration) -> Result<()> {
    crate::server_main(config)
        .await
        .with_context(|| "[Server] failed")
}
