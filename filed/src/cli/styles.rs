// (c) 2024 Ross Younger
//! CLI output styling

use anstream::ColorChoice;
#[allow(clippy::enum_glob_use)]
use anstyle::AnsiColor::*;
use anstyle::Color::Ansi;
use clap::builder::styling::Styles;
use std::io::IsTerminal;

// RAW STYLE DEFINITIONS //////////////////////////////////////////////////////////////////

/// Error message styling. This can be Displayed directly.
const _ERROR: anstyle::Style = anstyle::Style::new().bold().fg_color(Some(Ansi(Red)));

/// Warning message styling. This can be Displayed directly.
const _WARNING: anstyle::Style = anstyle::Style::new().bold().fg_color(Some(Ansi(Yellow)));

/// Informational message styling. This can be Displayed directly.
const _INFO: anstyle::Style = anstyle::Style::new().fg_color(Some(Ansi(Cyan)));

const _HEADER: anstyle::Style = anstyle::Style::new()
    .underline()
    .fg_color(Some(Ansi(Yellow)));

// COMPOSITE STYLES //////////////////////////////////////////////////////////////////////

// We don't need to make this conditional, as clap already reads the CLICOLOR environment variables.
pub(crate) const CLAP_STYLES: Styles = Styles::styled()
    .usage(_HEADER)
    .header(_HEADER)
    .literal(anstyle::Style::new().bold())
    .invalid(_WARNING)
    .error(_ERROR)
    .valid(_INFO.bold().underline())
    .placeholder(_INFO);

// CONDITIONAL STYLES ////////////////////////////////////////////////////////////////////

/// Error message styling, if colours are enabled; otherwise the empty Style.
#[must_use]
pub(crate) fn error() -> anstyle::Style {
    if use_colours() {
        _ERROR
    } else {
        anstyle::Style::new()
    }
}

// CONDITIONALITY & CLI //////////////////////////////////////////////////////////

/// Are we configured to use terminal colours?
#[must_use]
pub(crate) fn use_colours() -> bool {
    console::colors_enabled()
}

/// Detect the desired colour mode from the environment variables
///
/// See [https://bixense.com/clicolors/](https://bixense.com/clicolors/) for more information.
fn autodetect_colour() -> bool {
    let clicolor_force = std::env::var("CLICOLOR_FORCE").unwrap_or_default();
    let no_color = std::env::var("NO_COLOR").unwrap_or_default();

    if !no_color.is_empty() {
        false
    } else if !clicolor_force.is_empty() {
        true
    } else {
        std::io::stderr().is_terminal()
    }
}

/// Set up the terminal colour mode from the quasi-standard `CLICOLOR_FORCE` and `NO_COLOR` environment variables.
pub(crate) fn configure_colours() {
    let state = autodetect_colour();
    console::set_colors_enabled(state);
    console::set_colors_enabled_stderr(state);
    if state {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
    .write_global();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use rusty_fork::rusty_fork_test;

    use super::{configure_colours, error, use_colours};

    // these tests change process-global colour state, so need to run in forks
    rusty_fork_test! {
        #[test]
        fn no_color_wins() {
            figment::Jail::expect_with(|jail| {
                jail.set_env("NO_COLOR", "1");
                jail.set_env("CLICOLOR_FORCE", "1");
                configure_colours();
                assert!(!use_colours());
                assert_eq!(error(), anstyle::Style::new());
                Ok(())
            });
        }

        #[test]
        fn clicolor_force() {
            figment::Jail::expect_with(|jail| {
                jail.set_env("NO_COLOR", "");
                jail.set_env("CLICOLOR_FORCE", "1");
                configure_colours();
                assert!(use_colours());
                assert_ne!(error(), anstyle::Style::new());
                Ok(())
            });
        }
    }
}
