//! Configuration structure
// (c) 2024 Ross Younger

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use figment::{
    Metadata, Profile, Provider,
    providers::Serialized,
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use struct_field_names_as_array::FieldNamesAsSlice;

use crate::protocol::DEFAULT_PORT;
use crate::util::TimeFormat;

/// The set of configurable options supported by filed.
///
/// Each may be set on the command line (in kebab-case), or in the environment
/// as `FILED_<FIELD_NAME>` (e.g. `FILED_PORT=9000`).
/// The command line takes priority over the environment, which takes priority over the hard-wired defaults.
///
/// There is no `default()`.
/// You can access the hard-wired defaults through [`Configuration::system_default()`].
///
// Maintainer note: None of the members of this struct should be Option<anything>.
// Use an empty value where "not set" is meaningful.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, FieldNamesAsSlice)]
pub struct Configuration {
    /// TCP port to listen on
    pub port: u16,
    /// Local address to listen on
    pub address: IpAddr,
    /// Directory to serve files from.
    /// Empty means the directory containing the executable.
    pub root: String,
    /// Maximum number of sessions served at once; 0 means unlimited
    pub max_connections: u32,
    /// Time format to use in log messages
    pub time_format: TimeFormat,
    /// Also log to this file. Empty means no log file.
    pub log_file: String,
}

static SYSTEM_DEFAULT_CONFIG: LazyLock<Configuration> = LazyLock::new(|| Configuration {
    port: DEFAULT_PORT,
    address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    root: String::new(),
    max_connections: 0,
    time_format: TimeFormat::Local,
    log_file: String::new(),
});

impl Configuration {
    /// Hard-wired configuration
    #[must_use]
    pub fn system_default() -> &'static Self {
        &SYSTEM_DEFAULT_CONFIG
    }

    /// Checks the values that can be checked without side effects.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_empty() {
            anyhow::ensure!(
                Path::new(&self.root).is_dir(),
                "root {:?} is not a directory",
                self.root
            );
        }
        Ok(())
    }

    /// Convenience accessor
    #[must_use]
    pub fn log_file(&self) -> Option<&str> {
        if self.log_file.is_empty() {
            None
        } else {
            Some(&self.log_file)
        }
    }
}

/// Command-line overrides for [`Configuration`].
///
/// Every member is optional; anything not given on the command line falls through
/// to lower priority sources.
#[derive(Debug, Clone, Default, PartialEq, clap::Args, Serialize)]
pub(crate) struct ConfigurationOverrides {
    /// TCP port to listen on [default: 27015]
    #[arg(short, long, value_name("PORT"), help_heading("Server"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) port: Option<u16>,

    /// Local address to listen on [default: 0.0.0.0, i.e. all IPv4 interfaces]
    #[arg(short, long, value_name("IP"), help_heading("Server"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) address: Option<IpAddr>,

    /// Directory to serve files from [default: the directory containing this program]
    #[arg(short, long, value_name("DIR"), help_heading("Server"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) root: Option<String>,

    /// Maximum number of clients served at once. Further clients wait their turn.
    /// [default: 0, meaning unlimited]
    #[arg(short, long, value_name("N"), help_heading("Server"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_connections: Option<u32>,

    /// Time format to use in log messages [default: local]
    #[arg(short('T'), long, value_name("FORMAT"), help_heading("Output"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) time_format: Option<TimeFormat>,

    /// Log to a file as well as the console.
    ///
    /// The log file honours `RUST_LOG_FILE_DETAIL` if it is set, otherwise it receives the same
    /// messages as the console.
    #[arg(short('L'), long, value_name("FILE"), help_heading("Output"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) log_file: Option<String>,
}

impl ConfigurationOverrides {
    const META_NAME: &str = "command line";
}

impl Provider for ConfigurationOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named(Self::META_NAME)
    }

    fn data(&self) -> std::result::Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use figment::Figment;
    use pretty_assertions::assert_eq;

    use super::{Configuration, ConfigurationOverrides};
    use crate::util::TimeFormat;

    #[test]
    fn defaults() {
        let d = Configuration::system_default();
        assert_eq!(d.port, 27015);
        assert_eq!(d.address.to_string(), "0.0.0.0");
        assert!(d.root.is_empty());
        assert_eq!(d.max_connections, 0);
        assert_eq!(d.log_file(), None);
        d.validate().unwrap();
    }

    #[test]
    fn validate_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Configuration::system_default().clone();
        cfg.root = dir.path().to_string_lossy().to_string();
        cfg.validate().unwrap();

        cfg.root = dir.path().join("nope").to_string_lossy().to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("not a directory"));

        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        cfg.root = file.to_string_lossy().to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn overrides_only_provide_what_was_set() {
        let o = ConfigurationOverrides {
            port: Some(1234),
            time_format: Some(TimeFormat::Utc),
            ..Default::default()
        };
        let f = Figment::new().merge(o);
        assert_eq!(f.extract_inner::<u16>("port").unwrap(), 1234);
        assert_eq!(
            f.extract_inner::<TimeFormat>("time_format").unwrap(),
            TimeFormat::Utc
        );
        assert!(!f.contains("address"));
        assert!(!f.contains("root"));
    }

    #[test]
    fn log_file_accessor() {
        let mut cfg = Configuration::system_default().clone();
        cfg.log_file = "x.log".into();
        assert_eq!(cfg.log_file(), Some("x.log"));
    }
}
