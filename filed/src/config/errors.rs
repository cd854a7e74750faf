//! Configuration error output
// (c) 2024 Ross Younger

use figment::error::{Kind, OneOf};
use thiserror::Error;

/// A newtype wrapper giving figment errors a one-line `Display` that names the offending source
#[derive(Debug, Error, PartialEq)]
pub struct ConfigFileError(#[source] Box<figment::Error>);

impl From<figment::Error> for ConfigFileError {
    fn from(e: figment::Error) -> Self {
        Self(Box::new(e))
    }
}

impl std::ops::Deref for ConfigFileError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ConfigFileError {
    fn fmt_kind(kind: &Kind, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match kind {
            Kind::InvalidType(v, exp) => write!(f, "invalid type: found {v}, expected {exp}"),
            Kind::UnknownVariant(v, exp) => {
                write!(f, "unknown variant: found {v}, expected {}", OneOf(exp))
            }
            _ => std::fmt::Display::fmt(&kind, f),
        }
    }
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let e = self;
        Self::fmt_kind(&e.kind, f)?;

        if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
            if !e.path.is_empty() {
                let key = md.interpolate(profile, &e.path);
                write!(f, " for {key}")?;
            }
        }

        if let Some(md) = &e.metadata {
            if let Some(source) = &md.source {
                write!(f, " at {source}")?;
            } else {
                write!(f, " in {}", md.name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use super::ConfigFileError;
    use figment::error::{Actual, Kind};
    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_type() {
        let err = ConfigFileError::from(figment::Error::from(Kind::InvalidType(
            Actual::Str("many".into()),
            "u16".to_string(),
        )));
        assert_eq!(
            err.to_string(),
            "invalid type: found string \"many\", expected u16"
        );
    }

    #[test]
    fn unknown_variant() {
        let err = ConfigFileError::from(figment::Error::from(Kind::UnknownVariant(
            "martian".to_string(),
            &["local", "utc"],
        )));
        assert_eq!(
            err.to_string(),
            "unknown variant: found martian, expected `local` or `utc`"
        );
    }

    #[test]
    fn names_the_source() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FILED_PORT", "many");
            let err = crate::config::Manager::standard()
                .get::<crate::Configuration>()
                .unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("FILED_"), "{msg}");
            Ok(())
        });
    }
}
