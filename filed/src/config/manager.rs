//! Configuration source wrangling
// (c) 2024 Ross Younger

use super::{Configuration, ENV_PREFIX, SystemDefault, errors::ConfigFileError};

use anyhow::Result;
use figment::{Figment, Provider, providers::Env};
use serde::Deserialize;

/// Processes and merges all possible configuration sources.
///
/// Sources are merged in increasing order of priority: each [`merge_provider`](Self::merge_provider)
/// overrides whatever came before it.
/// The system defaults go in last, underneath everything else.
#[derive(Debug, Clone)]
pub struct Manager {
    /// Configuration data
    pub(super) data: Figment,
}

impl Manager {
    fn new(apply_env: bool) -> Self {
        let mut new1 = Self {
            data: Figment::new(),
        };
        if apply_env {
            new1.merge_provider(Env::prefixed(ENV_PREFIX));
        }
        new1
    }

    /// General constructor for production use.
    ///
    /// Reads the `FILED_*` environment variables.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(true)
    }

    /// Testing/internal constructor, does not read the environment or apply the system default
    #[must_use]
    #[cfg(test)]
    pub(crate) fn without_env() -> Self {
        Self::new(false)
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    /// This uses figment's `merge` operation, which prefers to _replace_ existing items.
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Applies the system default settings, at a lower priority than everything else
    pub fn apply_system_default(&mut self) {
        let f = std::mem::take(&mut self.data);
        self.data = f.join(SystemDefault {});
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// `T` is usually [Configuration], but it isn't intrinsically required to be.
    pub(crate) fn get<'de, T>(&self) -> Result<T, ConfigFileError>
    where
        T: Deserialize<'de>,
    {
        self.data
            .extract_lossy::<T>()
            .map_err(ConfigFileError::from)
    }

    /// Extracts the [`Configuration`] and checks it makes sense.
    ///
    /// The system defaults must already have been applied, or any field not set
    /// elsewhere will be reported missing.
    pub fn validate_configuration(&self) -> Result<Configuration> {
        let config = self.get::<Configuration>()?;
        config.validate()?;
        Ok(config)
    }
}
