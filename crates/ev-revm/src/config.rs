//! Configuration helpers for switching custom precompiles off at startup.

use crate::evm::EvEvm;
use alloy_primitives::Address;
use std::{collections::HashSet, env, fmt, str::FromStr};
use thiserror::Error;

/// Environment variable listing custom precompile addresses to disable.
pub const DISABLED_PRECOMPILES_ENV: &str = "EV_DISABLED_PRECOMPILES";

/// User-facing configuration for the custom precompile set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomPrecompilesConfig {
    /// Addresses whose custom precompile starts out disabled.
    pub disabled: HashSet<Address>,
}

impl CustomPrecompilesConfig {
    /// Constructs a configuration disabling the given addresses.
    pub fn new(disabled: impl IntoIterator<Item = Address>) -> Self {
        Self {
            disabled: disabled.into_iter().collect(),
        }
    }

    /// Returns `true` if the precompile at `address` is configured as disabled.
    pub fn is_disabled(&self, address: &Address) -> bool {
        self.disabled.contains(address)
    }

    /// Parses a comma-separated list of addresses.
    ///
    /// Whitespace around entries is ignored, as are empty entries.
    pub fn from_str(value: &str) -> Result<Self, ConfigError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_address)
            .collect::<Result<HashSet<_>, _>>()
            .map(|disabled| Self { disabled })
    }

    /// Loads the configuration from an environment variable.
    ///
    /// The variable must contain comma-separated hex-encoded addresses (with or
    /// without a `0x` prefix).
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let raw = env::var(var).map_err(|_| ConfigError::MissingEnv { var: var.into() })?;
        if raw.trim().is_empty() {
            return Err(ConfigError::EmptyEnv { var: var.into() });
        }
        Self::from_str(raw.trim())
    }

    /// Loads the configuration from [`DISABLED_PRECOMPILES_ENV`], treating an
    /// unset or empty variable as "nothing disabled".
    pub fn from_default_env() -> Result<Self, ConfigError> {
        match Self::from_env(DISABLED_PRECOMPILES_ENV) {
            Ok(config) => Ok(config),
            Err(ConfigError::MissingEnv { .. } | ConfigError::EmptyEnv { .. }) => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Disables every configured address registered as a custom precompile on
    /// `evm`.
    ///
    /// Returns the configured addresses with no custom precompile behind them.
    pub fn apply<H>(&self, evm: &EvEvm<H>) -> Vec<Address> {
        let mut unknown = Vec::new();
        for address in &self.disabled {
            match evm.precompiles().custom(address) {
                Some(precompile) => {
                    precompile.set_disabled(true);
                    tracing::info!(
                        target: "ev_revm::config",
                        ?address,
                        name = precompile.name(),
                        "custom precompile disabled by configuration"
                    );
                }
                None => {
                    tracing::warn!(
                        target: "ev_revm::config",
                        ?address,
                        "configured precompile address is not registered"
                    );
                    unknown.push(*address);
                }
            }
        }
        unknown
    }
}

impl FromIterator<Address> for CustomPrecompilesConfig {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Errors that can occur while building a [`CustomPrecompilesConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The environment variable was not set.
    #[error("environment variable {var} is not set")]
    MissingEnv {
        /// Name of the environment variable that was not present.
        var: String,
    },
    /// The environment variable was empty or whitespace.
    #[error("environment variable {var} is empty")]
    EmptyEnv {
        /// Name of the environment variable that evaluated to an empty string.
        var: String,
    },
    /// An entry could not be parsed as an address.
    #[error("invalid precompile address: {0}")]
    InvalidAddress(AddressParseDisplay),
}

/// Wrapper for formatting address parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParseDisplay(String);

impl fmt::Display for AddressParseDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_address(value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value).map_err(|err| {
        ConfigError::InvalidAddress(AddressParseDisplay(format!("{value}: {err}")))
    })
}
