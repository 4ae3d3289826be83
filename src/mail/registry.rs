//! Provider lookup table, built once at startup.

use std::collections::HashMap;

use super::{AuthMode, FormatError, Formatter, OutboundRequest, ProviderConfig, ProviderId};
use crate::config::Config;
use crate::models::EmailRequest;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{provider} expects {expected:?} credentials but was configured with {found:?}")]
    AuthMismatch {
        provider: ProviderId,
        expected: AuthMode,
        found: AuthMode,
    },

    #[error("no formatter registered for {0}")]
    NotRegistered(ProviderId),
}

/// One registry entry: fixed connection data plus the wire-format mapping.
pub struct Provider {
    pub config: ProviderConfig,
    formatter: &'static dyn Formatter,
}

impl Provider {
    pub fn format(&self, request: &EmailRequest) -> Result<OutboundRequest, FormatError> {
        self.formatter.format(&self.config, request)
    }
}

#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Provider>,
}

impl ProviderRegistry {
    /// Registers every known provider with the connection data from `config`.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for id in ProviderId::ALL {
            registry.register(id, config.provider(id).clone())?;
        }
        Ok(registry)
    }

    /// Adds `id` with its formatter, rejecting credentials the formatter
    /// can't use.
    pub fn register(&mut self, id: ProviderId, config: ProviderConfig) -> Result<(), RegistryError> {
        let formatter = id.formatter();
        if formatter.auth_mode() != config.auth.mode() {
            return Err(RegistryError::AuthMismatch {
                provider: id,
                expected: formatter.auth_mode(),
                found: config.auth.mode(),
            });
        }

        self.providers.insert(id, Provider { config, formatter });
        Ok(())
    }

    /// Adds an entry without the credential check, for exercising the
    /// request-time guards.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(
        &mut self,
        id: ProviderId,
        config: ProviderConfig,
        formatter: &'static dyn Formatter,
    ) {
        self.providers.insert(id, Provider { config, formatter });
    }

    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(&id)
    }

    pub fn ensure_registered(&self, id: ProviderId) -> Result<(), RegistryError> {
        if self.providers.contains_key(&id) {
            Ok(())
        } else {
            Err(RegistryError::NotRegistered(id))
        }
    }
}
