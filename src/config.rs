use std::env;
use std::time::Duration;

use crate::mail::{mailgun, mandrill, ProviderConfig, ProviderId, UnsupportedProvider};

pub const DEFAULT_SERVICE: &str = "mailgun";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Provider every request is forwarded to.
    pub service: ProviderId,
    pub provider_timeout_seconds: u64,
    pub mailgun: ProviderConfig,
    pub mandrill: ProviderConfig,
}

impl Config {
    /// Builds the config for `service`, reading the rest from the environment.
    pub fn from_env(service: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(service, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        service: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            service: service.parse()?,
            server_host: var("SERVER_HOST", "127.0.0.1"),
            server_port: var("SERVER_PORT", "5000")
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            provider_timeout_seconds: var("PROVIDER_TIMEOUT_SECONDS", "30")
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            mailgun: mailgun::provider_config(
                var("MAILGUN_URL", mailgun::DEFAULT_URL),
                var("MAILGUN_API_KEY", mailgun::DEFAULT_API_KEY),
            ),
            mandrill: mandrill::provider_config(
                var("MANDRILL_URL", mandrill::DEFAULT_URL),
                var("MANDRILL_API_KEY", mandrill::DEFAULT_API_KEY),
            ),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    pub fn provider(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::Mailgun => &self.mailgun,
            ProviderId::Mandrill => &self.mandrill,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnsupportedService(#[from] UnsupportedProvider),
    #[error("Invalid server port")]
    InvalidPort,
    #[error("PROVIDER_TIMEOUT_SECONDS must be a positive number of seconds")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::ProviderAuth;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(DEFAULT_SERVICE, lookup(&[])).unwrap();

        assert_eq!(config.service, ProviderId::Mailgun);
        assert_eq!(config.server_addr(), "127.0.0.1:5000");
        assert_eq!(config.provider_timeout(), Duration::from_secs(30));
        assert_eq!(config.mailgun.url, mailgun::DEFAULT_URL);
        assert_eq!(
            config.mailgun.auth,
            ProviderAuth::Basic {
                username: "api".to_string(),
                password: "key".to_string(),
            }
        );
        assert_eq!(config.mandrill.url, mandrill::DEFAULT_URL);
        assert_eq!(
            config.mandrill.auth,
            ProviderAuth::EmbeddedKey("password".to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(
            "mandrill",
            lookup(&[
                ("SERVER_PORT", "8025"),
                ("MANDRILL_URL", "http://localhost:9000/send.json"),
                ("MANDRILL_API_KEY", "live-key"),
                ("PROVIDER_TIMEOUT_SECONDS", "5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.service, ProviderId::Mandrill);
        assert_eq!(config.server_port, 8025);
        assert_eq!(config.provider_timeout_seconds, 5);
        assert_eq!(
            config.provider(ProviderId::Mandrill).url,
            "http://localhost:9000/send.json"
        );
        assert_eq!(
            config.provider(ProviderId::Mandrill).auth,
            ProviderAuth::EmbeddedKey("live-key".to_string())
        );
    }

    #[test]
    fn test_unknown_service_fails_with_supported_list() {
        let err = Config::from_lookup("sendgrid", lookup(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::UnsupportedService(_)));
        assert_eq!(
            err.to_string(),
            "Service not supported. The following services are supported:\nmailgun\nmandrill"
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            Config::from_lookup("mailgun", lookup(&[("SERVER_PORT", "http")])),
            Err(ConfigError::InvalidPort)
        ));
        assert!(matches!(
            Config::from_lookup("mailgun", lookup(&[("PROVIDER_TIMEOUT_SECONDS", "0")])),
            Err(ConfigError::InvalidTimeout)
        ));
    }
}
