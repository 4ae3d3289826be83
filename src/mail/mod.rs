pub mod mailgun;
pub mod mandrill;
pub mod registry;
pub mod transport;

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde_json::Value;

use crate::models::EmailRequest;

pub use registry::{Provider, ProviderRegistry, RegistryError};
pub use transport::{HttpTransport, Transport, TransportError};

/// Email delivery providers the relay can forward to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Mailgun,
    Mandrill,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Mailgun, ProviderId::Mandrill];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Mailgun => "mailgun",
            ProviderId::Mandrill => "mandrill",
        }
    }

    /// Wire-format mapping for this provider.
    pub fn formatter(self) -> &'static dyn Formatter {
        match self {
            ProviderId::Mailgun => &mailgun::MailgunFormatter,
            ProviderId::Mandrill => &mandrill::MandrillFormatter,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service name given at startup that matches no [`ProviderId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Service not supported. The following services are supported:{}", supported_list())]
pub struct UnsupportedProvider(pub String);

fn supported_list() -> String {
    ProviderId::ALL
        .iter()
        .map(|id| format!("\n{}", id))
        .collect()
}

impl FromStr for ProviderId {
    type Err = UnsupportedProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnsupportedProvider(s.to_string()))
    }
}

/// How a provider expects to be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Basic,
    EmbeddedKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderAuth {
    /// HTTP basic auth on the outbound call.
    Basic { username: String, password: String },
    /// Secret key carried inside the request body.
    EmbeddedKey(String),
}

impl ProviderAuth {
    pub fn mode(&self) -> AuthMode {
        match self {
            ProviderAuth::Basic { .. } => AuthMode::Basic,
            ProviderAuth::EmbeddedKey(_) => AuthMode::EmbeddedKey,
        }
    }
}

/// Fixed per-provider connection data, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: String,
    pub auth: ProviderAuth,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    Form(Vec<(String, String)>),
    Json(Value),
}

/// Fully described provider call, produced by a [`Formatter`] and executed
/// by a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub method: Method,
    pub basic_auth: Option<BasicAuth>,
    pub headers: Vec<(String, String)>,
    pub body: OutboundBody,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("expected {expected:?} credentials")]
    Credentials { expected: AuthMode },
}

/// Maps a validated request onto one provider's HTTP API.
pub trait Formatter: Send + Sync {
    fn auth_mode(&self) -> AuthMode;

    fn format(
        &self,
        config: &ProviderConfig,
        request: &EmailRequest,
    ) -> Result<OutboundRequest, FormatError>;
}

pub(crate) fn required<'a>(
    request: &'a EmailRequest,
    field: &'static str,
) -> Result<&'a str, FormatError> {
    request.text(field).ok_or(FormatError::MissingField(field))
}
