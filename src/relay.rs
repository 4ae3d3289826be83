//! Request pipeline: parse, validate, transcode, format, forward.
//!
//! Each step is a hard gate; the first failure becomes the response text and
//! nothing after it runs. A request that clears every gate results in exactly
//! one provider call.

use std::sync::Arc;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::mail::{FormatError, HttpTransport, ProviderId, ProviderRegistry, Transport};
use crate::models::EmailRequest;
use crate::transcode::html_to_plain_text;
use crate::validation::Validator;

pub const SUCCESS_MESSAGE: &str = "Request successfully serviced.";

pub struct Relay {
    provider: ProviderId,
    registry: ProviderRegistry,
    validator: Validator,
    transport: Arc<dyn Transport>,
}

impl Relay {
    /// Builds the relay for the configured provider over a real HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_config(config)?;
        registry.ensure_registered(config.service)?;
        let transport = HttpTransport::new(config.provider_timeout())?;

        Ok(Self::new(config.service, registry, Arc::new(transport)))
    }

    pub fn new(
        provider: ProviderId,
        registry: ProviderRegistry,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            provider,
            registry,
            validator: Validator::default(),
            transport,
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Runs `raw` through the pipeline and forwards it to the active provider.
    ///
    /// Everything logged while handling, including transport events, is
    /// recorded inside a `relay` span carrying the request id and provider.
    pub async fn handle(&self, raw: &[u8]) -> Result<()> {
        let span = tracing::info_span!(
            "relay",
            request_id = %Uuid::new_v4(),
            provider = %self.provider,
        );

        async {
            let result = self.relay(raw).await;

            match &result {
                Ok(()) => tracing::info!("Email relayed"),
                Err(e) if e.is_panic() => {
                    tracing::error!(error = %e, "Internal consistency failure")
                }
                Err(e) if matches!(e, RelayError::Transport { .. }) => {
                    tracing::warn!(error = %e, "Provider call failed")
                }
                Err(e) => tracing::debug!(error = %e, "Request rejected"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn relay(&self, raw: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(raw).map_err(|_| RelayError::MalformedJson)?;
        let mut request = EmailRequest::from_value(value).ok_or(RelayError::NotJsonObject)?;

        let validation = self.validator.validate(&request);
        if !validation.valid {
            return Err(RelayError::Invalid(validation.reason));
        }

        let html = request.text("body").ok_or(RelayError::BodyMissing)?;
        let text = html_to_plain_text(html)?;
        request.set_text("body", text);

        let provider = self
            .registry
            .get(self.provider)
            .ok_or(RelayError::ServiceMissing)?;

        let outbound = provider.format(&request).map_err(|e| match e {
            FormatError::MissingField(field) => RelayError::FieldMissing(field),
            FormatError::Credentials { .. } => RelayError::Credentials(self.provider),
        })?;

        self.transport
            .send(outbound)
            .await
            .map_err(|kind| RelayError::Transport {
                provider: self.provider,
                kind,
            })
    }
}
