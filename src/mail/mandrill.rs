use reqwest::Method;
use serde_json::json;

use super::{
    required, AuthMode, FormatError, Formatter, OutboundBody, OutboundRequest, ProviderAuth,
    ProviderConfig,
};
use crate::models::EmailRequest;

pub const DEFAULT_URL: &str = "https://mandrillapp.com/api/1.0/messages/send.json";
pub const DEFAULT_API_KEY: &str = "password";
pub const USER_AGENT: &str = "Mandrill-Curl/1.0";

pub fn provider_config(url: String, key: String) -> ProviderConfig {
    ProviderConfig {
        url,
        auth: ProviderAuth::EmbeddedKey(key),
        headers: vec![
            ("Content-type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ],
    }
}

/// JSON message with the API key embedded in the payload.
pub struct MandrillFormatter;

impl Formatter for MandrillFormatter {
    fn auth_mode(&self) -> AuthMode {
        AuthMode::EmbeddedKey
    }

    fn format(
        &self,
        config: &ProviderConfig,
        request: &EmailRequest,
    ) -> Result<OutboundRequest, FormatError> {
        let ProviderAuth::EmbeddedKey(key) = &config.auth else {
            return Err(FormatError::Credentials {
                expected: AuthMode::EmbeddedKey,
            });
        };

        let payload = json!({
            "key": key,
            "message": {
                "from_email": required(request, "from")?,
                "from_name": required(request, "from_name")?,
                "to": [{
                    "email": required(request, "to")?,
                    "name": required(request, "to_name")?,
                }],
                "text": required(request, "body")?,
                "subject": required(request, "subject")?,
            },
        });

        Ok(OutboundRequest {
            url: config.url.clone(),
            method: Method::POST,
            basic_auth: None,
            headers: config.headers.clone(),
            body: OutboundBody::Json(payload),
        })
    }
}
