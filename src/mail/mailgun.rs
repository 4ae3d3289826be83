use reqwest::Method;

use super::{
    required, AuthMode, BasicAuth, FormatError, Formatter, OutboundBody, OutboundRequest,
    ProviderAuth, ProviderConfig,
};
use crate::models::EmailRequest;

pub const DEFAULT_URL: &str =
    "https://api.mailgun.net/v2/sandboxcb081ce4ab0a4647b7e00a55a2240301.mailgun.org/messages";
pub const USERNAME: &str = "api";
pub const DEFAULT_API_KEY: &str = "key";

pub fn provider_config(url: String, api_key: String) -> ProviderConfig {
    ProviderConfig {
        url,
        auth: ProviderAuth::Basic {
            username: USERNAME.to_string(),
            password: api_key,
        },
        headers: Vec::new(),
    }
}

/// Form-encoded message, authenticated with basic auth.
pub struct MailgunFormatter;

impl Formatter for MailgunFormatter {
    fn auth_mode(&self) -> AuthMode {
        AuthMode::Basic
    }

    fn format(
        &self,
        config: &ProviderConfig,
        request: &EmailRequest,
    ) -> Result<OutboundRequest, FormatError> {
        let ProviderAuth::Basic { username, password } = &config.auth else {
            return Err(FormatError::Credentials {
                expected: AuthMode::Basic,
            });
        };

        let fields = vec![
            (
                "to".to_string(),
                mailbox(required(request, "to_name")?, required(request, "to")?),
            ),
            (
                "from".to_string(),
                mailbox(required(request, "from_name")?, required(request, "from")?),
            ),
            ("text".to_string(), required(request, "body")?.to_string()),
            ("subject".to_string(), required(request, "subject")?.to_string()),
        ];

        Ok(OutboundRequest {
            url: config.url.clone(),
            method: Method::POST,
            basic_auth: Some(BasicAuth {
                username: username.clone(),
                password: password.clone(),
            }),
            headers: config.headers.clone(),
            body: OutboundBody::Form(fields),
        })
    }
}

/// `Name <address>`
fn mailbox(name: &str, address: &str) -> String {
    format!("{} <{}>", name, address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request() -> EmailRequest {
        EmailRequest::from_value(json!({
            "to": "a@b.com",
            "to_name": "Bo",
            "from": "c@d.com",
            "from_name": "Al",
            "subject": "Hi",
            "body": "hi",
        }))
        .unwrap()
    }

    #[test]
    fn test_format_message() {
        let config = provider_config(DEFAULT_URL.to_string(), "secret".to_string());
        let outbound = MailgunFormatter.format(&config, &request()).unwrap();

        assert_eq!(
            outbound,
            OutboundRequest {
                url: DEFAULT_URL.to_string(),
                method: Method::POST,
                basic_auth: Some(BasicAuth {
                    username: "api".to_string(),
                    password: "secret".to_string(),
                }),
                headers: vec![],
                body: OutboundBody::Form(vec![
                    ("to".to_string(), "Bo <a@b.com>".to_string()),
                    ("from".to_string(), "Al <c@d.com>".to_string()),
                    ("text".to_string(), "hi".to_string()),
                    ("subject".to_string(), "Hi".to_string()),
                ]),
            }
        );
    }

    #[test]
    fn test_missing_field() {
        let partial = EmailRequest::from_value(json!({
            "to": "a@b.com",
            "to_name": "Bo",
            "from": "c@d.com",
        }))
        .unwrap();
        let config = provider_config(DEFAULT_URL.to_string(), "secret".to_string());

        assert_eq!(
            MailgunFormatter.format(&config, &partial),
            Err(FormatError::MissingField("from_name"))
        );
    }

    #[test]
    fn test_rejects_embedded_key_credentials() {
        let config = ProviderConfig {
            url: DEFAULT_URL.to_string(),
            auth: ProviderAuth::EmbeddedKey("secret".to_string()),
            headers: vec![],
        };

        assert_eq!(
            MailgunFormatter.format(&config, &request()),
            Err(FormatError::Credentials {
                expected: AuthMode::Basic
            })
        );
    }
}
