use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::mail::{ProviderId, TransportError};
use crate::transcode::TranscodeError;

/// Every way a relay request can end short of success. The `Display` text
/// is exactly what the caller receives.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Malformed JSON.")]
    MalformedJson,

    #[error("Failed to load JSON. Check that Content-Type is set correctly.")]
    NotJsonObject,

    #[error("{0}")]
    Invalid(String),

    #[error("Panic: Body field went missing!")]
    BodyMissing,

    #[error("Failed to convert HTML body to plain text:\n{0}")]
    Transcode(#[from] TranscodeError),

    #[error("Panic: Couldn't find email service!")]
    ServiceMissing,

    #[error("Panic: Required field does not exist after successful validation.")]
    FieldMissing(&'static str),

    #[error("Panic: Credentials for {0} are misconfigured!")]
    Credentials(ProviderId),

    #[error("{}", transport_message(.kind, .provider))]
    Transport {
        provider: ProviderId,
        kind: TransportError,
    },
}

fn transport_message(kind: &TransportError, provider: &ProviderId) -> String {
    match kind {
        TransportError::Connect => format!("Could not connect to {}.", provider),
        TransportError::Http => format!("An HTTPError occured using {}.", provider),
        TransportError::Timeout => format!("Connection timed out using {}.", provider),
        TransportError::TooManyRedirects => {
            format!("Too many redirects occured using {}.", provider)
        }
        TransportError::InvalidUrl => format!("Invalid URL using {}.", provider),
        TransportError::Request => format!("RequestException occured using {}.", provider),
    }
}

impl RelayError {
    /// Internal-consistency failures that correct validation should rule out.
    pub fn is_panic(&self) -> bool {
        matches!(
            self,
            RelayError::BodyMissing
                | RelayError::ServiceMissing
                | RelayError::FieldMissing(_)
                | RelayError::Credentials(_)
        )
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Every outcome is reported as 200 with a plain-text message.
        (StatusCode::OK, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_messages_name_the_provider() {
        let cases = [
            (TransportError::Connect, "Could not connect to mailgun."),
            (TransportError::Http, "An HTTPError occured using mailgun."),
            (TransportError::Timeout, "Connection timed out using mailgun."),
            (
                TransportError::TooManyRedirects,
                "Too many redirects occured using mailgun.",
            ),
            (TransportError::InvalidUrl, "Invalid URL using mailgun."),
            (TransportError::Request, "RequestException occured using mailgun."),
        ];

        for (kind, expected) in cases {
            let err = RelayError::Transport {
                provider: ProviderId::Mailgun,
                kind,
            };
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_transcode_message_appends_reason() {
        let err = RelayError::from(TranscodeError);

        assert_eq!(
            err.to_string(),
            "Failed to convert HTML body to plain text:\nFailed to convert HTML body to plain text."
        );
    }

    #[test]
    fn test_panic_classification() {
        assert!(RelayError::BodyMissing.is_panic());
        assert!(RelayError::Credentials(ProviderId::Mandrill).is_panic());
        assert!(!RelayError::MalformedJson.is_panic());
        assert!(RelayError::ServiceMissing.to_string().starts_with("Panic:"));
        assert!(RelayError::FieldMissing("to").to_string().starts_with("Panic:"));
    }

    #[tokio::test]
    async fn test_response_is_plain_text_ok() {
        let response = RelayError::MalformedJson.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Malformed JSON.");
    }
}
