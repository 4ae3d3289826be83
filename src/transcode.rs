//! HTML body to plain text conversion.

use std::panic;

/// Column width the plain-text rendering wraps at.
pub const BODY_WIDTH: usize = 78;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to convert HTML body to plain text.")]
pub struct TranscodeError;

/// Render `html` as plain text. Converter errors and panics both come back
/// as [`TranscodeError`].
pub fn html_to_plain_text(html: &str) -> Result<String, TranscodeError> {
    let rendered = panic::catch_unwind(|| html2text::from_read(html.as_bytes(), BODY_WIDTH));

    match rendered {
        Ok(Ok(text)) => Ok(text.trim_end().to_string()),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "HTML conversion failed");
            Err(TranscodeError)
        }
        Err(_) => {
            tracing::error!("HTML converter panicked");
            Err(TranscodeError)
        }
    }
}
