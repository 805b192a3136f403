use chatterbox_core::error::ChatterboxError;
use reqwest::StatusCode;

use crate::api_v1::ApiErrorEnvelope;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned non-success status {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("stream is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl OpenAiError {
    /// Build an [`OpenAiError::Api`] from a failed response, preferring the
    /// provider's own error message over the raw body.
    pub(crate) fn api(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        OpenAiError::Api { status, message }
    }
}

impl From<OpenAiError> for ChatterboxError {
    fn from(value: OpenAiError) -> Self {
        ChatterboxError::Backend(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_extracts_provider_message() {
        let err = OpenAiError::api(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#.into(),
        );

        assert_eq!(
            err.to_string(),
            "API returned non-success status 401 Unauthorized: Invalid API Key"
        );
    }

    #[test]
    fn api_error_keeps_non_json_body() {
        let err = OpenAiError::api(StatusCode::BAD_GATEWAY, "upstream down".into());

        assert!(err.to_string().ends_with("upstream down"));
    }
}
