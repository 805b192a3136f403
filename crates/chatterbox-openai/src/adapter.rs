use std::{env, sync::Arc, time::Duration};

use chatterbox_core::error::{ChatterboxError, Result};

use crate::{
    api_v1::DEFAULT_REASONING_FIELDS,
    client::{DEFAULT_CONNECT_TIMEOUT, OpenAiClient},
};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const LOCAL_BASE_URL: &str = "http://localhost:8000/v1";

/// Key sent to self-hosted servers that do not check authentication.
pub const PLACEHOLDER_API_KEY: &str = "EMPTY";

/// Wires the HTTP client [`OpenAiClient`] into a value that implements
/// [`chatterbox_core::provider::EventSource`].
///
/// * stores the API key and base URL,
/// * owns a shareable, connection-pooled `reqwest::Client`,
/// * knows which delta fields carry reasoning text for this provider.
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
    pub(crate) reasoning_fields: Vec<String>,
}

impl OpenAiAdapter {
    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }

    /// Delta fields consulted for reasoning text, in order.
    pub fn reasoning_fields(&self) -> &[String] {
        &self.reasoning_fields
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use chatterbox_openai::OpenAiAdapterBuilder;
///
/// // Groq's hosted API, key from `GROQ_API_KEY`.
/// let groq = OpenAiAdapterBuilder::groq_from_env()
///     .build()
///     .expect("GROQ_API_KEY must be set");
///
/// // A vLLM server on the local network.
/// let local = OpenAiAdapterBuilder::local("http://192.168.0.10:8000/v1")
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) api_key_var: Option<&'static str>,
    pub(crate) base_url: Option<String>,
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) reasoning_fields: Option<Vec<String>>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `OPENAI_API_KEY` and, if present, `OPENAI_BASE_URL`.
    ///
    /// Missing keys only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            api_key_var: Some("OPENAI_API_KEY"),
            base_url: env::var("OPENAI_BASE_URL").ok(),
            ..Self::default()
        }
    }

    /// Target Groq's OpenAI-compatible endpoint with `GROQ_API_KEY`.
    pub fn groq_from_env() -> Self {
        Self {
            api_key: env::var("GROQ_API_KEY").ok(),
            api_key_var: Some("GROQ_API_KEY"),
            base_url: Some(GROQ_BASE_URL.to_owned()),
            ..Self::default()
        }
    }

    /// Target a self-hosted server that ignores the API key.
    pub fn local(base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(PLACEHOLDER_API_KEY.to_owned()),
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Override which delta fields are read as reasoning text, in lookup
    /// order. Defaults to [`DEFAULT_REASONING_FIELDS`].
    pub fn with_reasoning_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reasoning_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`ChatterboxError::InvalidConfig`] – if the API key is missing.
    /// * [`ChatterboxError::Backend`] – if the HTTP client can't be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self.api_key.ok_or_else(|| {
            ChatterboxError::InvalidConfig(match self.api_key_var {
                Some(var) => format!("missing env variable: `{var}`"),
                None => "missing API key".into(),
            })
        })?;

        let client = OpenAiClient::new(
            api_key,
            self.base_url,
            self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        )?;

        let reasoning_fields = self.reasoning_fields.unwrap_or_else(|| {
            DEFAULT_REASONING_FIELDS
                .iter()
                .map(|field| (*field).to_owned())
                .collect()
        });

        Ok(OpenAiAdapter {
            client: Arc::new(client),
            reasoning_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_variable() {
        let builder = OpenAiAdapterBuilder {
            api_key_var: Some("GROQ_API_KEY"),
            ..OpenAiAdapterBuilder::default()
        };

        let Err(err) = builder.build() else {
            panic!("build should fail without a key");
        };
        assert!(matches!(err, ChatterboxError::InvalidConfig(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn local_server_uses_placeholder_key() {
        let adapter = OpenAiAdapterBuilder::local(LOCAL_BASE_URL).build().unwrap();

        assert_eq!(adapter.client().base_url(), LOCAL_BASE_URL);
        assert_eq!(adapter.reasoning_fields(), ["reasoning", "reasoning_content"]);
    }

    #[test]
    fn reasoning_fields_can_be_overridden() {
        let adapter = OpenAiAdapterBuilder::new()
            .with_api_key("k")
            .with_reasoning_fields(["thinking"])
            .build()
            .unwrap();

        assert_eq!(adapter.reasoning_fields(), ["thinking"]);
        assert_eq!(adapter.client().base_url(), crate::client::DEFAULT_BASE_URL);
    }
}
