use async_stream::try_stream;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    api_v1::{ChatCompletionChunkResponse, ChatCompletionRequest},
    error::OpenAiError,
    sse::{SseDecoder, SseFrame},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal HTTP client for the OpenAI-compatible *chat/completions* endpoint.
///
/// * Streaming only; every call returns a stream of decoded SSE chunks.
/// * Works against OpenAI, Groq and self-hosted servers (vLLM, llama.cpp, …)
///   as long as they speak the same wire format.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl OpenAiClient {
    /// Build a client with a default `reqwest` client: Rustls TLS and a
    /// connect timeout. There is no overall request timeout since a stream
    /// may legitimately run for minutes.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self::with_http(api_key, http, base_url))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Self {
            api_key: api_key.into(),
            http,
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn headers(&self) -> Result<HeaderMap, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        Ok(headers)
    }

    /// Perform a **streaming** chat completion.
    ///
    /// Frames whose JSON does not parse are logged and skipped. The stream
    /// ends after `[DONE]` or when the server closes the body.
    pub fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + Send + '_ {
        request.stream = Some(true);
        let url = format!("{}/chat/completions", self.base);

        try_stream! {
            let headers = self.headers()?;
            debug!(%url, model = %request.model, "sending streaming chat completion");

            let resp = self.http.post(url).headers(headers).json(&request).send().await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                Err::<(), _>(OpenAiError::api(status, body))?;
                return;
            }

            let chunks = decode_chunks(resp.bytes_stream());
            futures_util::pin_mut!(chunks);

            while let Some(chunk) = chunks.next().await {
                yield chunk?;
            }
        }
    }
}

/// Decode a raw SSE body into completion chunks, however the transport
/// happens to split it. Stops at `[DONE]`.
fn decode_chunks<S, B>(
    body: S,
) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + Send
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send,
    B: AsRef<[u8]> + Send,
{
    try_stream! {
        futures_util::pin_mut!(body);
        let mut decoder = SseDecoder::default();

        while let Some(bytes) = body.next().await {
            let bytes = bytes?;

            for frame in decoder.push(bytes.as_ref())? {
                match frame {
                    SseFrame::Done => return,
                    SseFrame::Data(data) => {
                        if let Some(parsed) = parse_chunk(&data) {
                            yield parsed;
                        }
                    }
                }
            }
        }

        if let Some(SseFrame::Data(data)) = decoder.finish()? {
            if let Some(parsed) = parse_chunk(&data) {
                yield parsed;
            }
        }
    }
}

fn parse_chunk(data: &str) -> Option<ChatCompletionChunkResponse> {
    match serde_json::from_str(data) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(error = %err, frame = data, "skipping malformed stream chunk");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let client = OpenAiClient::with_http(
            "key",
            HttpClient::new(),
            Some("http://localhost:8000/v1/".into()),
        );

        assert_eq!(client.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn malformed_chunk_is_skipped() {
        assert!(parse_chunk("{not json").is_none());
        assert!(parse_chunk(r#"{"choices": []}"#).is_some());
    }

    fn body(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], reqwest::Error>> {
        futures_util::stream::iter(parts.to_vec().into_iter().map(|part| Ok(part.as_bytes())))
    }

    async fn contents(parts: &[&'static str]) -> Vec<String> {
        decode_chunks(body(parts))
            .map(|chunk| {
                let chunk = chunk.unwrap();
                chunk.choices[0].delta.content.clone().unwrap_or_default()
            })
            .collect()
            .await
    }

    #[tokio::test]
    async fn frames_split_across_body_chunks_are_reassembled() {
        let parts = [
            "data: {\"choices\": [{\"delta\": {\"con",
            "tent\": \"Hel\"}}]}\n",
            "\ndata: {\"choices\": [{\"delta\": {\"content\": \"lo\"}}]}\r\n\r\n",
        ];

        assert_eq!(contents(&parts).await, ["Hel", "lo"]);
    }

    #[tokio::test]
    async fn done_frame_stops_decoding() {
        let parts = [
            "data: {\"choices\": [{\"delta\": {\"content\": \"a\"}}]}\n\ndata: [DO",
            "NE]\n\ndata: {\"choices\": [{\"delta\": {\"content\": \"late\"}}]}\n\n",
        ];

        assert_eq!(contents(&parts).await, ["a"]);
    }

    #[tokio::test]
    async fn malformed_frame_between_good_ones_is_skipped() {
        let parts = [
            "data: {\"choices\": [{\"delta\": {\"content\": \"a\"}}]}\n\n",
            "data: {oops\n\n",
            "data: {\"choices\": [{\"delta\": {\"content\": \"b\"}}]}",
        ];

        assert_eq!(contents(&parts).await, ["a", "b"]);
    }

    #[test]
    fn header_with_newline_key_is_rejected() {
        let client = OpenAiClient::with_http("bad\nkey", HttpClient::new(), None);

        assert!(matches!(client.headers(), Err(OpenAiError::InvalidHeader(_))));
    }
}
