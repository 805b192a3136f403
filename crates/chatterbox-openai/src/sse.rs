//! Incremental decoder for `text/event-stream` bodies.
//!
//! Only `data:` lines matter for chat completions; `event:`, `id:` and
//! comment lines are dropped.

use crate::error::OpenAiError;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseFrame {
    Data(String),
    Done,
}

#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    /// Feed raw bytes and return every frame completed by them.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Result<Vec<SseFrame>, OpenAiError> {
        // CR never appears unescaped inside JSON, so dropping it turns CRLF
        // framing into LF framing.
        self.buf.extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut frames = Vec::new();
        while let Some(pos) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.buf.drain(..pos + 2).collect();
            if let Some(frame) = parse_frame(&raw)? {
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    /// Flush a trailing frame that was not terminated by a blank line.
    pub(crate) fn finish(&mut self) -> Result<Option<SseFrame>, OpenAiError> {
        let raw = std::mem::take(&mut self.buf);
        parse_frame(&raw)
    }
}

fn parse_frame(raw: &[u8]) -> Result<Option<SseFrame>, OpenAiError> {
    let text = std::str::from_utf8(raw)?;

    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data.is_empty() {
        return Ok(None);
    }

    let data = data.join("\n");
    if data.trim() == "[DONE]" {
        return Ok(Some(SseFrame::Done));
    }
    Ok(Some(SseFrame::Data(data)))
}
