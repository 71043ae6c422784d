//! Live detection-event stream.
//!
//! `GET /api/events/stream` holds a persistent connection delivering one
//! JSON event per line. Some deployments frame lines with an SSE-style
//! `data:` prefix; both forms are accepted. Malformed lines are skipped.

use domain::LiveEvent;
use reqwest::Response;
use tracing::debug;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// Opens the live event stream. Dropping the returned stream closes the
    /// connection.
    pub async fn stream_events(&self) -> Result<EventStream, ClientError> {
        let response = self.send(self.stream_get("/api/events/stream")).await?;
        Ok(EventStream::new(response))
    }
}

/// Line-framed reader over the streaming response body.
pub struct EventStream {
    response: Response,
    buffer: Vec<u8>,
    done: bool,
}

impl EventStream {
    fn new(response: Response) -> Self {
        Self {
            response,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Next decodable event, or `None` once the server closes the stream.
    pub async fn next_event(&mut self) -> Result<Option<LiveEvent>, ClientError> {
        loop {
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                if let Some(event) = parse_line(&line[..line.len() - 1]) {
                    return Ok(Some(event));
                }
            }

            if self.done {
                // Trailing bytes without a final newline still count as a line.
                if !self.buffer.is_empty() {
                    let rest = std::mem::take(&mut self.buffer);
                    if let Some(event) = parse_line(&rest) {
                        return Ok(Some(event));
                    }
                }
                return Ok(None);
            }

            match self.response.chunk().await? {
                Some(chunk) => self.buffer.extend_from_slice(&chunk),
                None => self.done = true,
            }
        }
    }

    /// Closes the connection.
    pub fn close(self) {}
}

fn parse_line(raw: &[u8]) -> Option<LiveEvent> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    let text = text.strip_prefix("data:").map(str::trim).unwrap_or(text);
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(err) => {
            debug!(error = %err, "skipping malformed stream line");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::EventKind;

    const EVENT: &str = r#"{"eventId":"e1","logId":"q1","type":"PATTERN","severity":"HIGH","occurredAt":"2024-02-01T03:12:00","sqlRaw":"DROP TABLE users"}"#;

    #[test]
    fn test_parse_plain_line() {
        let event = parse_line(EVENT.as_bytes()).unwrap();
        assert_eq!(event.event_id, "e1");
        assert_eq!(event.kind, EventKind::Pattern);
    }

    #[test]
    fn test_parse_data_prefixed_line() {
        let line = format!("data: {}", EVENT);
        assert!(parse_line(line.as_bytes()).is_some());
    }

    #[test]
    fn test_malformed_and_blank_lines_are_skipped() {
        assert!(parse_line(b"{broken json").is_none());
        assert!(parse_line(b"").is_none());
        assert!(parse_line(b"   ").is_none());
        assert!(parse_line(&[0xff, 0xfe]).is_none());
    }
}
