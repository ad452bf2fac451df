//! SSE stream parsing logic
//!
//! Contains the stateful [`SseParser`] for accumulating lines and emitting
//! frames, and the line classifier it is built on.

use super::frame::{SseFrame, SseLine, DEFAULT_EVENT_TYPE};

/// Strip the single optional space after a field colon.
fn field_value(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Parse a single SSE line into its component type.
///
/// A trailing `\r` is removed first, so CRLF streams parse the same as LF.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    let (name, value) = match line.split_once(':') {
        Some((name, rest)) => (name, field_value(rest)),
        None => (line, ""),
    };

    match name {
        "event" => SseLine::Event(value.trim().to_string()),
        "data" => SseLine::Data(value.to_string()),
        _ => SseLine::Ignored,
    }
}

/// Stateful SSE parser that accumulates lines and emits complete frames
#[derive(Debug, Default)]
pub struct SseParser {
    /// Current event type being accumulated
    current_event_type: Option<String>,
    /// Accumulated data lines (SSE allows multiple data: lines)
    data_buffer: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the parser, returning a frame when the line completes
    /// one.
    ///
    /// A blank line with no accumulated data dispatches nothing, matching
    /// the EventSource rule that data-less events are dropped.
    pub fn feed_line(&mut self, line: &str) -> Option<SseFrame> {
        match parse_sse_line(line) {
            SseLine::Event(event_type) => {
                self.current_event_type = Some(event_type);
                None
            }
            SseLine::Data(data) => {
                self.data_buffer.push(data);
                None
            }
            SseLine::Empty => self.dispatch(),
            SseLine::Comment(_) | SseLine::Ignored => None,
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event_type = self.current_event_type.take();

        if self.data_buffer.is_empty() {
            return None;
        }

        let data = self.data_buffer.join("\n");
        self.data_buffer.clear();

        let event = event_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());

        Some(SseFrame { event, data })
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.current_event_type = None;
        self.data_buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
        assert_eq!(parse_sse_line("\r"), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": keep-alive"),
            SseLine::Comment("keep-alive".to_string())
        );
    }

    #[test]
    fn test_parse_event_line() {
        assert_eq!(
            parse_sse_line("event: connected"),
            SseLine::Event("connected".to_string())
        );
        assert_eq!(
            parse_sse_line("event:message"),
            SseLine::Event("message".to_string())
        );
    }

    #[test]
    fn test_parse_data_strips_single_space() {
        assert_eq!(
            parse_sse_line("data: {\"a\":1}"),
            SseLine::Data("{\"a\":1}".to_string())
        );
        assert_eq!(
            parse_sse_line("data:  indented"),
            SseLine::Data(" indented".to_string())
        );
        assert_eq!(parse_sse_line("data"), SseLine::Data(String::new()));
    }

    #[test]
    fn test_parse_ignored_fields() {
        assert_eq!(parse_sse_line("id: 42"), SseLine::Ignored);
        assert_eq!(parse_sse_line("retry: 3000"), SseLine::Ignored);
        assert_eq!(parse_sse_line("garbage"), SseLine::Ignored);
    }

    #[test]
    fn test_parser_connected_then_message() {
        let mut parser = SseParser::new();

        assert!(parser.feed_line("event: connected").is_none());
        assert!(parser.feed_line("data: {\"status\":\"connected\"}").is_none());
        let frame = parser.feed_line("").unwrap();
        assert_eq!(frame.event, "connected");
        assert_eq!(frame.data, "{\"status\":\"connected\"}");

        parser.feed_line("event: message");
        parser.feed_line("data: {\"type\":\"sms_received\",\"data\":{}}");
        let frame = parser.feed_line("").unwrap();
        assert!(frame.is_message());
        assert_eq!(frame.data, "{\"type\":\"sms_received\",\"data\":{}}");
    }

    #[test]
    fn test_parser_defaults_to_message_type() {
        let mut parser = SseParser::new();
        parser.feed_line("data: hello");
        assert_eq!(parser.feed_line(""), Some(SseFrame::message("hello")));
    }

    #[test]
    fn test_parser_joins_multiline_data() {
        let mut parser = SseParser::new();
        parser.feed_line("data: first");
        parser.feed_line("data: second");
        let frame = parser.feed_line("").unwrap();
        assert_eq!(frame.data, "first\nsecond");
    }

    #[test]
    fn test_parser_drops_event_without_data() {
        let mut parser = SseParser::new();
        parser.feed_line("event: ping");
        assert!(parser.feed_line("").is_none());

        // The type does not leak into the next frame
        parser.feed_line("data: x");
        assert_eq!(parser.feed_line("").unwrap().event, "message");
    }

    #[test]
    fn test_parser_ignores_comments_between_fields() {
        let mut parser = SseParser::new();
        parser.feed_line("event: message");
        parser.feed_line(": heartbeat");
        parser.feed_line("id: 7");
        parser.feed_line("data: ok");
        assert_eq!(parser.feed_line("").unwrap().data, "ok");
    }

    #[test]
    fn test_reset() {
        let mut parser = SseParser::new();
        parser.feed_line("event: message");
        parser.feed_line("data: partial");
        parser.reset();
        assert!(parser.feed_line("").is_none());
    }
}
